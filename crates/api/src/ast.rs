//! The slice of the host syntax tree this crate reads.
//!
//! The host parser owns the real tree; it hands over (or exports as JSON) just
//! enough structure to find marker declarations and read call arguments.

use serde::{Deserialize, Serialize};

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceModule {
    /// Portable path of the file. Modules without a path are never indexed.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl SourceModule {
    pub fn new(path: impl Into<String>, statements: Vec<Statement>) -> Self {
        Self {
            path: Some(path.into()),
            statements,
        }
    }

    /// The module path, if present and non-empty.
    pub fn portable_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    Namespace {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        body: Vec<Statement>,
    },
    Expression {
        expr: Expr,
    },
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// `name(args)` or `receiver->name(args)`.
    Call(CallExpr),
    /// `Class::name(args)`.
    StaticCall(StaticCallExpr),
    Scalar(Scalar),
    /// `Class::CONSTANT`, including `Class::class`.
    ClassConstant(ClassConstantAccess),
    Array(ArrayLiteral),
    /// A bare name reference, as written.
    Name { name: String },
    Variable { name: String },
    Comment { text: String },
    Other,
}

impl Expr {
    pub fn is_comment(&self) -> bool {
        matches!(self, Expr::Comment { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    #[serde(default)]
    pub receiver: Option<Box<Expr>>,
    pub name: String,
    #[serde(default)]
    pub args: Vec<Expr>,
}

impl CallExpr {
    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            receiver: None,
            name: name.into(),
            args,
        }
    }

    pub fn method(receiver: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            receiver: Some(Box::new(receiver)),
            name: name.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticCallExpr {
    /// Class reference as written (`\App\Container` or `Container`).
    pub class: String,
    pub name: String,
    #[serde(default)]
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Other,
}

/// A literal, with its source text (string literals keep their quotes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scalar {
    pub scalar_kind: ScalarKind,
    pub value: String,
}

impl Scalar {
    pub fn string(quoted: impl Into<String>) -> Self {
        Self {
            scalar_kind: ScalarKind::String,
            value: quoted.into(),
        }
    }

    pub fn int(value: i64) -> Self {
        Self {
            scalar_kind: ScalarKind::Int,
            value: value.to_string(),
        }
    }

    /// Unquoted value of a string literal.
    pub fn string_value(&self) -> Option<String> {
        match self.scalar_kind {
            ScalarKind::String => Some(strip_quotes(&self.value)),
            _ => None,
        }
    }

    pub fn int_value(&self) -> Option<i64> {
        match self.scalar_kind {
            ScalarKind::Int => self.value.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassConstantAccess {
    /// Class reference as written.
    pub class: String,
    pub constant: String,
}

impl ClassConstantAccess {
    /// `true` for `X::class`.
    pub fn is_class_name_constant(&self) -> bool {
        self.constant.eq_ignore_ascii_case("class")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayLiteral {
    #[serde(default)]
    pub elements: Vec<ArrayElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayElement {
    #[serde(default)]
    pub key: Option<Expr>,
    pub value: Expr,
}

/// Remove surrounding quotes from a string literal and undo the escapes that
/// matter for type names (`\\` and the quote character itself).
pub fn strip_quotes(raw: &str) -> String {
    let quote = match raw.chars().next() {
        Some(q @ ('\'' | '"')) if raw.len() >= 2 && raw.ends_with(q) => q,
        _ => return raw.to_string(),
    };
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&next) if next == '\\' || next == quote => {
                    out.push(next);
                    chars.next();
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
    }
    out
}
