use super::naming::{NAMESPACE_DELIMITER, same_type_name, strip_leading_separator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A class type, identified by its fully-qualified name.
///
/// The name is stored without the leading namespace separator and rendered
/// with it.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassType {
    name: String,
}

impl ClassType {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: strip_leading_separator(name.as_ref()).to_string(),
        }
    }

    /// Fully-qualified name without the leading separator.
    pub fn fqn(&self) -> &str {
        &self.name
    }

    /// Fully-qualified name with the leading separator, as the host prints it.
    pub fn type_name(&self) -> String {
        format!("{}{}", NAMESPACE_DELIMITER, self.name)
    }
}

impl PartialEq for ClassType {
    fn eq(&self, other: &Self) -> bool {
        same_type_name(&self.name, &other.name)
    }
}

impl std::hash::Hash for ClassType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", NAMESPACE_DELIMITER, self.name)
    }
}

/// Scalar pseudo-types that never name a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimpleType {
    Int,
    Float,
    String,
    Bool,
    Array,
    Object,
    Null,
    Void,
    Mixed,
    Resource,
    Callable,
    Iterable,
}

impl SimpleType {
    /// Map a written type name to a scalar pseudo-type, if it is one.
    pub fn from_name(name: &str) -> Option<Self> {
        let simple = match name.to_ascii_lowercase().as_str() {
            "int" | "integer" => SimpleType::Int,
            "float" | "double" | "real" => SimpleType::Float,
            "string" => SimpleType::String,
            "bool" | "boolean" => SimpleType::Bool,
            "array" => SimpleType::Array,
            "object" => SimpleType::Object,
            "null" => SimpleType::Null,
            "void" => SimpleType::Void,
            "mixed" => SimpleType::Mixed,
            "resource" => SimpleType::Resource,
            "callable" => SimpleType::Callable,
            "iterable" => SimpleType::Iterable,
            _ => return None,
        };
        Some(simple)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimpleType::Int => "int",
            SimpleType::Float => "float",
            SimpleType::String => "string",
            SimpleType::Bool => "bool",
            SimpleType::Array => "array",
            SimpleType::Object => "object",
            SimpleType::Null => "null",
            SimpleType::Void => "void",
            SimpleType::Mixed => "mixed",
            SimpleType::Resource => "resource",
            SimpleType::Callable => "callable",
            SimpleType::Iterable => "iterable",
        }
    }
}

/// A type produced by evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EvaluatedType {
    Class(ClassType),
    Simple(SimpleType),
    /// "Array of" the inner type.
    ArrayOf(Box<EvaluatedType>),
    /// More than one type is possible; all candidates are kept.
    Ambiguous(Vec<EvaluatedType>),
}

impl EvaluatedType {
    pub fn class(name: impl AsRef<str>) -> Self {
        EvaluatedType::Class(ClassType::new(name))
    }

    pub fn array_of(inner: EvaluatedType) -> Self {
        EvaluatedType::ArrayOf(Box::new(inner))
    }

    /// Resolve a written type name: scalar pseudo-types first, classes otherwise.
    pub fn from_type_name(name: &str) -> Option<Self> {
        if name.is_empty() {
            return None;
        }
        if let Some(simple) = SimpleType::from_name(name) {
            return Some(EvaluatedType::Simple(simple));
        }
        let stripped = strip_leading_separator(name);
        if stripped.is_empty() {
            return None;
        }
        Some(EvaluatedType::class(stripped))
    }

    /// Collapse a list of candidates: none, exactly one, or an ambiguous union.
    pub fn union(mut types: Vec<EvaluatedType>) -> Option<Self> {
        match types.len() {
            0 => None,
            1 => types.pop(),
            _ => Some(EvaluatedType::Ambiguous(types)),
        }
    }

    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            EvaluatedType::Class(class) => Some(class),
            _ => None,
        }
    }
}

impl fmt::Display for EvaluatedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluatedType::Class(class) => write!(f, "{}", class),
            EvaluatedType::Simple(simple) => write!(f, "{}", simple.as_str()),
            EvaluatedType::ArrayOf(inner) => write!(f, "{}[]", inner),
            EvaluatedType::Ambiguous(types) => {
                let parts: Vec<String> = types.iter().map(|t| t.to_string()).collect();
                write!(f, "{}", parts.join("|"))
            }
        }
    }
}
