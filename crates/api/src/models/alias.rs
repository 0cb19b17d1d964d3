//! Alias expressions.
//!
//! An alias expression describes the type a factory call produces:
//!
//! ```text
//! expression := operand ("|" operand)*
//! operand    := term "[]"?
//! term       := "@" | type-name
//! ```
//!
//! `@` stands for the discriminator value itself, `[]` turns the operand into
//! "array of" it, and several operands form an ambiguous union.

use super::types::EvaluatedType;

pub const SELF_REFERENCE: &str = "@";
pub const ARRAY_SUFFIX: &str = "[]";
pub const UNION_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasTerm {
    /// `@`: the discriminator value, read as a type name.
    Discriminator,
    /// A literal type name.
    TypeName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasOperand {
    pub term: AliasTerm,
    pub is_array: bool,
}

impl AliasOperand {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let (body, is_array) = match raw.strip_suffix(ARRAY_SUFFIX) {
            Some(body) => (body.trim_end(), true),
            None => (raw, false),
        };
        if body.is_empty() {
            return None;
        }
        let term = if body == SELF_REFERENCE {
            AliasTerm::Discriminator
        } else {
            AliasTerm::TypeName(body.to_string())
        };
        Some(Self { term, is_array })
    }

    /// Resolve this operand; `None` when it cannot name a type.
    pub fn resolve(&self, discriminator: Option<&str>) -> Option<EvaluatedType> {
        let name = match &self.term {
            AliasTerm::Discriminator => discriminator.filter(|d| !d.is_empty())?,
            AliasTerm::TypeName(name) => name.as_str(),
        };
        let ty = EvaluatedType::from_type_name(name)?;
        if self.is_array {
            Some(EvaluatedType::array_of(ty))
        } else {
            Some(ty)
        }
    }
}

/// A parsed alias expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AliasExpression {
    operands: Vec<AliasOperand>,
}

impl AliasExpression {
    /// Parse an alias expression. Empty operands are dropped, so the result
    /// may have no operands at all.
    pub fn parse(raw: &str) -> Self {
        Self {
            operands: raw
                .split(UNION_SEPARATOR)
                .filter_map(AliasOperand::parse)
                .collect(),
        }
    }

    pub fn operands(&self) -> &[AliasOperand] {
        &self.operands
    }

    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    /// Resolve every operand and union the non-empty results.
    pub fn resolve(&self, discriminator: Option<&str>) -> Option<EvaluatedType> {
        let resolved = self
            .operands
            .iter()
            .filter_map(|operand| operand.resolve(discriminator))
            .collect();
        EvaluatedType::union(resolved)
    }
}

/// Parse and resolve in one go.
pub fn resolve_alias(raw: &str, discriminator: Option<&str>) -> Option<EvaluatedType> {
    AliasExpression::parse(raw).resolve(discriminator)
}
