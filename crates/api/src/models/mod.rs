pub mod alias;
pub mod naming;
pub mod project;
pub mod signature;
pub mod types;

pub use alias::{AliasExpression, AliasOperand, AliasTerm, resolve_alias};
pub use project::ProjectId;
pub use signature::{FactoryMethodSignature, SignatureKind};
pub use types::{ClassType, EvaluatedType, SimpleType};
