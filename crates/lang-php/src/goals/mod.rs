//! Goal evaluators that resolve factory calls.

mod factory;
mod factory_call;
pub mod machine;
mod matching;
mod return_type;

pub use factory::FactoryGoalEvaluatorFactory;
pub use factory_call::FactoryCallEvaluator;
pub use machine::{CallSite, Effect, ResolutionEvent, ResolutionState, transition};
pub use matching::{SignatureSource, find_signature, find_signature_for_declaration, resolve_call};
pub use return_type::FactoryMethodReturnTypeEvaluator;
