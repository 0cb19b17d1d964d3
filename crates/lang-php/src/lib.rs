//! Factory method resolution for PHP containers.
//!
//! # Architecture
//!
//! ```text
//! SignatureExtractor  →  marker namespace  →  Catalog (per project)
//!                                                 │
//! FactoryGoalEvaluatorFactory                     │ prospective signatures
//!       │ classify_call (cheap filter)            ▼
//!       ▼                                   transition (state machine)
//! FactoryCallEvaluator ── receiver sub-goal ──► host framework
//! ```

pub mod classify;
pub mod extract;
pub mod goals;

pub use classify::{
    ArgumentOrigin, ArgumentValue, ClassifiedCall, FactoryFlags, classify_call,
    looks_like_class_name, method_flags,
};
pub use extract::{SignatureExtractor, extract_signatures};
pub use goals::{
    FactoryCallEvaluator, FactoryGoalEvaluatorFactory, FactoryMethodReturnTypeEvaluator,
    ResolutionState,
};
