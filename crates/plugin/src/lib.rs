//! Interfaces between the factory resolution engine and its host.

pub mod goal;
pub mod host;

pub use goal::{
    FixedResultEvaluator, Goal, GoalContext, GoalEvaluator, GoalEvaluatorFactory, GoalState,
    MethodReturnTypeGoal,
};
pub use host::{
    AlwaysEnrolled, DefaultEvaluators, EnrollmentProbe, HostModel, NameResolver, NoOpHostModel,
    TypeHierarchy, find_in_hierarchy_dyn,
};
