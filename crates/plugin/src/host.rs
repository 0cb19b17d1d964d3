//! Read-only queries into the host's semantic model.
//!
//! These traits abstract the host engine so the resolution logic can run
//! against the real model, a test mock, or nothing at all.

use crate::goal::{Goal, GoalContext, GoalEvaluator};
use factoscope_api::models::{ClassType, ProjectId};

/// Provides inheritance information for declared types.
pub trait TypeHierarchy: Send + Sync {
    /// Model declarations an evaluated class type stands for, as
    /// fully-qualified names. Usually just the class itself.
    fn model_types(&self, class: &ClassType, _context: &GoalContext) -> Vec<String> {
        vec![class.fqn().to_string()]
    }

    /// Direct super classes of a declaration, nearest first.
    fn super_classes(&self, fqn: &str) -> Vec<String>;
}

/// Resolves names written in source against the surrounding module
/// (namespace, `use` imports).
pub trait NameResolver: Send + Sync {
    /// Resolve a class reference as written at `context`; `None` when the
    /// host cannot resolve it to exactly one declaration.
    fn resolve_class_name(&self, written: &str, context: &GoalContext) -> Option<String>;
}

/// The combined host model.
pub trait HostModel: TypeHierarchy + NameResolver {
    /// Walk a declaration and its ancestors depth-first, nearest first,
    /// stopping at the first `Some` returned by `visit`.
    fn find_in_hierarchy<T>(
        &self,
        fqn: &str,
        visit: &mut dyn FnMut(&str) -> Option<T>,
    ) -> Option<T>
    where
        Self: Sized,
    {
        let mut seen = std::collections::HashSet::new();
        find_in_hierarchy_dyn(self, fqn, visit, &mut seen)
    }
}

impl<T: TypeHierarchy + NameResolver> HostModel for T {}

/// Depth-first ancestor walk usable through `dyn HostModel`.
pub fn find_in_hierarchy_dyn<T>(
    model: &(impl TypeHierarchy + ?Sized),
    fqn: &str,
    visit: &mut dyn FnMut(&str) -> Option<T>,
    seen: &mut std::collections::HashSet<String>,
) -> Option<T> {
    if fqn.is_empty() || !seen.insert(fqn.to_ascii_lowercase()) {
        return None;
    }
    if let Some(found) = visit(fqn) {
        return Some(found);
    }
    for parent in model.super_classes(fqn) {
        if let Some(found) = find_in_hierarchy_dyn(model, &parent, visit, seen) {
            return Some(found);
        }
    }
    None
}

/// The host's own evaluators, used when a call turns out not to be a
/// factory call.
pub trait DefaultEvaluators: Send + Sync {
    /// Ordinary method-call evaluator for an expression goal.
    fn method_call_evaluator(&self, goal: &Goal) -> Box<dyn GoalEvaluator>;
}

/// Answers whether a project is enrolled for factory resolution.
pub trait EnrollmentProbe: Send + Sync {
    fn is_enrolled(&self, project: &ProjectId) -> bool;
}

/// Every project is enrolled.
pub struct AlwaysEnrolled;

impl EnrollmentProbe for AlwaysEnrolled {
    fn is_enrolled(&self, _project: &ProjectId) -> bool {
        true
    }
}

/// A host model that knows nothing: no ancestors, no name resolution.
pub struct NoOpHostModel;

impl TypeHierarchy for NoOpHostModel {
    fn super_classes(&self, _fqn: &str) -> Vec<String> {
        vec![]
    }
}

impl NameResolver for NoOpHostModel {
    fn resolve_class_name(&self, _written: &str, _context: &GoalContext) -> Option<String> {
        None
    }
}
