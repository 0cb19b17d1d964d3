use factoscope_api::models::ProjectId;
use factoscope_core::CatalogRegistry;
use factoscope_php::FactoryMethodReturnTypeEvaluator;
use factoscope_plugin::{Goal, GoalContext, GoalEvaluator, MethodReturnTypeGoal, NoOpHostModel};
use std::sync::Arc;

/// Resolve through the declaration-level entry point. Without a host model
/// only the receiver class itself is matched, not its ancestors.
pub fn run(
    registry: &CatalogRegistry,
    project: &ProjectId,
    class: &str,
    method: &str,
    args: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let goal = Goal::MethodReturnType(MethodReturnTypeGoal {
        context: GoalContext::new(project.clone()),
        method_name: method.to_string(),
        arg_names: Some(args),
        evaluated_type: None,
        types: Some(vec![class.to_string()]),
    });

    let catalog = registry.get(project);
    let mut evaluator =
        FactoryMethodReturnTypeEvaluator::new(goal, Arc::downgrade(&catalog), Arc::new(NoOpHostModel));
    match evaluator.produce_result() {
        Some(resolved) => println!("{}", resolved),
        None => println!("(no result)"),
    }
    Ok(())
}
