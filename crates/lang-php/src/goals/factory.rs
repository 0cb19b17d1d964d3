use super::factory_call::FactoryCallEvaluator;
use super::machine::CallSite;
use super::return_type::FactoryMethodReturnTypeEvaluator;
use crate::classify::{FactoryFlags, classify_call};
use factoscope_api::ast::Expr;
use factoscope_api::models::SignatureKind;
use factoscope_api::models::naming::strip_leading_separator;
use factoscope_core::CatalogRegistry;
use factoscope_plugin::{
    DefaultEvaluators, Goal, GoalEvaluator, GoalEvaluatorFactory, HostModel,
};
use std::sync::Arc;

/// Hands out factory evaluators for the goals that may be factory calls.
pub struct FactoryGoalEvaluatorFactory {
    registry: Arc<CatalogRegistry>,
    host: Arc<dyn HostModel>,
    defaults: Arc<dyn DefaultEvaluators>,
}

impl FactoryGoalEvaluatorFactory {
    pub fn new(
        registry: Arc<CatalogRegistry>,
        host: Arc<dyn HostModel>,
        defaults: Arc<dyn DefaultEvaluators>,
    ) -> Self {
        Self {
            registry,
            host,
            defaults,
        }
    }
}

impl GoalEvaluatorFactory for FactoryGoalEvaluatorFactory {
    fn create_evaluator(&self, goal: &Goal) -> Option<Box<dyn GoalEvaluator>> {
        let context = goal.context();
        let catalog = self.registry.get(&context.project);
        if !catalog.is_enrolled() {
            return None;
        }

        match goal {
            Goal::ExpressionType { context, expression } => {
                let Expr::Call(call) = expression else {
                    return None;
                };
                // A call can only resolve through a signature for its name.
                if !catalog.has_method(&call.name, SignatureKind::INSTANCE_METHOD) {
                    return None;
                }
                let classified =
                    classify_call(call, FactoryFlags::ALIASES, context, self.host.as_ref())?;
                let site = CallSite {
                    context: context.clone(),
                    receiver: call.receiver.as_deref().cloned(),
                    call: classified,
                };
                Some(Box::new(FactoryCallEvaluator::new(
                    goal.clone(),
                    site,
                    Arc::downgrade(&catalog),
                    self.host.clone(),
                    self.defaults.clone(),
                )))
            }
            Goal::MethodReturnType(method) => {
                let name = strip_leading_separator(&method.method_name);
                if !catalog.has_method(name, SignatureKind::INSTANCE_METHOD) {
                    return None;
                }
                Some(Box::new(FactoryMethodReturnTypeEvaluator::new(
                    goal.clone(),
                    Arc::downgrade(&catalog),
                    self.host.clone(),
                )))
            }
        }
    }
}
