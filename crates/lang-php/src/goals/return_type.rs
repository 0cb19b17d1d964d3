use super::matching::{SignatureSource, find_signature, find_signature_for_declaration};
use factoscope_api::ast::strip_quotes;
use factoscope_api::models::naming::strip_leading_separator;
use factoscope_api::models::{EvaluatedType, FactoryMethodSignature, resolve_alias};
use factoscope_core::Catalog;
use factoscope_plugin::{Goal, GoalEvaluator, GoalState, HostModel, MethodReturnTypeGoal};
use std::sync::{Arc, Weak};

/// Return type of a known factory method declaration, given the textual
/// call arguments. Needs no sub-goals.
pub struct FactoryMethodReturnTypeEvaluator {
    goal: Goal,
    catalog: Weak<Catalog>,
    host: Arc<dyn HostModel>,
    result: Option<Option<EvaluatedType>>,
}

impl FactoryMethodReturnTypeEvaluator {
    pub fn new(goal: Goal, catalog: Weak<Catalog>, host: Arc<dyn HostModel>) -> Self {
        Self {
            goal,
            catalog,
            host,
            result: None,
        }
    }

    fn compute(&self) -> Option<EvaluatedType> {
        let Goal::MethodReturnType(goal) = &self.goal else {
            return None;
        };
        let method = strip_leading_separator(&goal.method_name);
        let prospective = self.catalog.prospective_signatures(method);
        if prospective.is_empty() {
            return None;
        }

        let signature = self.match_receiver(goal, &prospective)?;
        let discriminator = goal
            .arg_names
            .as_ref()
            .and_then(|args| args.get(signature.discriminator_index))
            .map(|arg| strip_quotes(arg.trim()))
            .filter(|arg| !arg.is_empty());

        let value = discriminator.as_deref();
        resolve_alias(signature.alias_for(value), value)
    }

    fn match_receiver<'s>(
        &self,
        goal: &MethodReturnTypeGoal,
        prospective: &'s [FactoryMethodSignature],
    ) -> Option<&'s FactoryMethodSignature> {
        let host = self.host.as_ref();
        if let Some(class) = goal.evaluated_type.as_ref().and_then(EvaluatedType::as_class) {
            return find_signature(prospective, class, &goal.context, host);
        }
        goal.types
            .iter()
            .flatten()
            .find_map(|fqn| find_signature_for_declaration(prospective, fqn, host))
    }
}

impl GoalEvaluator for FactoryMethodReturnTypeEvaluator {
    fn goal(&self) -> &Goal {
        &self.goal
    }

    fn init(&mut self) -> Vec<Goal> {
        vec![]
    }

    fn sub_goal_done(
        &mut self,
        _subgoal: &Goal,
        _result: Option<EvaluatedType>,
        _state: GoalState,
    ) -> Vec<Goal> {
        vec![]
    }

    fn produce_result(&mut self) -> Option<EvaluatedType> {
        if self.result.is_none() {
            self.result = Some(self.compute());
        }
        self.result.clone().flatten()
    }
}
