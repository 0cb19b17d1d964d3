use super::machine::{CallSite, Effect, ResolutionEvent, ResolutionState, transition};
use super::matching::SignatureSource;
use factoscope_api::models::EvaluatedType;
use factoscope_core::Catalog;
use factoscope_plugin::{DefaultEvaluators, Goal, GoalEvaluator, GoalState, HostModel};
use std::sync::{Arc, Weak};

/// Evaluates a prospective factory call expression.
///
/// Holds only a weak handle to the project catalog and touches it while
/// handling the receiver result, never across a suspension.
pub struct FactoryCallEvaluator {
    goal: Goal,
    site: CallSite,
    state: ResolutionState,
    catalog: Weak<Catalog>,
    host: Arc<dyn HostModel>,
    defaults: Arc<dyn DefaultEvaluators>,
    delegate: Option<Box<dyn GoalEvaluator>>,
}

impl FactoryCallEvaluator {
    pub fn new(
        goal: Goal,
        site: CallSite,
        catalog: Weak<Catalog>,
        host: Arc<dyn HostModel>,
        defaults: Arc<dyn DefaultEvaluators>,
    ) -> Self {
        Self {
            goal,
            site,
            state: ResolutionState::Init,
            catalog,
            host,
            defaults,
            delegate: None,
        }
    }

    pub fn state(&self) -> &ResolutionState {
        &self.state
    }

    pub fn is_delegating(&self) -> bool {
        self.delegate.is_some()
    }

    fn step(&mut self, event: ResolutionEvent<'_>) -> Vec<Goal> {
        let (next, effect) = transition(
            &self.state,
            event,
            &self.site,
            &self.catalog as &dyn SignatureSource,
            self.host.as_ref(),
        );
        tracing::trace!(
            "factory call {}: {:?} -> {:?}",
            self.site.call.method_name,
            self.state,
            next
        );
        self.state = next;

        match effect {
            Effect::Await(subgoal) => vec![subgoal],
            Effect::Finish | Effect::Stay => vec![],
            Effect::Delegate => {
                let mut delegate = self.defaults.method_call_evaluator(&self.goal);
                let subgoals = delegate.init();
                self.delegate = Some(delegate);
                subgoals
            }
        }
    }
}

impl GoalEvaluator for FactoryCallEvaluator {
    fn goal(&self) -> &Goal {
        &self.goal
    }

    fn init(&mut self) -> Vec<Goal> {
        if let Some(delegate) = self.delegate.as_mut() {
            return delegate.init();
        }
        self.step(ResolutionEvent::Start)
    }

    fn sub_goal_done(
        &mut self,
        subgoal: &Goal,
        result: Option<EvaluatedType>,
        state: GoalState,
    ) -> Vec<Goal> {
        if let Some(delegate) = self.delegate.as_mut() {
            return delegate.sub_goal_done(subgoal, result, state);
        }
        self.step(ResolutionEvent::ReceiverTyped {
            result: result.as_ref(),
            state,
        })
    }

    fn produce_result(&mut self) -> Option<EvaluatedType> {
        if let Some(delegate) = self.delegate.as_mut() {
            return delegate.produce_result();
        }
        match &self.state {
            ResolutionState::Resolved(result) => result.clone(),
            _ => None,
        }
    }
}
