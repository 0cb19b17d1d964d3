//! The resolution state machine of one factory call, as data.
//!
//! ```text
//!            Start (no receiver)
//!   Init ──────────────────────────────► NotAFactoryCall
//!     │ Start                                   ▲
//!     ▼                                         │ not a class / no signature
//!   AwaitingReceiverType ──ReceiverTyped────────┤
//!                                               │ signature matched
//!                                               ▼
//!                                            Resolved
//! ```
//!
//! [`transition`] is pure apart from the signature and host queries it is
//! handed; the evaluator owns the state value and performs the effects.

use super::matching::{SignatureSource, find_signature, resolve_call};
use crate::classify::ClassifiedCall;
use factoscope_api::ast::Expr;
use factoscope_api::models::EvaluatedType;
use factoscope_plugin::{Goal, GoalContext, GoalState, HostModel};

#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionState {
    Init,
    AwaitingReceiverType,
    /// Terminal; `None` is the "no result" outcome.
    Resolved(Option<EvaluatedType>),
    /// Terminal; the host's default evaluator takes over.
    NotAFactoryCall,
}

impl ResolutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResolutionState::Resolved(_) | ResolutionState::NotAFactoryCall
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ResolutionEvent<'a> {
    Start,
    ReceiverTyped {
        result: Option<&'a EvaluatedType>,
        state: GoalState,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Suspend until this sub-goal is resolved.
    Await(Goal),
    /// A terminal state was reached with a result of our own.
    Finish,
    /// Hand the goal to the host's default evaluator.
    Delegate,
    /// The event does not apply to the current state.
    Stay,
}

/// The static facts about the call being resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSite {
    pub context: GoalContext,
    pub receiver: Option<Expr>,
    pub call: ClassifiedCall,
}

pub fn transition(
    state: &ResolutionState,
    event: ResolutionEvent<'_>,
    site: &CallSite,
    signatures: &dyn SignatureSource,
    host: &dyn HostModel,
) -> (ResolutionState, Effect) {
    match (state, event) {
        (ResolutionState::Init, ResolutionEvent::Start) => match &site.receiver {
            None => (ResolutionState::NotAFactoryCall, Effect::Delegate),
            Some(receiver) => (
                ResolutionState::AwaitingReceiverType,
                Effect::Await(Goal::expression(site.context.clone(), receiver.clone())),
            ),
        },
        (
            ResolutionState::AwaitingReceiverType,
            ResolutionEvent::ReceiverTyped {
                result,
                state: goal_state,
            },
        ) => {
            let Some(class) = result.and_then(EvaluatedType::as_class) else {
                return (ResolutionState::NotAFactoryCall, Effect::Delegate);
            };
            let prospective = signatures.prospective_signatures(&site.call.method_name);
            let Some(signature) = find_signature(&prospective, class, &site.context, host) else {
                return (ResolutionState::NotAFactoryCall, Effect::Delegate);
            };
            if goal_state == GoalState::Pruned {
                return (ResolutionState::Resolved(None), Effect::Finish);
            }
            (
                ResolutionState::Resolved(resolve_call(signature, &site.call)),
                Effect::Finish,
            )
        }
        (current, _) => (current.clone(), Effect::Stay),
    }
}
