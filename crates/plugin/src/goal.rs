//! Goals and goal evaluators.
//!
//! The host analysis framework pulls types on demand: it asks a factory for
//! an evaluator per goal, calls [`GoalEvaluator::init`], resolves every
//! sub-goal the evaluator returns, feeds each result back through
//! [`GoalEvaluator::sub_goal_done`], and finally asks for
//! [`GoalEvaluator::produce_result`].

use factoscope_api::ast::Expr;
use factoscope_api::models::{EvaluatedType, ProjectId};

/// Lexical context of a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalContext {
    pub project: ProjectId,
}

impl GoalContext {
    pub fn new(project: impl Into<ProjectId>) -> Self {
        Self {
            project: project.into(),
        }
    }
}

/// "Evaluate the return type of this named method", used when the host
/// already knows which declaration is being invoked.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodReturnTypeGoal {
    pub context: GoalContext,
    pub method_name: String,
    /// Textual call arguments, by position.
    pub arg_names: Option<Vec<String>>,
    /// Receiver type, if already evaluated.
    pub evaluated_type: Option<EvaluatedType>,
    /// Candidate receiver declarations (fully-qualified names).
    pub types: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Goal {
    /// "Evaluate the type of this expression."
    ExpressionType { context: GoalContext, expression: Expr },
    MethodReturnType(MethodReturnTypeGoal),
}

impl Goal {
    pub fn expression(context: GoalContext, expression: Expr) -> Self {
        Goal::ExpressionType {
            context,
            expression,
        }
    }

    pub fn context(&self) -> &GoalContext {
        match self {
            Goal::ExpressionType { context, .. } => context,
            Goal::MethodReturnType(goal) => &goal.context,
        }
    }
}

/// How a sub-goal finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalState {
    Done,
    /// The framework no longer needs a result for this branch.
    Pruned,
    /// The sub-goal was cut because it recursed into itself.
    Recursive,
}

/// A suspendable evaluator for one goal.
pub trait GoalEvaluator: Send {
    fn goal(&self) -> &Goal;

    /// Start evaluation; returns the sub-goals to resolve first.
    fn init(&mut self) -> Vec<Goal>;

    /// Resume with the outcome of one sub-goal; returns further sub-goals.
    fn sub_goal_done(
        &mut self,
        subgoal: &Goal,
        result: Option<EvaluatedType>,
        state: GoalState,
    ) -> Vec<Goal>;

    /// Final result, once every sub-goal has been delivered.
    fn produce_result(&mut self) -> Option<EvaluatedType>;
}

/// Creates evaluators for the goals it understands.
pub trait GoalEvaluatorFactory: Send + Sync {
    /// `None` means "not mine": the framework asks the next factory.
    fn create_evaluator(&self, goal: &Goal) -> Option<Box<dyn GoalEvaluator>>;
}

/// An evaluator that answers immediately with a fixed result.
pub struct FixedResultEvaluator {
    goal: Goal,
    result: Option<EvaluatedType>,
}

impl FixedResultEvaluator {
    pub fn new(goal: Goal, result: Option<EvaluatedType>) -> Self {
        Self { goal, result }
    }
}

impl GoalEvaluator for FixedResultEvaluator {
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
        self.result.clone()
    }
}
