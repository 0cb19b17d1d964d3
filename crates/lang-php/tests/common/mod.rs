//! Shared fixtures: a mock host model, mock default evaluators and a small
//! synchronous goal driver standing in for the host framework.

#![allow(dead_code)]

use factoscope_api::ast::{
    ArrayElement, ArrayLiteral, CallExpr, ClassConstantAccess, Expr, Scalar, SourceModule,
    Statement, StaticCallExpr,
};
use factoscope_api::models::{EvaluatedType, ProjectId};
use factoscope_core::{CatalogConfig, CatalogRegistry};
use factoscope_php::{FactoryGoalEvaluatorFactory, SignatureExtractor};
use factoscope_plugin::{
    DefaultEvaluators, FixedResultEvaluator, Goal, GoalContext, GoalEvaluator,
    GoalEvaluatorFactory, GoalState, NameResolver, TypeHierarchy,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

pub const PROJECT: &str = "/ws/app";
pub const META_PATH: &str = "/ws/app/.phpstorm.meta.php";

/// What the mock default evaluator answers, so delegation is observable.
pub const HOST_DEFAULT: &str = "Host\\MethodResult";

/// A mock host model.
///
/// Can be built using a fluent API.
#[derive(Default)]
pub struct MockHost {
    parents: HashMap<String, Vec<String>>,
    variables: HashMap<String, EvaluatedType>,
    imports: HashMap<String, String>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a class and its direct super class.
    pub fn add_class(mut self, fqn: &str, super_class: Option<&str>) -> Self {
        self.parents.insert(
            fqn.to_ascii_lowercase(),
            super_class.map(|s| s.to_string()).into_iter().collect(),
        );
        self
    }

    /// Give a variable a type.
    pub fn add_variable(mut self, name: &str, ty: EvaluatedType) -> Self {
        self.variables.insert(name.to_string(), ty);
        self
    }

    /// Make a short name resolvable, as a `use` import would.
    pub fn add_import(mut self, written: &str, fqn: &str) -> Self {
        self.imports.insert(written.to_string(), fqn.to_string());
        self
    }

    pub fn variable_type(&self, name: &str) -> Option<EvaluatedType> {
        self.variables.get(name).cloned()
    }
}

impl TypeHierarchy for MockHost {
    fn super_classes(&self, fqn: &str) -> Vec<String> {
        self.parents
            .get(&fqn.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}

impl NameResolver for MockHost {
    fn resolve_class_name(&self, written: &str, _context: &GoalContext) -> Option<String> {
        self.imports.get(written).cloned()
    }
}

/// Default evaluators that answer every method call with [`HOST_DEFAULT`].
#[derive(Default)]
pub struct MockDefaults {
    created: AtomicUsize,
}

impl MockDefaults {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl DefaultEvaluators for MockDefaults {
    fn method_call_evaluator(&self, goal: &Goal) -> Box<dyn GoalEvaluator> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Box::new(FixedResultEvaluator::new(
            goal.clone(),
            Some(EvaluatedType::class(HOST_DEFAULT)),
        ))
    }
}

/// Pulls goals to completion the way the host framework would, one sub-goal
/// at a time.
pub struct Driver<'a> {
    pub factory: &'a dyn GoalEvaluatorFactory,
    pub host: &'a MockHost,
    pub defaults: &'a MockDefaults,
    /// Report every sub-goal as pruned.
    pub prune: bool,
}

impl Driver<'_> {
    pub fn evaluate(&self, goal: &Goal) -> Option<EvaluatedType> {
        let mut evaluator = self
            .factory
            .create_evaluator(goal)
            .unwrap_or_else(|| self.host_evaluator(goal));
        self.run(evaluator.as_mut())
    }

    pub fn run(&self, evaluator: &mut dyn GoalEvaluator) -> Option<EvaluatedType> {
        let mut pending: VecDeque<Goal> = evaluator.init().into();
        while let Some(subgoal) = pending.pop_front() {
            let result = self.evaluate(&subgoal);
            let state = if self.prune {
                GoalState::Pruned
            } else {
                GoalState::Done
            };
            pending.extend(evaluator.sub_goal_done(&subgoal, result, state));
        }
        evaluator.produce_result()
    }

    fn host_evaluator(&self, goal: &Goal) -> Box<dyn GoalEvaluator> {
        match goal {
            Goal::ExpressionType {
                expression: Expr::Variable { name },
                ..
            } => Box::new(FixedResultEvaluator::new(
                goal.clone(),
                self.host.variable_type(name),
            )),
            Goal::ExpressionType {
                expression: Expr::Call(_),
                ..
            } => self.defaults.method_call_evaluator(goal),
            _ => Box::new(FixedResultEvaluator::new(goal.clone(), None)),
        }
    }
}

/// A project with its own state directory, host and evaluator factory.
pub struct Fixture {
    _temp: TempDir,
    pub registry: Arc<CatalogRegistry>,
    pub host: Arc<MockHost>,
    pub defaults: Arc<MockDefaults>,
    pub factory: FactoryGoalEvaluatorFactory,
}

impl Fixture {
    pub fn new(host: MockHost) -> Self {
        let temp = TempDir::new().unwrap();
        let registry = Arc::new(CatalogRegistry::new(CatalogConfig::new(temp.path())));
        let host = Arc::new(host);
        let defaults = Arc::new(MockDefaults::default());
        let factory =
            FactoryGoalEvaluatorFactory::new(registry.clone(), host.clone(), defaults.clone());
        Self {
            _temp: temp,
            registry,
            host,
            defaults,
            factory,
        }
    }

    pub fn project(&self) -> ProjectId {
        ProjectId::from(PROJECT)
    }

    pub fn context(&self) -> GoalContext {
        GoalContext::new(PROJECT)
    }

    /// Index a marker module into the project catalog.
    pub fn index(&self, module: &SourceModule) -> usize {
        SignatureExtractor::new(&self.registry).index_module(&self.project(), module, true)
    }

    pub fn driver(&self) -> Driver<'_> {
        Driver {
            factory: &self.factory,
            host: &self.host,
            defaults: &self.defaults,
            prune: false,
        }
    }

    pub fn resolve(&self, expression: Expr) -> Option<EvaluatedType> {
        self.driver()
            .evaluate(&Goal::expression(self.context(), expression))
    }
}

// ---- AST builders ----

pub fn string(value: &str) -> Expr {
    Expr::Scalar(Scalar::string(format!("'{}'", value.replace('\\', "\\\\"))))
}

pub fn class_ref(class: &str) -> Expr {
    Expr::ClassConstant(ClassConstantAccess {
        class: class.to_string(),
        constant: "class".to_string(),
    })
}

pub fn variable(name: &str) -> Expr {
    Expr::Variable {
        name: name.to_string(),
    }
}

/// `$receiver->method(args)`
pub fn method_call(receiver: &str, method: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr::method(variable(receiver), method, args))
}

/// `override(\Class::method(index), map([key => value, ...]))`
pub fn override_decl(class: &str, method: &str, index: i64, entries: Vec<(&str, Expr)>) -> Statement {
    Statement::Expression {
        expr: Expr::Call(CallExpr::function(
            "override",
            vec![
                Expr::StaticCall(StaticCallExpr {
                    class: class.to_string(),
                    name: method.to_string(),
                    args: vec![Expr::Scalar(Scalar::int(index))],
                }),
                Expr::Call(CallExpr::function(
                    "map",
                    vec![Expr::Array(ArrayLiteral {
                        elements: entries
                            .into_iter()
                            .map(|(key, value)| ArrayElement {
                                key: Some(string(key)),
                                value,
                            })
                            .collect(),
                    })],
                )),
            ],
        )),
    }
}

pub fn meta_module(path: &str, declarations: Vec<Statement>) -> SourceModule {
    SourceModule::new(
        path,
        vec![Statement::Namespace {
            name: Some("PHPSTORM_META".to_string()),
            body: declarations,
        }],
    )
}
