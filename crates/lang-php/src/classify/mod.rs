//! Cheap, sub-goal free filtering of call expressions.
//!
//! A call is a factory candidate when its method name carries factory flags
//! and its first argument can be read as a discriminator value.

mod heuristic;

pub use heuristic::looks_like_class_name;

use bitflags::bitflags;
use factoscope_api::ast::{CallExpr, Expr};
use factoscope_api::models::naming::strip_leading_separator;
use factoscope_plugin::{GoalContext, NameResolver};

pub const BUILD_METHOD: &str = "build";
pub const MAKE_METHOD: &str = "make";

bitflags! {
    /// What a factory call may resolve through.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FactoryFlags: u8 {
        /// The discriminator may itself name the resulting class.
        const CLASSES = 0x1;
        /// The discriminator may be looked up in an alias table.
        const ALIASES = 0x2;
    }
}

/// Flags implied by the method name alone.
pub fn method_flags(name: &str) -> FactoryFlags {
    if name.eq_ignore_ascii_case(BUILD_METHOD) {
        FactoryFlags::CLASSES
    } else if name.eq_ignore_ascii_case(MAKE_METHOD) {
        FactoryFlags::CLASSES | FactoryFlags::ALIASES
    } else {
        FactoryFlags::empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentOrigin {
    StringLiteral,
    /// `X::class`
    ClassConstant,
}

/// A call argument read as a discriminator candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentValue {
    pub text: String,
    pub origin: ArgumentOrigin,
}

impl ArgumentValue {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: ArgumentOrigin::StringLiteral,
        }
    }

    pub fn class_name(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: ArgumentOrigin::ClassConstant,
        }
    }
}

/// A call that passed classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCall {
    pub method_name: String,
    pub flags: FactoryFlags,
    /// Non-comment arguments by position; `None` where the argument is not
    /// a readable literal.
    pub arguments: Vec<Option<ArgumentValue>>,
}

impl ClassifiedCall {
    /// `None` when the call has fewer arguments than `index + 1`.
    pub fn argument(&self, index: usize) -> Option<Option<&ArgumentValue>> {
        self.arguments.get(index).map(Option::as_ref)
    }

    pub fn may_name_class(&self) -> bool {
        self.flags.contains(FactoryFlags::CLASSES)
    }

    pub fn may_use_aliases(&self) -> bool {
        self.flags.contains(FactoryFlags::ALIASES)
    }
}

/// Read one argument as a discriminator value.
pub fn read_argument(
    expr: &Expr,
    context: &GoalContext,
    names: &(impl NameResolver + ?Sized),
) -> Option<ArgumentValue> {
    match expr {
        Expr::Scalar(scalar) => scalar.string_value().map(ArgumentValue::literal),
        Expr::ClassConstant(access) if access.is_class_name_constant() => {
            let resolved = names
                .resolve_class_name(&access.class, context)
                .map(|name| strip_leading_separator(&name).to_string())
                .filter(|name| !name.is_empty());
            let name = match resolved {
                Some(name) => name,
                None => strip_leading_separator(&access.class).to_string(),
            };
            (!name.is_empty()).then(|| ArgumentValue::class_name(name))
        }
        _ => None,
    }
}

/// Classify a call. `extra` adds flags known from elsewhere, such as a
/// catalog signature for the method name.
pub fn classify_call(
    call: &CallExpr,
    extra: FactoryFlags,
    context: &GoalContext,
    names: &(impl NameResolver + ?Sized),
) -> Option<ClassifiedCall> {
    let mut flags = method_flags(&call.name) | extra;
    if flags.is_empty() {
        return None;
    }

    let arguments: Vec<Option<ArgumentValue>> = call
        .args
        .iter()
        .filter(|arg| !arg.is_comment())
        .map(|arg| read_argument(arg, context, names))
        .collect();

    let first = arguments.first()?.as_ref()?;
    if first.origin == ArgumentOrigin::ClassConstant {
        flags |= FactoryFlags::CLASSES;
    }

    Some(ClassifiedCall {
        method_name: call.name.clone(),
        flags,
        arguments,
    })
}
