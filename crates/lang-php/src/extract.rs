//! Discovery of factory method signatures in marker declarations.
//!
//! Only the marker namespace is read:
//!
//! ```php
//! namespace PHPSTORM_META {
//!     override(\App\Container::make(0), map([
//!         '' => '@',
//!         'cache' => \App\ObjectCache::class,
//!     ]));
//! }
//! ```
//!
//! Anything that does not have exactly this shape is skipped without a trace.

use factoscope_api::ast::{ArrayLiteral, CallExpr, Expr, SourceModule, Statement, StaticCallExpr};
use factoscope_api::models::FactoryMethodSignature;
use factoscope_api::models::naming::{is_fully_qualified, strip_leading_separator};
use factoscope_api::models::ProjectId;
use factoscope_core::CatalogRegistry;

pub const MARKER_NAMESPACE: &str = "PHPSTORM_META";
pub const OVERRIDE_FUNCTION: &str = "override";
pub const MAP_FUNCTION: &str = "map";

/// Every signature declared by `module`, tagged with its path.
pub fn extract_signatures(module: &SourceModule) -> Vec<FactoryMethodSignature> {
    let Some(path) = module.portable_path() else {
        return Vec::new();
    };

    module
        .statements
        .iter()
        .filter_map(|statement| match statement {
            Statement::Namespace { name: Some(name), body } if is_marker_namespace(name) => {
                Some(body)
            }
            _ => None,
        })
        .flatten()
        .filter_map(|statement| match statement {
            Statement::Expression {
                expr: Expr::Call(call),
            } => read_override(path, call),
            _ => None,
        })
        .collect()
}

fn is_marker_namespace(name: &str) -> bool {
    strip_leading_separator(name.trim()).eq_ignore_ascii_case(MARKER_NAMESPACE)
}

fn significant_args(args: &[Expr]) -> impl Iterator<Item = &Expr> {
    args.iter().filter(|arg| !arg.is_comment())
}

fn is_plain_call(call: &CallExpr, function: &str) -> bool {
    call.receiver.is_none() && call.name.eq_ignore_ascii_case(function)
}

/// `override(\Class::method(<index>), map([...]))`
fn read_override(path: &str, call: &CallExpr) -> Option<FactoryMethodSignature> {
    if !is_plain_call(call, OVERRIDE_FUNCTION) {
        return None;
    }
    let mut args = significant_args(&call.args);
    let (Some(Expr::StaticCall(factory)), Some(Expr::Call(map)), None) =
        (args.next(), args.next(), args.next())
    else {
        return None;
    };

    let (class, method, index) = read_factory_call(factory)?;
    let entries = read_map_call(map)?;
    if entries.is_empty() {
        return None;
    }

    let mut signature = FactoryMethodSignature::new(path, class, method, index);
    for (key, alias) in entries {
        signature = if key.is_empty() {
            signature.with_fallback(alias)
        } else {
            signature.with_alias(key, alias)
        };
    }

    signature.is_valid().then_some(signature)
}

/// `\Fq\Class::method(<int>)`
fn read_factory_call(call: &StaticCallExpr) -> Option<(&str, &str, usize)> {
    if !is_fully_qualified(&call.class) || call.name.is_empty() {
        return None;
    }
    let mut args = significant_args(&call.args);
    let (Some(Expr::Scalar(index)), None) = (args.next(), args.next()) else {
        return None;
    };
    let index = usize::try_from(index.int_value()?).ok()?;
    Some((call.class.as_str(), call.name.as_str(), index))
}

/// `map([...])`, as `(key, alias expression)` pairs.
fn read_map_call(call: &CallExpr) -> Option<Vec<(String, String)>> {
    if !is_plain_call(call, MAP_FUNCTION) {
        return None;
    }
    let mut args = significant_args(&call.args);
    let (Some(Expr::Array(array)), None) = (args.next(), args.next()) else {
        return None;
    };
    if array.elements.is_empty() {
        return None;
    }
    Some(read_entries(array))
}

fn read_entries(array: &ArrayLiteral) -> Vec<(String, String)> {
    array
        .elements
        .iter()
        .filter_map(|element| {
            let key = match element.key.as_ref()? {
                Expr::Scalar(scalar) => scalar.string_value()?,
                _ => return None,
            };
            let alias = match &element.value {
                Expr::Scalar(scalar) => scalar.string_value()?,
                Expr::ClassConstant(access)
                    if access.is_class_name_constant() && is_fully_qualified(&access.class) =>
                {
                    strip_leading_separator(&access.class).to_string()
                }
                _ => return None,
            };
            (!alias.is_empty()).then_some((key, alias))
        })
        .collect()
}

/// Feeds extracted signatures into the project catalogs of a registry.
pub struct SignatureExtractor<'a> {
    registry: &'a CatalogRegistry,
}

impl<'a> SignatureExtractor<'a> {
    pub fn new(registry: &'a CatalogRegistry) -> Self {
        Self { registry }
    }

    /// Re-index one module: what it declared before is replaced by what it
    /// declares now, in one catalog step. Returns the number of signatures
    /// extracted.
    pub fn index_module(&self, project: &ProjectId, module: &SourceModule, enrolled: bool) -> usize {
        if !enrolled {
            return 0;
        }
        let Some(path) = module.portable_path() else {
            return 0;
        };

        let signatures = extract_signatures(module);
        let count = signatures.len();
        self.registry.get(project).replace_for_path(path, signatures);
        if count > 0 {
            tracing::debug!("Indexed {} factory signatures from {}", count, path);
        }
        count
    }
}
