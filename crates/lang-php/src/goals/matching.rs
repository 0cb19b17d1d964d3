use crate::classify::{ArgumentOrigin, ClassifiedCall, looks_like_class_name};
use factoscope_api::models::{
    ClassType, EvaluatedType, FactoryMethodSignature, SignatureKind, resolve_alias,
};
use factoscope_core::Catalog;
use factoscope_plugin::{GoalContext, HostModel, find_in_hierarchy_dyn};
use std::collections::HashSet;
use std::sync::{Arc, Weak};

/// Where prospective signatures come from.
pub trait SignatureSource: Send + Sync {
    /// Signatures whose method name matches, empty when there are none.
    fn prospective_signatures(&self, method_name: &str) -> Vec<FactoryMethodSignature>;
}

impl SignatureSource for Catalog {
    fn prospective_signatures(&self, method_name: &str) -> Vec<FactoryMethodSignature> {
        self.find_by_method_name(method_name, SignatureKind::INSTANCE_METHOD)
    }
}

impl SignatureSource for Arc<Catalog> {
    fn prospective_signatures(&self, method_name: &str) -> Vec<FactoryMethodSignature> {
        self.as_ref().prospective_signatures(method_name)
    }
}

/// A released catalog reads as empty.
impl SignatureSource for Weak<Catalog> {
    fn prospective_signatures(&self, method_name: &str) -> Vec<FactoryMethodSignature> {
        self.upgrade()
            .map(|catalog| catalog.prospective_signatures(method_name))
            .unwrap_or_default()
    }
}

impl SignatureSource for Vec<FactoryMethodSignature> {
    fn prospective_signatures(&self, method_name: &str) -> Vec<FactoryMethodSignature> {
        self.iter()
            .filter(|s| s.matches_method(method_name))
            .cloned()
            .collect()
    }
}

/// The signature declared by the class itself or, failing that, by its
/// nearest ancestor.
pub fn find_signature<'s>(
    signatures: &'s [FactoryMethodSignature],
    class: &ClassType,
    context: &GoalContext,
    host: &dyn HostModel,
) -> Option<&'s FactoryMethodSignature> {
    let mut seen = HashSet::new();
    host.model_types(class, context)
        .iter()
        .find_map(|fqn| walk(signatures, fqn, host, &mut seen))
}

/// Same as [`find_signature`], starting from a declaration name.
pub fn find_signature_for_declaration<'s>(
    signatures: &'s [FactoryMethodSignature],
    fqn: &str,
    host: &dyn HostModel,
) -> Option<&'s FactoryMethodSignature> {
    walk(signatures, fqn, host, &mut HashSet::new())
}

fn walk<'s>(
    signatures: &'s [FactoryMethodSignature],
    fqn: &str,
    host: &dyn HostModel,
    seen: &mut HashSet<String>,
) -> Option<&'s FactoryMethodSignature> {
    find_in_hierarchy_dyn(
        host,
        fqn,
        &mut |candidate: &str| signatures.iter().find(|s| s.declared_by(candidate)),
        seen,
    )
}

/// Type produced by a classified call under a matched signature.
///
/// The alias table (and its fallback) wins; the discriminator is read as a
/// class name only when that produced nothing.
pub fn resolve_call(
    signature: &FactoryMethodSignature,
    call: &ClassifiedCall,
) -> Option<EvaluatedType> {
    let argument = call.argument(signature.discriminator_index)?;
    let value = argument.map(|a| a.text.as_str());

    if call.may_use_aliases() {
        if let Some(resolved) = resolve_alias(signature.alias_for(value), value) {
            return Some(resolved);
        }
    }

    let argument = argument?;
    let names_class = match argument.origin {
        ArgumentOrigin::ClassConstant => true,
        ArgumentOrigin::StringLiteral => looks_like_class_name(&argument.text),
    };
    if call.may_name_class() && names_class {
        return EvaluatedType::from_type_name(&argument.text);
    }
    None
}
