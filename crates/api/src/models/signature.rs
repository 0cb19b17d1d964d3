use super::naming::{same_type_name, strip_leading_separator};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

bitflags! {
    /// Kind mask of a factory method signature.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SignatureKind: u32 {
        /// Method invoked on a container instance.
        const INSTANCE_METHOD = 0x001;
    }
}

impl Default for SignatureKind {
    fn default() -> Self {
        SignatureKind::INSTANCE_METHOD
    }
}

/// A discovered factory method: calls to `method_name` on instances of
/// `declaring_class` return the type chosen by the argument at
/// `discriminator_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryMethodSignature {
    /// Fully-qualified owner type, without leading separator.
    pub declaring_class: String,
    pub method_name: String,
    pub discriminator_index: usize,
    pub kind: SignatureKind,
    /// Discriminator value -> alias expression.
    pub aliases: HashMap<String, String>,
    /// Alias expression used when the discriminator value has no entry.
    /// Empty means none.
    pub fallback_alias: String,
    /// Portable path of the file that declared this signature.
    pub defining_path: String,
}

impl FactoryMethodSignature {
    pub fn new(
        defining_path: impl Into<String>,
        declaring_class: &str,
        method_name: impl Into<String>,
        discriminator_index: usize,
    ) -> Self {
        Self {
            declaring_class: strip_leading_separator(declaring_class).to_string(),
            method_name: method_name.into(),
            discriminator_index,
            kind: SignatureKind::INSTANCE_METHOD,
            aliases: HashMap::new(),
            fallback_alias: String::new(),
            defining_path: defining_path.into(),
        }
    }

    pub fn with_alias(mut self, key: impl Into<String>, alias: impl Into<String>) -> Self {
        self.aliases.insert(key.into(), alias.into());
        self
    }

    pub fn with_fallback(mut self, alias: impl Into<String>) -> Self {
        self.fallback_alias = alias.into();
        self
    }

    /// Structural validity: non-empty owner, method and defining path.
    pub fn is_valid(&self) -> bool {
        !self.declaring_class.is_empty()
            && !self.method_name.is_empty()
            && !self.defining_path.is_empty()
    }

    pub fn declared_by(&self, class_name: &str) -> bool {
        same_type_name(&self.declaring_class, class_name)
    }

    pub fn matches_method(&self, method_name: &str) -> bool {
        self.method_name.eq_ignore_ascii_case(method_name)
    }

    /// Alias expression for a discriminator value: the table entry if there
    /// is one, the fallback otherwise. Empty when neither applies.
    pub fn alias_for(&self, discriminator: Option<&str>) -> &str {
        discriminator
            .filter(|value| !value.is_empty())
            .and_then(|value| self.aliases.get(value))
            .map(String::as_str)
            .unwrap_or(&self.fallback_alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container_make() -> FactoryMethodSignature {
        FactoryMethodSignature::new("/p/.phpstorm.meta.php", "\\App\\Container", "make", 0)
            .with_alias("cache", "App\\ObjectCache")
    }

    #[test]
    fn test_new_strips_leading_separator() {
        let sig = container_make();
        assert_eq!(sig.declaring_class, "App\\Container");
        assert!(sig.declared_by("\\app\\CONTAINER"));
        assert!(sig.is_valid());
    }

    #[test]
    fn test_alias_for_prefers_table_entry() {
        let sig = container_make().with_fallback("App\\Default");
        assert_eq!(sig.alias_for(Some("cache")), "App\\ObjectCache");
        assert_eq!(sig.alias_for(Some("unknown")), "App\\Default");
        assert_eq!(sig.alias_for(None), "App\\Default");
        assert_eq!(sig.alias_for(Some("")), "App\\Default");
    }

    #[test]
    fn test_alias_for_without_fallback_is_empty() {
        assert_eq!(container_make().alias_for(Some("unknown")), "");
    }

    #[test]
    fn test_method_match_is_case_insensitive() {
        assert!(container_make().matches_method("MAKE"));
        assert!(!container_make().matches_method("build"));
    }
}
