//! Named, reusable query-option bundles with override merging.

use crate::core::error::{SiftError, SiftResult};
use crate::core::options::QueryOptions;
use indexmap::IndexMap;

/// Registry of named [`QueryOptions`] bundles.
///
/// The registry is a plain in-process value owned by whatever facade holds
/// it; it is never a process-wide singleton, so multiple facades over
/// different collections can each carry their own presets. Nothing persists
/// across restarts.
///
/// Iteration order is insertion order; redefining an existing name replaces
/// its bundle without moving its position.
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: IndexMap<String, QueryOptions>,
}

impl PresetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bundle under a name. Unconditional upsert: an existing
    /// name is silently overwritten wholesale (no field-level merge with the
    /// old bundle).
    pub fn define(&mut self, name: impl Into<String>, options: QueryOptions) {
        self.presets.insert(name.into(), options);
    }

    /// Look up a stored bundle.
    pub fn get(&self, name: &str) -> Option<&QueryOptions> {
        self.presets.get(name)
    }

    /// Whether a preset exists under this name.
    pub fn has(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// Remove a preset. Returns whether an entry existed; a missing name is
    /// not an error.
    pub fn delete(&mut self, name: &str) -> bool {
        self.presets.shift_remove(name).is_some()
    }

    /// All registered names, in registry iteration order.
    pub fn list(&self) -> Vec<&str> {
        self.presets.keys().map(String::as_str).collect()
    }

    /// Number of registered presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Resolve a preset into a merged option bundle: the stored options with
    /// every key present in `overrides` applied on top (spread semantics, so
    /// an explicit `null` override still wins).
    ///
    /// Fails with [`SiftError::PresetNotFound`] naming the requested preset
    /// and every currently defined name.
    pub fn resolve(&self, name: &str, overrides: &QueryOptions) -> SiftResult<QueryOptions> {
        let Some(stored) = self.presets.get(name) else {
            return Err(SiftError::PresetNotFound {
                name: name.to_string(),
                defined: self.presets.keys().cloned().collect(),
            });
        };
        Ok(stored.merge(overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_define_and_get() {
        let mut registry = PresetRegistry::new();
        registry.define("active", QueryOptions::new().with_filter("status", "active"));

        assert!(registry.has("active"));
        let stored = registry.get("active").unwrap();
        assert_eq!(stored.get("status"), Some(&json!("active")));
    }

    #[test]
    fn test_redefine_replaces_bundle_wholesale() {
        let mut registry = PresetRegistry::new();
        registry.define(
            "recent",
            QueryOptions::new().with_sort("-created_at").with_limit(5),
        );
        registry.define("recent", QueryOptions::new().with_limit(20));

        let stored = registry.get("recent").unwrap();
        assert_eq!(stored.limit(), 20);
        // The old bundle's sort must not survive the redefinition.
        assert!(stored.sort_str().is_none());
    }

    #[test]
    fn test_redefine_keeps_list_position() {
        let mut registry = PresetRegistry::new();
        registry.define("first", QueryOptions::new());
        registry.define("second", QueryOptions::new());
        registry.define("first", QueryOptions::new().with_limit(99));

        assert_eq!(registry.list(), vec!["first", "second"]);
    }

    #[test]
    fn test_delete_returns_existence() {
        let mut registry = PresetRegistry::new();
        registry.define("gone", QueryOptions::new());

        assert!(registry.delete("gone"));
        assert!(!registry.delete("gone"));
        assert!(!registry.has("gone"));
    }

    #[test]
    fn test_resolve_applies_overrides_on_top() {
        let mut registry = PresetRegistry::new();
        registry.define(
            "active",
            QueryOptions::new().with_filter("status", "active").with_limit(10),
        );

        let merged = registry
            .resolve("active", &QueryOptions::new().with_limit(50).with_page(2))
            .unwrap();
        assert_eq!(merged.limit(), 50);
        assert_eq!(merged.page(), 2);
        assert_eq!(merged.get("status"), Some(&json!("active")));
    }

    #[test]
    fn test_resolve_explicit_null_override_wins() {
        let mut registry = PresetRegistry::new();
        registry.define("active", QueryOptions::new().with_filter("status", "active"));

        let merged = registry
            .resolve("active", &QueryOptions::new().with("status", Value::Null))
            .unwrap();
        assert_eq!(merged.get("status"), Some(&Value::Null));
    }

    #[test]
    fn test_resolve_missing_names_preset_and_defined_list() {
        let mut registry = PresetRegistry::new();
        registry.define("alpha", QueryOptions::new());
        registry.define("beta", QueryOptions::new());

        let err = registry
            .resolve("missing", &QueryOptions::new())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("missing"));
        assert!(message.contains("alpha"));
        assert!(message.contains("beta"));
    }
}
