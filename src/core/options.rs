//! Untrusted query options and the whitelist configuration that bounds them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Keys with dedicated meaning in a [`QueryOptions`] bundle.
///
/// Any other key is treated as a candidate exact-match filter, subject to the
/// `filterable` whitelist.
pub const RESERVED_KEYS: [&str; 6] = ["q", "page", "limit", "sort", "select", "expand"];

/// Default page number when absent or unparseable.
pub const DEFAULT_PAGE: u64 = 1;

/// Default page size when absent or unparseable.
pub const DEFAULT_LIMIT: u64 = 10;

/// Caller-supplied query options: a flat map of string keys to JSON values.
///
/// This structure is the untrusted input of the whole pipeline. It can be
/// deserialized straight from a URL query string or JSON body; all recognized
/// keys have sensible defaults and everything unrecognized survives as a
/// candidate filter.
///
/// # Example
/// ```rust,ignore
/// let options = QueryOptions::new()
///     .with_search("alice")
///     .with_filter("status", "active")
///     .with_sort("-created_at")
///     .with_page(2)
///     .with_limit(25);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryOptions {
    values: BTreeMap<String, Value>,
}

impl QueryOptions {
    /// Create an empty option bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw access to a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether a key is explicitly present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// All keys currently present, in map order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Keys that are candidate exact-match filters: everything not in
    /// [`RESERVED_KEYS`]. Whether a candidate actually filters is decided by
    /// the `filterable` whitelist at translation time.
    pub fn filter_candidates(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|key| !RESERVED_KEYS.contains(key))
    }

    /// Set a value, replacing any previous one under the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set the free-text search term (`q`).
    pub fn with_search(self, term: impl Into<String>) -> Self {
        self.with("q", term.into())
    }

    /// Set an exact-match filter candidate.
    pub fn with_filter(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, value)
    }

    /// Set the page number.
    pub fn with_page(self, page: u64) -> Self {
        self.with("page", page)
    }

    /// Set the page size.
    pub fn with_limit(self, limit: u64) -> Self {
        self.with("limit", limit)
    }

    /// Set the comma-separated sort spec (leading `-` means descending).
    pub fn with_sort(self, sort: impl Into<String>) -> Self {
        self.with("sort", sort.into())
    }

    /// Set the comma-separated field selection (leading `-` means exclusion).
    pub fn with_select(self, select: impl Into<String>) -> Self {
        self.with("select", select.into())
    }

    /// Set the comma-separated relation-expansion list.
    pub fn with_expand(self, expand: impl Into<String>) -> Self {
        self.with("expand", expand.into())
    }

    /// The free-text search term, if one was supplied as a string.
    pub fn search_term(&self) -> Option<&str> {
        self.str_value("q")
    }

    /// Page number, defaulting to 1. Non-numeric or non-positive input falls
    /// back to the default.
    pub fn page(&self) -> u64 {
        self.positive_int("page", DEFAULT_PAGE)
    }

    /// Page size, defaulting to 10. Non-numeric or non-positive input falls
    /// back to the default. No upper bound is enforced at this layer.
    pub fn limit(&self) -> u64 {
        self.positive_int("limit", DEFAULT_LIMIT)
    }

    /// Raw sort spec string, if present.
    pub fn sort_str(&self) -> Option<&str> {
        self.str_value("sort")
    }

    /// Raw field-selection string, if present.
    pub fn select_str(&self) -> Option<&str> {
        self.str_value("select")
    }

    /// Raw relation-expansion string, if present.
    pub fn expand_str(&self) -> Option<&str> {
        self.str_value("expand")
    }

    /// Shallow merge: every key present in `overrides` wins, including keys
    /// explicitly set to `null`. Keys absent from `overrides` keep the value
    /// stored in `self`.
    pub fn merge(&self, overrides: &QueryOptions) -> QueryOptions {
        let mut merged = self.clone();
        for (key, value) in &overrides.values {
            merged.values.insert(key.clone(), value.clone());
        }
        merged
    }

    fn str_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    fn positive_int(&self, key: &str, default: u64) -> u64 {
        let parsed = match self.values.get(key) {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n >= 1 => n,
            _ => default,
        }
    }
}

impl FromIterator<(String, Value)> for QueryOptions {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Whitelists bounding which fields each query feature may touch, fixed at
/// construction time.
///
/// The empty-set semantics are deliberately asymmetric:
/// - empty `searchable` or `filterable` **disables** that feature (no field
///   is enabled, so the clause is never emitted);
/// - empty `selectable` or `expandable` means **unrestricted** (any field
///   passes through).
///
/// Field order in `searchable` determines the order of search-clause
/// branches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWhitelists {
    pub searchable: Vec<String>,
    pub filterable: Vec<String>,
    pub selectable: Vec<String>,
    pub expandable: Vec<String>,
}

impl FieldWhitelists {
    /// All-empty whitelists: search and filter disabled, select and expand
    /// unrestricted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the searchable set.
    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style setter for the filterable set.
    pub fn filterable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filterable = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style setter for the selectable set.
    pub fn selectable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selectable = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style setter for the expandable set.
    pub fn expandable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expandable = fields.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = QueryOptions::new();
        assert_eq!(options.page(), 1);
        assert_eq!(options.limit(), 10);
        assert!(options.search_term().is_none());
        assert!(options.sort_str().is_none());
    }

    #[test]
    fn test_numeric_and_string_page_values() {
        let options = QueryOptions::new().with("page", 3).with("limit", "25");
        assert_eq!(options.page(), 3);
        assert_eq!(options.limit(), 25);
    }

    #[test]
    fn test_invalid_page_values_fall_back_to_defaults() {
        let options = QueryOptions::new()
            .with("page", "zero-ish")
            .with("limit", 0);
        assert_eq!(options.page(), 1);
        assert_eq!(options.limit(), 10);
    }

    #[test]
    fn test_filter_candidates_skip_reserved_keys() {
        let options = QueryOptions::new()
            .with_search("term")
            .with_page(2)
            .with_sort("-age")
            .with_filter("status", "active")
            .with_filter("role", "admin");
        let candidates: Vec<&str> = options.filter_candidates().collect();
        assert_eq!(candidates, vec!["role", "status"]);
    }

    #[test]
    fn test_merge_overrides_win() {
        let stored = QueryOptions::new()
            .with_filter("status", "active")
            .with_limit(5);
        let overrides = QueryOptions::new().with_limit(50).with_sort("-created_at");

        let merged = stored.merge(&overrides);
        assert_eq!(merged.limit(), 50);
        assert_eq!(merged.sort_str(), Some("-created_at"));
        assert_eq!(merged.get("status"), Some(&json!("active")));
    }

    #[test]
    fn test_merge_explicit_null_wins() {
        let stored = QueryOptions::new().with_filter("status", "active");
        let overrides = QueryOptions::new().with("status", Value::Null);

        let merged = stored.merge(&overrides);
        assert_eq!(merged.get("status"), Some(&Value::Null));
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let options: QueryOptions =
            serde_json::from_value(json!({"q": "term", "page": "2", "status": "active"})).unwrap();
        assert_eq!(options.search_term(), Some("term"));
        assert_eq!(options.page(), 2);
        assert_eq!(options.get("status"), Some(&json!("active")));
    }

    #[test]
    fn test_whitelists_builder() {
        let whitelists = FieldWhitelists::new()
            .searchable(["name", "email"])
            .filterable(["status"]);
        assert_eq!(whitelists.searchable, vec!["name", "email"]);
        assert_eq!(whitelists.filterable, vec!["status"]);
        assert!(whitelists.selectable.is_empty());
        assert!(whitelists.expandable.is_empty());
    }
}
