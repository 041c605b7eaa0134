//! In-memory implementation of the store collaborator for testing and
//! development.
//!
//! Interprets exactly the predicate dialect the translator emits: top-level
//! equality pairs, `$or` branches, and `$regex` conditions with the `i`
//! option. Relations are registered by name; expanding a relation replaces
//! the reference value in each document with the referenced target document
//! (matched on its `id` field) when one exists.

use crate::core::translate::{SortDirection, SortSpec};
use crate::store::{DocumentStore, QueryCursor};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use regex::RegexBuilder;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory document store.
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// cloning shares the same underlying documents.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    docs: Arc<RwLock<Vec<Value>>>,
    relations: Arc<RwLock<HashMap<String, Vec<Value>>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with documents.
    pub fn with_docs(docs: Vec<Value>) -> Self {
        Self {
            docs: Arc::new(RwLock::new(docs)),
            relations: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert one document.
    pub fn insert(&self, doc: Value) -> Result<()> {
        let mut docs = self
            .docs
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        docs.push(doc);
        Ok(())
    }

    /// Register the target documents for a relation. The relation name is
    /// the document field holding the reference; targets are matched on
    /// their `id` field.
    pub fn define_relation(&self, name: impl Into<String>, targets: Vec<Value>) -> Result<()> {
        let mut relations = self
            .relations
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        relations.insert(name.into(), targets);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    type Cursor = InMemoryCursor;

    fn find(&self, predicate: Value) -> InMemoryCursor {
        InMemoryCursor {
            store: self.clone(),
            predicate,
            sort: SortSpec::new(),
            projection: None,
            expansions: Vec::new(),
            skip: 0,
            limit: None,
        }
    }

    async fn count_documents(&self, predicate: Value) -> Result<u64> {
        let docs = self
            .docs
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(docs
            .iter()
            .filter(|doc| matches_predicate(doc, &predicate))
            .count() as u64)
    }
}

/// Lazily built find query over an [`InMemoryStore`].
pub struct InMemoryCursor {
    store: InMemoryStore,
    predicate: Value,
    sort: SortSpec,
    projection: Option<String>,
    expansions: Vec<String>,
    skip: u64,
    limit: Option<u64>,
}

#[async_trait]
impl QueryCursor for InMemoryCursor {
    fn sort(mut self, spec: &SortSpec) -> Self {
        self.sort = spec.clone();
        self
    }

    fn select(mut self, projection: &str) -> Self {
        self.projection = Some(projection.to_string());
        self
    }

    fn expand(mut self, relation: &str) -> Self {
        self.expansions.push(relation.to_string());
        self
    }

    fn skip(mut self, n: u64) -> Self {
        self.skip = n;
        self
    }

    fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    async fn execute(self) -> Result<Vec<Value>> {
        let docs = self
            .store
            .docs
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?
            .clone();

        let mut matched: Vec<Value> = docs
            .into_iter()
            .filter(|doc| matches_predicate(doc, &self.predicate))
            .collect();

        if !self.sort.is_empty() {
            matched.sort_by(|a, b| compare_docs(a, b, &self.sort));
        }

        let start = (self.skip as usize).min(matched.len());
        let mut page: Vec<Value> = matched.split_off(start);
        if let Some(limit) = self.limit {
            page.truncate(limit as usize);
        }

        let relations = self
            .store
            .relations
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?
            .clone();
        for relation in &self.expansions {
            if let Some(targets) = relations.get(relation) {
                for doc in &mut page {
                    expand_relation(doc, relation, targets);
                }
            }
        }

        if let Some(projection) = &self.projection {
            for doc in &mut page {
                apply_projection(doc, projection);
            }
        }

        Ok(page)
    }
}

/// Whether a document satisfies a predicate object. An empty predicate (or a
/// non-object) matches everything.
fn matches_predicate(doc: &Value, predicate: &Value) -> bool {
    let Some(conditions) = predicate.as_object() else {
        return true;
    };
    conditions.iter().all(|(key, expected)| match key.as_str() {
        "$or" => expected
            .as_array()
            .is_some_and(|branches| branches.iter().any(|branch| matches_predicate(doc, branch))),
        field => matches_condition(doc.get(field), expected),
    })
}

fn matches_condition(actual: Option<&Value>, expected: &Value) -> bool {
    if let Some(operators) = expected.as_object()
        && let Some(pattern) = operators.get("$regex").and_then(Value::as_str)
    {
        let insensitive = operators
            .get("$options")
            .and_then(Value::as_str)
            .is_some_and(|options| options.contains('i'));
        let Some(text) = actual.and_then(Value::as_str) else {
            return false;
        };
        return RegexBuilder::new(pattern)
            .case_insensitive(insensitive)
            .build()
            .is_ok_and(|re| re.is_match(text));
    }

    // Exact equality; a missing field compares as null.
    actual.unwrap_or(&Value::Null) == expected
}

fn compare_docs(a: &Value, b: &Value, sort: &SortSpec) -> Ordering {
    for (field, direction) in sort {
        let ordering = compare_values(a.get(field), b.get(field));
        let ordering = match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Total order over JSON values: null < bool < number < string < everything
/// else, with same-kind comparison inside each group.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Replace the reference stored under `relation` with the target document
/// whose `id` equals it. Documents without the field, or references with no
/// matching target, are left untouched.
fn expand_relation(doc: &mut Value, relation: &str, targets: &[Value]) {
    let Some(object) = doc.as_object_mut() else {
        return;
    };
    let Some(reference) = object.get(relation).cloned() else {
        return;
    };
    if let Some(target) = targets.iter().find(|t| t.get("id") == Some(&reference)) {
        object.insert(relation.to_string(), target.clone());
    }
}

/// Apply a space-separated projection: if any inclusion token is present the
/// document keeps only those fields (plus `id`, which document stores
/// conventionally always return); otherwise the `-`-prefixed tokens are
/// removed.
fn apply_projection(doc: &mut Value, projection: &str) {
    let tokens: Vec<&str> = projection.split_whitespace().collect();
    let inclusions: Vec<&str> = tokens
        .iter()
        .filter(|t| !t.starts_with('-'))
        .copied()
        .collect();
    let exclusions: Vec<&str> = tokens.iter().filter_map(|t| t.strip_prefix('-')).collect();

    let Some(object) = doc.as_object_mut() else {
        return;
    };
    if !inclusions.is_empty() {
        object.retain(|key, _| key == "id" || inclusions.contains(&key.as_str()));
    } else {
        object.retain(|key, _| !exclusions.contains(&key.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::translate::parse_sort;
    use serde_json::json;

    fn sample_store() -> InMemoryStore {
        InMemoryStore::with_docs(vec![
            json!({"id": 1, "name": "Alice", "status": "active", "age": 34}),
            json!({"id": 2, "name": "Bob", "status": "inactive", "age": 28}),
            json!({"id": 3, "name": "Malice", "status": "active", "age": 41}),
        ])
    }

    #[test]
    fn test_matches_empty_predicate() {
        assert!(matches_predicate(&json!({"a": 1}), &json!({})));
    }

    #[test]
    fn test_matches_equality_and_missing_field() {
        assert!(matches_predicate(
            &json!({"status": "active"}),
            &json!({"status": "active"})
        ));
        assert!(!matches_predicate(&json!({}), &json!({"status": "active"})));
        // Missing field compares as null.
        assert!(matches_predicate(&json!({}), &json!({"status": null})));
    }

    #[test]
    fn test_matches_or_with_case_insensitive_regex() {
        let predicate = json!({"$or": [
            {"name": {"$regex": "ali", "$options": "i"}},
            {"email": {"$regex": "ali", "$options": "i"}},
        ]});
        assert!(matches_predicate(&json!({"name": "Malice"}), &predicate));
        assert!(matches_predicate(&json!({"email": "ALICE@x.io"}), &predicate));
        assert!(!matches_predicate(&json!({"name": "Bob"}), &predicate));
    }

    #[test]
    fn test_regex_condition_on_non_string_is_no_match() {
        let predicate = json!({"age": {"$regex": "3", "$options": "i"}});
        assert!(!matches_predicate(&json!({"age": 34}), &predicate));
    }

    #[tokio::test]
    async fn test_count_documents() {
        let store = sample_store();
        let count = store
            .count_documents(json!({"status": "active"}))
            .await
            .unwrap();
        assert_eq!(count, 2);

        store
            .insert(json!({"id": 4, "name": "Carol", "status": "active"}))
            .unwrap();
        let count = store
            .count_documents(json!({"status": "active"}))
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_execute_sort_skip_limit() {
        let store = sample_store();
        let docs = store
            .find(json!({}))
            .sort(&parse_sort("-age"))
            .skip(1)
            .limit(1)
            .execute()
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["name"], "Alice");
    }

    #[tokio::test]
    async fn test_execute_inclusion_projection_keeps_id() {
        let store = sample_store();
        let docs = store
            .find(json!({"id": 1}))
            .select("name")
            .execute()
            .await
            .unwrap();

        assert_eq!(docs[0], json!({"id": 1, "name": "Alice"}));
    }

    #[tokio::test]
    async fn test_execute_exclusion_projection() {
        let store = sample_store();
        let docs = store
            .find(json!({"id": 1}))
            .select("-age -status")
            .execute()
            .await
            .unwrap();

        assert_eq!(docs[0], json!({"id": 1, "name": "Alice"}));
    }

    #[tokio::test]
    async fn test_expand_replaces_reference_with_target() {
        let store = InMemoryStore::with_docs(vec![
            json!({"id": 1, "title": "Post", "author": 10}),
            json!({"id": 2, "title": "Orphan", "author": 99}),
        ]);
        store
            .define_relation("author", vec![json!({"id": 10, "name": "Alice"})])
            .unwrap();

        let docs = store
            .find(json!({}))
            .expand("author")
            .execute()
            .await
            .unwrap();

        assert_eq!(docs[0]["author"], json!({"id": 10, "name": "Alice"}));
        // Unresolvable reference is left as-is.
        assert_eq!(docs[1]["author"], 99);
    }

    #[tokio::test]
    async fn test_multi_key_sort_tie_break() {
        let store = InMemoryStore::with_docs(vec![
            json!({"id": 1, "group": "a", "rank": 2}),
            json!({"id": 2, "group": "a", "rank": 1}),
            json!({"id": 3, "group": "b", "rank": 3}),
        ]);
        let docs = store
            .find(json!({}))
            .sort(&parse_sort("group,-rank"))
            .execute()
            .await
            .unwrap();

        let ids: Vec<_> = docs.iter().map(|d| d["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
