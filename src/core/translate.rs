//! Pure translation from raw query options into store-level query artifacts.
//!
//! Every function here is stateless and side-effect free: raw strings and the
//! whitelist configuration go in, predicate fragments, sort specs,
//! projections, expansion lists and pagination bounds come out. The predicate
//! dialect is the Mongo operator form (`$or`, `$regex` with `$options: "i"`,
//! top-level equality pairs).

use crate::core::options::{FieldWhitelists, QueryOptions};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

/// Sort direction for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Wire form: 1 for ascending, -1 for descending.
    pub fn as_i64(self) -> i64 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

/// Ordered field → direction mapping. Insertion order is the tie-break
/// priority at the store level; re-inserting a field keeps its position.
pub type SortSpec = IndexMap<String, SortDirection>;

/// Resolved pagination bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub skip: u64,
}

/// Build the free-text search clause: a `$or` of per-field case-insensitive
/// substring conditions, one per searchable field in whitelist order.
///
/// Returns `None` (feature disabled, no clause) when the term is empty or the
/// whitelist is empty. The term is regex-escaped so the observable contract
/// stays plain substring matching.
pub fn build_search_clause(term: &str, searchable: &[String]) -> Option<Value> {
    let term = term.trim();
    if term.is_empty() || searchable.is_empty() {
        return None;
    }

    let escaped = escape_regex(term);
    let branches: Vec<Value> = searchable
        .iter()
        .map(|field| {
            let mut condition = Map::new();
            condition.insert(
                field.clone(),
                json!({ "$regex": escaped.as_str(), "$options": "i" }),
            );
            Value::Object(condition)
        })
        .collect();

    Some(json!({ "$or": branches }))
}

/// Build the exact-match filter clause.
///
/// Iterates the whitelist rather than the caller's keys, which bounds the
/// work and keeps arbitrary operators out of the predicate. Values pass
/// through unchanged; type coercion is the store's concern.
pub fn build_filter_clause(options: &QueryOptions, filterable: &[String]) -> Map<String, Value> {
    let mut clause = Map::new();
    for field in filterable {
        if let Some(value) = options.get(field) {
            clause.insert(field.clone(), value.clone());
        }
    }
    clause
}

/// Combine search and filter clauses into one predicate object.
///
/// Absent sub-clauses are omitted entirely; an empty predicate is `{}`, never
/// an always-true placeholder condition.
pub fn build_predicate(options: &QueryOptions, whitelists: &FieldWhitelists) -> Value {
    let mut predicate = build_filter_clause(options, &whitelists.filterable);

    if let Some(term) = options.search_term()
        && let Some(Value::Object(search)) = build_search_clause(term, &whitelists.searchable)
    {
        predicate.extend(search);
    }

    Value::Object(predicate)
}

/// Parse a comma-separated sort string into a [`SortSpec`].
///
/// A leading `-` means descending and is stripped from the field name. Empty
/// tokens are skipped; duplicate fields keep their first position but the
/// last occurrence's direction wins.
pub fn parse_sort(sort_str: &str) -> SortSpec {
    let mut spec = SortSpec::new();
    for token in sort_str.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (field, direction) = match token.strip_prefix('-') {
            Some(rest) => (rest, SortDirection::Desc),
            None => (token, SortDirection::Asc),
        };
        if field.is_empty() {
            continue;
        }
        spec.insert(field.to_string(), direction);
    }
    spec
}

/// Build a space-separated projection string from a comma-separated selection.
///
/// Empty input means no projection. An empty `selectable` whitelist is
/// unrestricted: tokens pass through verbatim, exclusion prefixes intact.
/// Otherwise tokens whose prefix-stripped name is not whitelisted are
/// silently dropped; a selection that filters down to nothing yields no
/// projection rather than an error.
pub fn build_projection(select_str: &str, selectable: &[String]) -> Option<String> {
    let tokens = select_str
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && *token != "-");

    let kept: Vec<&str> = if selectable.is_empty() {
        tokens.collect()
    } else {
        tokens
            .filter(|token| {
                let name = token.trim_start_matches('-');
                selectable.iter().any(|field| field == name)
            })
            .collect()
    };

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

/// Build the relation-expansion list from a comma-separated string.
///
/// Tokens are trimmed. An empty `expandable` whitelist is unrestricted; a
/// non-empty one keeps only whitelisted relations, preserving input order and
/// silently dropping the rest.
pub fn build_expansion_list(expand_str: &str, expandable: &[String]) -> Vec<String> {
    expand_str
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter(|token| expandable.is_empty() || expandable.iter().any(|field| field == token))
        .map(str::to_string)
        .collect()
}

/// Resolve pagination bounds: `skip = (page - 1) * limit`.
///
/// Zero values are floored to 1; no upper bound on `limit` is enforced here.
/// Both values are caller-controlled, so the skip multiply saturates at
/// `u64::MAX` instead of overflowing.
pub fn compute_pagination(page: u64, limit: u64) -> Pagination {
    let page = page.max(1);
    let limit = limit.max(1);
    Pagination {
        page,
        limit,
        skip: (page - 1).saturating_mul(limit),
    }
}

/// Escape regex metacharacters so a search term matches literally.
fn escape_regex(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
