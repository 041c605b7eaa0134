//! Collaborator traits for the underlying document store.
//!
//! The toolkit is agnostic to the actual storage engine: anything that can
//! produce a find cursor and a document count over the predicate dialect
//! emitted by [`crate::core::translate`] can sit behind a
//! [`QueryFacade`](crate::facade::QueryFacade). Failures travel as
//! `anyhow::Error` and are propagated unchanged; timeout and cancellation
//! policy belong to the store client, not to this layer.

use crate::core::translate::SortSpec;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A lazily built find query over one collection of documents.
///
/// Builder-style: each call consumes and returns the cursor. The facade
/// chains calls in a fixed order (sort, select, expand once per relation,
/// skip, limit, execute); implementations sensitive to call order can rely
/// on it.
#[async_trait]
pub trait QueryCursor: Send + Sized {
    /// Apply an ordered sort spec.
    #[must_use]
    fn sort(self, spec: &SortSpec) -> Self;

    /// Apply a projection: space-separated field tokens, `-` prefix for
    /// exclusion.
    #[must_use]
    fn select(self, projection: &str) -> Self;

    /// Expand one relation, replacing the reference field with the referenced
    /// document. Callable multiple times, once per relation.
    #[must_use]
    fn expand(self, relation: &str) -> Self;

    /// Skip the first `n` matching documents.
    #[must_use]
    fn skip(self, n: u64) -> Self;

    /// Return at most `n` documents.
    #[must_use]
    fn limit(self, n: u64) -> Self;

    /// Run the query and collect the matching documents.
    async fn execute(self) -> Result<Vec<Value>>;
}

/// Capability set required of any store collaborator.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    type Cursor: QueryCursor;

    /// Start a find query over the given predicate. Building the cursor is
    /// cheap and synchronous; nothing touches the store until
    /// [`QueryCursor::execute`].
    fn find(&self, predicate: Value) -> Self::Cursor;

    /// Count the documents matching the predicate.
    async fn count_documents(&self, predicate: Value) -> Result<u64>;
}
