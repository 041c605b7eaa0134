//! # Sift
//!
//! A query-translation toolkit sitting between untyped, caller-supplied
//! request parameters and a document-store executor.
//!
//! ## Features
//!
//! - **Declarative options**: one flat [`QueryOptions`](core::QueryOptions)
//!   map carrying search term, per-field filters, sort, field selection,
//!   relation expansion and pagination
//! - **Whitelist-bounded**: four field whitelists fixed at construction
//!   decide what each feature may touch; unknown fields are silently dropped
//! - **Deterministic translation**: pure functions produce the predicate,
//!   sort spec, projection, expansion list and pagination bounds
//! - **Paginated envelopes**: find and count run concurrently over the same
//!   predicate and assemble a pagination snapshot
//! - **Named presets**: reusable option bundles, resolvable by name with
//!   override merging
//! - **Store-agnostic**: any backend implementing the
//!   [`DocumentStore`](store::DocumentStore) capability set plugs in
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sift::prelude::*;
//!
//! let store = InMemoryStore::new();
//! let mut facade = QueryFacade::new(
//!     store,
//!     FieldWhitelists::new()
//!         .searchable(["name", "email"])
//!         .filterable(["status", "role"]),
//! );
//!
//! facade.define_preset(
//!     "active-admins",
//!     QueryOptions::new()
//!         .with_filter("status", "active")
//!         .with_filter("role", "admin")
//!         .with_sort("-created_at"),
//! );
//!
//! let page = facade
//!     .find_with_preset("active-admins", QueryOptions::new().with_limit(50))
//!     .await?;
//! println!("{} of {} docs", page.docs.len(), page.pagination.total_docs);
//! ```

pub mod core;
pub mod facade;
pub mod storage;
pub mod store;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core types ===
    pub use crate::core::{
        error::{SiftError, SiftResult},
        options::{FieldWhitelists, QueryOptions},
        presets::PresetRegistry,
        query::{PaginatedResponse, PaginationMeta},
        translate::{Pagination, SortDirection, SortSpec},
    };

    // === Facade ===
    pub use crate::facade::QueryFacade;

    // === Store seam ===
    pub use crate::store::{DocumentStore, QueryCursor};

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
}
