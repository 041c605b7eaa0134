//! Facade orchestrating option translation, presets and the store client.

use crate::core::error::SiftResult;
use crate::core::options::{FieldWhitelists, QueryOptions};
use crate::core::presets::PresetRegistry;
use crate::core::query::{PaginatedResponse, PaginationMeta};
use crate::core::translate::{
    build_expansion_list, build_predicate, build_projection, compute_pagination, parse_sort,
};
use crate::store::{DocumentStore, QueryCursor};

/// Query façade over one store collaborator.
///
/// Owns the whitelist configuration, a [`PresetRegistry`] and the store
/// handle for its lifetime. Each facade is an independent value: build one
/// per collection or entity type, each with its own whitelists and presets.
///
/// # Example
/// ```rust,ignore
/// let facade = QueryFacade::new(
///     store,
///     FieldWhitelists::new()
///         .searchable(["name", "email"])
///         .filterable(["status", "role"]),
/// );
///
/// let page = facade
///     .find_with_options(QueryOptions::new().with_search("alice").with_page(2))
///     .await?;
/// ```
pub struct QueryFacade<S: DocumentStore> {
    store: S,
    whitelists: FieldWhitelists,
    presets: PresetRegistry,
}

impl<S: DocumentStore> QueryFacade<S> {
    /// Create a facade with an empty preset registry.
    pub fn new(store: S, whitelists: FieldWhitelists) -> Self {
        Self {
            store,
            whitelists,
            presets: PresetRegistry::new(),
        }
    }

    /// The whitelist configuration this facade was built with.
    pub fn whitelists(&self) -> &FieldWhitelists {
        &self.whitelists
    }

    /// Find one page of documents.
    ///
    /// The document fetch and the total count are independent reads over the
    /// same predicate and run without ordering on each other; the call
    /// completes once both finish, and either failure fails the whole call.
    /// The cursor is always chained sort → select → expand → skip → limit.
    pub async fn find_with_options(&self, options: QueryOptions) -> SiftResult<PaginatedResponse> {
        let predicate = build_predicate(&options, &self.whitelists);
        let sort = parse_sort(options.sort_str().unwrap_or(""));
        let projection =
            build_projection(options.select_str().unwrap_or(""), &self.whitelists.selectable);
        let expansions =
            build_expansion_list(options.expand_str().unwrap_or(""), &self.whitelists.expandable);
        let pagination = compute_pagination(options.page(), options.limit());

        tracing::debug!(
            page = pagination.page,
            limit = pagination.limit,
            expansions = expansions.len(),
            "executing paginated find"
        );

        let mut cursor = self.store.find(predicate.clone());
        if !sort.is_empty() {
            cursor = cursor.sort(&sort);
        }
        if let Some(projection) = &projection {
            cursor = cursor.select(projection);
        }
        for relation in &expansions {
            cursor = cursor.expand(relation);
        }
        let docs_future = cursor.skip(pagination.skip).limit(pagination.limit).execute();

        // The count uses the bare predicate: sort/select/skip/limit have no
        // effect on a count and must not be sent.
        let count_future = self.store.count_documents(predicate);

        let (docs, total_docs) = tokio::try_join!(docs_future, count_future)?;

        Ok(PaginatedResponse {
            docs,
            pagination: PaginationMeta::new(pagination.page, pagination.limit, total_docs),
        })
    }

    /// Count documents matching the predicate.
    ///
    /// Only the search term and whitelisted filters participate; `page`,
    /// `limit`, `sort`, `select` and `expand` are ignored even when present.
    pub async fn count_with_options(&self, options: QueryOptions) -> SiftResult<u64> {
        let predicate = build_predicate(&options, &self.whitelists);

        tracing::debug!("executing count");

        Ok(self.store.count_documents(predicate).await?)
    }

    /// Resolve a preset (overrides win key-by-key) and run
    /// [`find_with_options`](Self::find_with_options) on the merged bundle.
    ///
    /// A missing preset fails before any store I/O.
    pub async fn find_with_preset(
        &self,
        name: &str,
        overrides: QueryOptions,
    ) -> SiftResult<PaginatedResponse> {
        let merged = self.presets.resolve(name, &overrides)?;
        self.find_with_options(merged).await
    }

    /// Resolve a preset and run [`count_with_options`](Self::count_with_options)
    /// on the merged bundle.
    pub async fn count_with_preset(&self, name: &str, overrides: QueryOptions) -> SiftResult<u64> {
        let merged = self.presets.resolve(name, &overrides)?;
        self.count_with_options(merged).await
    }

    /// Register a preset, silently overwriting an existing one.
    pub fn define_preset(&mut self, name: impl Into<String>, options: QueryOptions) {
        self.presets.define(name, options);
    }

    /// Whether a preset exists under this name.
    pub fn has_preset(&self, name: &str) -> bool {
        self.presets.has(name)
    }

    /// Inspect a stored preset bundle.
    pub fn get_preset(&self, name: &str) -> Option<&QueryOptions> {
        self.presets.get(name)
    }

    /// All preset names, in registry iteration order.
    pub fn list_presets(&self) -> Vec<&str> {
        self.presets.list()
    }

    /// Remove a preset; returns whether an entry existed.
    pub fn delete_preset(&mut self, name: &str) -> bool {
        self.presets.delete(name)
    }
}
