//! Paginated result envelope.

use serde::Serialize;
use serde_json::Value;

/// Paginated response structure: one page of documents plus the pagination
/// snapshot computed for this call.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse {
    /// The documents on this page.
    pub docs: Vec<Value>,

    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Pagination metadata, derived once per call and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Total number of documents matching the predicate (across all pages).
    pub total_docs: u64,

    /// Page size used for this call.
    pub limit: u64,

    /// Current page number (starts at 1).
    pub page: u64,

    /// Total number of pages: `ceil(total_docs / limit)`.
    pub total_pages: u64,

    /// Whether a page exists after this one: `page < total_pages`.
    pub has_next_page: bool,

    /// Whether a page exists before this one: `page > 1`.
    pub has_prev_page: bool,
}

impl PaginationMeta {
    /// Compute the pagination snapshot.
    pub fn new(page: u64, limit: u64, total_docs: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = total_docs.div_ceil(limit);

        Self {
            total_docs,
            limit,
            page,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling() {
        let meta = PaginationMeta::new(1, 10, 145);
        assert_eq!(meta.total_pages, 15);

        let meta = PaginationMeta::new(1, 10, 150);
        assert_eq!(meta.total_pages, 15);
    }

    #[test]
    fn test_first_page_flags() {
        let meta = PaginationMeta::new(1, 10, 25);
        assert!(meta.has_next_page);
        assert!(!meta.has_prev_page);
    }

    #[test]
    fn test_last_page_has_no_next() {
        let meta = PaginationMeta::new(3, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(!meta.has_next_page);
        assert!(meta.has_prev_page);
    }

    #[test]
    fn test_empty_result_set() {
        let meta = PaginationMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_prev_page);
    }

    #[test]
    fn test_page_beyond_last_has_prev_but_no_next() {
        let meta = PaginationMeta::new(9, 10, 25);
        assert!(!meta.has_next_page);
        assert!(meta.has_prev_page);
    }
}
