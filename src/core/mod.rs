//! Core module containing the option model, translation functions, preset
//! registry, pagination envelope and error types.

pub mod error;
pub mod options;
pub mod presets;
pub mod query;
pub mod translate;

pub use error::{SiftError, SiftResult};
pub use options::{FieldWhitelists, QueryOptions};
pub use presets::PresetRegistry;
pub use query::{PaginatedResponse, PaginationMeta};
pub use translate::{Pagination, SortDirection, SortSpec};
