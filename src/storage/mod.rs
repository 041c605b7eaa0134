//! Storage implementations of the store collaborator traits.

pub mod in_memory;

pub use in_memory::{InMemoryCursor, InMemoryStore};
