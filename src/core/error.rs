//! Typed error handling for the query toolkit.
//!
//! The taxonomy is intentionally small: empty whitelists are configuration
//! no-ops (a feature silently disables or becomes unrestricted, never an
//! error), and unrecognized filter/select/expand fields are silently dropped.
//! What remains caller-visible is a missing preset, raised before any store
//! I/O, and store failures, which propagate unchanged with no retry or
//! backoff in this layer.

use std::fmt;

/// The main error type for query-toolkit operations.
#[derive(Debug)]
pub enum SiftError {
    /// A preset was invoked under a name that is not defined.
    PresetNotFound {
        name: String,
        /// Names currently registered, to aid debugging.
        defined: Vec<String>,
    },

    /// A failure from the underlying store's find or count capability.
    Store(anyhow::Error),
}

impl fmt::Display for SiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiftError::PresetNotFound { name, defined } => {
                if defined.is_empty() {
                    write!(f, "Preset '{}' not found (no presets defined)", name)
                } else {
                    write!(
                        f,
                        "Preset '{}' not found (defined presets: {})",
                        name,
                        defined.join(", ")
                    )
                }
            }
            SiftError::Store(err) => write!(f, "Store operation failed: {}", err),
        }
    }
}

impl std::error::Error for SiftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SiftError::PresetNotFound { .. } => None,
            SiftError::Store(err) => Some(err.as_ref()),
        }
    }
}

impl From<anyhow::Error> for SiftError {
    fn from(err: anyhow::Error) -> Self {
        SiftError::Store(err)
    }
}

/// A specialized Result type for query-toolkit operations.
pub type SiftResult<T> = Result<T, SiftError>;
