//! Error types for quoteday-core

use thiserror::Error;

/// Result type alias using quoteday-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quoteday-core operations
///
/// Every variant is recoverable: a failed sync cycle, import or random pick
/// leaves the local quote store intact.
#[derive(Error, Debug)]
pub enum Error {
    /// Remote fetch/push failed (transport error or non-success status)
    #[error("Network error: {0}")]
    Network(String),

    /// Import payload is not a valid quote array
    #[error("Invalid import format: {0}")]
    ImportFormat(String),

    /// No quotes match the current filter
    #[error("No quotes available in this category")]
    EmptySet,

    /// Conflict index out of range
    #[error("Conflict not found at index {0}")]
    ConflictNotFound(usize),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Persistence adapter error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}
