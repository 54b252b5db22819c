//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StoreError {
    pub(crate) fn poisoned(e: impl std::fmt::Display) -> Self {
        StoreError::Poisoned(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
