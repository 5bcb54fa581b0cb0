//! Error types for graft.

use thiserror::Error;

/// Result type alias using graft's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for graft operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Store database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Archive API call failed (transport error, timeout, or non-success status)
    #[error("Archive error: {0}")]
    Corpus(String),

    /// Note-store write API call failed
    #[error("Store API error: {0}")]
    StoreApi(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
