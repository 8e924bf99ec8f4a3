//! Error types for kiln-memory

/// Errors that can occur in history and memory operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// SQLite database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A caller-supplied argument was rejected
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// General internal error
    #[error("{0}")]
    Internal(String),
}

/// Convenience Result type.
pub type Result<T> = std::result::Result<T, Error>;
