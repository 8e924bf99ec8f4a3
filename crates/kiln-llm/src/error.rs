//! Error types for kiln-llm

use std::time::Duration;
use thiserror::Error;

/// Why a model call produced no usable reply
#[derive(Debug, Error)]
pub enum Error {
    /// No provider registered under the name, or its key is missing
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// The endpoint answered with a non-success status
    #[error("provider returned {status}: {message}")]
    Status {
        /// HTTP status code (0 for failures that never reached HTTP)
        status: u16,
        /// Sanitized error body
        message: String,
    },

    /// The endpoint answered 429
    #[error("provider rate limit reached")]
    RateLimited,

    /// The reply did not have the chat-completions shape
    #[error("malformed provider reply: {0}")]
    MalformedReply(String),

    /// Connection-level failure
    #[error("transport error: {0}")]
    Transport(String),

    /// No reply within the configured timeout
    #[error("no reply within {0:?}")]
    TimedOut(Duration),
}

impl Error {
    /// Failure reported by the provider itself rather than the transport
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Status {
            status: 0,
            message: message.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
