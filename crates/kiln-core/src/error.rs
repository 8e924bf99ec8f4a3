//! Error types for kiln-core
//!
//! This module provides error types and user-friendly error formatting.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// A generation result failed validation before saving
    #[error("validation error: {0}")]
    Validation(String),

    /// No route exists for the requested output type
    #[error("unsupported generation type: {0}")]
    UnsupportedGenerationType(String),

    /// Saving stopped after some files were already written
    #[error("partial write: {} failed after {} file(s) were written", failed.display(), written.len())]
    PartialWrite {
        /// Files written before the failure
        written: Vec<PathBuf>,
        /// File whose write failed
        failed: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Model output could not be turned into a structured result
    #[error("unparseable model output: {0}")]
    Parse(String),

    /// The project tool loop hit its iteration limit
    #[error("tool loop exceeded {0} iterations")]
    ToolLoopExhausted(usize),

    /// Building a session failed (shared by every caller waiting on it)
    #[error("session build failed: {0}")]
    SessionBuild(Arc<Error>),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// LLM provider error
    #[error("llm error: {0}")]
    Llm(#[from] kiln_llm::Error),

    /// History / memory error
    #[error("history error: {0}")]
    History(#[from] kiln_memory::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Take ownership of a shared build error when no other waiter holds it.
    #[must_use]
    pub fn from_shared(shared: Arc<Error>) -> Self {
        Arc::try_unwrap(shared).unwrap_or_else(Error::SessionBuild)
    }

    /// The innermost error, looking through shared build failures.
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Error::SessionBuild(inner) => inner.root(),
            other => other,
        }
    }
}

/// Trait for user-friendly error messages
///
/// Provides human-readable error messages and suggestions for fixing.
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::Validation(msg) => format!("The generated result was rejected: {}", msg),
            Error::UnsupportedGenerationType(ty) => {
                format!("Output type '{}' is not supported.", ty)
            }
            Error::PartialWrite { written, failed, .. } => format!(
                "Saving stopped at {} after {} file(s) were written.",
                failed.display(),
                written.len()
            ),
            Error::Parse(_) => "The model reply did not contain usable code.".to_string(),
            Error::ToolLoopExhausted(n) => {
                format!("Project generation did not finish within {} steps.", n)
            }
            Error::SessionBuild(inner) => inner.user_message(),
            Error::Configuration(msg) => format!("Configuration error: {}", msg),
            Error::Llm(kiln_llm::Error::RateLimited) => {
                "Rate limit exceeded. Please try again later.".to_string()
            }
            Error::Llm(kiln_llm::Error::TimedOut(after)) => {
                format!("The model did not answer within {} s.", after.as_secs())
            }
            Error::Llm(kiln_llm::Error::NotConfigured(what)) => {
                format!("Model provider is not configured: {}", what)
            }
            Error::Llm(e) => format!("Model call failed: {}", e),
            Error::History(e) => format!("Chat history error: {}", e),
            Error::Io(e) => format!("File system error: {}", e),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::UnsupportedGenerationType(_) => {
                Some("Use one of: html, multi_file, vue_project.".to_string())
            }
            Error::PartialWrite { .. } | Error::Validation(_) | Error::Parse(_) => {
                Some("Run the generation again; the output directory is overwritten.".to_string())
            }
            Error::ToolLoopExhausted(_) => Some(
                "Raise project.max_tool_iterations or simplify the request.".to_string(),
            ),
            Error::Llm(kiln_llm::Error::NotConfigured(_)) | Error::Configuration(_) => Some(
                "Check config/default.toml, your .env file and the KILN_* environment variables."
                    .to_string(),
            ),
            Error::Llm(kiln_llm::Error::TimedOut(_)) => Some(
                "Raise timeout_ms in the provider section or ask for a smaller change."
                    .to_string(),
            ),
            Error::SessionBuild(inner) => inner.suggestion(),
            _ => None,
        }
    }
}

/// Format an error for display in the CLI
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = error.user_message();
    if let Some(suggestion) = error.suggestion() {
        output.push_str("\n\n");
        output.push_str(&suggestion);
    }
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_shared_unwraps_sole_owner() {
        let shared = Arc::new(Error::UnsupportedGenerationType("pdf".to_string()));
        assert!(matches!(
            Error::from_shared(shared),
            Error::UnsupportedGenerationType(_)
        ));

        let shared = Arc::new(Error::Validation("x".to_string()));
        let _other = Arc::clone(&shared);
        let err = Error::from_shared(shared);
        assert!(matches!(err, Error::SessionBuild(_)));
        assert!(matches!(err.root(), Error::Validation(_)));
    }

    #[test]
    fn test_cli_format_includes_suggestion() {
        let text = format_error_for_cli(&Error::UnsupportedGenerationType("pdf".to_string()));
        assert!(text.contains("'pdf'"));
        assert!(text.contains("vue_project"));

        let text = format_error_for_cli(&Error::Io(std::io::Error::other("denied")));
        assert!(text.starts_with("File system error"));

        let text = format_error_for_cli(&Error::Llm(kiln_llm::Error::TimedOut(
            std::time::Duration::from_secs(120),
        )));
        assert!(text.contains("within 120 s"));
        assert!(text.contains("timeout_ms"));
    }
}
