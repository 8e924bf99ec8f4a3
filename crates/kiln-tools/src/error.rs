//! Error types for kiln-tools

use thiserror::Error;

/// Why a tool call could not be carried out.
///
/// Every variant is reported back to the model as a tool result; none of
/// them ends a generation on its own.
#[derive(Debug, Error)]
pub enum Error {
    /// No tool registered under that name
    #[error("no tool called {0}")]
    UnknownTool(String),

    /// Arguments missing, of the wrong type, or not JSON at all
    #[error("bad arguments: {0}")]
    BadArguments(String),

    /// Path leaves the project directory
    #[error("'{0}' is outside the project directory")]
    OutsideSandbox(String),

    /// Filesystem failure while writing
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
