//! Function-calling types shared by providers and the tool registry

use serde::{Deserialize, Serialize};

/// A function the model may call, as sent in the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Function name
    pub name: String,
    /// What the function does, written for the model
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a definition
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A call the model asked for.
///
/// `arguments` is kept as the raw JSON text the model produced; it may be
/// malformed, and that is reported back to the model rather than failing
/// the reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Id the tool result must echo
    pub id: String,
    /// Requested function
    pub name: String,
    /// Raw JSON arguments
    pub arguments: String,
}

impl ToolCall {
    /// Create a call
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}
