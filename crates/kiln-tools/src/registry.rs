//! Registry - the tools one session offers to the model
//!
//! A project session owns a registry holding the tools its output type
//! grants. The registry hands the model their definitions and dispatches the
//! calls it makes back by name.

use crate::error::{Error, Result};
use kiln_llm::{ToolCall, ToolDefinition};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// What a successful tool run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// JSON reported back to the model
    pub report: serde_json::Value,
    /// Files created or overwritten, as resolved paths
    pub written: Vec<PathBuf>,
}

impl ToolOutput {
    /// Output that touched no files
    #[must_use]
    pub fn report(report: serde_json::Value) -> Self {
        Self {
            report,
            written: Vec::new(),
        }
    }

    /// Output of a run that wrote one file
    #[must_use]
    pub fn wrote(report: serde_json::Value, path: PathBuf) -> Self {
        Self {
            report,
            written: vec![path],
        }
    }
}

/// A capability the model can call by name
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and JSON schema shown to the model
    fn definition(&self) -> &ToolDefinition;

    /// Run with arguments already parsed into a JSON object
    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput>;
}

/// Tools keyed by name
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, replacing any tool of the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name.clone();
        debug!(tool = %name, "Registering tool");
        self.tools.insert(name, tool);
    }

    /// Whether a tool of that name exists
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Definitions to send with a completion request, sorted by name
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| tool.definition().clone())
            .collect()
    }

    /// Parse the call's arguments and run the named tool
    pub async fn dispatch(&self, call: &ToolCall) -> Result<ToolOutput> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| Error::UnknownTool(call.name.clone()))?;
        let arguments: serde_json::Value = serde_json::from_str(&call.arguments)
            .map_err(|e| Error::BadArguments(e.to_string()))?;
        if !arguments.is_object() {
            return Err(Error::BadArguments("arguments must be a JSON object".to_string()));
        }
        tool.execute(arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool {
        definition: ToolDefinition,
    }

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput> {
            Ok(ToolOutput::report(arguments))
        }
    }

    fn echo(name: &str) -> Arc<dyn Tool> {
        Arc::new(EchoTool {
            definition: ToolDefinition::new(name, "echo input", serde_json::json!({"type": "object"})),
        })
    }

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: "call_1".to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }
    }

    #[test]
    fn test_definitions_are_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("write_file"));
        registry.register(echo("list_dir"));

        assert!(registry.has("write_file"));
        assert!(!registry.has("read_file"));
        assert_eq!(registry.names(), vec!["list_dir", "write_file"]);
        let names: Vec<_> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["list_dir", "write_file"]);
    }

    #[tokio::test]
    async fn test_dispatch() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("echo"));

        let output = registry.dispatch(&call("echo", r#"{"a": 1}"#)).await.unwrap();
        assert_eq!(output.report["a"], 1);
        assert!(output.written.is_empty());

        let missing = registry.dispatch(&call("foo", "{}")).await;
        assert!(matches!(missing, Err(Error::UnknownTool(name)) if name == "foo"));

        let malformed = registry.dispatch(&call("echo", "{not json")).await;
        assert!(matches!(malformed, Err(Error::BadArguments(_))));

        let scalar = registry.dispatch(&call("echo", r#""text""#)).await;
        assert!(matches!(scalar, Err(Error::BadArguments(_))));
    }
}
