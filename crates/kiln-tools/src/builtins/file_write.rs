//! File write tool bound to a project directory

use super::security;
use crate::error::{Error, Result};
use crate::registry::{Tool, ToolOutput};
use kiln_llm::ToolDefinition;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name under which the tool is offered to the model
pub const FILE_WRITE_TOOL_NAME: &str = "write_file";

/// Writes project files under a fixed base directory
pub struct FileWriteTool {
    definition: ToolDefinition,
    base_dir: PathBuf,
}

impl FileWriteTool {
    /// Create a tool that writes beneath `base_dir`
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let definition = ToolDefinition::new(
            FILE_WRITE_TOOL_NAME,
            "Write a file of the project. Paths are relative to the project root; \
             parent directories are created and existing files are overwritten.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "relative_path": {
                        "type": "string",
                        "description": "File path relative to the project root, e.g. src/App.vue"
                    },
                    "content": {
                        "type": "string",
                        "description": "Full content of the file"
                    }
                },
                "required": ["relative_path", "content"]
            }),
        );

        Self {
            definition,
            base_dir: base_dir.into(),
        }
    }

    /// Directory the tool writes into
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

fn string_arg<'a>(arguments: &'a serde_json::Value, key: &str) -> Result<&'a str> {
    arguments
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::BadArguments(format!("missing string '{key}'")))
}

#[async_trait::async_trait]
impl Tool for FileWriteTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput> {
        let relative_path = string_arg(&arguments, "relative_path")?;
        let content = string_arg(&arguments, "content")?;

        let target = security::resolve_within(&self.base_dir, relative_path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, content).await?;

        // Report the cleaned path so `./a.js` and `a.js` read the same
        let shown = target
            .strip_prefix(&self.base_dir)
            .unwrap_or(&target)
            .to_string_lossy()
            .into_owned();
        debug!(path = %shown, bytes = content.len(), "Project file written");

        Ok(ToolOutput::wrote(
            serde_json::json!({ "path": shown, "bytes_written": content.len() }),
            target,
        ))
    }
}
