//! Route table: which model serves each output type
//!
//! Configuration only picks the model. The tools a session gets follow from
//! its output type, so a project route always carries the file-write tool.

use crate::codegen_type::CodeGenType;
use crate::error::{Error, Result};
use kiln_llm::ModelConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tools granted to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSet {
    /// Plain chat completion
    None,
    /// Sandboxed file writing inside the project directory
    FileWrite,
}

impl ToolSet {
    /// Tools an output type is generated with
    #[must_use]
    pub fn for_type(code_gen_type: CodeGenType) -> Self {
        if code_gen_type.is_tool_driven() {
            Self::FileWrite
        } else {
            Self::None
        }
    }
}

/// Everything needed to assemble a session for one output type
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRoute {
    /// Model to call
    pub model: ModelConfig,
    /// Tools offered to the model
    pub tools: ToolSet,
}

impl GenerationRoute {
    /// Route for an output type served by `model`
    #[must_use]
    pub fn new(code_gen_type: CodeGenType, model: ModelConfig) -> Self {
        Self {
            model,
            tools: ToolSet::for_type(code_gen_type),
        }
    }
}

/// Model per output type; a missing entry makes that type unsupported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Model for single-page generation
    #[serde(default)]
    pub html: Option<ModelConfig>,
    /// Model for HTML/CSS/JS generation
    #[serde(default)]
    pub multi_file: Option<ModelConfig>,
    /// Model for project generation; must support tool calls
    #[serde(default)]
    pub vue_project: Option<ModelConfig>,
}

impl RoutingConfig {
    /// The same model for every output type
    #[must_use]
    pub fn uniform(model: ModelConfig) -> Self {
        Self {
            html: Some(model.clone()),
            multi_file: Some(model.clone()),
            vue_project: Some(model),
        }
    }

    fn model_for(&self, code_gen_type: CodeGenType) -> Option<&ModelConfig> {
        match code_gen_type {
            CodeGenType::Html => self.html.as_ref(),
            CodeGenType::MultiFile => self.multi_file.as_ref(),
            CodeGenType::VueProject => self.vue_project.as_ref(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        let chat = ModelConfig::new("deepseek", "deepseek-chat").with_max_tokens(8192);
        Self {
            html: Some(chat.clone()),
            multi_file: Some(chat),
            vue_project: Some(
                ModelConfig::new("deepseek", "deepseek-reasoner").with_max_tokens(32768),
            ),
        }
    }
}

/// Maps output types to routes
#[derive(Debug, Clone, Default)]
pub struct RoutingPolicy {
    config: RoutingConfig,
}

impl RoutingPolicy {
    /// Create a policy from a route table
    #[must_use]
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Route for an output type
    pub fn route(&self, code_gen_type: CodeGenType) -> Result<GenerationRoute> {
        let model = self
            .config
            .model_for(code_gen_type)
            .cloned()
            .ok_or_else(|| Error::UnsupportedGenerationType(code_gen_type.value().to_string()))?;
        let route = GenerationRoute::new(code_gen_type, model);
        debug!(
            code_gen_type = %code_gen_type,
            provider = %route.model.provider,
            model = %route.model.model,
            tools = ?route.tools,
            "Route selected"
        );
        Ok(route)
    }

    /// Route for an output type given by its wire value
    pub fn route_str(&self, code_gen_type: &str) -> Result<GenerationRoute> {
        self.route(code_gen_type.parse()?)
    }

    /// The route table
    #[must_use]
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_routes() {
        let policy = RoutingPolicy::default();

        let html = policy.route(CodeGenType::Html).unwrap();
        assert_eq!(html.model.model, "deepseek-chat");
        assert_eq!(html.tools, ToolSet::None);

        let multi = policy.route(CodeGenType::MultiFile).unwrap();
        assert_eq!(multi.tools, ToolSet::None);

        let project = policy.route_str("project").unwrap();
        assert_eq!(project.model.model, "deepseek-reasoner");
        assert_eq!(project.tools, ToolSet::FileWrite);
    }

    #[test]
    fn test_missing_route_is_unsupported() {
        let policy = RoutingPolicy::new(RoutingConfig {
            vue_project: None,
            ..RoutingConfig::default()
        });
        assert!(matches!(
            policy.route(CodeGenType::VueProject),
            Err(Error::UnsupportedGenerationType(v)) if v == "vue_project"
        ));
        assert!(matches!(
            policy.route_str("svelte"),
            Err(Error::UnsupportedGenerationType(_))
        ));
    }

    #[test]
    fn test_project_route_tools_come_from_type() {
        let config: RoutingConfig = serde_json::from_value(serde_json::json!({
            "html": { "provider": "openai", "model": "gpt-4o" },
            "vue_project": { "provider": "deepseek", "model": "deepseek-reasoner" }
        }))
        .unwrap();
        let policy = RoutingPolicy::new(config);

        let project = policy.route(CodeGenType::VueProject).unwrap();
        assert_eq!(project.model.provider, "deepseek");
        assert_eq!(project.tools, ToolSet::FileWrite);

        let html = policy.route(CodeGenType::Html).unwrap();
        assert_eq!(html.model.provider, "openai");
        assert_eq!(html.tools, ToolSet::None);

        assert!(policy.route(CodeGenType::MultiFile).is_err());
    }
}
