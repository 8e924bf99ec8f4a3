//! Session assembly

use super::session::GenerationSession;
use crate::codegen_type::{CacheKey, CodeGenType};
use crate::error::{Error, Result};
use crate::routing::{RoutingPolicy, ToolSet};
use crate::saver::artifact_dir;
use kiln_llm::LlmRouter;
use kiln_memory::MemoryBridge;
use kiln_tools::{FileWriteTool, ToolRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Model calls allowed in one project generation
pub const DEFAULT_MAX_TOOL_ITERATIONS: usize = 20;

/// Builds sessions for cache keys
pub struct SessionFactory {
    policy: RoutingPolicy,
    llm: Arc<LlmRouter>,
    bridge: MemoryBridge,
    output_root: PathBuf,
    max_tool_iterations: usize,
}

impl SessionFactory {
    /// Create a factory writing project files under `output_root`
    #[must_use]
    pub fn new(
        policy: RoutingPolicy,
        llm: Arc<LlmRouter>,
        bridge: MemoryBridge,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            policy,
            llm,
            bridge,
            output_root: output_root.into(),
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }

    /// Limit model calls per project generation (at least one)
    #[must_use]
    pub fn with_max_tool_iterations(mut self, max: usize) -> Self {
        self.max_tool_iterations = max.max(1);
        self
    }

    /// Route table in use
    #[must_use]
    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    /// Artifact root
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Assemble a session: route, provider, tools, then replayed memory.
    ///
    /// Nothing is shared between sessions except the provider and the
    /// history log.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn build(&self, key: CacheKey) -> Result<GenerationSession> {
        let route = self.policy.route(key.code_gen_type)?;
        let provider = self.llm.resolve(&route.model)?;

        if route.tools != ToolSet::None && !provider.supports_tools() {
            return Err(Error::Configuration(format!(
                "provider '{}' cannot call tools, required for {}",
                provider.name(),
                key.code_gen_type
            )));
        }

        let project_dir = artifact_dir(&self.output_root, key.app_id, CodeGenType::VueProject);
        let mut tools = ToolRegistry::new();
        match route.tools {
            ToolSet::None => {}
            ToolSet::FileWrite => tools.register(Arc::new(FileWriteTool::new(project_dir.clone()))),
        }

        let window = self.bridge.build_memory(key.app_id).await;
        let session = GenerationSession::new(
            key,
            route,
            provider,
            tools,
            window,
            self.bridge.clone(),
            project_dir,
            self.max_tool_iterations,
        );

        info!(
            session_id = %session.id(),
            provider = %session.route().model.provider,
            model = %session.route().model.model,
            tools = ?session.tool_names(),
            "Generation session built"
        );
        Ok(session)
    }
}
