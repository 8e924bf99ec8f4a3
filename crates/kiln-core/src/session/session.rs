//! The assembled generation session

use super::prompts::system_prompt;
use crate::codegen_type::{CacheKey, CodeGenType};
use crate::error::{Error, Result};
use crate::result::{
    parse_html_result, parse_multi_file_result, GenerationResult, HtmlCodeResult,
    MultiFileCodeResult,
};
use crate::routing::GenerationRoute;
use crate::saver::{CodeSaverExecutor, SavedArtifactSet};
use kiln_llm::{CompletionRequest, LlmProvider, Message};
use kiln_memory::{AppId, ConversationTurn, ConversationWindow, MemoryBridge};
use kiln_tools::ToolRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// A ready-to-invoke unit: model, tools and conversation memory bound to one
/// application and output type.
///
/// Invocations on one session run one at a time. A session removed from the
/// cache stays fully usable by whoever still holds it.
pub struct GenerationSession {
    pub(super) id: String,
    pub(super) key: CacheKey,
    pub(super) route: GenerationRoute,
    pub(super) provider: Arc<dyn LlmProvider>,
    pub(super) tools: ToolRegistry,
    pub(super) memory: Mutex<ConversationWindow>,
    pub(super) bridge: MemoryBridge,
    pub(super) project_dir: PathBuf,
    pub(super) max_tool_iterations: usize,
    created_at: Instant,
    last_access: std::sync::Mutex<Instant>,
}

impl std::fmt::Debug for GenerationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationSession")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("provider", &self.provider.name())
            .field("model", &self.route.model.model)
            .field("tools", &self.tools.names())
            .finish_non_exhaustive()
    }
}

impl GenerationSession {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        key: CacheKey,
        route: GenerationRoute,
        provider: Arc<dyn LlmProvider>,
        tools: ToolRegistry,
        window: ConversationWindow,
        bridge: MemoryBridge,
        project_dir: PathBuf,
        max_tool_iterations: usize,
    ) -> Self {
        let now = Instant::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            key,
            route,
            provider,
            tools,
            memory: Mutex::new(window),
            bridge,
            project_dir,
            max_tool_iterations,
            created_at: now,
            last_access: std::sync::Mutex::new(now),
        }
    }

    /// Unique id of this session instance
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Cache key the session was built for
    #[must_use]
    pub fn key(&self) -> CacheKey {
        self.key
    }

    /// Owning application
    #[must_use]
    pub fn app_id(&self) -> AppId {
        self.key.app_id
    }

    /// Output type the session produces
    #[must_use]
    pub fn code_gen_type(&self) -> CodeGenType {
        self.key.code_gen_type
    }

    /// Route the session was assembled from
    #[must_use]
    pub fn route(&self) -> &GenerationRoute {
        &self.route
    }

    /// Names of the tools offered to the model
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.names()
    }

    /// Directory project tools write into
    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// When the session was built
    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// When the session was last handed out by the cache
    #[must_use]
    pub fn last_access(&self) -> Instant {
        *self.last_access.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(super) fn touch(&self) {
        *self.last_access.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
    }

    /// Copy of the conversation window, oldest first
    pub async fn memory_snapshot(&self) -> Vec<Message> {
        self.memory.lock().await.messages()
    }

    /// Generate a single page
    pub async fn generate_html(&self, user_message: &str) -> Result<HtmlCodeResult> {
        self.expect_type(CodeGenType::Html)?;
        match self.generate(user_message).await? {
            GenerationResult::Html(result) => Ok(result),
            other => Err(self.mismatch(other.code_gen_type())),
        }
    }

    /// Generate an HTML/CSS/JS triple
    pub async fn generate_multi_file(&self, user_message: &str) -> Result<MultiFileCodeResult> {
        self.expect_type(CodeGenType::MultiFile)?;
        match self.generate(user_message).await? {
            GenerationResult::MultiFile(result) => Ok(result),
            other => Err(self.mismatch(other.code_gen_type())),
        }
    }

    /// Generate a structured result of whatever shape the session produces.
    ///
    /// Project sessions write files through tools; use
    /// [`generate_project`](Self::generate_project) for those.
    pub async fn generate(&self, user_message: &str) -> Result<GenerationResult> {
        let mut memory = self.memory.lock().await;
        let (result, reply) = self.exchange(&mut memory, user_message).await?;
        self.bridge
            .append_turn(&mut memory, ConversationTurn::now(Message::assistant(reply)));
        Ok(result)
    }

    /// Generate and write the artifacts.
    ///
    /// The assistant turn enters memory only after the save succeeded, so a
    /// failed write leaves the window ending in the user turn, the same as
    /// the history log replays it.
    pub async fn generate_and_save(
        &self,
        user_message: &str,
        saver: &CodeSaverExecutor,
    ) -> Result<(GenerationResult, SavedArtifactSet)> {
        let mut memory = self.memory.lock().await;
        let (result, reply) = self.exchange(&mut memory, user_message).await?;
        let saved = saver.save(&result, self.key.app_id).await?;
        self.bridge
            .append_turn(&mut memory, ConversationTurn::now(Message::assistant(reply)));
        Ok((result, saved))
    }

    fn expect_type(&self, wanted: CodeGenType) -> Result<()> {
        if self.key.code_gen_type != wanted {
            return Err(self.mismatch(wanted));
        }
        Ok(())
    }

    fn mismatch(&self, wanted: CodeGenType) -> Error {
        Error::UnsupportedGenerationType(format!(
            "{} requested from a {} session",
            wanted, self.key.code_gen_type
        ))
    }

    /// Request carrying the system prompt followed by `history`
    pub(super) fn request_with(&self, history: Vec<Message>) -> CompletionRequest {
        CompletionRequest::for_model(&self.route.model)
            .with_message(Message::system(system_prompt(self.key.code_gen_type)))
            .with_messages(history)
            .with_json_mode(!self.key.code_gen_type.is_tool_driven())
    }

    /// Append the user turn, call the model and parse its reply.
    ///
    /// Returns the result and the text to keep as the assistant turn, which
    /// is the same text the history log records. Appending that turn is left
    /// to the caller.
    #[instrument(skip(self, memory, user_message), fields(key = %self.key, session_id = %self.id))]
    async fn exchange(
        &self,
        memory: &mut ConversationWindow,
        user_message: &str,
    ) -> Result<(GenerationResult, String)> {
        let code_gen_type = self.key.code_gen_type;
        if code_gen_type.is_tool_driven() {
            return Err(Error::UnsupportedGenerationType(format!(
                "{code_gen_type} has no structured result"
            )));
        }
        self.bridge
            .append_turn(memory, ConversationTurn::now(Message::user(user_message)));

        let request = self.request_with(memory.messages());
        debug!(messages = request.messages.len(), "Calling model");
        let response = self.provider.complete(request).await?;
        debug!(
            model = %response.model,
            tokens = ?response.usage.map(|u| u.total_tokens),
            "Model replied"
        );

        let result: GenerationResult = match code_gen_type {
            CodeGenType::MultiFile => parse_multi_file_result(&response.content)?.into(),
            _ => parse_html_result(&response.content)?.into(),
        };
        let reply = result.reply_text()?;
        Ok((result, reply))
    }
}
