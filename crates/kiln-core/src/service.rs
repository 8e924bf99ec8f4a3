//! End-to-end generation flow used by front ends
//!
//! One request runs: record the prompt, fetch the cached session, generate,
//! persist the artifacts, record the reply. Requests for the same application
//! are serialized; different applications run in parallel.

use crate::codegen_type::CodeGenType;
use crate::error::Result;
use crate::saver::{CodeSaverExecutor, SavedArtifactSet};
use crate::session::{GenerationSession, ProjectEvent, SessionCache};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use kiln_memory::{AppId, ChatHistoryService, HistoryEntry, MessageType, UserId};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// One generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Target application
    pub app_id: AppId,
    /// Requesting user
    pub user_id: UserId,
    /// What to build or change
    pub prompt: String,
    /// Output type
    pub code_gen_type: CodeGenType,
}

impl GenerationRequest {
    /// Create a request
    #[must_use]
    pub fn new(
        app_id: AppId,
        user_id: UserId,
        prompt: impl Into<String>,
        code_gen_type: CodeGenType,
    ) -> Self {
        Self {
            app_id,
            user_id,
            prompt: prompt.into(),
            code_gen_type,
        }
    }
}

/// What a successful request produced
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// Output type
    pub code_gen_type: CodeGenType,
    /// Description or summary from the model
    pub description: String,
    /// Where the artifacts landed
    pub artifacts: SavedArtifactSet,
    /// Session that served the request
    pub session_id: String,
}

/// Generation facade over the session cache, history and savers
pub struct GenerationService {
    cache: Arc<SessionCache>,
    history: ChatHistoryService,
    saver: CodeSaverExecutor,
    locks: DashMap<AppId, Arc<Mutex<()>>>,
}

impl GenerationService {
    /// Create a service
    #[must_use]
    pub fn new(
        cache: Arc<SessionCache>,
        history: ChatHistoryService,
        saver: CodeSaverExecutor,
    ) -> Self {
        Self {
            cache,
            history,
            saver,
            locks: DashMap::new(),
        }
    }

    /// Session cache
    #[must_use]
    pub fn cache(&self) -> &Arc<SessionCache> {
        &self.cache
    }

    /// History service
    #[must_use]
    pub fn history(&self) -> &ChatHistoryService {
        &self.history
    }

    /// Run one generation request.
    ///
    /// `events` receives progress of project generations and is ignored for
    /// the other output types. A failed generation is recorded as an `error`
    /// history entry and returned.
    #[instrument(skip(self, request, events), fields(app_id = request.app_id, code_gen_type = %request.code_gen_type))]
    pub async fn generate(
        &self,
        request: GenerationRequest,
        events: Option<&UnboundedSender<ProjectEvent>>,
    ) -> Result<GenerationOutcome> {
        let lock = self.app_lock(request.app_id);
        let _guard = lock.lock().await;

        self.history
            .add_chat_message(
                request.app_id,
                &request.prompt,
                MessageType::User.as_str(),
                request.user_id,
            )
            .await?;

        match self.run(&request, events).await {
            Ok((outcome, reply)) => {
                self.record(&request, &reply, MessageType::Ai).await;
                info!(
                    session_id = %outcome.session_id,
                    files = outcome.artifacts.files.len(),
                    dir = %outcome.artifacts.dir.display(),
                    "Generation finished"
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "Generation failed");
                self.record(&request, &format!("Generation failed: {e}"), MessageType::Error)
                    .await;
                Err(e)
            }
        }
    }

    /// Forget an application: delete its history and drop its sessions.
    ///
    /// Generated files stay on disk.
    #[instrument(skip(self))]
    pub async fn reset_app(&self, app_id: AppId) -> Result<u64> {
        let lock = self.app_lock(app_id);
        let _guard = lock.lock().await;

        let removed = self.history.delete_by_app_id(app_id).await?;
        self.cache.invalidate_app(app_id).await;
        info!(removed, "Application reset");
        Ok(removed)
    }

    /// One page of an application's history, newest first
    pub async fn list_history(
        &self,
        app_id: AppId,
        page_size: usize,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<HistoryEntry>> {
        Ok(self
            .history
            .list_app_chat_history(app_id, page_size, before)
            .await?)
    }

    fn app_lock(&self, app_id: AppId) -> Arc<Mutex<()>> {
        Arc::clone(&self.locks.entry(app_id).or_default())
    }

    /// Generate and save; returns the outcome and the reply to record, which
    /// is the text the session kept as its assistant turn.
    async fn run(
        &self,
        request: &GenerationRequest,
        events: Option<&UnboundedSender<ProjectEvent>>,
    ) -> Result<(GenerationOutcome, String)> {
        let session = self
            .cache
            .get(request.app_id, request.code_gen_type)
            .await?;

        if request.code_gen_type.is_tool_driven() {
            return self.run_project(&session, request, events).await;
        }

        let (result, artifacts) = session
            .generate_and_save(&request.prompt, &self.saver)
            .await?;
        let reply = result.reply_text()?;
        Ok((
            GenerationOutcome {
                code_gen_type: request.code_gen_type,
                description: result.description().to_string(),
                artifacts,
                session_id: session.id().to_string(),
            },
            reply,
        ))
    }

    async fn run_project(
        &self,
        session: &GenerationSession,
        request: &GenerationRequest,
        events: Option<&UnboundedSender<ProjectEvent>>,
    ) -> Result<(GenerationOutcome, String)> {
        let outcome = session.generate_project(&request.prompt, events).await?;
        Ok((
            GenerationOutcome {
                code_gen_type: request.code_gen_type,
                description: outcome.summary.clone(),
                artifacts: SavedArtifactSet {
                    dir: outcome.dir,
                    files: outcome.files,
                },
                session_id: session.id().to_string(),
            },
            outcome.summary,
        ))
    }

    async fn record(&self, request: &GenerationRequest, text: &str, kind: MessageType) {
        if let Err(e) = self
            .history
            .add_chat_message(request.app_id, text, kind.as_str(), request.user_id)
            .await
        {
            warn!(error = %e, message_type = %kind, "Failed to record chat message");
        }
    }
}
