//! Service assembly from configuration

use super::config::{AppConfig, HistoryBackend};
use super::providers::resolve_llm_router;
use anyhow::{Context, Result};
use kiln_core::{
    CodeSaverExecutor, GenerationService, RoutingPolicy, SessionCache, SessionFactory,
};
use kiln_memory::{
    ChatHistoryService, HistoryLog, InMemoryHistoryLog, MemoryBridge, SqliteHistoryLog,
};
use std::sync::Arc;
use tracing::info;

/// Open the configured history log
pub async fn init_history(config: &AppConfig) -> Result<Arc<dyn HistoryLog>> {
    match config.history.backend {
        HistoryBackend::Memory => {
            info!("Using in-memory chat history");
            Ok(Arc::new(InMemoryHistoryLog::new()))
        }
        HistoryBackend::Sqlite => {
            let path = match &config.history.path {
                Some(path) => path.clone(),
                None => SqliteHistoryLog::default_path()
                    .context("Failed to resolve default history path")?,
            };
            let log = SqliteHistoryLog::from_path(&path)
                .await
                .with_context(|| format!("Failed to open history at {}", path.display()))?;
            info!(path = %path.display(), "Using SQLite chat history");
            Ok(Arc::new(log))
        }
    }
}

/// Build the generation service
pub async fn init_service(config: &AppConfig) -> Result<GenerationService> {
    let log = init_history(config).await?;
    let bridge = MemoryBridge::new(Arc::clone(&log))
        .with_window_size(config.memory.window_size)
        .with_replay_count(config.memory.replay_count);

    let llm = resolve_llm_router(&config.llm);
    let factory = SessionFactory::new(
        RoutingPolicy::new(config.routing.clone()),
        llm,
        bridge,
        config.output.root.clone(),
    )
    .with_max_tool_iterations(config.project.max_tool_iterations);

    let cache = SessionCache::new(Arc::new(factory), config.cache.to_session_cache_config());

    Ok(GenerationService::new(
        Arc::new(cache),
        ChatHistoryService::new(log),
        CodeSaverExecutor::new(config.output.root.clone()),
    ))
}
