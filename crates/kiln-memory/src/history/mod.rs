//! Durable chat history
//!
//! - `HistoryLog`: persistence interface (append, delete, cursor query)
//! - `InMemoryHistoryLog`: process-local log for development and tests
//! - `SqliteHistoryLog`: SQLite-backed log
//! - `ChatHistoryService`: argument validation and paging on top of a log

mod memory_log;
mod service;
mod sqlite_log;

pub use memory_log::InMemoryHistoryLog;
pub use service::{ChatHistoryService, MAX_PAGE_SIZE};
pub use sqlite_log::SqliteHistoryLog;

use crate::error::Result;
use crate::types::{AppId, HistoryEntry, MessageType, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence interface for chat turns.
///
/// Implementations return query results newest first, ordered by creation
/// time and then by insertion order.
#[async_trait]
pub trait HistoryLog: Send + Sync {
    /// Store one message and return the stored entry
    async fn append(
        &self,
        app_id: AppId,
        message: &str,
        message_type: MessageType,
        user_id: UserId,
    ) -> Result<HistoryEntry>;

    /// Delete every entry of an application; returns the number removed
    async fn delete_all(&self, app_id: AppId) -> Result<u64>;

    /// Up to `limit` entries of an application, newest first.
    ///
    /// With `before`, only entries created strictly earlier are returned.
    async fn query_recent(
        &self,
        app_id: AppId,
        limit: usize,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<HistoryEntry>>;
}
