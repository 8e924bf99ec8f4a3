//! Process-local history log

use super::HistoryLog;
use crate::error::Result;
use crate::types::{AppId, HistoryEntry, MessageType, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct Inner {
    next_id: i64,
    entries: Vec<HistoryEntry>,
}

/// History log kept in memory; contents are lost on exit.
#[derive(Default)]
pub struct InMemoryHistoryLog {
    inner: Mutex<Inner>,
}

impl InMemoryHistoryLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all applications
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    /// Whether the log holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HistoryLog for InMemoryHistoryLog {
    async fn append(
        &self,
        app_id: AppId,
        message: &str,
        message_type: MessageType,
        user_id: UserId,
    ) -> Result<HistoryEntry> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.next_id += 1;
        let entry = HistoryEntry {
            id: inner.next_id,
            app_id,
            message: message.to_string(),
            message_type: message_type.as_str().to_string(),
            user_id,
            created_at: Utc::now(),
        };
        inner.entries.push(entry.clone());
        debug!(app_id, id = entry.id, message_type = %message_type, "History entry appended");
        Ok(entry)
    }

    async fn delete_all(&self, app_id: AppId) -> Result<u64> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let before = inner.entries.len();
        inner.entries.retain(|e| e.app_id != app_id);
        Ok((before - inner.entries.len()) as u64)
    }

    async fn query_recent(
        &self,
        app_id: AppId,
        limit: usize,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<HistoryEntry>> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut matching: Vec<HistoryEntry> = inner
            .entries
            .iter()
            .filter(|e| e.app_id == app_id)
            .filter(|e| before.map_or(true, |cursor| e.created_at < cursor))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matching.truncate(limit);
        Ok(matching)
    }
}
