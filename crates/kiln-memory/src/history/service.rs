//! Validated access to the history log

use super::HistoryLog;
use crate::error::{Error, Result};
use crate::types::{AppId, HistoryEntry, MessageType, UserId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Largest page `list_app_chat_history` will return
pub const MAX_PAGE_SIZE: usize = 50;

/// Chat history operations with argument checks applied before the log is
/// touched.
#[derive(Clone)]
pub struct ChatHistoryService {
    log: Arc<dyn HistoryLog>,
}

impl ChatHistoryService {
    /// Wrap a history log
    #[must_use]
    pub fn new(log: Arc<dyn HistoryLog>) -> Self {
        Self { log }
    }

    /// The underlying log
    #[must_use]
    pub fn log(&self) -> Arc<dyn HistoryLog> {
        Arc::clone(&self.log)
    }

    /// Record one chat message.
    ///
    /// `message_type` is the wire value (`user`, `ai` or `error`).
    #[instrument(skip(self, message))]
    pub async fn add_chat_message(
        &self,
        app_id: AppId,
        message: &str,
        message_type: &str,
        user_id: UserId,
    ) -> Result<HistoryEntry> {
        require_app_id(app_id)?;
        if message.trim().is_empty() {
            return Err(Error::InvalidArgument("message must not be blank".to_string()));
        }
        if message_type.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "message type must not be blank".to_string(),
            ));
        }
        let kind: MessageType = message_type.parse()?;
        if user_id <= 0 {
            return Err(Error::InvalidArgument(format!("invalid user id: {user_id}")));
        }

        self.log.append(app_id, message, kind, user_id).await
    }

    /// Delete all history of one application
    #[instrument(skip(self))]
    pub async fn delete_by_app_id(&self, app_id: AppId) -> Result<u64> {
        require_app_id(app_id)?;
        let removed = self.log.delete_all(app_id).await?;
        debug!(app_id, removed, "Deleted application history");
        Ok(removed)
    }

    /// One page of history, newest first.
    ///
    /// Pass the `created_at` of the last entry of the previous page as
    /// `last_create_time` to continue.
    #[instrument(skip(self))]
    pub async fn list_app_chat_history(
        &self,
        app_id: AppId,
        page_size: usize,
        last_create_time: Option<DateTime<Utc>>,
    ) -> Result<Vec<HistoryEntry>> {
        require_app_id(app_id)?;
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(Error::InvalidArgument(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }
        self.log
            .query_recent(app_id, page_size, last_create_time)
            .await
    }
}

fn require_app_id(app_id: AppId) -> Result<()> {
    if app_id <= 0 {
        return Err(Error::InvalidArgument(format!("invalid app id: {app_id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryHistoryLog;

    fn service() -> (ChatHistoryService, Arc<InMemoryHistoryLog>) {
        let log = Arc::new(InMemoryHistoryLog::new());
        (ChatHistoryService::new(log.clone()), log)
    }

    #[tokio::test]
    async fn test_add_chat_message_validation() {
        let (service, log) = service();

        assert!(service.add_chat_message(0, "hi", "user", 1).await.is_err());
        assert!(service.add_chat_message(1, "   ", "user", 1).await.is_err());
        assert!(service.add_chat_message(1, "hi", "", 1).await.is_err());
        assert!(service.add_chat_message(1, "hi", "assistant", 1).await.is_err());
        assert!(service.add_chat_message(1, "hi", "user", 0).await.is_err());
        assert!(log.is_empty());

        let entry = service.add_chat_message(1, "hi", "user", 1).await.unwrap();
        assert_eq!(entry.message_type, "user");
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_requires_valid_app() {
        let (service, _log) = service();
        assert!(matches!(
            service.delete_by_app_id(-1).await,
            Err(Error::InvalidArgument(_))
        ));

        service.add_chat_message(5, "x", "user", 1).await.unwrap();
        assert_eq!(service.delete_by_app_id(5).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_paging() {
        let (service, _log) = service();
        for i in 0..5 {
            service
                .add_chat_message(2, &format!("m{i}"), "user", 1)
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        assert!(service.list_app_chat_history(2, 0, None).await.is_err());
        assert!(service.list_app_chat_history(2, 51, None).await.is_err());

        let first = service.list_app_chat_history(2, 2, None).await.unwrap();
        assert_eq!(first[0].message, "m4");
        assert_eq!(first[1].message, "m3");

        let cursor = first.last().map(|e| e.created_at);
        let second = service.list_app_chat_history(2, 2, cursor).await.unwrap();
        assert_eq!(second[0].message, "m2");
        assert_eq!(second[1].message, "m1");
    }
}
