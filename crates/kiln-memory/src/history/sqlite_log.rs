//! SQLite history log
//!
//! Timestamps are stored as microseconds since the Unix epoch so that range
//! and ordering queries work on plain integers.

use super::HistoryLog;
use crate::error::{Error, Result};
use crate::types::{AppId, HistoryEntry, MessageType, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

type EntryRow = (i64, i64, String, String, i64, i64);

/// SQLite-backed history log
#[derive(Clone)]
pub struct SqliteHistoryLog {
    pool: SqlitePool,
}

impl SqliteHistoryLog {
    /// Open (or create) a history database at the given path
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Internal(format!("Failed to create database directory: {}", e))
            })?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let log = Self { pool };
        log.init_schema().await?;

        info!(path = %path.display(), "SQLite history log initialized");
        Ok(log)
    }

    /// In-memory database (for tests)
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let log = Self { pool };
        log.init_schema().await?;
        debug!("In-memory SQLite history log initialized");
        Ok(log)
    }

    /// Default database location (~/.kiln/history.db)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Internal("Could not determine home directory".to_string()))?;
        Ok(home.join(".kiln").join("history.db"))
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                app_id INTEGER NOT NULL,
                message TEXT NOT NULL,
                message_type TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_chat_history_app_created
                ON chat_history(app_id, created_at)
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("chat_history schema initialized");
        Ok(())
    }

    fn row_to_entry(row: EntryRow) -> Result<HistoryEntry> {
        let (id, app_id, message, message_type, user_id, created_at) = row;
        let created_at = DateTime::<Utc>::from_timestamp_micros(created_at)
            .ok_or_else(|| Error::Internal(format!("Invalid timestamp in row {id}")))?;
        Ok(HistoryEntry {
            id,
            app_id,
            message,
            message_type,
            user_id,
            created_at,
        })
    }
}

#[async_trait]
impl HistoryLog for SqliteHistoryLog {
    async fn append(
        &self,
        app_id: AppId,
        message: &str,
        message_type: MessageType,
        user_id: UserId,
    ) -> Result<HistoryEntry> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO chat_history (app_id, message, message_type, user_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(app_id)
        .bind(message)
        .bind(message_type.as_str())
        .bind(user_id)
        .bind(now.timestamp_micros())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(app_id, id, message_type = %message_type, "History entry appended");

        // Round-trip through micros so the returned entry matches what a query yields.
        let created_at = DateTime::<Utc>::from_timestamp_micros(now.timestamp_micros())
            .unwrap_or(now);
        Ok(HistoryEntry {
            id,
            app_id,
            message: message.to_string(),
            message_type: message_type.as_str().to_string(),
            user_id,
            created_at,
        })
    }

    async fn delete_all(&self, app_id: AppId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM chat_history WHERE app_id = ?")
            .bind(app_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected();
        debug!(app_id, removed, "History deleted");
        Ok(removed)
    }

    async fn query_recent(
        &self,
        app_id: AppId,
        limit: usize,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<HistoryEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<EntryRow> = match before {
            Some(cursor) => {
                sqlx::query_as(
                    r#"
                    SELECT id, app_id, message, message_type, user_id, created_at
                    FROM chat_history
                    WHERE app_id = ? AND created_at < ?
                    ORDER BY created_at DESC, id DESC
                    LIMIT ?
                    "#,
                )
                .bind(app_id)
                .bind(cursor.timestamp_micros())
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT id, app_id, message, message_type, user_id, created_at
                    FROM chat_history
                    WHERE app_id = ?
                    ORDER BY created_at DESC, id DESC
                    LIMIT ?
                    "#,
                )
                .bind(app_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Self::row_to_entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_query() {
        let log = SqliteHistoryLog::in_memory().await.unwrap();
        let u1 = log.append(3, "make a blog", MessageType::User, 1).await.unwrap();
        let a1 = log.append(3, "done", MessageType::Ai, 1).await.unwrap();
        log.append(4, "unrelated", MessageType::User, 1).await.unwrap();

        let entries = log.query_recent(3, 10, None).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], a1);
        assert_eq!(entries[1], u1);
    }

    #[tokio::test]
    async fn test_cursor_and_delete() {
        let log = SqliteHistoryLog::in_memory().await.unwrap();
        let old = log.append(3, "old", MessageType::User, 1).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let new = log.append(3, "new", MessageType::Ai, 1).await.unwrap();

        let page = log.query_recent(3, 10, Some(new.created_at)).await.unwrap();
        assert_eq!(page, vec![old]);

        assert_eq!(log.delete_all(3).await.unwrap(), 2);
        assert!(log.query_recent(3, 10, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_from_path_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.db");
        {
            let log = SqliteHistoryLog::from_path(&path).await.unwrap();
            log.append(1, "kept", MessageType::User, 1).await.unwrap();
        }
        let reopened = SqliteHistoryLog::from_path(&path).await.unwrap();
        let entries = reopened.query_recent(1, 5, None).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "kept");
    }
}
