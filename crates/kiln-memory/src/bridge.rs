//! MemoryBridge: rebuilds a conversation window from the history log
//!
//! A fresh window is seeded with the most recent turns of the application.
//! The newest entry is left out when it is a user prompt: the caller records
//! the prompt before it asks for a session and then hands the same prompt to
//! the session, so replaying it would put it in the window twice.

use crate::history::HistoryLog;
use crate::types::{AppId, HistoryEntry, MessageType};
use crate::window::{ConversationTurn, ConversationWindow, DEFAULT_WINDOW_SIZE};
use kiln_llm::{Message, MessageRole};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Connects conversation windows to a durable history log
#[derive(Clone)]
pub struct MemoryBridge {
    log: Arc<dyn HistoryLog>,
    window_size: usize,
    replay_count: usize,
}

impl MemoryBridge {
    /// Bridge with the default window size and replay count (both 20)
    #[must_use]
    pub fn new(log: Arc<dyn HistoryLog>) -> Self {
        Self {
            log,
            window_size: DEFAULT_WINDOW_SIZE,
            replay_count: DEFAULT_WINDOW_SIZE,
        }
    }

    /// Set the window capacity
    #[must_use]
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set how many log entries are replayed into a new window
    #[must_use]
    pub fn with_replay_count(mut self, replay_count: usize) -> Self {
        self.replay_count = replay_count;
        self
    }

    /// The history log this bridge reads from
    #[must_use]
    pub fn log(&self) -> Arc<dyn HistoryLog> {
        Arc::clone(&self.log)
    }

    /// Build a window for an application and replay its recent history.
    ///
    /// Never fails: replay problems leave the window empty.
    #[instrument(skip(self))]
    pub async fn build_memory(&self, app_id: AppId) -> ConversationWindow {
        let mut window = ConversationWindow::new(self.window_size);
        if app_id <= 0 {
            debug!(app_id, "Unbound application, starting with empty memory");
            return window;
        }
        self.load_history(app_id, &mut window, self.replay_count)
            .await;
        window
    }

    /// Replace the contents of `window` with up to `max_count` replayed turns.
    ///
    /// Returns the number of turns loaded; 0 on any log failure.
    pub async fn load_history(
        &self,
        app_id: AppId,
        window: &mut ConversationWindow,
        max_count: usize,
    ) -> usize {
        window.clear();
        if max_count == 0 {
            return 0;
        }

        let mut entries = match self.log.query_recent(app_id, max_count + 1, None).await {
            Ok(entries) => entries,
            Err(e) => {
                error!(app_id, error = %e, "Failed to load chat history into memory");
                return 0;
            }
        };

        if entries
            .first()
            .is_some_and(|latest| latest.kind() == Some(MessageType::User))
        {
            entries.remove(0);
        }
        entries.truncate(max_count);

        let mut loaded = 0;
        for entry in entries.into_iter().rev() {
            if let Some(turn) = replay_turn(entry) {
                window.push(turn);
                loaded += 1;
            }
        }

        info!(app_id, loaded, "Loaded chat history into memory");
        loaded
    }

    /// Append a turn produced during the session.
    pub fn append_turn(&self, window: &mut ConversationWindow, turn: ConversationTurn) {
        window.push(turn);
    }
}

fn replay_turn(entry: HistoryEntry) -> Option<ConversationTurn> {
    let message = match entry.role()? {
        MessageRole::User => Message::user(entry.message),
        MessageRole::Assistant => Message::assistant(entry.message),
        MessageRole::System | MessageRole::Tool => return None,
    };
    Some(ConversationTurn {
        message,
        created_at: entry.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryHistoryLog;

    async fn seeded(entries: &[(&str, MessageType)]) -> Arc<InMemoryHistoryLog> {
        let log = Arc::new(InMemoryHistoryLog::new());
        for (text, kind) in entries {
            log.append(1, text, *kind, 1).await.unwrap();
        }
        log
    }

    fn contents(window: &ConversationWindow) -> Vec<(MessageRole, String)> {
        window
            .messages()
            .into_iter()
            .map(|m| (m.role, m.content))
            .collect()
    }

    #[tokio::test]
    async fn test_replay_excludes_pending_prompt() {
        use MessageType::{Ai, User};
        let log = seeded(&[("u1", User), ("a1", Ai), ("u2", User), ("a2", Ai), ("u3", User)]).await;
        let bridge = MemoryBridge::new(log);

        let window = bridge.build_memory(1).await;
        assert_eq!(
            contents(&window),
            vec![
                (MessageRole::User, "u1".to_string()),
                (MessageRole::Assistant, "a1".to_string()),
                (MessageRole::User, "u2".to_string()),
                (MessageRole::Assistant, "a2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_replay_keeps_trailing_reply() {
        use MessageType::{Ai, User};
        let log = seeded(&[("u1", User), ("a1", Ai)]).await;
        let bridge = MemoryBridge::new(log);

        let window = bridge.build_memory(1).await;
        assert_eq!(window.len(), 2);
        assert_eq!(window.last().unwrap().message.content, "a1");
    }

    #[tokio::test]
    async fn test_replay_skips_error_entries() {
        use MessageType::{Ai, Error, User};
        let log = seeded(&[("u1", User), ("boom", Error), ("u2", User), ("a2", Ai)]).await;
        let bridge = MemoryBridge::new(log);

        let window = bridge.build_memory(1).await;
        let texts: Vec<String> = window.messages().into_iter().map(|m| m.content).collect();
        assert_eq!(texts, vec!["u1", "u2", "a2"]);
    }

    #[tokio::test]
    async fn test_replay_respects_max_count() {
        let log = Arc::new(InMemoryHistoryLog::new());
        for i in 0..30 {
            let kind = if i % 2 == 0 { MessageType::User } else { MessageType::Ai };
            log.append(1, &format!("m{i}"), kind, 1).await.unwrap();
        }
        let bridge = MemoryBridge::new(log).with_replay_count(4).with_window_size(10);

        let window = bridge.build_memory(1).await;
        let texts: Vec<String> = window.messages().into_iter().map(|m| m.content).collect();
        assert_eq!(texts, vec!["m26", "m27", "m28", "m29"]);
        assert_eq!(window.capacity(), 10);
    }

    #[tokio::test]
    async fn test_unbound_app_gets_empty_window() {
        let log = seeded(&[("u1", MessageType::User), ("a1", MessageType::Ai)]).await;
        let bridge = MemoryBridge::new(log);
        assert!(bridge.build_memory(0).await.is_empty());
    }

    #[tokio::test]
    async fn test_append_turn_evicts_oldest() {
        let bridge = MemoryBridge::new(Arc::new(InMemoryHistoryLog::new()));
        let mut window = bridge.build_memory(1).await;
        for i in 0..25 {
            bridge.append_turn(&mut window, ConversationTurn::now(Message::user(format!("t{i}"))));
        }
        assert_eq!(window.len(), 20);
        assert_eq!(window.messages()[0].content, "t5");
    }
}
