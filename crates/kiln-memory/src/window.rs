//! Bounded in-process conversation window

use chrono::{DateTime, Utc};
use kiln_llm::Message;
use std::collections::VecDeque;

/// Window capacity used when none is configured
pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// A message held by the window, stamped with when it entered
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    /// The message itself
    pub message: Message,
    /// When the turn was produced (replayed turns keep their log timestamp)
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    /// Stamp a message with the current time
    #[must_use]
    pub fn now(message: Message) -> Self {
        Self {
            message,
            created_at: Utc::now(),
        }
    }
}

/// Fixed-capacity FIFO of the most recent turns of one session.
///
/// Pushing into a full window drops the oldest turn first.
#[derive(Debug, Clone)]
pub struct ConversationWindow {
    capacity: usize,
    turns: VecDeque<ConversationTurn>,
}

impl Default for ConversationWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl ConversationWindow {
    /// Create an empty window; a zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            turns: VecDeque::with_capacity(capacity),
        }
    }

    /// Maximum number of turns kept
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of turns currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the window holds no turns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a turn, evicting the oldest when full
    pub fn push(&mut self, turn: ConversationTurn) {
        while self.turns.len() >= self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    /// Append a message stamped with the current time
    pub fn push_message(&mut self, message: Message) {
        self.push(ConversationTurn::now(message));
    }

    /// Drop every turn
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Turns, oldest first
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    /// Messages, oldest first, ready to send to a provider
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.turns.iter().map(|t| t.message.clone()).collect()
    }

    /// The most recent turn
    #[must_use]
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_keeps_last_n() {
        let mut window = ConversationWindow::default();
        for i in 0..25 {
            window.push_message(Message::user(format!("m{i}")));
        }
        assert_eq!(window.len(), DEFAULT_WINDOW_SIZE);

        let contents: Vec<String> = window.messages().into_iter().map(|m| m.content).collect();
        let expected: Vec<String> = (5..25).map(|i| format!("m{i}")).collect();
        assert_eq!(contents, expected);
    }

    #[test]
    fn test_window_clear_and_last() {
        let mut window = ConversationWindow::new(3);
        assert!(window.last().is_none());
        window.push_message(Message::user("a"));
        window.push_message(Message::assistant("b"));
        assert_eq!(window.last().unwrap().message.content, "b");

        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.capacity(), 3);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut window = ConversationWindow::new(0);
        window.push_message(Message::user("a"));
        window.push_message(Message::user("b"));
        assert_eq!(window.len(), 1);
        assert_eq!(window.messages()[0].content, "b");
    }
}
