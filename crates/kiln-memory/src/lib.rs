//! Kiln Memory - Conversation Window and Chat History
//!
//! Each generation session keeps a short in-process window of recent turns.
//! The durable history log is the source of truth: a new window is rebuilt
//! from it, and every turn the session produces is written back to it.
//!
//! ```text
//! HistoryLog (SQLite / in-memory) ──replay──► MemoryBridge ──► ConversationWindow
//!        ▲                                                            │
//!        └──────────── ChatHistoryService::add_chat_message ◄─────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bridge;
pub mod error;
pub mod history;
pub mod types;
pub mod window;

pub use bridge::MemoryBridge;
pub use error::{Error, Result};
pub use history::{
    ChatHistoryService, HistoryLog, InMemoryHistoryLog, SqliteHistoryLog, MAX_PAGE_SIZE,
};
pub use types::{AppId, HistoryEntry, MessageType, UserId};
pub use window::{ConversationTurn, ConversationWindow, DEFAULT_WINDOW_SIZE};
