//! Shared types for chat history

use chrono::{DateTime, Utc};
use kiln_llm::MessageRole;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Application identifier; valid ids are positive, 0 is the unbound default.
pub type AppId = i64;

/// Identifier of the user who produced a history entry.
pub type UserId = i64;

/// Kind of a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Prompt sent by the user
    User,
    /// Reply produced by the model
    Ai,
    /// Record of a failed generation
    Error,
}

impl MessageType {
    /// Wire value stored in the history log
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
            Self::Error => "error",
        }
    }

    /// Conversation role used when the entry is replayed, if any
    #[must_use]
    pub fn role(&self) -> Option<MessageRole> {
        match self {
            Self::User => Some(MessageRole::User),
            Self::Ai => Some(MessageRole::Assistant),
            Self::Error => None,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "ai" => Ok(Self::Ai),
            "error" => Ok(Self::Error),
            other => Err(crate::Error::InvalidArgument(format!(
                "unknown message type: {other}"
            ))),
        }
    }
}

/// One persisted chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Row id, increasing in insertion order
    pub id: i64,
    /// Owning application
    pub app_id: AppId,
    /// Message text
    pub message: String,
    /// Raw message type as stored
    pub message_type: String,
    /// Author
    pub user_id: UserId,
    /// Insertion time
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Parsed message type; `None` for values this version does not know.
    #[must_use]
    pub fn kind(&self) -> Option<MessageType> {
        self.message_type.parse().ok()
    }

    /// Conversation role for replay; `None` means the entry is skipped.
    #[must_use]
    pub fn role(&self) -> Option<MessageRole> {
        self.kind().and_then(|k| k.role())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_parse() {
        assert_eq!("user".parse::<MessageType>().unwrap(), MessageType::User);
        assert_eq!("ai".parse::<MessageType>().unwrap(), MessageType::Ai);
        assert_eq!("error".parse::<MessageType>().unwrap(), MessageType::Error);
        assert!("assistant".parse::<MessageType>().is_err());
        assert_eq!(MessageType::Ai.to_string(), "ai");
    }

    #[test]
    fn test_entry_role() {
        let mut entry = HistoryEntry {
            id: 1,
            app_id: 7,
            message: "hello".to_string(),
            message_type: "user".to_string(),
            user_id: 1,
            created_at: Utc::now(),
        };
        assert_eq!(entry.role(), Some(MessageRole::User));

        entry.message_type = "ai".to_string();
        assert_eq!(entry.role(), Some(MessageRole::Assistant));

        entry.message_type = "error".to_string();
        assert_eq!(entry.role(), None);

        entry.message_type = "system".to_string();
        assert_eq!(entry.kind(), None);
        assert_eq!(entry.role(), None);
    }
}
