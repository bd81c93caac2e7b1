//! Conversation message types.

use serde::{Deserialize, Serialize};

/// Represents the originator of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Message typed by the user.
    User,
    /// Message produced by the assistant backend.
    Assistant,
}

/// A single message in the conversation log.
///
/// Messages are immutable once created; the log is insertion-ordered and
/// ids are unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (UUID format)
    pub id: String,
    /// Who produced the message.
    pub sender: Sender,
    /// The message text as rendered in the chat surface.
    pub text: String,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
}

impl Message {
    /// Creates a message with a fresh id and the current timestamp.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
