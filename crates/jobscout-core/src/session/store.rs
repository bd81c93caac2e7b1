//! Conversation store: the ordered message log and the pending-interrupt state.

use serde::{Deserialize, Serialize};

use super::message::{Message, Sender};

/// A clarification the backend is waiting on.
///
/// At most one exists per session. The `context` payload is opaque to the
/// engine; it is forwarded to the presentation layer for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingInterrupt {
    /// The clarification question, as shown in the chat surface.
    pub question: String,
    /// Opaque interrupt payload from the server (`Null` when it sent none).
    pub context: serde_json::Value,
}

/// The ordered message log for one session.
///
/// The store guarantees the log never contains two consecutive assistant
/// messages: one server reply corresponds to at most one visible assistant
/// utterance, so bursts of partial or duplicate signals from a single turn
/// collapse into one bubble.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationStore {
    messages: Vec<Message>,
    pending_interrupt: Option<PendingInterrupt>,
}

impl ConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user message.
    ///
    /// This is the sole entry point for user turns and must be called before
    /// the turn call is issued (immediate optimistic echo). The pending
    /// interrupt is left in place: the user text is the clarification answer
    /// and the payload is resolved by whatever the next reply does.
    pub fn append_user(&mut self, text: impl Into<String>) -> &Message {
        self.messages.push(Message::new(Sender::User, text));
        // Safe to unwrap because we just pushed an element
        self.messages.last().unwrap()
    }

    /// Upserts an assistant message.
    ///
    /// If the last message is an assistant message it is replaced in place
    /// (fresh id, fresh timestamp); otherwise the message is appended.
    pub fn upsert_assistant(&mut self, text: impl Into<String>) -> &Message {
        let message = Message::new(Sender::Assistant, text);
        let trailing_assistant =
            matches!(self.messages.last(), Some(last) if last.sender == Sender::Assistant);
        if trailing_assistant {
            // Safe to unwrap: trailing_assistant implies a last element
            *self.messages.last_mut().unwrap() = message;
        } else {
            self.messages.push(message);
        }
        self.messages.last().expect("non-empty")
    }

    /// Sets or clears the pending interrupt.
    pub fn set_interrupt(&mut self, payload: Option<PendingInterrupt>) {
        self.pending_interrupt = payload;
    }

    /// The current pending interrupt, if a clarification answer is outstanding.
    pub fn pending_interrupt(&self) -> Option<&PendingInterrupt> {
        self.pending_interrupt.as_ref()
    }

    /// Read-only view of the message log.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}
