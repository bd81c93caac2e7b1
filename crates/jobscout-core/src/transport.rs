//! Transport contracts consumed by the session engine.
//!
//! The engine never talks to the network itself; it drives these traits.
//! Production implementations live in `jobscout-transport`, tests supply
//! mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::jobs::JobSnapshot;
use crate::push::PushEvent;

/// One request/response turn sent to the assistant backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub user_id: String,
    pub thread_id: String,
    /// The user's profile document, forwarded verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<Value>,
    pub user_response: String,
    /// Hint for the backend's intent router (e.g. `CHAT` for greetings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_intent_hint: Option<String>,
}

/// The request/response channel: a single RPC call per user turn.
#[async_trait]
pub trait TurnTransport: Send + Sync {
    /// Sends one turn and returns the raw reply.
    ///
    /// # Errors
    ///
    /// Returns a transport error on network failure, non-success status, or
    /// a non-JSON body. No retries are performed.
    async fn send_turn(&self, request: &TurnRequest) -> Result<Value>;
}

/// The periodic out-of-band snapshot feed.
#[async_trait]
pub trait SnapshotFeed: Send + Sync {
    /// Fetches the full applied/rejected snapshot for a user.
    ///
    /// # Errors
    ///
    /// Returns a transport error on failure; the caller logs and retries on
    /// the next tick.
    async fn fetch_jobs(&self, user_id: &str) -> Result<JobSnapshot>;
}

/// The server-initiated push stream, abstracted as a channel of typed
/// events so the reconnect policy stays outside the engine.
#[async_trait]
pub trait PushConnector: Send + Sync {
    /// Opens the push stream for a user.
    ///
    /// The receiver yields events until the connection closes, then ends.
    ///
    /// # Errors
    ///
    /// Returns a push error when the stream cannot be established.
    async fn connect(&self, user_id: &str) -> Result<mpsc::Receiver<PushEvent>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_turn_fields_are_omitted_from_the_wire() {
        let request = TurnRequest {
            user_id: "u".to_string(),
            thread_id: "t".to_string(),
            user_profile: None,
            user_response: "hello".to_string(),
            user_intent_hint: None,
        };

        let wire = serde_json::to_value(&request).expect("serializes");
        assert_eq!(
            wire,
            json!({"user_id": "u", "thread_id": "t", "user_response": "hello"})
        );
    }
}
