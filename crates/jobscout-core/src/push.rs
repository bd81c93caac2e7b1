//! Push notification types and the advisory notification feed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::jobs::JobOutcome;

/// Kind discriminator on push notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushKind {
    Applied,
    Rejected,
    Clarify,
}

impl PushKind {
    /// The job bucket this kind advises about, if any.
    pub fn outcome(self) -> Option<JobOutcome> {
        match self {
            Self::Applied => Some(JobOutcome::Applied),
            Self::Rejected => Some(JobOutcome::Rejected),
            Self::Clarify => None,
        }
    }
}

/// One inbound event on the push stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "type")]
    pub kind: PushKind,
    pub message: String,
    /// Job identifier, when the server attached one (string or number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Value>,
}

/// An entry on the advisory notification surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier (UUID format)
    pub id: String,
    pub kind: PushKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Value>,
    /// Timestamp when the event was received (ISO 8601 format).
    pub received_at: String,
}

/// Newest-first notification list plus the unread badge.
///
/// The feed exists to raise user attention immediately; it is never a
/// source of truth for job state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationFeed {
    items: Vec<Notification>,
    unread: bool,
}

impl NotificationFeed {
    /// Creates an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a push event and raises the unread badge.
    pub fn record(&mut self, event: &PushEvent) -> &Notification {
        self.items.insert(
            0,
            Notification {
                id: uuid::Uuid::new_v4().to_string(),
                kind: event.kind,
                message: event.message.clone(),
                job_id: event.job_id.clone(),
                received_at: chrono::Utc::now().to_rfc3339(),
            },
        );
        self.unread = true;
        &self.items[0]
    }

    /// Clears the unread badge; called when the notification menu opens.
    pub fn mark_read(&mut self) {
        self.unread = false;
    }

    /// Whether any notification arrived since the badge was last cleared.
    pub fn has_unread(&self) -> bool {
        self.unread
    }

    /// Newest-first view of the notifications.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn push_event_parses_the_wire_shape() {
        let event: PushEvent =
            serde_json::from_value(json!({"type": "applied", "message": "done", "job_id": 103}))
                .expect("event parses");
        assert_eq!(event.kind, PushKind::Applied);
        assert_eq!(event.kind.outcome(), Some(JobOutcome::Applied));
        assert_eq!(event.job_id, Some(json!(103)));
    }

    #[test]
    fn feed_is_newest_first_and_tracks_unread() {
        let mut feed = NotificationFeed::new();
        assert!(!feed.has_unread());

        feed.record(&PushEvent {
            kind: PushKind::Applied,
            message: "first".to_string(),
            job_id: None,
        });
        feed.record(&PushEvent {
            kind: PushKind::Rejected,
            message: "second".to_string(),
            job_id: None,
        });

        assert!(feed.has_unread());
        assert_eq!(feed.items()[0].message, "second");
        assert_eq!(feed.items()[1].message, "first");

        feed.mark_read();
        assert!(!feed.has_unread());
    }
}
