use serde::{Deserialize, Serialize};

/// Change notifications emitted by the session engine.
///
/// The presentation layer re-renders from snapshot reads; these events only
/// say which surface went stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The message log or the pending interrupt changed.
    ConversationUpdated,
    /// The applied/rejected job buckets changed.
    JobsUpdated,
    /// The quick-display listing was set or cleared.
    ListingChanged,
    /// A push notification arrived (badge, optional alert sound).
    NotificationArrived,
    /// The push stream failed or closed; surfaced once per connection.
    PushConnectionLost,
}
