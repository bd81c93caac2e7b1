//! Session aggregate.
//!
//! Chat and job state used to live scattered across the presentation
//! layer; the aggregate consolidates it behind explicit mutators so
//! ordering and invariants are testable without rendering anything.

use serde_json::Value;

use super::event::SessionEvent;
use super::store::ConversationStore;
use crate::jobs::{JobListing, JobReconciler, JobSnapshot};
use crate::push::{NotificationFeed, PushEvent};
use crate::reply::{ServerReply, Update, interpret};

/// The aggregate root for one chat session.
///
/// Created when the chat surface mounts, torn down on unmount. Mutated only
/// by the session controller and the owned components' own operations; the
/// presentation layer gets snapshot reads.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Stable user identifier the session is keyed by.
    pub id: String,
    /// Timestamp when the session was created (ISO 8601 format).
    pub created_at: String,
    /// Ordered message log and pending-interrupt state.
    pub conversation: ConversationStore,
    /// Applied/rejected buckets and their reconciliation bookkeeping.
    pub jobs: JobReconciler,
    /// Advisory notification surface fed by the push stream.
    pub notifications: NotificationFeed,
    /// Quick-display payload of the most recent list reply.
    pub last_listing: Option<JobListing>,
}

impl Session {
    /// Creates an empty session keyed by a user identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            ..Self::default()
        }
    }

    /// Routes one raw turn-call reply through classification and
    /// interpretation, applies the resulting updates, and returns the
    /// change events (deduplicated, in first-occurrence order).
    pub fn apply_reply(&mut self, raw: &Value) -> Vec<SessionEvent> {
        let reply = ServerReply::classify(raw);
        tracing::debug!(?reply, "classified turn reply");
        let mut events = Vec::new();
        for update in interpret(reply) {
            if let Some(event) = self.apply(update) {
                push_unique(&mut events, event);
            }
        }
        events
    }

    /// Records one push event: notification surface first, then the
    /// advisory bucket append when the event kind names a bucket.
    pub fn record_push(&mut self, event: &PushEvent) -> Vec<SessionEvent> {
        self.notifications.record(event);
        let mut events = vec![SessionEvent::NotificationArrived];
        if self.jobs.merge_from_push(event).is_some() {
            events.push(SessionEvent::JobsUpdated);
        }
        events
    }

    /// Merges one poll snapshot; `None` when nothing changed (no re-render).
    pub fn absorb_snapshot(&mut self, snapshot: JobSnapshot) -> Option<SessionEvent> {
        self.jobs
            .merge_from_poll(snapshot)
            .then_some(SessionEvent::JobsUpdated)
    }

    fn apply(&mut self, update: Update) -> Option<SessionEvent> {
        match update {
            Update::UpsertAssistant(text) => {
                self.conversation.upsert_assistant(text);
                Some(SessionEvent::ConversationUpdated)
            }
            Update::SetInterrupt(payload) => {
                if self.conversation.pending_interrupt() == payload.as_ref() {
                    return None;
                }
                self.conversation.set_interrupt(payload);
                Some(SessionEvent::ConversationUpdated)
            }
            Update::ReplaceBucket { outcome, items } => {
                self.jobs.merge_from_interpreter(outcome, items);
                Some(SessionEvent::JobsUpdated)
            }
            Update::SetListing(listing) => {
                if self.last_listing == listing {
                    return None;
                }
                self.last_listing = listing;
                Some(SessionEvent::ListingChanged)
            }
        }
    }
}

fn push_unique(events: &mut Vec<SessionEvent>, event: SessionEvent) {
    if !events.contains(&event) {
        events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobRecord;
    use crate::push::PushKind;
    use crate::session::Sender;
    use serde_json::json;

    #[test]
    fn clarification_reply_adds_one_message_and_sets_interrupt() {
        let mut session = Session::new("user@example.com");
        session.conversation.append_user("apply for me");
        let before = session.conversation.messages().len();

        let events = session.apply_reply(&json!({
            "status": "waiting_for_clarification",
            "question": "Relocate to Pune?",
        }));

        assert_eq!(session.conversation.messages().len(), before + 1);
        let last = session.conversation.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Assistant);
        assert_eq!(last.text, "Relocate to Pune?");
        assert!(session.conversation.pending_interrupt().is_some());
        assert_eq!(events, vec![SessionEvent::ConversationUpdated]);
    }

    #[test]
    fn list_reply_without_message_adds_no_bubble() {
        let mut session = Session::new("u");
        session.conversation.append_user("list rejected");
        let before = session.conversation.messages().len();

        session.apply_reply(&json!({
            "status": "list",
            "kind": "rejected",
            "items": [{"id": "job_1"}],
        }));

        assert_eq!(session.conversation.messages().len(), before);
        assert_eq!(session.jobs.state().rejected, vec![JobRecord(json!({"id": "job_1"}))]);
        assert_eq!(session.last_listing.as_ref().map(|l| l.kind.as_str()), Some("rejected"));
    }

    #[test]
    fn success_reply_reports_jobs_and_clears_interrupt() {
        let mut session = Session::new("u");
        session.apply_reply(&json!({
            "status": "waiting_for_clarification",
            "question": "Remote ok?",
        }));
        session.conversation.append_user("yes");

        let events = session.apply_reply(&json!({
            "status": "success",
            "message": "Applied to 3 jobs",
            "companies_applied": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
        }));

        let last = session.conversation.messages().last().unwrap();
        assert_eq!(last.text, "Applied to 3 jobs");
        assert_eq!(session.jobs.state().applied.len(), 3);
        assert!(session.conversation.pending_interrupt().is_none());
        assert!(events.contains(&SessionEvent::JobsUpdated));
        assert!(events.contains(&SessionEvent::ConversationUpdated));
    }

    #[test]
    fn interrupt_is_live_until_a_success_resolves_it() {
        let mut session = Session::new("u");
        session.apply_reply(&json!({
            "status": "waiting_for_clarification",
            "question": "Which city?",
        }));
        session.conversation.append_user("Pune");

        // A generic acknowledgment does not resolve the clarification
        session.apply_reply(&json!({"message": "noted"}));
        assert!(session.conversation.pending_interrupt().is_some());

        session.apply_reply(&json!({"status": "success", "message": "done"}));
        assert!(session.conversation.pending_interrupt().is_none());
    }

    #[test]
    fn interpreter_bucket_replace_is_never_a_union() {
        let mut session = Session::new("u");
        session.apply_reply(&json!({
            "status": "list", "kind": "applied", "items": [{"id": "x1"}, {"id": "x2"}],
        }));
        session.apply_reply(&json!({
            "status": "list", "kind": "applied", "items": [{"id": "y1"}],
        }));

        assert_eq!(session.jobs.state().applied, vec![JobRecord(json!({"id": "y1"}))]);
    }

    #[test]
    fn identical_snapshots_emit_one_change_event_total() {
        let mut session = Session::new("u");
        let snapshot = JobSnapshot {
            applied: vec![JobRecord(json!({"id": "a"})), JobRecord(json!({"id": "b"}))],
            rejected: vec![],
        };

        assert_eq!(
            session.absorb_snapshot(snapshot.clone()),
            Some(SessionEvent::JobsUpdated)
        );
        assert_eq!(session.absorb_snapshot(snapshot), None);
    }

    #[test]
    fn push_event_raises_notification_and_advisory() {
        let mut session = Session::new("u");
        let events = session.record_push(&PushEvent {
            kind: PushKind::Applied,
            message: "your job has been applied".to_string(),
            job_id: Some(json!("job_103")),
        });

        assert_eq!(
            events,
            vec![SessionEvent::NotificationArrived, SessionEvent::JobsUpdated]
        );
        assert!(session.notifications.has_unread());
        assert_eq!(session.jobs.state().applied.len(), 1);

        let events = session.record_push(&PushEvent {
            kind: PushKind::Clarify,
            message: "a job needs input".to_string(),
            job_id: None,
        });
        assert_eq!(events, vec![SessionEvent::NotificationArrived]);
        assert_eq!(session.jobs.state().applied.len(), 1);
    }

    #[test]
    fn clarification_with_progress_updates_applied_bucket() {
        let mut session = Session::new("u");
        let events = session.apply_reply(&json!({
            "status": "waiting_for_clarification",
            "question": "Continue?",
            "applied_so_far": [{"id": "a"}],
        }));

        assert_eq!(session.jobs.state().applied.len(), 1);
        assert!(events.contains(&SessionEvent::JobsUpdated));
    }
}
