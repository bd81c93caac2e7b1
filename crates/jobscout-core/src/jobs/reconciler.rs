//! Dual-channel job-state reconciliation.
//!
//! Polls and interpreter replies are authoritative full-state sources and
//! replace buckets wholesale. Push events are low-latency but partial, so
//! they only append advisory records; full correctness is restored by the
//! next authoritative merge.

use serde_json::{Map, Value, json};

use super::record::{JobOutcome, JobRecord, JobSnapshot, JobState};
use crate::push::PushEvent;

/// Merges poll snapshots, interpreter updates, and push advisories into a
/// single applied/rejected record set.
#[derive(Debug, Clone, Default)]
pub struct JobReconciler {
    state: JobState,
    last_polled_applied: usize,
    last_polled_rejected: usize,
}

impl JobReconciler {
    /// Creates a reconciler with empty buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// The reconciled job state.
    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// Merges a full poll snapshot.
    ///
    /// Bucket lengths are compared against the last polled lengths; when
    /// both are unchanged nothing is mutated and `false` is returned, so a
    /// quiet poll tick causes no re-render. Otherwise both buckets are
    /// replaced wholesale and the last-known lengths updated.
    pub fn merge_from_poll(&mut self, snapshot: JobSnapshot) -> bool {
        let unchanged = snapshot.applied.len() == self.last_polled_applied
            && snapshot.rejected.len() == self.last_polled_rejected;
        if unchanged {
            return false;
        }

        self.last_polled_applied = snapshot.applied.len();
        self.last_polled_rejected = snapshot.rejected.len();
        self.state.applied = snapshot.applied;
        self.state.rejected = snapshot.rejected;
        true
    }

    /// Replaces one bucket with an interpreter-sourced list.
    ///
    /// Interpreter updates are authoritative and rarer than polls; they
    /// always replace and always signal. The last polled lengths are left
    /// alone; only the poll path maintains them.
    pub fn merge_from_interpreter(&mut self, outcome: JobOutcome, items: Vec<JobRecord>) {
        *self.state.bucket_mut(outcome) = items;
    }

    /// Appends an advisory record for a push event.
    ///
    /// Returns the bucket that gained a record, or `None` when the event
    /// kind names no bucket (clarify events only raise the notification
    /// surface).
    pub fn merge_from_push(&mut self, event: &PushEvent) -> Option<JobOutcome> {
        let outcome = event.kind.outcome()?;
        self.state.bucket_mut(outcome).push(advisory_record(event));
        Some(outcome)
    }
}

/// A lightweight sidebar entry for a push event, pending the next
/// authoritative merge.
fn advisory_record(event: &PushEvent) -> JobRecord {
    let mut payload = Map::new();
    if let Some(job_id) = &event.job_id {
        payload.insert("id".to_string(), job_id.clone());
    }
    payload.insert("message".to_string(), json!(event.message));
    payload.insert("source".to_string(), json!("push"));
    JobRecord(Value::Object(payload))
}
