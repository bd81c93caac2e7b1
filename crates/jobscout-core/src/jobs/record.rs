//! Job record and bucket types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The outcome bucket a job record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    Applied,
    Rejected,
}

impl JobOutcome {
    /// Maps a server-side `kind` string onto a bucket.
    ///
    /// List replies may carry kinds that name no bucket (the original client
    /// defaults to `"list"`); those produce `None` and update no bucket.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "applied" => Some(Self::Applied),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// One job entry as delivered by the backend.
///
/// The payload (company, title, receipt, ...) is arbitrary descriptive
/// metadata the engine treats as opaque; only the identifier is ever read,
/// and only for advisory bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRecord(pub Value);

impl JobRecord {
    /// The job identifier, from `id` or `job_id`, when the payload has one.
    ///
    /// Numeric identifiers are rendered as their decimal string.
    pub fn id(&self) -> Option<String> {
        let raw = self.0.get("id").or_else(|| self.0.get("job_id"))?;
        match raw {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// A full `{ applied, rejected }` snapshot from the poll feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    #[serde(default)]
    pub applied: Vec<JobRecord>,
    #[serde(default)]
    pub rejected: Vec<JobRecord>,
}

/// The reconciled job state read by the sidebar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobState {
    pub applied: Vec<JobRecord>,
    pub rejected: Vec<JobRecord>,
}

impl JobState {
    /// The records in one outcome bucket.
    pub fn bucket(&self, outcome: JobOutcome) -> &[JobRecord] {
        match outcome {
            JobOutcome::Applied => &self.applied,
            JobOutcome::Rejected => &self.rejected,
        }
    }

    pub(crate) fn bucket_mut(&mut self, outcome: JobOutcome) -> &mut Vec<JobRecord> {
        match outcome {
            JobOutcome::Applied => &mut self.applied,
            JobOutcome::Rejected => &mut self.rejected,
        }
    }
}

/// Quick-display payload of the most recent list-shaped reply.
///
/// Unlike the reconciled buckets this keeps the server's `kind` verbatim,
/// including kinds that name no bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub kind: String,
    pub items: Vec<JobRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_id_reads_id_then_job_id() {
        assert_eq!(JobRecord(json!({"id": "job_1"})).id().as_deref(), Some("job_1"));
        assert_eq!(JobRecord(json!({"job_id": 42})).id().as_deref(), Some("42"));
        assert_eq!(JobRecord(json!({"company": "acme"})).id(), None);
    }

    #[test]
    fn snapshot_buckets_default_to_empty() {
        let snapshot: JobSnapshot = serde_json::from_value(json!({"applied": [{"id": "a"}]}))
            .expect("snapshot parses");
        assert_eq!(snapshot.applied.len(), 1);
        assert!(snapshot.rejected.is_empty());
    }

    #[test]
    fn unknown_kind_maps_to_no_bucket() {
        assert_eq!(JobOutcome::from_kind("applied"), Some(JobOutcome::Applied));
        assert_eq!(JobOutcome::from_kind("rejected"), Some(JobOutcome::Rejected));
        assert_eq!(JobOutcome::from_kind("list"), None);
    }
}
