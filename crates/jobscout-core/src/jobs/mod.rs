//! Job application state: records, buckets, and the dual-channel reconciler.

mod reconciler;
mod record;

pub use reconciler::JobReconciler;
pub use record::{JobListing, JobOutcome, JobRecord, JobSnapshot, JobState};
