//! Normalization of classified replies into session update commands.

use serde_json::Value;

use super::ServerReply;
use crate::jobs::{JobListing, JobOutcome, JobRecord};
use crate::session::PendingInterrupt;

/// A single state-update command produced from one server reply.
///
/// Commands are applied to the session aggregate in order; the order within
/// one reply matters (the clarification question is upserted before the
/// interrupt is set, a completion replaces jobs before it clears the
/// interrupt).
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Upsert an assistant message (replacing a trailing one).
    UpsertAssistant(String),
    /// Set or clear the pending interrupt.
    SetInterrupt(Option<PendingInterrupt>),
    /// Wholesale-replace one job bucket.
    ReplaceBucket {
        outcome: JobOutcome,
        items: Vec<JobRecord>,
    },
    /// Set or clear the quick-display listing.
    SetListing(Option<JobListing>),
}

/// Normalizes one classified reply into update commands.
///
/// The engine never synthesizes reply text the server did not provide: a
/// reply without a display message produces no chat bubble.
pub fn interpret(reply: ServerReply) -> Vec<Update> {
    match reply {
        ServerReply::ClarificationWait {
            question,
            interrupt,
            applied_so_far,
        } => {
            let mut updates = vec![
                Update::UpsertAssistant(question.clone()),
                Update::SetInterrupt(Some(PendingInterrupt {
                    question,
                    context: interrupt.unwrap_or(Value::Null),
                })),
            ];
            if !applied_so_far.is_empty() {
                updates.push(Update::ReplaceBucket {
                    outcome: JobOutcome::Applied,
                    items: applied_so_far,
                });
            }
            updates.push(Update::SetListing(None));
            updates
        }

        ServerReply::Listing {
            kind,
            items,
            message,
        } => {
            let mut updates = Vec::new();
            if let Some(message) = message {
                updates.push(Update::UpsertAssistant(message));
            }
            if let Some(outcome) = JobOutcome::from_kind(&kind) {
                updates.push(Update::ReplaceBucket {
                    outcome,
                    items: items.clone(),
                });
            }
            updates.push(Update::SetListing(Some(JobListing { kind, items })));
            updates
        }

        ServerReply::Completed { message, applied } => {
            let mut updates = Vec::new();
            if !applied.is_empty() {
                updates.push(Update::ReplaceBucket {
                    outcome: JobOutcome::Applied,
                    items: applied,
                });
            }
            if let Some(message) = message {
                updates.push(Update::UpsertAssistant(message));
            }
            updates.push(Update::SetInterrupt(None));
            updates.push(Update::SetListing(None));
            updates
        }

        ServerReply::Generic { message } => {
            message.map(Update::UpsertAssistant).into_iter().collect()
        }
    }
}
