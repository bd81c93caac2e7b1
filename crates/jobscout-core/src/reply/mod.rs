//! Server reply classification.
//!
//! A turn call answers with one of four shapes, keyed by a `status`
//! discriminator. Instead of sniffing fields at every use site, the raw
//! reply is classified once into a closed union; everything downstream
//! works on the union.

mod interpreter;

pub use interpreter::{Update, interpret};

use serde_json::Value;

use crate::jobs::JobRecord;

/// Shown when a clarification reply carries no question text.
const DEFAULT_CLARIFICATION_PROMPT: &str = "Can you clarify?";

/// A classified turn-call reply.
///
/// Classification priority is clarification, then list, then success, then
/// generic; first match wins. Anything malformed or unexpected degrades to
/// `Generic`; a reply shape is never a user-facing error.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerReply {
    /// The backend paused for a clarification answer.
    ClarificationWait {
        question: String,
        /// Opaque interrupt payload, when the server sent one.
        interrupt: Option<Value>,
        /// Jobs applied before the pause; replaces the applied bucket.
        applied_so_far: Vec<JobRecord>,
    },
    /// An enumeration of jobs of some kind.
    Listing {
        kind: String,
        items: Vec<JobRecord>,
        message: Option<String>,
    },
    /// The task finished, optionally reporting the submitted jobs.
    Completed {
        message: Option<String>,
        applied: Vec<JobRecord>,
    },
    /// No recognized tag; at most a display message.
    Generic { message: Option<String> },
}

impl ServerReply {
    /// Classifies a raw turn-call reply.
    pub fn classify(raw: &Value) -> Self {
        match raw.get("status").and_then(Value::as_str) {
            Some("waiting_for_clarification") => Self::ClarificationWait {
                question: question_text(raw.get("question")),
                interrupt: raw.get("interrupt").filter(|v| !v.is_null()).cloned(),
                applied_so_far: records_at(raw, &["applied_so_far"]),
            },
            Some("list") => Self::Listing {
                kind: string_at(raw, &["kind", "listed_kind"])
                    .unwrap_or_else(|| "list".to_string()),
                items: records_at(raw, &["items", "listed_items"]),
                message: message_at(raw, &["message"]),
            },
            Some("success") => Self::Completed {
                message: message_at(raw, &["message", "msg"]),
                applied: records_at(raw, &["companies_applied", "applied_receipts", "results"]),
            },
            _ => Self::Generic {
                message: message_at(raw, &["message"]),
            },
        }
    }
}

/// The clarification question as chat text.
///
/// Falls back to a stock prompt when absent or empty; a structured question
/// is pretty-printed so the user sees what the server is asking about.
fn question_text(question: Option<&Value>) -> String {
    match question {
        None | Some(Value::Null) => DEFAULT_CLARIFICATION_PROMPT.to_string(),
        Some(Value::String(s)) if s.is_empty() => DEFAULT_CLARIFICATION_PROMPT.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// The first usable display message among `keys`.
///
/// A non-string message is rendered as compact JSON rather than dropped;
/// empty strings and nulls count as absent and fall through to the next key.
fn message_at(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match raw.get(*key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    })
}

/// The first non-empty string value among `keys`, if any.
fn string_at(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .map(str::to_string)
}

/// The first array value among `keys`, as job records.
///
/// A present-but-non-array value counts as absent; the reply stays
/// well-formed from the engine's point of view.
fn records_at(raw: &Value, keys: &[&str]) -> Vec<JobRecord> {
    keys.iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_array))
        .map(|items| items.iter().cloned().map(JobRecord).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clarification_reply_is_classified_first() {
        let reply = ServerReply::classify(&json!({
            "status": "waiting_for_clarification",
            "question": "Relocate to Pune?",
            "interrupt": {"tool": "apply", "step": 3},
            "applied_so_far": [{"id": "a"}],
        }));

        match reply {
            ServerReply::ClarificationWait {
                question,
                interrupt,
                applied_so_far,
            } => {
                assert_eq!(question, "Relocate to Pune?");
                assert_eq!(interrupt, Some(json!({"tool": "apply", "step": 3})));
                assert_eq!(applied_so_far.len(), 1);
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn structured_question_is_rendered_deterministically() {
        let reply = ServerReply::classify(&json!({
            "status": "waiting_for_clarification",
            "question": {"options": ["Pune", "Mumbai"]},
        }));

        match reply {
            ServerReply::ClarificationWait { question, .. } => {
                assert!(question.contains("Pune"));
                assert!(question.starts_with('{'));
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn missing_question_falls_back_to_stock_prompt() {
        let reply = ServerReply::classify(&json!({"status": "waiting_for_clarification"}));
        match reply {
            ServerReply::ClarificationWait { question, .. } => {
                assert_eq!(question, "Can you clarify?");
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn list_reply_reads_aliases_and_defaults_kind() {
        let reply = ServerReply::classify(&json!({
            "status": "list",
            "listed_kind": "rejected",
            "listed_items": [{"id": "job_1"}],
        }));
        assert_eq!(
            reply,
            ServerReply::Listing {
                kind: "rejected".to_string(),
                items: vec![JobRecord(json!({"id": "job_1"}))],
                message: None,
            }
        );

        let reply = ServerReply::classify(&json!({"status": "list"}));
        assert_eq!(
            reply,
            ServerReply::Listing {
                kind: "list".to_string(),
                items: vec![],
                message: None,
            }
        );
    }

    #[test]
    fn success_reply_reads_the_first_jobs_alias() {
        let reply = ServerReply::classify(&json!({
            "status": "success",
            "msg": "Applied to 1 job",
            "applied_receipts": [{"id": "a"}],
        }));
        match reply {
            ServerReply::Completed { message, applied } => {
                assert_eq!(message.as_deref(), Some("Applied to 1 job"));
                assert_eq!(applied.len(), 1);
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn unknown_status_degrades_to_generic() {
        let reply = ServerReply::classify(&json!({"status": "thinking", "message": "hold on"}));
        assert_eq!(
            reply,
            ServerReply::Generic {
                message: Some("hold on".to_string())
            }
        );

        // No tags at all, message missing: a visible no-op
        assert_eq!(
            ServerReply::classify(&json!({})),
            ServerReply::Generic { message: None }
        );
    }

    #[test]
    fn non_string_message_is_stringified_not_dropped() {
        let reply = ServerReply::classify(&json!({"message": {"note": "done"}}));
        assert_eq!(
            reply,
            ServerReply::Generic {
                message: Some(r#"{"note":"done"}"#.to_string())
            }
        );
    }

    #[test]
    fn empty_message_counts_as_absent() {
        let reply = ServerReply::classify(&json!({"status": "list", "kind": "applied", "items": [], "message": ""}));
        match reply {
            ServerReply::Listing { message, .. } => assert_eq!(message, None),
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
