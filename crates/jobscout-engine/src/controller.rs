//! Session controller: turn submission and background feed wiring.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock, broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use jobscout_core::jobs::{JobListing, JobState};
use jobscout_core::push::{Notification, PushEvent};
use jobscout_core::session::{Message, PendingInterrupt, Session, SessionEvent};
use jobscout_core::transport::{PushConnector, SnapshotFeed, TurnRequest, TurnTransport};
use jobscout_core::{Result, ScoutError};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Short greetings that must not start an application run.
static GREETINGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "hi",
        "hello",
        "hey",
        "hiya",
        "good morning",
        "good afternoon",
        "good evening",
        "hey there",
    ]
    .into_iter()
    .collect()
});

/// Who the session belongs to, and the profile sent along with every turn.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub user_id: String,
    pub thread_id: String,
    pub profile: Option<Value>,
}

impl UserIdentity {
    /// Creates an identity where the thread is keyed by the user id.
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            thread_id: user_id.clone(),
            user_id,
            profile: None,
        }
    }

    /// Derives the identity from a profile document: `email` when present,
    /// `_id` otherwise. The profile rides along on every turn request.
    ///
    /// # Errors
    ///
    /// Returns a config error when the profile carries neither field.
    pub fn from_profile(profile: Value) -> Result<Self> {
        let user_id = profile
            .get("email")
            .and_then(Value::as_str)
            .or_else(|| profile.get("_id").and_then(Value::as_str))
            .ok_or_else(|| ScoutError::config("profile carries neither email nor _id"))?
            .to_string();

        Ok(Self {
            thread_id: user_id.clone(),
            user_id,
            profile: Some(profile),
        })
    }
}

struct Background {
    cancel: CancellationToken,
    poll: JoinHandle<()>,
    push: JoinHandle<()>,
}

/// Orchestrates one chat session.
///
/// All mutation goes through this controller; the presentation layer reads
/// snapshots and subscribes to change events. One `RwLock` guards the whole
/// session aggregate; critical sections are short and synchronous.
pub struct SessionController {
    session: Arc<RwLock<Session>>,
    turns: Arc<dyn TurnTransport>,
    snapshots: Arc<dyn SnapshotFeed>,
    push: Arc<dyn PushConnector>,
    identity: UserIdentity,
    poll_interval: Duration,
    events: broadcast::Sender<SessionEvent>,
    background: Mutex<Option<Background>>,
}

impl SessionController {
    /// Creates a controller for one user.
    pub fn new(
        identity: UserIdentity,
        poll_interval: Duration,
        turns: Arc<dyn TurnTransport>,
        snapshots: Arc<dyn SnapshotFeed>,
        push: Arc<dyn PushConnector>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            session: Arc::new(RwLock::new(Session::new(identity.user_id.clone()))),
            turns,
            snapshots,
            push,
            identity,
            poll_interval,
            events,
            background: Mutex::new(None),
        }
    }

    /// Subscribes to change events; the receiver sees every event emitted
    /// after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Submits one user turn.
    ///
    /// Empty input (after trimming) is a complete no-op: no message, no
    /// turn call. A transport failure is recovered locally as a single
    /// error bubble; the pending interrupt is left untouched so the user
    /// can answer again.
    pub async fn submit(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let had_listing = {
            let mut session = self.session.write().await;
            session.conversation.append_user(text);
            // The quick-display listing belongs to the previous turn
            session.last_listing.take().is_some()
        };
        self.emit(SessionEvent::ConversationUpdated);
        if had_listing {
            self.emit(SessionEvent::ListingChanged);
        }

        let request = TurnRequest {
            user_id: self.identity.user_id.clone(),
            thread_id: self.identity.thread_id.clone(),
            user_profile: self.identity.profile.clone(),
            user_response: text.to_string(),
            user_intent_hint: intent_hint(text).map(str::to_string),
        };

        match self.turns.send_turn(&request).await {
            Ok(raw) => {
                let events = self.session.write().await.apply_reply(&raw);
                for event in events {
                    self.emit(event);
                }
            }
            Err(err) => {
                warn!("turn call failed: {err}");
                self.session
                    .write()
                    .await
                    .conversation
                    .upsert_assistant(error_bubble(&err));
                self.emit(SessionEvent::ConversationUpdated);
            }
        }
    }

    /// Wires up the poll and push feeds. Idempotent.
    pub async fn start(&self) {
        let mut background = self.background.lock().await;
        if background.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let poll = tokio::spawn(poll_loop(
            self.session.clone(),
            self.snapshots.clone(),
            self.identity.user_id.clone(),
            self.poll_interval,
            cancel.clone(),
            self.events.clone(),
        ));
        let push = tokio::spawn(push_loop(
            self.session.clone(),
            self.push.clone(),
            self.identity.user_id.clone(),
            cancel.clone(),
            self.events.clone(),
        ));

        *background = Some(Background { cancel, poll, push });
    }

    /// Tears down the background feeds. Idempotent.
    ///
    /// An in-flight poll fetch that resolves after this call is discarded.
    pub async fn stop(&self) {
        let Some(background) = self.background.lock().await.take() else {
            return;
        };
        background.cancel.cancel();
        background.poll.abort();
        background.push.abort();
    }

    // ============================================================================
    // Snapshot reads for the presentation layer
    // ============================================================================

    /// The ordered message log.
    pub async fn messages(&self) -> Vec<Message> {
        self.session.read().await.conversation.messages().to_vec()
    }

    /// The pending clarification, when one is outstanding.
    pub async fn pending_interrupt(&self) -> Option<PendingInterrupt> {
        self.session.read().await.conversation.pending_interrupt().cloned()
    }

    /// The reconciled applied/rejected buckets.
    pub async fn job_state(&self) -> JobState {
        self.session.read().await.jobs.state().clone()
    }

    /// The quick-display listing from the most recent list reply.
    pub async fn last_listing(&self) -> Option<JobListing> {
        self.session.read().await.last_listing.clone()
    }

    /// Newest-first advisory notifications.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.session.read().await.notifications.items().to_vec()
    }

    /// Whether the notification badge is raised.
    pub async fn has_unread_notifications(&self) -> bool {
        self.session.read().await.notifications.has_unread()
    }

    /// Clears the notification badge (the menu was opened).
    pub async fn mark_notifications_read(&self) {
        self.session.write().await.notifications.mark_read();
    }

    fn emit(&self, event: SessionEvent) {
        // Nobody subscribed is fine
        let _ = self.events.send(event);
    }
}

/// The intent hint for a submission, if any.
///
/// A submission of at most two words whose first word is a known greeting
/// is tagged `CHAT`.
fn intent_hint(text: &str) -> Option<&'static str> {
    let mut words = text.split_whitespace();
    let first = words.next()?.to_lowercase();
    if words.count() < 2 && GREETINGS.contains(first.as_str()) {
        Some("CHAT")
    } else {
        None
    }
}

/// The chat bubble shown for a failed turn.
fn error_bubble(err: &ScoutError) -> String {
    match err {
        ScoutError::Transport {
            status: Some(_),
            message,
        } => format!("Server error: {message}"),
        other => format!("Network error: {other}"),
    }
}

/// Fetches the jobs snapshot on a fixed interval, starting immediately.
///
/// Fetch failures are logged and retried on the next tick; a result that
/// arrives after cancellation never mutates the session.
async fn poll_loop(
    session: Arc<RwLock<Session>>,
    feed: Arc<dyn SnapshotFeed>,
    user_id: String,
    interval: Duration,
    cancel: CancellationToken,
    events: broadcast::Sender<SessionEvent>,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let snapshot = tokio::select! {
            _ = cancel.cancelled() => break,
            fetched = feed.fetch_jobs(&user_id) => match fetched {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!("jobs poll failed: {err}");
                    continue;
                }
            }
        };

        if let Some(event) = session.write().await.absorb_snapshot(snapshot) {
            let _ = events.send(event);
        }
    }
}

/// Consumes the push stream until it ends.
///
/// A failed connect or a closed stream is surfaced once as
/// `PushConnectionLost`; reconnection is a collaborator concern.
async fn push_loop(
    session: Arc<RwLock<Session>>,
    connector: Arc<dyn PushConnector>,
    user_id: String,
    cancel: CancellationToken,
    events: broadcast::Sender<SessionEvent>,
) {
    let mut inbound: mpsc::Receiver<PushEvent> = match connector.connect(&user_id).await {
        Ok(inbound) => inbound,
        Err(err) => {
            warn!("push connect failed: {err}");
            let _ = events.send(SessionEvent::PushConnectionLost);
            return;
        }
    };

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = inbound.recv() => match event {
                Some(event) => {
                    let emitted = session.write().await.record_push(&event);
                    for event in emitted {
                        let _ = events.send(event);
                    }
                }
                None => {
                    warn!("push stream closed");
                    let _ = events.send(SessionEvent::PushConnectionLost);
                    break;
                }
            }
        }
    }
}
