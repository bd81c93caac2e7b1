//! Session orchestration for the JobScout client.
//!
//! `SessionController` wires the transport adapters into the session
//! aggregate: it submits turns, runs the poll loop and the push consumer,
//! and broadcasts change events to the presentation layer.

mod controller;
mod telemetry;

pub use controller::{SessionController, UserIdentity};
pub use telemetry::init_logging;
