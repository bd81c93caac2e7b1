//! Session domain module.
//!
//! This module contains the session aggregate and everything it owns:
//! the conversation log, the pending-interrupt state, and the change
//! events the engine emits to the presentation layer.
//!
//! # Module Structure
//!
//! - `model`: Session aggregate (`Session`)
//! - `message`: Conversation message types (`Sender`, `Message`)
//! - `store`: Conversation store (`ConversationStore`, `PendingInterrupt`)
//! - `event`: Change notifications (`SessionEvent`)

mod event;
mod message;
mod model;
mod store;

pub use event::SessionEvent;
pub use message::{Message, Sender};
pub use model::Session;
pub use store::{ConversationStore, PendingInterrupt};
