pub mod error;
pub mod jobs;
pub mod push;
pub mod reply;
pub mod session;
pub mod transport;

// Re-export common error type
pub use error::{Result, ScoutError};
