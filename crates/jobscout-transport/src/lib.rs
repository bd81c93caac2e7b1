//! Backend adapters for the JobScout session engine.
//!
//! Implements the transport contracts from `jobscout-core` against a real
//! backend: HTTP for the turn call and the jobs snapshot poll, WebSocket
//! for the push stream, plus endpoint configuration.

mod config;
mod http;
mod push;

pub use config::ClientConfig;
pub use http::ChatClient;
pub use push::WsPushConnector;
