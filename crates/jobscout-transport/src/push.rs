//! WebSocket adapter for the push notification stream.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, warn};

use jobscout_core::push::PushEvent;
use jobscout_core::transport::PushConnector;
use jobscout_core::{Result, ScoutError};

use crate::config::ClientConfig;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Push stream client.
///
/// Each connection is read by a background task that parses text frames
/// into typed events and forwards them over an `mpsc` channel. The channel
/// closes when the stream ends; reconnection is the caller's concern.
#[derive(Clone)]
pub struct WsPushConnector {
    ws_base: String,
}

impl WsPushConnector {
    /// Creates a connector for the configured backend.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            ws_base: config.ws_url(),
        }
    }
}

#[async_trait]
impl PushConnector for WsPushConnector {
    async fn connect(&self, user_id: &str) -> Result<mpsc::Receiver<PushEvent>> {
        let url = format!("{}/ws/{user_id}", self.ws_base);
        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|err| ScoutError::push(format!("connect to {url} failed: {err}")))?;
        debug!("push stream connected: {url}");

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::spawn(async move {
            let (_, mut read) = stream.split();
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(WsMessage::Text(text)) => {
                        match serde_json::from_str::<PushEvent>(text.as_str()) {
                            Ok(event) => {
                                if tx.send(event).await.is_err() {
                                    // Consumer is gone; stop reading
                                    break;
                                }
                            }
                            Err(err) => warn!("discarding unparseable push frame: {err}"),
                        }
                    }
                    Ok(WsMessage::Close(_)) => {
                        debug!("push stream closed by server");
                        break;
                    }
                    // Ping/pong and binary frames carry no events
                    Ok(_) => {}
                    Err(err) => {
                        warn!("push stream error: {err}");
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }
}
