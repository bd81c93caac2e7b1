//! HTTP adapter: the turn call and the jobs snapshot poll.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use jobscout_core::jobs::JobSnapshot;
use jobscout_core::transport::{SnapshotFeed, TurnRequest, TurnTransport};
use jobscout_core::{Result, ScoutError};

use crate::config::ClientConfig;

/// HTTP client for the assistant backend.
///
/// One instance serves both the turn call (`POST /chat`) and the snapshot
/// poll (`GET /api/jobs/{user_id}`); `reqwest::Client` pools connections
/// internally.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    /// Creates a client for the configured backend.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl TurnTransport for ChatClient {
    async fn send_turn(&self, request: &TurnRequest) -> Result<Value> {
        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|err| ScoutError::transport(format!("chat request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(ScoutError::http(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|err| ScoutError::transport(format!("chat reply was not JSON: {err}")))
    }
}

#[async_trait]
impl SnapshotFeed for ChatClient {
    async fn fetch_jobs(&self, user_id: &str) -> Result<JobSnapshot> {
        let response = self
            .client
            .get(format!("{}/api/jobs/{user_id}", self.base_url))
            .send()
            .await
            .map_err(|err| ScoutError::transport(format!("jobs snapshot request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(ScoutError::http(
                response.status().as_u16(),
                "jobs snapshot request rejected".to_string(),
            ));
        }

        response
            .json()
            .await
            .map_err(|err| ScoutError::transport(format!("jobs snapshot was not JSON: {err}")))
    }
}
