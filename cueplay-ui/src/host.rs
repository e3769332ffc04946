//! Playback host client
//!
//! [`PlaybackHost`] is everything the session core needs from the machine
//! running Live. [`HttpHost`] implements it against cueplay-host's HTTP API.

use async_trait::async_trait;
use cueplay_common::api::{MonitorRequest, PlayRequest, PlayResponse};
use cueplay_common::CuePoint;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Host call failures
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Host returned {0}: {1}")]
    Status(u16, String),

    #[error("Invalid host response: {0}")]
    Decode(String),
}

/// Operations the session core performs against the playback host
#[async_trait]
pub trait PlaybackHost: Send + Sync + 'static {
    /// Ordered cue list, host order preserved
    async fn fetch_cue_points(&self) -> Result<Vec<CuePoint>, HostError>;

    async fn start_playback(&self, request: &PlayRequest) -> Result<PlayResponse, HostError>;

    async fn stop_playback(&self) -> Result<(), HostError>;

    /// Returns once the host reports the playhead reached `stop_pos`
    async fn monitor_playhead(&self, request: &MonitorRequest) -> Result<(), HostError>;
}

/// HTTP client for cueplay-host
pub struct HttpHost {
    base_url: String,
    /// Short calls (catalog, play, stop)
    http_client: reqwest::Client,
    /// Monitor calls; no timeout, the host holds them until the stop condition
    monitor_client: reqwest::Client,
}

impl HttpHost {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, HostError> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| HostError::Network(e.to_string()))?;
        let monitor_client = reqwest::Client::builder()
            .build()
            .map_err(|e| HostError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            monitor_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Map non-2xx responses to `HostError::Status`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, HostError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(HostError::Status(status.as_u16(), error_text))
}

#[async_trait]
impl PlaybackHost for HttpHost {
    async fn fetch_cue_points(&self) -> Result<Vec<CuePoint>, HostError> {
        let url = self.url("/get_cue_points");
        debug!(url = %url, "Fetching cue points");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| HostError::Network(e.to_string()))?;

        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| HostError::Decode(e.to_string()))
    }

    async fn start_playback(&self, request: &PlayRequest) -> Result<PlayResponse, HostError> {
        let url = self.url("/play_song");
        debug!(url = %url, cue_index = request.cue_index, "Requesting playback");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| HostError::Network(e.to_string()))?;

        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| HostError::Decode(e.to_string()))
    }

    async fn stop_playback(&self) -> Result<(), HostError> {
        let url = self.url("/stop_song");
        debug!(url = %url, "Requesting stop");

        let response = self
            .http_client
            .post(&url)
            .send()
            .await
            .map_err(|e| HostError::Network(e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }

    async fn monitor_playhead(&self, request: &MonitorRequest) -> Result<(), HostError> {
        let url = self.url("/monitor_playhead");
        debug!(url = %url, stop_pos = request.stop_pos, "Monitoring playhead");

        let response = self
            .monitor_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| HostError::Network(e.to_string()))?;

        // Body is an acknowledgment only
        check_status(response).await?;
        Ok(())
    }
}
