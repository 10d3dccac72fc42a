//! HTTP tracker.
//!
//! Sends every call as `GET <base_url>/<endpoint>?data=<base64 json>` and
//! reads the body as a one-character status: `1` success, `0` failure.

use async_trait::async_trait;
use mixpanel_types::{EngagePayload, Event, TrackPayload, Update};

use super::{Tracker, TransportError};
use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::TrackError;

/// Service endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Event ingestion.
    Track,
    /// Profile updates.
    Engage,
}

impl Endpoint {
    /// Path relative to the base URL.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Track => "/track",
            Self::Engage => "/engage",
        }
    }
}

/// Tracker backed by the remote service.
#[derive(Debug, Clone)]
pub struct HttpTracker {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl HttpTracker {
    /// Create a tracker for `token` talking to `base_url`.
    ///
    /// A trailing `/` on `base_url` is ignored.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            base_url,
        }
    }

    /// Create a tracker for the hosted service.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(token, DEFAULT_BASE_URL)
    }

    /// Create a tracker from a loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.token.clone(), config.base_url.clone())
    }

    /// Get the project token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for an endpoint.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        distinct_id: &str,
        data: String,
    ) -> Result<(), TrackError> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(endpoint = endpoint.path(), distinct_id, "sending request");

        let response = self
            .http
            .get(&url)
            .query(&[("data", data.as_str())])
            .send()
            .await
            .map_err(TransportError::Http)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = endpoint.path(), %status, "service returned error status");
            return Err(TransportError::Status(status.as_u16()).into());
        }

        let body = response.text().await.map_err(TransportError::Http)?;
        let result = interpret_body(&body);
        if let Err(e) = &result {
            tracing::warn!(endpoint = endpoint.path(), distinct_id, "request rejected: {}", e);
        }
        result
    }
}

/// Map a 2xx response body to the call outcome.
fn interpret_body(body: &str) -> Result<(), TrackError> {
    match body.trim_end() {
        "1" => Ok(()),
        "0" => Err(TrackError::TrackFailed),
        _ => Err(TransportError::UnexpectedResponse(body.to_string()).into()),
    }
}

#[async_trait]
impl Tracker for HttpTracker {
    async fn track(
        &self,
        distinct_id: &str,
        event_name: &str,
        event: &Event,
    ) -> Result<(), TrackError> {
        let data = TrackPayload::new(&self.token, distinct_id, event_name, event)
            .encode()
            .map_err(TransportError::from)?;
        self.send(Endpoint::Track, distinct_id, data).await
    }

    async fn update(&self, distinct_id: &str, update: &Update) -> Result<(), TrackError> {
        let data = EngagePayload::new(&self.token, distinct_id, update)
            .encode()
            .map_err(TransportError::from)?;
        self.send(Endpoint::Engage, distinct_id, data).await
    }
}
