//! Delivery of heartbeats to the collector.
//!
//! Delivery is best effort: one synchronous POST per heartbeat, no retries and
//! no queue. The outcome is reported as human-readable text (`200 OK`,
//! `✗ POST failed: ...`) which is what the console shows and what the
//! scheduler keeps as the last server status.

use reqwest::blocking::Client;
use std::time::Duration;

use crate::core::render::HeartbeatPayload;
use crate::error::{Result, SentryError};

/// Collector endpoint path
pub const SUBMIT_PATH: &str = "/submit";

/// Default POST timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub trait Transport {
    /// Send one heartbeat and describe the outcome. Never fails.
    fn send(&self, payload: &HeartbeatPayload) -> String;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, payload: &HeartbeatPayload) -> String {
        (**self).send(payload)
    }
}

/// Whether a transport status text denotes an accepted heartbeat.
///
/// Substring match on `200`, not a status code comparison.
pub fn is_success(status_text: &str) -> bool {
    status_text.contains("200")
}

/// JSON-over-HTTP transport
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mata-sentry/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SentryError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!("http://{}:{}{}", host, port, SUBMIT_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `.json(..)` serialises the body and sets `Content-Type: application/json`
    fn post(&self, payload: &HeartbeatPayload) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .map_err(|e| SentryError::transport(e.to_string()))?;

        let status = response.status();
        let text = format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        );
        Ok(text.trim_end().to_string())
    }
}

impl Transport for HttpTransport {
    fn send(&self, payload: &HeartbeatPayload) -> String {
        match self.post(payload) {
            Ok(status) => {
                log::debug!("POST {} -> {}", self.url, status);
                status
            }
            Err(e) => {
                log::warn!("POST {} failed: {}", self.url, e);
                format!("✗ POST failed: {}", e)
            }
        }
    }
}
