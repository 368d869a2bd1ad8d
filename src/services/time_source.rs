//! Trusted time source probe (HTTP `Date` header)

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{CACHE_CONTROL, DATE};
use thiserror::Error;
use tracing::{debug, error};

/// Reasons a time probe can fail
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("time probe timed out after {0:?}")]
    Timeout(Duration),
    #[error("time probe request failed: {0}")]
    Request(String),
    #[error("time probe response has no Date header")]
    MissingDateHeader,
    #[error("invalid Date header {value:?}: {reason}")]
    InvalidDateHeader { value: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Something that can report its own current time.
#[async_trait]
pub trait TimeSource: Send + Sync {
    /// Ask the source for its current time. Must give up after `timeout`.
    async fn server_time(&self, timeout: Duration) -> Result<DateTime<Utc>, SyncError>;
}

/// Probes an HTTP endpoint with a `HEAD` request and reads only its `Date`
/// response header.
#[derive(Debug, Clone)]
pub struct HttpDateSource {
    url: String,
    client: reqwest::Client,
}

impl HttpDateSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()
            .map_err(|e| {
                error!("Failed to build time probe client: {}", e);
                SyncError::Client(e.to_string())
            })?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl TimeSource for HttpDateSource {
    async fn server_time(&self, timeout: Duration) -> Result<DateTime<Utc>, SyncError> {
        debug!("Probing {} for server time", self.url);

        let request = self
            .client
            .head(&self.url)
            .header(CACHE_CONTROL, "no-store")
            .send();

        let response = match tokio::time::timeout(timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => return Err(SyncError::Timeout(timeout)),
            Ok(Err(e)) => return Err(SyncError::Request(e.to_string())),
            Err(_) => return Err(SyncError::Timeout(timeout)),
        };

        let header = response
            .headers()
            .get(DATE)
            .ok_or(SyncError::MissingDateHeader)?;
        let value = header.to_str().map_err(|e| SyncError::InvalidDateHeader {
            value: String::from_utf8_lossy(header.as_bytes()).into_owned(),
            reason: e.to_string(),
        })?;

        parse_date_header(value)
    }
}

/// Parse an HTTP `Date` header value (IMF-fixdate, e.g.
/// `Wed, 15 Jan 2025 09:00:00 GMT`).
pub fn parse_date_header(value: &str) -> Result<DateTime<Utc>, SyncError> {
    DateTime::parse_from_rfc2822(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| SyncError::InvalidDateHeader {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Render an instant as an HTTP `Date` header value
pub fn format_date_header(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
