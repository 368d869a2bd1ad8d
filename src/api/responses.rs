//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    clock::{CountdownConfig, SyncFailurePolicy, SyncOutcome},
    display::Language,
    state::{AlertEvent, ExamInfo},
};

/// Response for exam info changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub exam: ExamInfo,
    /// Whether the exam time parsed into a countdown window
    pub countdown_enabled: bool,
}

impl ExamResponse {
    pub fn new(message: String, exam: ExamInfo, countdown_enabled: bool) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            exam,
            countdown_enabled,
        }
    }
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
        }
    }
}

/// Response for a manual resync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    pub offset_millis: i64,
    pub outcome: Option<SyncOutcome>,
}

/// Body of the time probe endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeResponse {
    pub now: DateTime<Utc>,
    pub offset_millis: i64,
}

/// Service status with sync and alert information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub language: Language,
    pub offset_millis: i64,
    pub sync_enabled: bool,
    pub failure_policy: SyncFailurePolicy,
    pub last_sync: Option<SyncOutcome>,
    pub exam_configured: bool,
    pub countdown: CountdownConfig,
    pub last_alert: Option<AlertEvent>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
