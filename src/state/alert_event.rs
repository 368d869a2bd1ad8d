//! Minute-mark alert events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::display::{announcement, Language};

/// A minute mark was crossed for the current exam window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub minutes_left: u64,
    pub announcement: String,
    pub fired_at: DateTime<Utc>,
}

impl AlertEvent {
    pub fn new(minutes_left: u64, language: Language, fired_at: DateTime<Utc>) -> Self {
        Self {
            minutes_left,
            announcement: announcement(minutes_left, language),
            fired_at,
        }
    }
}
