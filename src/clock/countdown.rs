//! Exam countdown: status, color band, progress and one-shot minute alerts

use std::{collections::BTreeSet, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::exam_time::ExamWindow;

pub const DEFAULT_YELLOW_THRESHOLD: u64 = 30;
pub const DEFAULT_RED_THRESHOLD: u64 = 15;
pub const DEFAULT_ALERT_MARKS: [u64; 3] = [30, 15, 5];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountdownStatus {
    BeforeStart,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownColor {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CountdownConfigError {
    #[error("red threshold ({red} min) must be below yellow threshold ({yellow} min)")]
    ThresholdOrder { red: u64, yellow: u64 },
}

/// Color thresholds and alert marks, all in minutes remaining
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    pub yellow_threshold: u64,
    pub red_threshold: u64,
    pub alert_marks: Vec<u64>,
}

impl CountdownConfig {
    /// Validated config. Alert marks are sorted largest first and deduplicated.
    pub fn new(
        yellow_threshold: u64,
        red_threshold: u64,
        mut alert_marks: Vec<u64>,
    ) -> Result<Self, CountdownConfigError> {
        if red_threshold >= yellow_threshold {
            return Err(CountdownConfigError::ThresholdOrder {
                red: red_threshold,
                yellow: yellow_threshold,
            });
        }
        alert_marks.sort_unstable_by(|a, b| b.cmp(a));
        alert_marks.dedup();

        Ok(Self {
            yellow_threshold,
            red_threshold,
            alert_marks,
        })
    }

    pub fn color_for(&self, minutes_left: u64) -> CountdownColor {
        if minutes_left <= self.red_threshold {
            CountdownColor::Red
        } else if minutes_left <= self.yellow_threshold {
            CountdownColor::Yellow
        } else {
            CountdownColor::Green
        }
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            yellow_threshold: DEFAULT_YELLOW_THRESHOLD,
            red_threshold: DEFAULT_RED_THRESHOLD,
            alert_marks: DEFAULT_ALERT_MARKS.to_vec(),
        }
    }
}

/// Remaining time split into h/m/s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeLeft {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub total_seconds: u64,
}

impl TimeLeft {
    pub fn from_millis(millis: i64) -> Self {
        let total_seconds = millis.max(0) as u64 / 1000;
        Self {
            hours: total_seconds / 3600,
            minutes: (total_seconds % 3600) / 60,
            seconds: total_seconds % 60,
            total_seconds,
        }
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_time_left(self.hours, self.minutes, self.seconds))
    }
}

/// `2h 30m 45s`, `30m 45s`, `45s`. Minutes are kept whenever hours are shown.
pub fn format_time_left(hours: u64, minutes: u64, seconds: u64) -> String {
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Render-ready countdown snapshot for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountdownState {
    pub status: CountdownStatus,
    pub color: CountdownColor,
    pub time_left: TimeLeft,
    pub minutes_left: u64,
    pub progress_percent: f64,
    pub is_active: bool,
}

impl CountdownState {
    pub fn before_start() -> Self {
        Self {
            status: CountdownStatus::BeforeStart,
            color: CountdownColor::Green,
            time_left: TimeLeft::default(),
            minutes_left: 0,
            progress_percent: 0.0,
            is_active: false,
        }
    }

    pub fn finished() -> Self {
        Self {
            status: CountdownStatus::Finished,
            color: CountdownColor::Red,
            time_left: TimeLeft::default(),
            minutes_left: 0,
            progress_percent: 100.0,
            is_active: false,
        }
    }
}

/// Evaluates the countdown on each tick and remembers which alert marks have
/// already fired for the current exam window.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    config: CountdownConfig,
    window: Option<ExamWindow>,
    alerted_marks: BTreeSet<u64>,
}

impl Countdown {
    pub fn new(config: CountdownConfig) -> Self {
        Self {
            config,
            window: None,
            alerted_marks: BTreeSet::new(),
        }
    }

    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }

    pub fn alerted_marks(&self) -> &BTreeSet<u64> {
        &self.alerted_marks
    }

    /// Compute the state at `now` for `window`, calling `on_alert` once for
    /// every alert mark crossed for the first time in this window.
    ///
    /// A different `window` than the previous call clears the fired marks.
    pub fn evaluate<F>(
        &mut self,
        now: DateTime<Utc>,
        window: Option<ExamWindow>,
        mut on_alert: F,
    ) -> CountdownState
    where
        F: FnMut(u64),
    {
        if window != self.window {
            if !self.alerted_marks.is_empty() {
                debug!("Exam window changed, clearing alerted marks {:?}", self.alerted_marks);
            }
            self.alerted_marks.clear();
            self.window = window;
        }

        let Some(window) = window else {
            return CountdownState::before_start();
        };
        if now < window.start {
            return CountdownState::before_start();
        }
        if now >= window.end {
            return CountdownState::finished();
        }

        let total = (window.end - window.start).num_milliseconds();
        let elapsed = (now - window.start).num_milliseconds();
        let remaining = (window.end - now).num_milliseconds();

        let progress_percent = (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0);
        let minutes_left = (remaining / 60_000) as u64;

        for &mark in &self.config.alert_marks {
            if minutes_left <= mark && self.alerted_marks.insert(mark) {
                debug!("Alert mark {} min reached ({} min left)", mark, minutes_left);
                on_alert(mark);
            }
        }

        CountdownState {
            status: CountdownStatus::InProgress,
            color: self.config.color_for(minutes_left),
            time_left: TimeLeft::from_millis(remaining),
            minutes_left,
            progress_percent,
            is_active: true,
        }
    }
}
