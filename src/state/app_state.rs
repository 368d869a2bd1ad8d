//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use chrono::Local;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{AlertEvent, ExamInfo};
use crate::{
    clock::{
        format_time_left, parse_exam_time, ClockState, Countdown, CountdownConfig, ExamWindow,
        ParsedExamTime, TimeSync,
    },
    display::{DisplaySnapshot, Language},
};

/// Capacity of the alert broadcast channel
const ALERT_CHANNEL_CAPACITY: usize = 16;

/// Runtime settings derived from the configuration
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub language: Language,
    pub sync_timeout: Duration,
    pub resync_interval: Duration,
    pub countdown: CountdownConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 20554,
            language: Language::default(),
            sync_timeout: Duration::from_secs(3),
            resync_interval: Duration::from_secs(10 * 60),
            countdown: CountdownConfig::default(),
        }
    }
}

/// The configured exam and the window parsed from its time text
#[derive(Debug, Clone, Default)]
struct ExamSession {
    info: ExamInfo,
    parsed: ParsedExamTime,
}

/// Shared state between the display tick, the resync task and the HTTP API
pub struct AppState {
    pub settings: AppSettings,
    pub time_sync: Arc<TimeSync>,
    pub start_time: Instant,
    exam: Mutex<ExamSession>,
    countdown: Mutex<Countdown>,
    last_alert: Mutex<Option<AlertEvent>>,
    /// Latest display snapshot, replaced every emitted tick
    snapshot_tx: watch::Sender<DisplaySnapshot>,
    /// Alerts fired by the countdown
    alert_tx: broadcast::Sender<AlertEvent>,
    /// Flipped to `true` on teardown; every background task watches it
    shutdown_tx: watch::Sender<bool>,
}

impl AppState {
    pub fn new(settings: AppSettings, time_sync: Arc<TimeSync>) -> Self {
        let initial = DisplaySnapshot::build(
            time_sync.tick(),
            &Local,
            settings.language,
            &ExamInfo::default(),
            None,
        );
        let (snapshot_tx, _) = watch::channel(initial);
        let (alert_tx, _) = broadcast::channel(ALERT_CHANNEL_CAPACITY);
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            countdown: Mutex::new(Countdown::new(settings.countdown.clone())),
            settings,
            time_sync,
            start_time: Instant::now(),
            exam: Mutex::new(ExamSession::default()),
            last_alert: Mutex::new(None),
            snapshot_tx,
            alert_tx,
            shutdown_tx,
        }
    }

    /// Replace the exam info. The time text is reparsed only when it changed,
    /// anchored to the current display day.
    pub fn set_exam_info(&self, info: ExamInfo) -> Result<ExamInfo, String> {
        let mut session = self.exam.lock()
            .map_err(|e| format!("Failed to lock exam info: {}", e))?;

        if info.time != session.info.time {
            let reference = self.time_sync.tick().display_time.with_timezone(&Local);
            session.parsed = parse_exam_time(&info.time, &reference);
            match session.parsed.window {
                Some(window) => info!("Exam window set: {} - {}", window.start, window.end),
                None if info.time.trim().is_empty() => info!("Exam time cleared"),
                None => warn!("Exam time {:?} could not be parsed, countdown disabled", info.time),
            }
        }
        session.info = info.clone();

        Ok(info)
    }

    pub fn clear_exam_info(&self) -> Result<(), String> {
        self.set_exam_info(ExamInfo::default()).map(|_| ())
    }

    pub fn get_exam_info(&self) -> Result<ExamInfo, String> {
        self.exam.lock()
            .map(|session| session.info.clone())
            .map_err(|e| format!("Failed to lock exam info: {}", e))
    }

    pub fn exam_window(&self) -> Result<Option<ExamWindow>, String> {
        self.exam.lock()
            .map(|session| session.parsed.window)
            .map_err(|e| format!("Failed to lock exam info: {}", e))
    }

    /// Evaluate the countdown for `clock`, broadcast any alerts it fired and
    /// publish the resulting snapshot
    pub fn publish_tick(&self, clock: ClockState) -> Result<DisplaySnapshot, String> {
        let (info, window) = {
            let session = self.exam.lock()
                .map_err(|e| format!("Failed to lock exam info: {}", e))?;
            (session.info.clone(), session.parsed.window)
        };

        let mut fired = Vec::new();
        let countdown_state = {
            let mut countdown = self.countdown.lock()
                .map_err(|e| format!("Failed to lock countdown: {}", e))?;
            countdown.evaluate(clock.display_time, window, |mark| fired.push(mark))
        };

        for mark in fired {
            let event = AlertEvent::new(mark, self.settings.language, clock.display_time);
            if self.alert_tx.send(event).is_err() {
                debug!("No alert listeners for {} min mark", mark);
            }
        }

        let snapshot = DisplaySnapshot::build(
            clock,
            &Local,
            self.settings.language,
            &info,
            window.map(|_| countdown_state),
        );
        self.snapshot_tx.send_replace(snapshot.clone());

        Ok(snapshot)
    }

    pub fn latest_snapshot(&self) -> DisplaySnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<DisplaySnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<AlertEvent> {
        self.alert_tx.subscribe()
    }

    pub fn record_alert(&self, event: AlertEvent) -> Result<(), String> {
        let mut last = self.last_alert.lock()
            .map_err(|e| format!("Failed to lock last alert: {}", e))?;
        *last = Some(event);
        Ok(())
    }

    pub fn last_alert(&self) -> Option<AlertEvent> {
        self.last_alert.lock().ok().and_then(|a| a.clone())
    }

    /// Resync the clock offset now, bounded by the configured timeout
    pub async fn resync(&self) -> i64 {
        self.time_sync.sync_offset(self.settings.sync_timeout).await
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        format_time_left(secs / 3600, (secs % 3600) / 60, secs % 60)
    }

    /// Stop all background tasks
    pub fn shutdown(&self) {
        info!("Stopping background tasks");
        self.shutdown_tx.send_replace(true);
    }

    pub fn shutdown_rx(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }
}
