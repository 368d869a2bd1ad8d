//! Server-corrected display clock

use std::{
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::wall_clock::WallClock;
use crate::services::TimeSource;

/// What to do with the offset when a resync fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncFailurePolicy {
    /// Keep the last offset that came from a successful sync
    #[default]
    KeepLastOffset,
    /// Fall back to the raw local clock
    ResetToZero,
}

/// One reading of the display clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockState {
    pub display_time: DateTime<Utc>,
    pub offset_millis: i64,
}

impl ClockState {
    /// Whole seconds since the epoch; the tick loop emits when this changes
    pub fn epoch_second(&self) -> i64 {
        self.display_time.timestamp()
    }
}

/// Result of the most recent sync attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub attempted_at: DateTime<Utc>,
    pub offset_millis: i64,
    pub success: bool,
    pub error: Option<String>,
}

/// Combines the device clock with an offset learned from a trusted time
/// source. The offset starts at zero and is replaced wholesale on every
/// successful sync.
pub struct TimeSync {
    clock: Arc<dyn WallClock>,
    source: Option<Arc<dyn TimeSource>>,
    failure_policy: SyncFailurePolicy,
    offset_millis: AtomicI64,
    last_outcome: Mutex<Option<SyncOutcome>>,
}

impl TimeSync {
    /// Without a `source` the local clock is trusted and syncs are no-ops.
    pub fn new(
        clock: Arc<dyn WallClock>,
        source: Option<Arc<dyn TimeSource>>,
        failure_policy: SyncFailurePolicy,
    ) -> Self {
        Self {
            clock,
            source,
            failure_policy,
            offset_millis: AtomicI64::new(0),
            last_outcome: Mutex::new(None),
        }
    }

    pub fn offset_millis(&self) -> i64 {
        self.offset_millis.load(Ordering::SeqCst)
    }

    pub fn failure_policy(&self) -> SyncFailurePolicy {
        self.failure_policy
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Current display time: device clock plus the last known offset
    pub fn tick(&self) -> ClockState {
        let offset_millis = self.offset_millis();
        ClockState {
            display_time: self.clock.now() + chrono::Duration::milliseconds(offset_millis),
            offset_millis,
        }
    }

    /// Probe the time source and store `server_time - client_time`.
    ///
    /// Never fails: on any probe error the failure is logged and the offset
    /// is handled according to the [`SyncFailurePolicy`]. Returns the offset
    /// in effect afterwards.
    pub async fn sync_offset(&self, timeout: Duration) -> i64 {
        let Some(source) = &self.source else {
            debug!("No time source configured, trusting local clock");
            return self.offset_millis();
        };

        match source.server_time(timeout).await {
            Ok(server_time) => {
                let client_time = self.clock.now();
                let offset = (server_time - client_time).num_milliseconds();
                let previous = self.offset_millis.swap(offset, Ordering::SeqCst);
                info!("Server time synced: offset={}ms (was {}ms)", offset, previous);
                self.record(SyncOutcome {
                    attempted_at: client_time,
                    offset_millis: offset,
                    success: true,
                    error: None,
                });
                offset
            }
            Err(e) => {
                let offset = match self.failure_policy {
                    SyncFailurePolicy::KeepLastOffset => self.offset_millis(),
                    SyncFailurePolicy::ResetToZero => {
                        self.offset_millis.store(0, Ordering::SeqCst);
                        0
                    }
                };
                warn!("Unable to sync with server time, using offset {}ms: {}", offset, e);
                self.record(SyncOutcome {
                    attempted_at: self.clock.now(),
                    offset_millis: offset,
                    success: false,
                    error: Some(e.to_string()),
                });
                offset
            }
        }
    }

    pub fn last_outcome(&self) -> Option<SyncOutcome> {
        self.last_outcome
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, outcome: SyncOutcome) {
        let mut last = self.last_outcome.lock().unwrap_or_else(|e| e.into_inner());
        *last = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::{clock::ManualClock, services::SyncError};

    /// Replays a fixed list of probe results, each relative to the clock
    struct ScriptedSource {
        clock: ManualClock,
        script: Mutex<VecDeque<Result<i64, ()>>>,
    }

    impl ScriptedSource {
        fn new(clock: ManualClock, script: Vec<Result<i64, ()>>) -> Self {
            Self {
                clock,
                script: Mutex::new(script.into()),
            }
        }
    }

    #[async_trait]
    impl TimeSource for ScriptedSource {
        async fn server_time(&self, timeout: Duration) -> Result<DateTime<Utc>, SyncError> {
            match self.script.lock().unwrap().pop_front() {
                Some(Ok(ahead_ms)) => {
                    Ok(self.clock.now() + chrono::Duration::milliseconds(ahead_ms))
                }
                _ => Err(SyncError::Timeout(timeout)),
            }
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap()
    }

    fn sync_with(
        script: Vec<Result<i64, ()>>,
        policy: SyncFailurePolicy,
    ) -> (ManualClock, TimeSync) {
        let clock = ManualClock::new(start());
        let source = ScriptedSource::new(clock.clone(), script);
        let sync = TimeSync::new(Arc::new(clock.clone()), Some(Arc::new(source)), policy);
        (clock, sync)
    }

    #[test]
    fn tick_uses_local_clock_before_first_sync() {
        let (clock, sync) = sync_with(vec![], SyncFailurePolicy::KeepLastOffset);
        let state = sync.tick();
        assert_eq!(state.offset_millis, 0);
        assert_eq!(state.display_time, clock.now());
    }

    #[tokio::test]
    async fn successful_sync_replaces_offset() {
        let (clock, sync) = sync_with(
            vec![Ok(1_500), Ok(-250)],
            SyncFailurePolicy::KeepLastOffset,
        );

        assert_eq!(sync.sync_offset(Duration::from_secs(3)).await, 1_500);
        assert_eq!(
            sync.tick().display_time,
            clock.now() + chrono::Duration::milliseconds(1_500)
        );

        // Replaced, not accumulated
        assert_eq!(sync.sync_offset(Duration::from_secs(3)).await, -250);
        assert_eq!(sync.offset_millis(), -250);
        assert!(sync.last_outcome().unwrap().success);
    }

    #[tokio::test]
    async fn failed_resync_keeps_last_good_offset() {
        let (_clock, sync) =
            sync_with(vec![Ok(5_000), Err(())], SyncFailurePolicy::KeepLastOffset);

        sync.sync_offset(Duration::from_secs(3)).await;
        let offset = sync.sync_offset(Duration::from_secs(3)).await;

        assert_eq!(offset, 5_000);
        assert_eq!(sync.tick().offset_millis, 5_000);
        let outcome = sync.last_outcome().unwrap();
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn failed_first_sync_leaves_zero() {
        let (_clock, sync) = sync_with(vec![Err(())], SyncFailurePolicy::KeepLastOffset);
        assert_eq!(sync.sync_offset(Duration::from_secs(3)).await, 0);
    }

    #[tokio::test]
    async fn reset_policy_drops_offset_on_failure() {
        let (clock, sync) = sync_with(vec![Ok(5_000), Err(())], SyncFailurePolicy::ResetToZero);

        sync.sync_offset(Duration::from_secs(3)).await;
        assert_eq!(sync.sync_offset(Duration::from_secs(3)).await, 0);
        assert_eq!(sync.tick().display_time, clock.now());
    }

    #[tokio::test]
    async fn no_source_is_a_noop() {
        let clock = ManualClock::new(start());
        let sync = TimeSync::new(Arc::new(clock), None, SyncFailurePolicy::KeepLastOffset);
        assert_eq!(sync.sync_offset(Duration::from_secs(3)).await, 0);
        assert!(sync.last_outcome().is_none());
    }
}
