//! Display tick background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use super::stopped;
use crate::state::AppState;

/// How often the clock is polled; a snapshot is only published when the
/// displayed second changes
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Background task that publishes a fresh display snapshot once per second
pub async fn display_tick_task(state: Arc<AppState>) {
    info!("Starting display tick task");

    let mut shutdown = state.shutdown_rx();
    let mut ticker = interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_second = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let clock = state.time_sync.tick();
                let second = clock.epoch_second();
                if last_second == Some(second) {
                    continue;
                }
                last_second = Some(second);

                if let Err(e) = state.publish_tick(clock) {
                    error!("Failed to publish display tick: {}", e);
                }
            }

            _ = stopped(&mut shutdown) => break,
        }
    }

    info!("Display tick task stopped");
}
