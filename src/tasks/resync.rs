//! Periodic server-time resync task

use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use super::stopped;
use crate::state::AppState;

/// Background task that syncs the clock offset at startup and then on every
/// resync interval. Runs independently of the display tick, so a slow probe
/// never delays the clock.
pub async fn resync_task(state: Arc<AppState>) {
    if !state.time_sync.has_source() {
        info!("No time source configured, resync task not needed");
        return;
    }

    info!(
        "Starting resync task (every {:?}, timeout {:?})",
        state.settings.resync_interval, state.settings.sync_timeout
    );

    let mut shutdown = state.shutdown_rx();
    // The first tick completes immediately and performs the initial sync
    let mut ticker = interval(state.settings.resync_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut probe_shutdown = shutdown.clone();
                tokio::select! {
                    offset = state.resync() => {
                        debug!("Resync finished, offset={}ms", offset);
                    }
                    _ = stopped(&mut probe_shutdown) => break,
                }
            }

            _ = stopped(&mut shutdown) => break,
        }
    }

    info!("Resync task stopped");
}
