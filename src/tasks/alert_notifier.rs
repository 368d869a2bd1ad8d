//! Alert notifier background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use super::stopped;
use crate::state::AppState;

/// Background task that announces minute-mark alerts and records the latest
/// one for the status endpoint
pub async fn alert_notifier_task(state: Arc<AppState>) {
    info!("Starting alert notifier task");

    let mut alerts = state.subscribe_alerts();
    let mut shutdown = state.shutdown_rx();

    loop {
        tokio::select! {
            received = alerts.recv() => match received {
                Ok(event) => {
                    info!(
                        minutes_left = event.minutes_left,
                        "Exam alert: {}", event.announcement
                    );
                    if let Err(e) = state.record_alert(event) {
                        warn!("Failed to record alert: {}", e);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Alert notifier fell behind, {} alerts skipped", skipped);
                }
                Err(RecvError::Closed) => break,
            },

            _ = stopped(&mut shutdown) => break,
        }
    }

    info!("Alert notifier task stopped");
}
