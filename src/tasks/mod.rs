//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod alert_notifier;
pub mod display_tick;
pub mod resync;

use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};

use crate::state::AppState;

// Re-export main functions
pub use alert_notifier::alert_notifier_task;
pub use display_tick::display_tick_task;
pub use resync::resync_task;

/// Spawn every periodic task. They all stop once [`AppState::shutdown`] is
/// called.
pub fn spawn_background_tasks(state: &Arc<AppState>) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(alert_notifier_task(Arc::clone(state))),
        tokio::spawn(display_tick_task(Arc::clone(state))),
        tokio::spawn(resync_task(Arc::clone(state))),
    ]
}

/// Resolves once the shutdown flag is set. Also resolves if the sender is
/// gone, since nothing can flip the flag after that.
pub(crate) async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
