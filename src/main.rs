//! Exam Clock - A server-time synchronized exam-room clock
//!
//! This is the main entry point for the exam-clock daemon.

use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{info, warn};

use exam_clock::{
    api::create_router,
    clock::{SystemClock, TimeSync},
    config::Config,
    services::{HttpDateSource, TimeSource},
    state::{AppState, ExamInfo},
    tasks::spawn_background_tasks,
    utils::shutdown_signal,
};

/// How long to wait for background tasks after shutdown is requested
const TASK_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("exam_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting exam-clock v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, sync_url={:?}, resync={}min, language={:?}",
        config.host, config.port, config.sync_url, config.resync_minutes, config.language
    );

    let settings = config.app_settings()?;

    let source = match &config.sync_url {
        Some(url) => {
            info!("Using {} as time source", url);
            Some(Arc::new(HttpDateSource::new(url.clone())?) as Arc<dyn TimeSource>)
        }
        None => None,
    };
    let time_sync = Arc::new(TimeSync::new(
        Arc::new(SystemClock),
        source,
        config.failure_policy(),
    ));

    // Create application state
    let state = Arc::new(AppState::new(settings, time_sync));

    if let Some(exam_time) = &config.exam_time {
        let exam = ExamInfo {
            time: exam_time.clone(),
            ..Default::default()
        };
        if let Err(e) = state.set_exam_info(exam) {
            warn!("Failed to set initial exam time: {}", e);
        }
    }

    // The tick starts right away with offset 0; the initial sync runs alongside
    let tasks = spawn_background_tasks(&state);

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /display - Current clock and countdown snapshot");
    info!("  GET    /exam    - Current exam info");
    info!("  PUT    /exam    - Replace exam info");
    info!("  DELETE /exam    - Clear exam info");
    info!("  POST   /sync    - Resync with the time source");
    info!("  GET    /time    - Time probe (Date header)");
    info!("  GET    /status  - Sync, alert and config status");
    info!("  GET    /health  - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    let stopped = futures::future::join_all(tasks);
    if tokio::time::timeout(TASK_SHUTDOWN_GRACE, stopped).await.is_err() {
        warn!("Background tasks did not stop within {:?}", TASK_SHUTDOWN_GRACE);
    }

    info!("Server shutdown complete");
    Ok(())
}
