//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use tracing::{error, info, warn};

use crate::{
    display::DisplaySnapshot,
    services::format_date_header,
    state::{AppState, ExamInfo},
};
use super::responses::{
    ErrorResponse, ExamResponse, HealthResponse, StatusResponse, SyncResponse, TimeResponse,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(message: String) -> ApiError {
    error!("{}", message);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(message)))
}

/// Handle GET /display - Latest render-ready snapshot
pub async fn display_handler(State(state): State<Arc<AppState>>) -> Json<DisplaySnapshot> {
    Json(state.latest_snapshot())
}

/// Handle GET /exam - Current exam info
pub async fn get_exam_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ExamResponse>, ApiError> {
    let exam = state.get_exam_info().map_err(internal_error)?;
    let window = state.exam_window().map_err(internal_error)?;
    Ok(Json(ExamResponse::new(
        "Current exam info".to_string(),
        exam,
        window.is_some(),
    )))
}

/// Handle PUT /exam - Replace exam info
pub async fn put_exam_handler(
    State(state): State<Arc<AppState>>,
    Json(exam): Json<ExamInfo>,
) -> Result<Json<ExamResponse>, ApiError> {
    if let Err(e) = exam.validate() {
        warn!("Rejected exam info: {}", e);
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new(e.to_string())),
        ));
    }

    let exam = state.set_exam_info(exam).map_err(internal_error)?;
    let window = state.exam_window().map_err(internal_error)?;
    info!("Exam info updated (countdown {})", if window.is_some() { "enabled" } else { "disabled" });

    let message = match window {
        Some(_) => "Exam info updated".to_string(),
        None if exam.time.trim().is_empty() => "Exam info updated without exam time".to_string(),
        None => format!("Exam info updated, exam time {:?} not recognized", exam.time),
    };
    Ok(Json(ExamResponse::new(message, exam, window.is_some())))
}

/// Handle DELETE /exam - Clear exam info
pub async fn delete_exam_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ExamResponse>, ApiError> {
    state.clear_exam_info().map_err(internal_error)?;
    info!("Exam info cleared");
    Ok(Json(ExamResponse::new(
        "Exam info cleared".to_string(),
        ExamInfo::default(),
        false,
    )))
}

/// Handle POST /sync - Resync with the time source now
pub async fn sync_handler(State(state): State<Arc<AppState>>) -> Json<SyncResponse> {
    let offset_millis = state.resync().await;
    Json(SyncResponse {
        offset_millis,
        outcome: state.time_sync.last_outcome(),
    })
}

/// Handle GET/HEAD /time - Time probe carrying the display time in its
/// `Date` header
pub async fn time_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let clock = state.time_sync.tick();
    (
        [
            (header::DATE, format_date_header(clock.display_time)),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        Json(TimeResponse {
            now: clock.display_time,
            offset_millis: clock.offset_millis,
        }),
    )
}

/// Handle GET /status - Return current service status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let exam = state.get_exam_info().map_err(internal_error)?;

    Ok(Json(StatusResponse {
        uptime: state.get_uptime(),
        port: state.settings.port,
        host: state.settings.host.clone(),
        language: state.settings.language,
        offset_millis: state.time_sync.offset_millis(),
        sync_enabled: state.time_sync.has_source(),
        failure_policy: state.time_sync.failure_policy(),
        last_sync: state.time_sync.last_outcome(),
        exam_configured: exam.has_exam_info(),
        countdown: state.settings.countdown.clone(),
        last_alert: state.last_alert(),
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
