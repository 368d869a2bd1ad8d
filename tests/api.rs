//! HTTP API driven through the router without binding a socket

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use exam_clock::{
    clock::{ManualClock, SyncFailurePolicy, TimeSync},
    create_router,
    services::parse_date_header,
    state::{AppSettings, AppState},
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> (Arc<AppState>, Router) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 15, 2, 0, 0).unwrap());
    let sync = TimeSync::new(Arc::new(clock), None, SyncFailurePolicy::KeepLastOffset);
    let state = Arc::new(AppState::new(AppSettings::default(), Arc::new(sync)));
    let router = create_router(Arc::clone(&state));
    (state, router)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_version() {
    let (_state, router) = app();
    let (status, body) = send(&router, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn exam_info_lifecycle() {
    let (state, router) = app();

    let (status, body) = send(
        &router,
        Method::PUT,
        "/exam",
        Some(json!({
            "course_code": "01204111",
            "course_name": "Computer Programming",
            "time": "09.00 - 12.00 น.",
            "exam_room": "LH4-101 (40 ที่)"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown_enabled"], true);
    assert_eq!(body["exam"]["course_code"], "01204111");
    // Missing fields default to empty
    assert_eq!(body["exam"]["remarks"], "");
    assert!(state.exam_window().unwrap().is_some());

    let (status, body) = send(&router, Method::GET, "/exam", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exam"]["time"], "09.00 - 12.00 น.");
    assert_eq!(body["countdown_enabled"], true);

    let (status, body) = send(&router, Method::DELETE, "/exam", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown_enabled"], false);
    assert_eq!(body["exam"]["course_code"], "");
    assert!(state.exam_window().unwrap().is_none());
}

#[tokio::test]
async fn over_long_field_is_rejected() {
    let (state, router) = app();
    let (status, body) = send(
        &router,
        Method::PUT,
        "/exam",
        Some(json!({ "course_name": "x".repeat(101) })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("course_name"));
    assert!(!state.get_exam_info().unwrap().has_exam_info());
}

#[tokio::test]
async fn unrecognized_time_disables_countdown() {
    let (_state, router) = app();
    let (status, body) = send(
        &router,
        Method::PUT,
        "/exam",
        Some(json!({ "course_code": "01204111", "time": "after lunch" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown_enabled"], false);
    assert!(body["message"].as_str().unwrap().contains("after lunch"));
}

#[tokio::test]
async fn time_probe_carries_date_header() {
    let (_state, router) = app();
    let request = Request::builder()
        .method(Method::HEAD)
        .uri("/time")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let date = response.headers()[header::DATE].to_str().unwrap();
    assert_eq!(date, "Wed, 15 Jan 2025 02:00:00 GMT");
    assert_eq!(
        parse_date_header(date).unwrap(),
        Utc.with_ymd_and_hms(2025, 1, 15, 2, 0, 0).unwrap()
    );
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn time_body_reports_offset() {
    let (_state, router) = app();
    let (status, body) = send(&router, Method::GET, "/time", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offset_millis"], 0);
    assert_eq!(body["now"], "2025-01-15T02:00:00Z");
}

#[tokio::test]
async fn display_returns_latest_snapshot() {
    let (state, router) = app();
    state.publish_tick(state.time_sync.tick()).unwrap();

    let (status, body) = send(&router, Method::GET, "/display", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offset_millis"], 0);
    assert_eq!(body["language"], "th");
    assert!(body["time"]["hours"].is_string());
    assert!(body["countdown"].is_null());
}

#[tokio::test]
async fn sync_without_source_keeps_local_clock() {
    let (_state, router) = app();
    let (status, body) = send(&router, Method::POST, "/sync", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offset_millis"], 0);
    assert!(body["outcome"].is_null());
}

#[tokio::test]
async fn status_describes_configuration() {
    let (_state, router) = app();
    let (status, body) = send(&router, Method::GET, "/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["port"], 20554);
    assert_eq!(body["sync_enabled"], false);
    assert_eq!(body["failure_policy"], "keep-last-offset");
    assert_eq!(body["exam_configured"], false);
    assert_eq!(body["countdown"]["yellow_threshold"], 30);
    assert_eq!(body["countdown"]["alert_marks"], json!([30, 15, 5]));
    assert!(body["last_alert"].is_null());
}
