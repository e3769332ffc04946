//! Integration tests for cueplay-ui HTTP endpoints
//!
//! The router runs against a real controller task backed by the scripted host.

mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use cueplay_common::events::EventBus;
use cueplay_ui::{build_router, spawn_controller, AppState, ControllerOptions, SessionController};
use helpers::{setlist, FakeHost, HostCall};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: router with a loaded setlist
async fn setup_app() -> (axum::Router, Arc<FakeHost>) {
    let host = Arc::new(FakeHost::new(setlist()));
    let events = EventBus::new(100);
    let (controller, completions) = SessionController::new(
        host.clone(),
        Arc::new(events.clone()),
        ControllerOptions::default(),
    );
    let (handle, _task) = spawn_controller(controller, completions);
    handle.load().await.expect("initial load");

    (build_router(AppState::new(handle, events)), host)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method("POST").uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

// =============================================================================
// Service endpoints
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _host) = setup_app().await;

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "cueplay-ui");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_index_page_served() {
    let (app, _host) = setup_app().await;

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/static/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/javascript"
    );
}

#[tokio::test]
async fn test_state_after_startup_load() {
    let (app, _host) = setup_app().await;

    let (status, body) = send(&app, get("/api/state")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["entries"],
        json!([{"index": 0, "name": "Intro"}, {"index": 2, "name": "Verse 2"}])
    );
    assert_eq!(body["phase"], "idle");
    assert!(body["selected"].is_null());
    assert!(body["now_playing"].is_null());
}

// =============================================================================
// Operator actions
// =============================================================================

#[tokio::test]
async fn test_play_without_selection_is_bad_request() {
    let (app, host) = setup_app().await;

    let (status, body) = send(&app, post("/api/play", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no_selection");
    assert_eq!(host.count(|c| matches!(c, HostCall::StartPlayback(_))), 0);
}

#[tokio::test]
async fn test_select_out_of_range() {
    let (app, _host) = setup_app().await;

    let (status, body) = send(&app, post("/api/select", Some(json!({"index": 7})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "index_out_of_range");
}

#[tokio::test]
async fn test_select_stop_marker_is_bad_request() {
    let (app, _host) = setup_app().await;

    let (status, body) = send(&app, post("/api/select", Some(json!({"index": 1})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "not_selectable");

    let (_, state) = send(&app, get("/api/state")).await;
    assert!(state["selected"].is_null());
}

#[tokio::test]
async fn test_select_play_stop_cycle() {
    let (app, host) = setup_app().await;

    let (status, body) = send(&app, post("/api/select", Some(json!({"index": 0})))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"], 0);

    let (status, body) = send(&app, post("/api/play", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "playing");
    let session = body["session"].clone();

    let (_, state) = send(&app, get("/api/state")).await;
    assert_eq!(state["phase"], "monitoring");
    assert_eq!(state["now_playing"], "Intro");
    assert!(state["started_at"].is_string());

    let (status, body) = send(&app, post("/api/play", None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "session_busy");

    let (status, body) = send(&app, post("/api/stop", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "stopped");
    assert_eq!(body["session"], session);

    let (_, state) = send(&app, get("/api/state")).await;
    assert_eq!(state["phase"], "idle");
    assert_eq!(state["selected"], 0);

    assert_eq!(host.count(|c| *c == HostCall::StopPlayback), 1);
}

#[tokio::test]
async fn test_null_start_pos_is_unprocessable() {
    let (app, host) = setup_app().await;
    host.set_play_response(None, None);

    send(&app, post("/api/select", Some(json!({"index": 0})))).await;
    let (status, body) = send(&app, post("/api/play", None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "playback_start_failed");
}

#[tokio::test]
async fn test_reload_failure_is_bad_gateway() {
    let (app, host) = setup_app().await;
    host.fail_fetch(true);

    let (status, body) = send(&app, post("/api/cues/reload", None)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "host_unavailable");

    // Previous catalog still served
    let (_, state) = send(&app, get("/api/state")).await;
    assert_eq!(state["entries"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_reload_success() {
    let (app, _host) = setup_app().await;

    let (status, body) = send(&app, post("/api/cues/reload", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cue_count"], 3);
}
