//! cueplay-ui library - operator cue session
//!
//! The operator picks a cue from the setlist and plays it on the playback
//! host; the session ends when the host reports the segment's stop marker
//! was reached or the operator stops it.
//!
//! - [`catalog`], [`selection`], [`session`]: session state
//! - [`monitor`]: long-lived stop-detection call
//! - [`controller`]: the only place state changes
//! - [`runtime`]: the task that owns the controller
//! - [`api`]: HTTP surface for the operator page

use axum::Router;
use cueplay_common::events::EventBus;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod controller;
pub mod display;
pub mod error;
pub mod host;
pub mod monitor;
pub mod runtime;
pub mod selection;
pub mod session;

pub use controller::{ControllerOptions, SessionController, SessionSnapshot};
pub use error::{ControllerError, Result};
pub use runtime::{spawn_controller, ControllerHandle};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Session controller task
    pub controller: ControllerHandle,
    /// Display intents for SSE clients
    pub events: EventBus,
}

impl AppState {
    pub fn new(controller: ControllerHandle, events: EventBus) -> Self {
        Self { controller, events }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/state", get(api::get_state))
        .route("/api/cues/reload", post(api::reload_cues))
        .route("/api/select", post(api::select_cue))
        .route("/api/play", post(api::play))
        .route("/api/stop", post(api::stop))
        .route("/api/events", get(api::event_stream));

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes());

    Router::new()
        .merge(api)
        .merge(public)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
