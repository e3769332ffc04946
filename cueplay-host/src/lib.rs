//! cueplay-host library - Ableton Live playback host
//!
//! Bridges the cueplay HTTP protocol to AbletonOSC. The operator session
//! (cueplay-ui) fetches cue points, starts playback at a cue and holds a
//! monitor request open until the segment's stop marker is reached.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod live;
pub mod osc;

pub use error::{Error, Result};
pub use live::{AbletonLive, LiveSet};

/// Playhead monitor tuning
#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    /// Poll interval
    pub tick: Duration,
    /// Beats before `stop_pos` that count as reached
    pub stop_tolerance: f64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(150),
            stop_tolerance: 1.0,
        }
    }
}

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub live: Arc<dyn LiveSet>,
    pub settings: MonitorSettings,
    /// Bumped by every successful `/stop_song`; open monitors watch it
    pub stop_generation: Arc<watch::Sender<u64>>,
}

impl AppContext {
    pub fn new(live: Arc<dyn LiveSet>, settings: MonitorSettings) -> Self {
        let (stop_generation, _) = watch::channel(0);
        Self {
            live,
            settings,
            stop_generation: Arc::new(stop_generation),
        }
    }
}

/// Build application router
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/get_cue_points", get(api::get_cue_points))
        .route("/play_song", post(api::play_song))
        .route("/stop_song", post(api::stop_song))
        .route("/monitor_playhead", post(api::monitor_playhead))
        .route("/health", get(api::health_check))
        .with_state(ctx)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
