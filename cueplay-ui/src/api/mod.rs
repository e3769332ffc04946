//! HTTP API handlers for cueplay-ui

pub mod handlers;
pub mod health;
pub mod ui;

pub use handlers::{event_stream, get_state, play, reload_cues, select_cue, stop};
pub use health::health_routes;
pub use ui::{serve_app_js, serve_index};
