//! HTTP API for cueplay-host

pub mod handlers;

pub use handlers::{get_cue_points, health_check, monitor_playhead, play_song, stop_song};
