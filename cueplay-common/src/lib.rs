//! # cueplay Common Library
//!
//! Shared code for the cueplay services:
//! - Cue point model and the stop-marker rule
//! - Host API request/response types
//! - Display intents and the EventBus that carries them
//! - Configuration loading
//! - SSE helpers

pub mod api;
pub mod config;
pub mod cue;
pub mod error;
pub mod events;
pub mod sse;

pub use cue::{is_stop_marker, stop_position_after, CuePoint, STOP_MARKER};
pub use error::{Error, Result};
