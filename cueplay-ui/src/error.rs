//! Error types for cueplay-ui
//!
//! Every variant is recovered at the controller boundary: the operator sees a
//! notification and the session ends up Idle. `IndexOutOfRange` and
//! `NotSelectable` are the exceptions (bad input, not an operational failure)
//! and leave the session untouched.

use thiserror::Error;

use crate::host::HostError;

/// Session controller errors
#[derive(Error, Debug)]
pub enum ControllerError {
    /// Transport or server failure on any host call
    #[error("Playback host unavailable: {0}")]
    HostUnavailable(#[from] HostError),

    /// Play attempted with nothing selected
    #[error("No cue selected")]
    NoSelection,

    /// Play attempted while a session is already running
    #[error("Playback already in progress")]
    SessionBusy,

    /// Host answered the play request with a null start position
    #[error("Host could not start playback of '{0}'")]
    PlaybackStartFailed(String),

    /// Playhead monitor call failed
    #[error("Playhead monitor failed: {0}")]
    MonitorFailed(HostError),

    /// Cue exists but is a hidden stop marker
    #[error("Cue {index} is a stop marker and cannot be selected")]
    NotSelectable { index: usize },

    /// Selection or lookup outside the catalog
    #[error("Cue index {index} out of range (catalog has {len} cues)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Controller task is no longer running
    #[error("Session controller has shut down")]
    Shutdown,
}

impl ControllerError {
    /// Stable identifier used in HTTP error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            ControllerError::HostUnavailable(_) => "host_unavailable",
            ControllerError::NoSelection => "no_selection",
            ControllerError::SessionBusy => "session_busy",
            ControllerError::PlaybackStartFailed(_) => "playback_start_failed",
            ControllerError::MonitorFailed(_) => "monitor_failed",
            ControllerError::NotSelectable { .. } => "not_selectable",
            ControllerError::IndexOutOfRange { .. } => "index_out_of_range",
            ControllerError::Shutdown => "shutdown",
        }
    }
}

/// Convenience Result type using ControllerError
pub type Result<T> = std::result::Result<T, ControllerError>;
