//! Host API request/response types
//!
//! | Endpoint | Request | Response |
//! |---|---|---|
//! | `GET /get_cue_points` | - | `[[name, position], ...]` |
//! | `POST /play_song` | [`PlayRequest`] | [`PlayResponse`] |
//! | `POST /stop_song` | - | [`StatusResponse`] |
//! | `POST /monitor_playhead` | [`MonitorRequest`] | [`StatusResponse`] |

use serde::{Deserialize, Serialize};

use crate::cue::CuePoint;

// ========================================
// Playback Types
// ========================================

/// Start playback at a cue
///
/// The host keeps no cue state of its own, so every play request carries the
/// complete catalog the operator is looking at.
///
/// # Examples
///
/// ```
/// use cueplay_common::api::PlayRequest;
/// use cueplay_common::CuePoint;
///
/// let request = PlayRequest {
///     cue_index: 0,
///     cue_points: vec![CuePoint::new("Intro", 0.0), CuePoint::new("stop", 16.0)],
/// };
/// let json = serde_json::to_value(&request).unwrap();
/// assert_eq!(json["cue_points"][1][0], "stop");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayRequest {
    /// Index into `cue_points` (full catalog, not the filtered display list)
    pub cue_index: usize,
    /// Entire catalog in host order
    pub cue_points: Vec<CuePoint>,
}

/// Result of a play request
///
/// `start_pos: null` means the host could not start playback.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayResponse {
    pub start_pos: Option<f64>,
    /// Where the segment ends, if the host found a stop marker
    #[serde(default)]
    pub stop_pos: Option<f64>,
}

/// Long-lived request that completes once the playhead reaches `stop_pos`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MonitorRequest {
    pub stop_pos: f64,
}

/// Plain acknowledgment (`{"status": "stopped"}`)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn stopped() -> Self {
        Self {
            status: "stopped".to_string(),
        }
    }
}

// ========================================
// Service Types
// ========================================

/// Error body returned by both services
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// Error kind identifier (e.g. "session_busy")
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// GET /health body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok(module: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            module: module.to_string(),
            version: version.to_string(),
        }
    }
}
