//! Cue point model
//!
//! A cue point is a named marker in the Live set arrangement. The host sends
//! them as `[name, position]` pairs and expects them back in the same shape,
//! so `CuePoint` serializes as a two-element array rather than an object.
//!
//! Cues whose name contains [`STOP_MARKER`] (any casing) mark where a song
//! segment ends. They stay in the catalog (indices are shared with the host)
//! but are hidden from the operator.

use serde::{Deserialize, Serialize};

/// Substring identifying stop-marker cues
pub const STOP_MARKER: &str = "stop";

/// A named position in the host's arrangement timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64)", into = "(String, f64)")]
pub struct CuePoint {
    /// Cue name as shown in Live
    pub name: String,
    /// Arrangement position (beats); only meaningful to the host
    pub position: f64,
}

impl CuePoint {
    pub fn new(name: impl Into<String>, position: f64) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }

    /// True if this cue marks the end of a segment rather than a playable song
    pub fn is_stop_marker(&self) -> bool {
        is_stop_marker(&self.name)
    }
}

impl From<(String, f64)> for CuePoint {
    fn from((name, position): (String, f64)) -> Self {
        Self { name, position }
    }
}

impl From<CuePoint> for (String, f64) {
    fn from(cue: CuePoint) -> Self {
        (cue.name, cue.position)
    }
}

/// Case-insensitive containment of [`STOP_MARKER`]
pub fn is_stop_marker(name: &str) -> bool {
    name.to_lowercase().contains(STOP_MARKER)
}

/// Position of the first stop marker after `index`
///
/// Only cues strictly after `index` are considered, so a segment never ends
/// on its own start cue. Returns `None` when no stop marker follows.
pub fn stop_position_after(cues: &[CuePoint], index: usize) -> Option<f64> {
    cues.iter()
        .skip(index.saturating_add(1))
        .find(|cue| cue.is_stop_marker())
        .map(|cue| cue.position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_marker_is_case_insensitive_containment() {
        assert!(is_stop_marker("stop"));
        assert!(is_stop_marker("STOP"));
        assert!(is_stop_marker("Verse 1 Stop"));
        assert!(is_stop_marker("nonstop"));
        assert!(!is_stop_marker("Intro"));
        assert!(!is_stop_marker("St op"));
    }

    #[test]
    fn test_cue_point_serializes_as_pair() {
        let cue = CuePoint::new("Intro", 16.0);
        let json = serde_json::to_string(&cue).unwrap();
        assert_eq!(json, r#"["Intro",16.0]"#);

        let parsed: Vec<CuePoint> = serde_json::from_str(r#"[["A", 0], ["B stop", 30.5]]"#).unwrap();
        assert_eq!(parsed[0], CuePoint::new("A", 0.0));
        assert_eq!(parsed[1], CuePoint::new("B stop", 30.5));
    }

    #[test]
    fn test_stop_position_after_skips_own_index() {
        let cues = vec![
            CuePoint::new("Song A", 0.0),
            CuePoint::new("stop", 32.0),
            CuePoint::new("Song B", 40.0),
            CuePoint::new("Song B STOP", 72.0),
        ];

        assert_eq!(stop_position_after(&cues, 0), Some(32.0));
        assert_eq!(stop_position_after(&cues, 2), Some(72.0));
        // Selecting a stop marker itself looks for the next one
        assert_eq!(stop_position_after(&cues, 1), Some(72.0));
        assert_eq!(stop_position_after(&cues, 3), None);
        assert_eq!(stop_position_after(&cues, 10), None);
    }
}
