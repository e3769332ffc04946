//! Cue catalog
//!
//! Ordered cue list as last fetched from the host. Order is the host's and is
//! never changed here: indices are the identifiers used on the wire.

use cueplay_common::events::CueEntry;
use cueplay_common::{stop_position_after, CuePoint};

use crate::error::{ControllerError, Result};

#[derive(Debug, Clone, Default)]
pub struct CueCatalog {
    cues: Vec<CuePoint>,
}

impl CueCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole catalog
    pub fn replace(&mut self, cues: Vec<CuePoint>) {
        self.cues = cues;
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Full catalog in host order
    pub fn cues(&self) -> &[CuePoint] {
        &self.cues
    }

    pub fn entry_at(&self, index: usize) -> Result<&CuePoint> {
        self.cues
            .get(index)
            .ok_or(ControllerError::IndexOutOfRange {
                index,
                len: self.cues.len(),
            })
    }

    /// Operator-visible `(index, name)` pairs, stop markers hidden
    ///
    /// Recomputed from the live catalog on every call.
    pub fn display_entries(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.cues
            .iter()
            .enumerate()
            .filter(|(_, cue)| !cue.is_stop_marker())
            .map(|(index, cue)| (index, cue.name.as_str()))
    }

    /// Owned display list for [`DisplayIntent::ShowCueList`](cueplay_common::events::DisplayIntent)
    pub fn cue_entries(&self) -> Vec<CueEntry> {
        self.display_entries()
            .map(|(index, name)| CueEntry {
                index,
                name: name.to_string(),
            })
            .collect()
    }

    /// Position of the stop marker ending the segment that starts at `index`
    pub fn stop_position_after(&self, index: usize) -> Option<f64> {
        stop_position_after(&self.cues, index)
    }
}
