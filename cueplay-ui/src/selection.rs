//! Operator's single cue selection

use crate::catalog::CueCatalog;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `index`, replacing any previous selection
    ///
    /// Fails with `IndexOutOfRange` (selection unchanged) if `index` is not
    /// in `catalog`.
    pub fn select(&mut self, index: usize, catalog: &CueCatalog) -> Result<()> {
        catalog.entry_at(index)?;
        self.current = Some(index);
        Ok(())
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
