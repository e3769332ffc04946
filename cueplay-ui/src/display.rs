//! Display sinks
//!
//! The controller talks to the UI only through [`DisplaySink`]. In the service
//! the sink is the [`EventBus`] feeding SSE clients; tests use a recorder.

use cueplay_common::events::{DisplayIntent, EventBus};
use tracing::trace;

pub trait DisplaySink: Send + Sync + 'static {
    fn emit(&self, intent: DisplayIntent);
}

impl DisplaySink for EventBus {
    fn emit(&self, intent: DisplayIntent) {
        trace!("Display intent: {:?}", intent);
        // No browser connected is fine; /api/state covers late joiners
        EventBus::emit(self, intent);
    }
}
