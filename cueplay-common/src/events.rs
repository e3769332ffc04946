//! Display intents and event distribution
//!
//! The session core never renders anything. It emits [`DisplayIntent`]s and
//! whatever front end is attached (SSE page, test recorder) turns them into
//! widgets and toasts.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// One operator-visible cue (index into the full catalog)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueEntry {
    pub index: usize,
    pub name: String,
}

/// Display intent emitted by the session core
///
/// Serialized with a `type` tag so the browser can switch on it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DisplayIntent {
    /// Replace the setlist with these entries (stop markers already hidden)
    ShowCueList { entries: Vec<CueEntry> },

    /// Highlight the selected entry, or clear highlighting
    HighlightSelected { index: Option<usize> },

    /// Toggle the play control's "playing" look
    SetPlayingVisual { playing: bool },

    /// "Now playing: ..." line; empty string clears it
    SetNowPlayingText { text: String },

    /// Transient toast message
    Notify { message: String },
}

impl DisplayIntent {
    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            DisplayIntent::ShowCueList { .. } => "ShowCueList",
            DisplayIntent::HighlightSelected { .. } => "HighlightSelected",
            DisplayIntent::SetPlayingVisual { .. } => "SetPlayingVisual",
            DisplayIntent::SetNowPlayingText { .. } => "SetNowPlayingText",
            DisplayIntent::Notify { .. } => "Notify",
        }
    }

    pub fn notify(message: impl Into<String>) -> Self {
        DisplayIntent::Notify {
            message: message.into(),
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Broadcast bus for display intents
///
/// Wraps `tokio::sync::broadcast`:
/// - Non-blocking publish (slow subscribers don't block the session)
/// - Multiple concurrent subscribers (one per connected browser)
/// - Lagged subscribers lose the oldest intents
///
/// # Examples
///
/// ```
/// use cueplay_common::events::{DisplayIntent, EventBus};
///
/// let bus = EventBus::new(100);
/// let mut rx = bus.subscribe();
///
/// bus.emit(DisplayIntent::notify("Playback stopped"));
/// assert_eq!(rx.try_recv().unwrap(), DisplayIntent::notify("Playback stopped"));
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DisplayIntent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` intents per subscriber
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future intents
    pub fn subscribe(&self) -> broadcast::Receiver<DisplayIntent> {
        self.tx.subscribe()
    }

    /// Emit an intent, ignoring if no subscribers are listening
    ///
    /// Returns the number of subscribers that received it.
    pub fn emit(&self, intent: DisplayIntent) -> usize {
        self.tx.send(intent).unwrap_or(0)
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_serialization_is_tagged() {
        let intent = DisplayIntent::SetNowPlayingText {
            text: "Now playing: Intro".to_string(),
        };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["type"], "SetNowPlayingText");
        assert_eq!(json["text"], "Now playing: Intro");

        let intent = DisplayIntent::HighlightSelected { index: None };
        let json = serde_json::to_value(&intent).unwrap();
        assert!(json["index"].is_null());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let bus = EventBus::new(0);
        assert_eq!(bus.capacity(), 1);
        let mut rx = bus.subscribe();
        assert_eq!(bus.emit(DisplayIntent::notify("still works")), 1);
        assert_eq!(rx.try_recv().unwrap(), DisplayIntent::notify("still works"));
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.emit(DisplayIntent::notify("nobody listening")), 0);
    }

    #[tokio::test]
    async fn test_all_subscribers_receive() {
        let bus = EventBus::new(10);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let sent = bus.emit(DisplayIntent::SetPlayingVisual { playing: true });
        assert_eq!(sent, 2);

        assert_eq!(
            rx1.recv().await.unwrap(),
            DisplayIntent::SetPlayingVisual { playing: true }
        );
        assert_eq!(
            rx2.recv().await.unwrap(),
            DisplayIntent::SetPlayingVisual { playing: true }
        );
    }
}
