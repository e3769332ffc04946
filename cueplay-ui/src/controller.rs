//! Session controller
//!
//! Owns the cue catalog, the operator's selection and the playback session,
//! and is the only thing that mutates them. Operator actions (`load`,
//! `select`, `play`, `stop`) and monitor completions come in; host requests
//! and display intents go out.
//!
//! Every error is reported to the operator with a `Notify` intent before it is
//! returned, so callers only need the `Result` for their own bookkeeping.

use chrono::{DateTime, Utc};
use cueplay_common::api::PlayRequest;
use cueplay_common::events::{CueEntry, DisplayIntent};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::catalog::CueCatalog;
use crate::display::DisplaySink;
use crate::error::{ControllerError, Result};
use crate::host::PlaybackHost;
use crate::monitor::{MonitorCompletion, PlayheadMonitor};
use crate::selection::Selection;
use crate::session::{PlaybackSession, SessionId, SessionPhase};

pub const STOPPED_MESSAGE: &str = "Playback stopped";
pub const NO_SELECTION_MESSAGE: &str = "Please select a song from the setlist";

#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// Drop the selection whenever a session ends
    pub clear_selection_on_stop: bool,
}

/// Point-in-time view for clients that connect mid-session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub entries: Vec<CueEntry>,
    pub selected: Option<usize>,
    pub phase: SessionPhase,
    pub now_playing: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

pub struct SessionController {
    host: Arc<dyn PlaybackHost>,
    display: Arc<dyn DisplaySink>,
    catalog: CueCatalog,
    selection: Selection,
    session: PlaybackSession,
    monitor: PlayheadMonitor,
    options: ControllerOptions,
}

impl SessionController {
    /// Create a controller and the channel its monitor completions arrive on
    ///
    /// Completions must be fed back through [`on_monitor_complete`](Self::on_monitor_complete);
    /// [`spawn_controller`](crate::runtime::spawn_controller) does this.
    pub fn new(
        host: Arc<dyn PlaybackHost>,
        display: Arc<dyn DisplaySink>,
        options: ControllerOptions,
    ) -> (Self, mpsc::UnboundedReceiver<MonitorCompletion>) {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let monitor = PlayheadMonitor::new(Arc::clone(&host), completions_tx);

        let controller = Self {
            host,
            display,
            catalog: CueCatalog::new(),
            selection: Selection::new(),
            session: PlaybackSession::new(),
            monitor,
            options,
        };
        (controller, completions_rx)
    }

    pub fn catalog(&self) -> &CueCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    /// Fetch the catalog from the host and replace the current one
    ///
    /// On failure the previous catalog and display stay as they were.
    pub async fn load(&mut self) -> Result<usize> {
        let cues = match self.host.fetch_cue_points().await {
            Ok(cues) => cues,
            Err(e) => {
                warn!("Failed to load cue points: {}", e);
                self.notify(format!("Could not load cue points: {}", e));
                return Err(ControllerError::HostUnavailable(e));
            }
        };

        info!("Loaded {} cue points", cues.len());
        self.catalog.replace(cues);

        // Old indices may now name different cues
        self.selection.clear();
        self.display.emit(DisplayIntent::ShowCueList {
            entries: self.catalog.cue_entries(),
        });
        self.display
            .emit(DisplayIntent::HighlightSelected { index: None });

        Ok(self.catalog.len())
    }

    /// Select a cue from the operator-visible list
    ///
    /// Stop markers are hidden from the list and cannot be selected.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if self.catalog.entry_at(index).is_ok_and(|cue| cue.is_stop_marker()) {
            warn!("Rejected selection of stop marker {}", index);
            self.notify("Stop markers cannot be selected");
            return Err(ControllerError::NotSelectable { index });
        }

        if let Err(e) = self.selection.select(index, &self.catalog) {
            warn!("Rejected selection: {}", e);
            self.notify(format!("Invalid selection: {}", e));
            return Err(e);
        }

        debug!("Selected cue {}", index);
        self.display.emit(DisplayIntent::HighlightSelected {
            index: Some(index),
        });
        Ok(())
    }

    /// Start playback of the selected cue
    ///
    /// No host call is made unless the session is idle and a cue is selected.
    pub async fn play(&mut self) -> Result<SessionId> {
        if !self.session.is_idle() {
            warn!("Play rejected: session is {:?}", self.session.phase());
            self.notify("Playback already in progress");
            return Err(ControllerError::SessionBusy);
        }

        let Some(index) = self.selection.current() else {
            self.notify(NO_SELECTION_MESSAGE);
            return Err(ControllerError::NoSelection);
        };

        let cue = match self.catalog.entry_at(index) {
            Ok(cue) => cue.clone(),
            Err(e) => {
                warn!("Selected index no longer valid: {}", e);
                self.notify(format!("Invalid selection: {}", e));
                return Err(e);
            }
        };

        let request = PlayRequest {
            cue_index: index,
            cue_points: self.catalog.cues().to_vec(),
        };

        info!("Requesting playback of '{}' (cue {})", cue.name, index);
        let response = match self.host.start_playback(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Play request failed: {}", e);
                self.reset_display();
                self.notify(format!("Could not start playback: {}", e));
                return Err(ControllerError::HostUnavailable(e));
            }
        };

        let Some(start_pos) = response.start_pos else {
            warn!("Host could not start '{}'", cue.name);
            self.reset_display();
            self.notify(format!("Could not start '{}'", cue.name));
            return Err(ControllerError::PlaybackStartFailed(cue.name));
        };

        let id = self.session.start(index, &cue.name, start_pos)?;
        info!("Session {} playing '{}' from {}", id, cue.name, start_pos);
        self.display
            .emit(DisplayIntent::SetPlayingVisual { playing: true });
        self.display.emit(DisplayIntent::SetNowPlayingText {
            text: format!("Now playing: {}", cue.name),
        });

        match response
            .stop_pos
            .or_else(|| self.catalog.stop_position_after(index))
        {
            Some(stop_pos) => {
                self.session.monitor_started(id, stop_pos);
                self.monitor.spawn(id, stop_pos);
            }
            None => {
                warn!("No stop marker after '{}', session {} will not auto-stop", cue.name, id);
                self.notify(format!(
                    "No stop marker after '{}'; stop playback manually",
                    cue.name
                ));
            }
        }

        Ok(id)
    }

    /// Stop playback, whatever state the session is in
    ///
    /// Returns the session that was ended, if any. A monitor call still in
    /// flight for that session becomes a no-op when it completes.
    pub async fn stop(&mut self) -> Result<Option<SessionId>> {
        let result = self.host.stop_playback().await;
        let ended = self.end_session();

        match result {
            Ok(()) => {
                info!(
                    "Stopped by operator{}",
                    ended.map(|id| format!(" (session {})", id)).unwrap_or_default()
                );
                self.notify(STOPPED_MESSAGE);
                Ok(ended)
            }
            Err(e) => {
                warn!("Stop request failed: {}", e);
                self.notify(format!("Stop request failed: {}", e));
                Err(ControllerError::HostUnavailable(e))
            }
        }
    }

    /// Apply a monitor completion
    ///
    /// Returns `Ok(false)` for a stale completion (session already stopped or
    /// replaced), `Ok(true)` when it ended the session.
    pub fn on_monitor_complete(&mut self, completion: MonitorCompletion) -> Result<bool> {
        if !self.session.is_monitoring(completion.session) {
            debug!(
                "Ignoring monitor completion for inactive session {}",
                completion.session
            );
            return Ok(false);
        }

        self.end_session();
        match completion.outcome {
            Ok(()) => {
                info!("Session {} reached its stop marker", completion.session);
                self.notify(STOPPED_MESSAGE);
                Ok(true)
            }
            Err(e) => {
                self.notify(format!("Playhead monitor failed: {}", e));
                Err(ControllerError::MonitorFailed(e))
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let active = self.session.active();
        SessionSnapshot {
            entries: self.catalog.cue_entries(),
            selected: self.selection.current(),
            phase: self.session.phase(),
            now_playing: active.map(|s| s.cue_name.clone()),
            started_at: active.map(|s| s.started_at),
        }
    }

    /// Session → Idle plus display reset (no notification)
    fn end_session(&mut self) -> Option<SessionId> {
        let ended = self.session.reset().map(|s| s.id);

        if self.options.clear_selection_on_stop && self.selection.current().is_some() {
            self.selection.clear();
            self.display
                .emit(DisplayIntent::HighlightSelected { index: None });
        }
        self.reset_display();
        ended
    }

    fn reset_display(&self) {
        self.display
            .emit(DisplayIntent::SetPlayingVisual { playing: false });
        self.display.emit(DisplayIntent::SetNowPlayingText {
            text: String::new(),
        });
    }

    fn notify(&self, message: impl Into<String>) {
        self.display.emit(DisplayIntent::notify(message));
    }
}
