//! Playback session state machine
//!
//! ```text
//!          play ok                 monitor started
//!   Idle ───────────▶ Playing ─────────────────────▶ Monitoring
//!    ▲                  │                                 │
//!    └──── stop ────────┴───── stop / monitor done ───────┘
//! ```
//!
//! Every entry into `Playing` gets a fresh [`SessionId`]. Monitor completions
//! carry the id they were started for; a completion whose id no longer
//! matches a `Monitoring` session is stale and must be ignored.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::error::{ControllerError, Result};

/// Identity of one play-to-stop session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Playing,
    Monitoring,
}

/// Details of the cue currently playing
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub id: SessionId,
    pub cue_index: usize,
    pub cue_name: String,
    pub start_pos: f64,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Idle,
    Playing(ActiveSession),
    Monitoring { session: ActiveSession, stop_pos: f64 },
}

#[derive(Debug)]
pub struct PlaybackSession {
    state: State,
    next_id: u64,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            next_id: 1,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::Idle => SessionPhase::Idle,
            State::Playing(_) => SessionPhase::Playing,
            State::Monitoring { .. } => SessionPhase::Monitoring,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        match &self.state {
            State::Idle => None,
            State::Playing(session) | State::Monitoring { session, .. } => Some(session),
        }
    }

    /// Stop position being watched, if monitoring
    pub fn stop_pos(&self) -> Option<f64> {
        match self.state {
            State::Monitoring { stop_pos, .. } => Some(stop_pos),
            _ => None,
        }
    }

    /// Idle → Playing
    pub fn start(&mut self, cue_index: usize, cue_name: &str, start_pos: f64) -> Result<SessionId> {
        if !self.is_idle() {
            return Err(ControllerError::SessionBusy);
        }

        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.state = State::Playing(ActiveSession {
            id,
            cue_index,
            cue_name: cue_name.to_string(),
            start_pos,
            started_at: Utc::now(),
        });
        Ok(id)
    }

    /// Playing → Monitoring, only for the session `id`
    pub fn monitor_started(&mut self, id: SessionId, stop_pos: f64) -> bool {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Playing(session) if session.id == id => {
                self.state = State::Monitoring { session, stop_pos };
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// True if `id` is the session currently being monitored
    pub fn is_monitoring(&self, id: SessionId) -> bool {
        matches!(&self.state, State::Monitoring { session, .. } if session.id == id)
    }

    /// Any state → Idle, returning the session that ended
    pub fn reset(&mut self) -> Option<ActiveSession> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => None,
            State::Playing(session) | State::Monitoring { session, .. } => Some(session),
        }
    }
}
