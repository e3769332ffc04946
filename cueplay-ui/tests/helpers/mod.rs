//! Test doubles for the session controller

#![allow(dead_code)]

use async_trait::async_trait;
use cueplay_common::api::{MonitorRequest, PlayRequest, PlayResponse};
use cueplay_common::events::DisplayIntent;
use cueplay_common::CuePoint;
use cueplay_ui::display::DisplaySink;
use cueplay_ui::host::{HostError, PlaybackHost};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

/// `[("Intro", 0), ("Verse 1 stop", 30), ("Verse 2", 45)]`
pub fn setlist() -> Vec<CuePoint> {
    vec![
        CuePoint::new("Intro", 0.0),
        CuePoint::new("Verse 1 stop", 30.0),
        CuePoint::new("Verse 2", 45.0),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    FetchCuePoints,
    StartPlayback(PlayRequest),
    StopPlayback,
    MonitorPlayhead(f64),
}

/// Scripted playback host
///
/// Monitor calls stay open until the test releases them with
/// [`finish_monitor`](FakeHost::finish_monitor).
pub struct FakeHost {
    cue_points: Mutex<Vec<CuePoint>>,
    fail_fetch: AtomicBool,
    fail_play: AtomicBool,
    fail_stop: AtomicBool,
    play_response: Mutex<PlayResponse>,
    monitors: Mutex<VecDeque<oneshot::Sender<Result<(), HostError>>>>,
    calls: Mutex<Vec<HostCall>>,
}

impl FakeHost {
    pub fn new(cue_points: Vec<CuePoint>) -> Self {
        Self {
            cue_points: Mutex::new(cue_points),
            fail_fetch: AtomicBool::new(false),
            fail_play: AtomicBool::new(false),
            fail_stop: AtomicBool::new(false),
            play_response: Mutex::new(PlayResponse {
                start_pos: Some(12.5),
                stop_pos: None,
            }),
            monitors: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_cue_points(&self, cue_points: Vec<CuePoint>) {
        *self.cue_points.lock().unwrap() = cue_points;
    }

    pub fn set_play_response(&self, start_pos: Option<f64>, stop_pos: Option<f64>) {
        *self.play_response.lock().unwrap() = PlayResponse {
            start_pos,
            stop_pos,
        };
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_play(&self, fail: bool) {
        self.fail_play.store(fail, Ordering::SeqCst);
    }

    pub fn fail_stop(&self, fail: bool) {
        self.fail_stop.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    /// Wait until `n` monitor calls are open
    pub async fn wait_for_monitors(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.monitors.lock().unwrap().len() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("monitor call was never made");
    }

    /// Complete the oldest open monitor call
    pub fn finish_monitor(&self, outcome: Result<(), HostError>) {
        let sender = self
            .monitors
            .lock()
            .unwrap()
            .pop_front()
            .expect("no open monitor call");
        let _ = sender.send(outcome);
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PlaybackHost for FakeHost {
    async fn fetch_cue_points(&self) -> Result<Vec<CuePoint>, HostError> {
        self.record(HostCall::FetchCuePoints);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(HostError::Network("connection refused".to_string()));
        }
        Ok(self.cue_points.lock().unwrap().clone())
    }

    async fn start_playback(&self, request: &PlayRequest) -> Result<PlayResponse, HostError> {
        self.record(HostCall::StartPlayback(request.clone()));
        if self.fail_play.load(Ordering::SeqCst) {
            return Err(HostError::Status(500, "boom".to_string()));
        }
        Ok(self.play_response.lock().unwrap().clone())
    }

    async fn stop_playback(&self) -> Result<(), HostError> {
        self.record(HostCall::StopPlayback);
        if self.fail_stop.load(Ordering::SeqCst) {
            return Err(HostError::Network("connection refused".to_string()));
        }
        Ok(())
    }

    async fn monitor_playhead(&self, request: &MonitorRequest) -> Result<(), HostError> {
        self.record(HostCall::MonitorPlayhead(request.stop_pos));
        let (tx, rx) = oneshot::channel();
        self.monitors.lock().unwrap().push_back(tx);
        rx.await
            .unwrap_or_else(|_| Err(HostError::Network("monitor abandoned".to_string())))
    }
}

/// Records every display intent
#[derive(Default)]
pub struct RecordingSink {
    intents: Mutex<Vec<DisplayIntent>>,
}

impl RecordingSink {
    pub fn intents(&self) -> Vec<DisplayIntent> {
        self.intents.lock().unwrap().clone()
    }

    /// Drain recorded intents
    pub fn take(&self) -> Vec<DisplayIntent> {
        std::mem::take(&mut *self.intents.lock().unwrap())
    }

    pub fn notifications(&self) -> Vec<String> {
        self.intents
            .lock()
            .unwrap()
            .iter()
            .filter_map(|intent| match intent {
                DisplayIntent::Notify { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl DisplaySink for RecordingSink {
    fn emit(&self, intent: DisplayIntent) {
        self.intents.lock().unwrap().push(intent);
    }
}
