//! Ableton Live control surface
//!
//! [`LiveSet`] is the slice of the Live API the playback host needs;
//! [`AbletonLive`] drives it through AbletonOSC.

use async_trait::async_trait;
use cueplay_common::CuePoint;
use rosc::OscType;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::osc::OscClient;

const GET_CUE_POINTS: &str = "/live/song/get/cue_points";
const JUMP_TO_CUE: &str = "/live/song/cue_point/jump";
const START_PLAYING: &str = "/live/song/start_playing";
const STOP_PLAYING: &str = "/live/song/stop_playing";
const GET_SONG_TIME: &str = "/live/song/get/current_song_time";

#[async_trait]
pub trait LiveSet: Send + Sync + 'static {
    /// Cue points of the open set, ordered by time
    async fn cue_points(&self) -> Result<Vec<CuePoint>>;

    /// Move the playhead to the named cue
    async fn jump_to_cue(&self, name: &str) -> Result<()>;

    async fn start_playing(&self) -> Result<()>;

    async fn stop_playing(&self) -> Result<()>;

    /// Playhead position in beats
    async fn current_song_time(&self) -> Result<f64>;
}

pub struct AbletonLive {
    osc: OscClient,
    query_timeout: Duration,
}

impl AbletonLive {
    pub fn new(osc: OscClient, query_timeout: Duration) -> Self {
        Self { osc, query_timeout }
    }
}

#[async_trait]
impl LiveSet for AbletonLive {
    async fn cue_points(&self) -> Result<Vec<CuePoint>> {
        let reply = self
            .osc
            .query(GET_CUE_POINTS, vec![], self.query_timeout)
            .await?;
        let cues = parse_cue_points(&reply)?;
        debug!("Live set has {} cue points", cues.len());
        Ok(cues)
    }

    async fn jump_to_cue(&self, name: &str) -> Result<()> {
        self.osc
            .send_message(JUMP_TO_CUE, vec![OscType::String(name.to_string())])
            .await
    }

    async fn start_playing(&self) -> Result<()> {
        self.osc.send_message(START_PLAYING, vec![]).await
    }

    async fn stop_playing(&self) -> Result<()> {
        self.osc.send_message(STOP_PLAYING, vec![]).await
    }

    async fn current_song_time(&self) -> Result<f64> {
        let reply = self
            .osc
            .query(GET_SONG_TIME, vec![], self.query_timeout)
            .await?;
        reply
            .first()
            .and_then(as_number)
            .ok_or_else(|| unexpected(GET_SONG_TIME, format!("{:?}", reply)))
    }
}

/// Pair up a flat `[name, time, name, time, ...]` reply and sort by time
///
/// Cues sharing a time keep Live's order.
pub fn parse_cue_points(args: &[OscType]) -> Result<Vec<CuePoint>> {
    if args.len() % 2 != 0 {
        return Err(unexpected(
            GET_CUE_POINTS,
            format!("odd argument count {}", args.len()),
        ));
    }

    let mut cues = args
        .chunks_exact(2)
        .map(|pair| match (&pair[0], as_number(&pair[1])) {
            (OscType::String(name), Some(time)) => Ok(CuePoint::new(name.clone(), time)),
            _ => Err(unexpected(GET_CUE_POINTS, format!("{:?}", pair))),
        })
        .collect::<Result<Vec<_>>>()?;

    cues.sort_by(|a, b| a.position.total_cmp(&b.position));
    Ok(cues)
}

fn as_number(arg: &OscType) -> Option<f64> {
    match arg {
        OscType::Float(v) => Some(f64::from(*v)),
        OscType::Double(v) => Some(*v),
        OscType::Int(v) => Some(f64::from(*v)),
        OscType::Long(v) => Some(*v as f64),
        _ => None,
    }
}

fn unexpected(address: &str, detail: String) -> Error {
    Error::UnexpectedReply {
        address: address.to_string(),
        detail,
    }
}
