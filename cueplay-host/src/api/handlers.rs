//! HTTP request handlers
//!
//! The host is stateless apart from the stop generation counter: every play
//! request brings the full catalog, and monitor requests only need a stop
//! position.

use axum::{extract::State, Json};
use cueplay_common::api::{
    HealthResponse, MonitorRequest, PlayRequest, PlayResponse, StatusResponse,
};
use cueplay_common::{stop_position_after, CuePoint};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::AppContext;

// ============================================================================
// Cue points
// ============================================================================

/// GET /get_cue_points
pub async fn get_cue_points(State(ctx): State<AppContext>) -> Result<Json<Vec<CuePoint>>> {
    let cues = ctx.live.cue_points().await?;
    info!("Returning {} cue points", cues.len());
    Ok(Json(cues))
}

// ============================================================================
// Playback
// ============================================================================

/// POST /play_song
///
/// Jumps to the selected cue and starts Live. `start_pos` is null when the
/// cue no longer exists in the open set.
pub async fn play_song(
    State(ctx): State<AppContext>,
    Json(request): Json<PlayRequest>,
) -> Result<Json<PlayResponse>> {
    let selected = request.cue_points.get(request.cue_index).ok_or_else(|| {
        Error::BadRequest(format!(
            "cue_index {} out of range ({} cue points)",
            request.cue_index,
            request.cue_points.len()
        ))
    })?;

    let live_cues = ctx.live.cue_points().await?;
    if !live_cues.iter().any(|cue| cue.name == selected.name) {
        warn!("Cue '{}' not found in the Live set", selected.name);
        return Ok(Json(PlayResponse {
            start_pos: None,
            stop_pos: None,
        }));
    }

    ctx.live.jump_to_cue(&selected.name).await?;
    ctx.live.start_playing().await?;

    let stop_pos = stop_position_after(&request.cue_points, request.cue_index);
    info!(
        "Playing '{}' from {} (stop marker: {:?})",
        selected.name, selected.position, stop_pos
    );

    Ok(Json(PlayResponse {
        start_pos: Some(selected.position),
        stop_pos,
    }))
}

/// POST /stop_song
///
/// Also releases every open monitor request.
pub async fn stop_song(State(ctx): State<AppContext>) -> Result<Json<StatusResponse>> {
    ctx.live.stop_playing().await?;
    ctx.stop_generation.send_modify(|generation| *generation += 1);
    info!("Playback stopped");
    Ok(Json(StatusResponse::stopped()))
}

/// POST /monitor_playhead
///
/// Polls the playhead every tick and stops Live once it is within tolerance
/// of `stop_pos`. Returns early, without stopping again, if `/stop_song`
/// is called meanwhile.
///
/// The stop only arms after the playhead has been seen before `stop_pos`, so
/// a stale position from the previous song (jump not yet applied) is ignored.
pub async fn monitor_playhead(
    State(ctx): State<AppContext>,
    Json(request): Json<MonitorRequest>,
) -> Result<Json<StatusResponse>> {
    // Subscribing marks the current generation as seen
    let mut stops = ctx.stop_generation.subscribe();
    info!("Monitoring playhead until {}", request.stop_pos);
    let mut armed = false;

    loop {
        let position = ctx.live.current_song_time().await?;
        debug!("Playhead at {}", position);

        if position < request.stop_pos {
            armed = true;
        }
        if armed && position + ctx.settings.stop_tolerance >= request.stop_pos {
            ctx.live.stop_playing().await?;
            info!("Stop marker reached at {}", position);
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(ctx.settings.tick) => {}
            _ = stops.changed() => {
                info!("Monitor released by explicit stop");
                break;
            }
        }
    }

    Ok(Json(StatusResponse::stopped()))
}

// ============================================================================
// Service
// ============================================================================

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok("cueplay-host", env!("CARGO_PKG_VERSION")))
}
