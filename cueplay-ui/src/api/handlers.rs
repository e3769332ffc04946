//! Operator action endpoints
//!
//! Each handler forwards to the controller task and maps [`ControllerError`]
//! onto an HTTP status. The operator-facing message has already gone out as a
//! `Notify` intent by the time the error arrives here.

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    Json,
};
use cueplay_common::api::ErrorResponse;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tracing::info;

use crate::controller::SessionSnapshot;
use crate::error::ControllerError;
use crate::session::SessionId;
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub selected: usize,
}

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub cue_count: usize,
}

#[derive(Debug, Serialize)]
pub struct PlayResponse {
    pub status: String,
    pub session: SessionId,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub status: String,
    pub session: Option<SessionId>,
}

impl IntoResponse for ControllerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ControllerError::NoSelection
            | ControllerError::NotSelectable { .. }
            | ControllerError::IndexOutOfRange { .. } => {
                StatusCode::BAD_REQUEST
            }
            ControllerError::SessionBusy => StatusCode::CONFLICT,
            ControllerError::PlaybackStartFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ControllerError::HostUnavailable(_) | ControllerError::MonitorFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            ControllerError::Shutdown => StatusCode::SERVICE_UNAVAILABLE,
        };

        (
            status,
            Json(ErrorResponse::new(self.kind(), self.to_string())),
        )
            .into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/state
pub async fn get_state(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, ControllerError> {
    Ok(Json(state.controller.snapshot().await?))
}

/// POST /api/cues/reload
pub async fn reload_cues(
    State(state): State<AppState>,
) -> Result<Json<LoadResponse>, ControllerError> {
    let cue_count = state.controller.load().await?;
    Ok(Json(LoadResponse { cue_count }))
}

/// POST /api/select
pub async fn select_cue(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SelectResponse>, ControllerError> {
    state.controller.select(req.index).await?;
    Ok(Json(SelectResponse {
        selected: req.index,
    }))
}

/// POST /api/play
pub async fn play(State(state): State<AppState>) -> Result<Json<PlayResponse>, ControllerError> {
    let session = state.controller.play().await?;
    info!("Play request accepted (session {})", session);
    Ok(Json(PlayResponse {
        status: "playing".to_string(),
        session,
    }))
}

/// POST /api/stop
pub async fn stop(State(state): State<AppState>) -> Result<Json<StopResponse>, ControllerError> {
    let session = state.controller.stop().await?;
    Ok(Json(StopResponse {
        status: "stopped".to_string(),
        session,
    }))
}

/// GET /api/events - SSE stream of display intents
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    cueplay_common::sse::intent_stream(&state.events)
}
