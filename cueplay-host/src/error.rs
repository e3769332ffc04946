//! Error types for cueplay-host
//!
//! Defines module-specific error types using thiserror; handlers return them
//! directly and they render as `ErrorResponse` JSON.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cueplay_common::api::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// Main error type for cueplay-host
#[derive(Error, Debug)]
pub enum Error {
    /// OSC encode/decode or send failure
    #[error("OSC error: {0}")]
    Osc(String),

    /// Live did not answer an OSC query in time
    #[error("No response received to query: {0}")]
    Timeout(String),

    /// Live answered with something we can't interpret
    #[error("Unexpected reply to {address}: {detail}")]
    UnexpectedReply { address: String, detail: String },

    /// Socket I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid request
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl Error {
    fn kind(&self) -> &'static str {
        match self {
            Error::Osc(_) => "osc_error",
            Error::Timeout(_) => "live_timeout",
            Error::UnexpectedReply { .. } => "unexpected_reply",
            Error::Io(_) => "io_error",
            Error::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Osc(_) | Error::Timeout(_) | Error::UnexpectedReply { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };
        if status != StatusCode::BAD_REQUEST {
            error!("Request failed: {}", self);
        }

        (status, Json(ErrorResponse::new(self.kind(), self.to_string()))).into_response()
    }
}

/// Convenience Result type using cueplay-host Error
pub type Result<T> = std::result::Result<T, Error>;
