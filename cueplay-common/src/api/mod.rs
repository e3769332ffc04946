//! Shared HTTP API types
//!
//! Request/response shapes exchanged between cueplay-ui and cueplay-host,
//! plus the error and health bodies both services return.
//!
//! This module contains ONLY serde types; each service wraps them with its
//! own axum handlers.

pub mod types;

pub use types::{
    ErrorResponse, HealthResponse, MonitorRequest, PlayRequest, PlayResponse, StatusResponse,
};
