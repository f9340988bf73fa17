//! Board API endpoint modules.
//!
//! Each sub-module owns a single responsibility area.
//! Shared error types live here in mod.rs.

mod board;
mod focus;
mod health;

pub use board::{get_state, post_state, recalc};
pub use focus::{budgets, focus};
pub use health::health;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

// ── Shared types ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub(crate) fn internal(err: impl std::fmt::Display) -> ApiError {
    tracing::error!("board store failure: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
