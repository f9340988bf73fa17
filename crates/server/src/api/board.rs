//! Board state read/replace and bulk recalculation.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use burner_core::{BoardState, BurnerError};

use crate::state::AppState;

use super::{bad_request, internal, ApiError};

/// Current board, seeded from the task sheet on first access.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Result<Json<BoardState>, ApiError> {
    let store = state.store.lock().await;
    store.load().map(Json).map_err(internal)
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub ok: bool,
    pub updated_at: String,
}

/// Replace the whole board with the posted document.
///
/// The body is parsed by hand so malformed JSON gets the same 400 shape as a
/// document missing `budgets` or `tasks`.
pub async fn post_state(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SaveResponse>, ApiError> {
    let payload: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| bad_request("invalid json"))?;
    let mut board = BoardState::from_payload(payload).map_err(|e| match e {
        BurnerError::InvalidPayload(msg) => bad_request(msg),
    })?;

    let store = state.store.lock().await;
    let updated_at = store.save(&mut board).map_err(internal)?;
    Ok(Json(SaveResponse {
        ok: true,
        updated_at,
    }))
}

#[derive(Debug, Serialize)]
pub struct RecalcResponse {
    pub updated: usize,
    pub updated_at: String,
}

/// Recalculate every task as of today and persist the board.
pub async fn recalc(State(state): State<Arc<AppState>>) -> Result<Json<RecalcResponse>, ApiError> {
    let today = state.today();
    let store = state.store.lock().await;
    let mut board = store.load().map_err(internal)?;
    let updated = board.recalculate(today);
    let updated_at = store.save(&mut board).map_err(internal)?;
    info!(updated, %today, "recalculated board");
    Ok(Json(RecalcResponse {
        updated,
        updated_at,
    }))
}
