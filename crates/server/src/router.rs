//! HTTP router construction.
//!
//! Assembles the board API routes, the static web directory, and middleware
//! into a single `Router`.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let web_dir = ServeDir::new(&state.config.storage.web_dir);
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/health", get(api::health))
        .route("/api/state", get(api::get_state).post(api::post_state))
        .route("/api/recalc", post(api::recalc))
        .route("/api/focus", get(api::focus))
        .route("/api/budgets", get(api::budgets))
        .fallback_service(web_dir)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => CorsLayer::new().allow_origin(AllowOrigin::exact(value)),
        Err(_) => {
            tracing::warn!("Invalid CORS_ORIGIN '{}', allowing any origin", origin);
            CorsLayer::permissive()
        }
    }
}
