use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::api;
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    let body_limit = state.config().max_upload_bytes;

    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        .route("/api/layout/default", get(api::cards::default_layout))
        // --- Uploads ---
        .merge(build_upload_routes(body_limit))
        // --- Middleware ---
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn build_upload_routes(body_limit: usize) -> Router<SharedState> {
    Router::new()
        .route("/api/preview", post(api::cards::preview))
        .route("/api/generate", post(api::cards::generate))
        .layer(DefaultBodyLimit::max(body_limit))
}

async fn status_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
