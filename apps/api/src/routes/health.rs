use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
/// Service banner.
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Review Reply API",
        "api_base_url": state.config.api_base_url,
    }))
}

/// GET /health
/// Returns service version and whether each dependency can currently be used.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "review-reply-api",
        "store_available": state.store.is_available(),
        "completion_configured": state.llm.is_configured(),
    }))
}
