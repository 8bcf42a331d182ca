use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Router, routing::get};
use catch_core::Log;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check endpoint; always answers with an empty log.
pub async fn health_check(State(state): State<AppState>) -> Response {
    state.responder.send_json(
        StatusCode::OK,
        Log::new(),
        &HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            protocol: state.responder.protocol().as_str().to_string(),
        },
    )
}
