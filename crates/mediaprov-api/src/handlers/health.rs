use crate::state::AppState;
use axum::{extract::State, Json};
use mediaprov_core::models::HealthResponse;
use std::sync::Arc;

/// Liveness probe. Never requires a function key.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        blob_backend: state.containers.blob_store().backend_type().to_string(),
    })
}
