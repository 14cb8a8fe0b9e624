//! Liveness endpoint.

use axum::{extract::State, Json};
use chrono::SecondsFormat;
use std::sync::Arc;

use crate::api::handlers::AppState;
use crate::api::models::HealthResponse;

/// Liveness check. Requires no authentication.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: state
            .clock
            .now()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
