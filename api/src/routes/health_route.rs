//! GET /health: liveness of the store, the backend, and the model.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{core::app_state::AppState, models::HealthResponse};

/// Handler: GET /health
///
/// Overall status is `"ok"` only when both external collaborators respond;
/// the cross-encoder is informational (its absence degrades, not fails).
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let redis = match state.redis.ping().await {
        Ok(()) => "connected",
        Err(_) => "unavailable",
    };

    let searxng = match state.searx.ping().await {
        Ok(()) => "reachable",
        Err(_) => "unreachable",
    };

    let cross_encoder = if state.rerank.is_loaded() {
        "loaded"
    } else {
        "unavailable"
    };

    let status = if redis == "connected" && searxng == "reachable" {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        redis,
        searxng,
        cross_encoder,
        uptime_seconds: state.started_at.elapsed().as_secs_f64(),
    })
}
