//! GET /stats: aggregated query statistics from the store counters.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{Json, extract::State};
use search_pipeline::Intent;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    models::StatsResponse,
};

/// Handler: GET /stats
pub async fn stats(State(state): State<Arc<AppState>>) -> AppResult<Json<StatsResponse>> {
    let intents: Vec<&str> = Intent::ALL.iter().map(|i| i.as_str()).collect();
    let snapshot = state
        .redis
        .stats_snapshot(&intents)
        .await
        .map_err(|e| AppError::StatsUnavailable(e.to_string()))?;

    let cache_hit_rate = if snapshot.queries_total > 0 {
        snapshot.cache_hits as f64 / snapshot.queries_total as f64
    } else {
        0.0
    };
    let avg_latency_ms = if snapshot.latency_count > 0 {
        snapshot.latency_sum_ms / snapshot.latency_count as f64
    } else {
        0.0
    };

    let queries_by_intent: BTreeMap<String, i64> = snapshot.by_intent.into_iter().collect();

    Ok(Json(StatsResponse {
        queries_total: snapshot.queries_total,
        cache_hit_rate,
        avg_latency_ms,
        queries_by_intent,
    }))
}
