//! Response DTOs for the health and stats endpoints.

use std::collections::BTreeMap;

use serde::Serialize;

/// Response from `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"` iff Redis and SearXNG are both reachable, else `"degraded"`.
    pub status: &'static str,
    pub redis: &'static str,
    pub searxng: &'static str,
    /// `loaded` or `unavailable`.
    pub cross_encoder: &'static str,
    pub uptime_seconds: f64,
}

/// Response from `GET /stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub queries_total: i64,
    pub cache_hit_rate: f64,
    pub avg_latency_ms: f64,
    pub queries_by_intent: BTreeMap<String, i64>,
}
