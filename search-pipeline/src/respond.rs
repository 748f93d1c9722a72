//! Response assembly, cache write, and stats recording.
//!
//! Everything here is best-effort: a failed cache write or counter bump is
//! logged and forgotten, and both run on detached tasks so a client
//! disconnect does not abort them.

use std::sync::Arc;
use std::time::Duration;

use redis_store::{RedisStore, keys};
use tracing::{debug, warn};

use crate::models::{ExpandedQuery, Intent, ScoredHit, SearchRequest, SearchResponse};

/// Build the public response for a completed (non-cached) pipeline run.
pub fn build_response(
    req: &SearchRequest,
    expanded: &ExpandedQuery,
    query_time_ms: f64,
    results: Vec<ScoredHit>,
) -> SearchResponse {
    SearchResponse {
        query: req.query.clone(),
        expanded_query: expanded.text.clone(),
        intent: expanded.intent,
        cache_hit: false,
        query_time_ms,
        results,
    }
}

/// Write the response to cache on a detached task. Stored entries always
/// carry `cache_hit=false`; the read path flips it.
pub fn store_cache(redis: Arc<RedisStore>, fingerprint: String, response: SearchResponse, ttl: Duration) {
    tokio::spawn(async move {
        let key = keys::cache(&fingerprint);
        match redis.set_json(&key, &response, ttl).await {
            Ok(()) => debug!(key, "response cached"),
            Err(e) => warn!(error = %e, "cache write failed; continuing without cache"),
        }
    });
}

/// Bump the stats counters for one handled request on a detached task.
pub fn record_stats(redis: Arc<RedisStore>, intent: Intent, latency_ms: f64, cache_hit: bool) {
    tokio::spawn(async move {
        let result = async {
            redis.incr(keys::QUERIES_TOTAL, 1).await?;
            redis.incr(&keys::by_intent(intent.as_str()), 1).await?;
            redis.incr_float(keys::LATENCY_SUM_MS, latency_ms).await?;
            redis.incr(keys::LATENCY_COUNT, 1).await?;
            if cache_hit {
                redis.incr(keys::CACHE_HITS, 1).await?;
            }
            Ok::<(), redis_store::StoreError>(())
        }
        .await;

        if let Err(e) = result {
            warn!(error = %e, "stats update failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_carries_request_and_expansion() {
        let req = SearchRequest::new("transformers", Some(5), None, 8).unwrap();
        let expanded = ExpandedQuery {
            intent: Intent::Research,
            text: "transformers attention".to_string(),
        };
        let resp = build_response(&req, &expanded, 12.5, Vec::new());
        assert_eq!(resp.query, "transformers");
        assert_eq!(resp.expanded_query, "transformers attention");
        assert_eq!(resp.intent, Intent::Research);
        assert!(!resp.cache_hit);
        assert_eq!(resp.query_time_ms, 12.5);
        assert!(resp.results.is_empty());
    }
}
