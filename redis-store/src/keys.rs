//! Redis key layout shared by the cache and stats paths.

/// Total `/search` requests handled.
pub const QUERIES_TOTAL: &str = "stats:queries_total";
/// Requests answered from cache.
pub const CACHE_HITS: &str = "stats:cache_hits";
/// Sum of per-request latencies in milliseconds (double).
pub const LATENCY_SUM_MS: &str = "stats:latency_sum_ms";
/// Number of latency samples in the sum.
pub const LATENCY_COUNT: &str = "stats:latency_count";

/// Key for a cached response, addressed by request fingerprint.
pub fn cache(fingerprint: &str) -> String {
    format!("cache:{fingerprint}")
}

/// Per-intent query counter key.
pub fn by_intent(intent: &str) -> String {
    format!("stats:by_intent:{intent}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_shape() {
        assert_eq!(cache("abc123"), "cache:abc123");
    }

    #[test]
    fn intent_key_shape() {
        assert_eq!(by_intent("research"), "stats:by_intent:research");
    }
}
