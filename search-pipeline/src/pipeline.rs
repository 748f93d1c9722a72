//! Pipeline orchestrator: stage sequencing, cache fast path, single-flight
//! coalescing.
//!
//! Control flow per request: fingerprint → cache (hit → done) → classify →
//! route → fetch → normalize/dedup → coarse score → semantic re-rank →
//! respond. Stages are strictly sequential within one request; only the
//! backend fetch can fail the request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use query_intel::IntelClient;
use redis_store::{RedisStore, keys};
use reranker::RerankService;
use searx_client::SearxClient;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::errors::PipelineResult;
use crate::models::{SearchRequest, SearchResponse};
use crate::{coarse, dedup, fetch, fingerprint, intel, normalize, rerank, respond, router};

/// Backend fetch deadline, applied as the search client's timeout.
pub const BACKEND_DEADLINE: Duration = Duration::from_secs(8);

/// Stage deadlines and cache TTL. The total request budget stays ≤ 15 s.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub cache_ttl: Duration,
    pub cache_deadline: Duration,
    pub classifier_deadline: Duration,
    pub rerank_deadline: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(24 * 3600),
            cache_deadline: Duration::from_millis(250),
            classifier_deadline: Duration::from_secs(3),
            rerank_deadline: Duration::from_secs(5),
        }
    }
}

impl PipelineConfig {
    pub fn with_ttl_hours(hours: u64) -> Self {
        Self {
            cache_ttl: Duration::from_secs(hours * 3600),
            ..Self::default()
        }
    }
}

/// Process-wide pipeline. Shared mutable state is limited to the
/// single-flight map; everything else is read-only after construction.
pub struct SearchPipeline {
    redis: Arc<RedisStore>,
    searx: Arc<SearxClient>,
    intel: Arc<IntelClient>,
    rerank: Arc<RerankService>,
    cfg: PipelineConfig,
    inflight: Mutex<HashMap<String, Arc<OnceCell<SearchResponse>>>>,
}

impl SearchPipeline {
    pub fn new(
        redis: Arc<RedisStore>,
        searx: Arc<SearxClient>,
        intel: Arc<IntelClient>,
        rerank: Arc<RerankService>,
        cfg: PipelineConfig,
    ) -> Self {
        Self {
            redis,
            searx,
            intel,
            rerank,
            cfg,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Run the full pipeline for a validated request.
    ///
    /// Every handled request (cache hit, coalesced follower, or fresh run)
    /// counts in the stats; only cache hits count as hits.
    pub async fn run(&self, req: SearchRequest) -> PipelineResult<SearchResponse> {
        let started = Instant::now();
        let fp = fingerprint::fingerprint(&req);

        // Cache lookup. Hits skip every downstream stage.
        if let Some(mut cached) = self.cache_lookup(&fp).await {
            cached.cache_hit = true;
            cached.query_time_ms = elapsed_ms(started);
            let fp_short = &fp[..8];
            info!(fingerprint = fp_short, latency_ms = cached.query_time_ms, "cache hit");
            respond::record_stats(self.redis.clone(), cached.intent, cached.query_time_ms, true);
            return Ok(cached);
        }

        // Coalesce concurrent identical requests onto one execution. If the
        // leader is cancelled mid-flight, a waiter re-runs the init closure.
        let cell = {
            let mut map = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(fp.clone()).or_default().clone()
        };
        let result = cell
            .get_or_try_init(|| self.execute(&req, &fp))
            .await
            .cloned();
        {
            let mut map = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
            map.remove(&fp);
        }

        let mut response = result?;
        response.query_time_ms = elapsed_ms(started);
        respond::record_stats(self.redis.clone(), response.intent, response.query_time_ms, false);
        Ok(response)
    }

    /// The cache-miss path: every stage after the cache lookup.
    async fn execute(&self, req: &SearchRequest, fp: &str) -> PipelineResult<SearchResponse> {
        let started = Instant::now();
        debug!(query = %req.query, limit = req.limit, "pipeline start");

        // Intent classification (degrades internally).
        let expanded = intel::classify(&self.intel, &req.query, self.cfg.classifier_deadline).await;

        // Engine routing.
        let plan = router::route(expanded.intent);

        // Backend fetch; the only fatal stage.
        let raw = fetch::fetch_hits(&self.searx, &expanded.text, &plan).await?;

        // Canonicalize and dedup.
        let canonical: Vec<_> = raw.into_iter().filter_map(normalize::canonicalize).collect();
        let unique = dedup::dedup(canonical);

        // Metadata coarse filter.
        let survivors = coarse::coarse_filter(unique, Utc::now().date_naive());

        // Semantic re-rank against the original query.
        let ranked = rerank::rerank(
            &self.rerank,
            &req.query,
            survivors,
            req.limit,
            self.cfg.rerank_deadline,
        )
        .await;

        // Assemble, cache, done. Stats are recorded per request in run().
        let response = respond::build_response(req, &expanded, elapsed_ms(started), ranked);
        respond::store_cache(self.redis.clone(), fp.to_string(), response.clone(), self.cfg.cache_ttl);

        info!(
            intent = expanded.intent.as_str(),
            results = response.results.len(),
            latency_ms = response.query_time_ms,
            "pipeline complete"
        );
        Ok(response)
    }

    /// Bounded cache read. Any error (I/O, deserialization, deadline) is a
    /// MISS; the cache is never a source of correctness.
    async fn cache_lookup(&self, fp: &str) -> Option<SearchResponse> {
        let key = keys::cache(fp);
        match tokio::time::timeout(self.cfg.cache_deadline, self.redis.get_json(&key)).await {
            Ok(Ok(hit)) => hit,
            Ok(Err(e)) => {
                warn!(error = %e, "cache degraded; treating as miss");
                None
            }
            Err(_) => {
                warn!(deadline_ms = self.cfg.cache_deadline.as_millis(), "cache read deadline exceeded; treating as miss");
                None
            }
        }
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
