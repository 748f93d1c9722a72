//! Thin typed facade over Redis for response caching and stats counters.
//!
//! The store is an optimization, never a source of correctness: callers are
//! expected to treat every error here as a degradation signal. Connection
//! management is lazy so the service keeps running (and `/health` keeps
//! reporting) while Redis is down; once established, the underlying
//! `ConnectionManager` reconnects on its own.

pub mod errors;
pub mod keys;

use std::time::Duration;

use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::OnceCell;
use tracing::debug;

pub use crate::errors::{StoreError, StoreResult};

/// Aggregated stats counters, read in one pass for `/stats`.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub queries_total: i64,
    pub cache_hits: i64,
    pub latency_sum_ms: f64,
    pub latency_count: i64,
    /// Per-intent counters in the order the caller asked for them.
    pub by_intent: Vec<(String, i64)>,
}

/// Redis client wrapper with typed helpers.
pub struct RedisStore {
    client: redis::Client,
    manager: OnceCell<ConnectionManager>,
}

impl RedisStore {
    /// Create a store for `url`. No I/O happens here; the first command
    /// establishes the connection.
    pub fn new(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            manager: OnceCell::new(),
        })
    }

    /// Hand out a (cheaply cloned) managed connection, connecting on first use.
    /// A failed first connect leaves the cell empty so the next call retries.
    async fn conn(&self) -> StoreResult<ConnectionManager> {
        let manager = self
            .manager
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await?;
        Ok(manager.clone())
    }

    /// Return `Ok(())` if Redis answers PING.
    pub async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cache helpers
    // ------------------------------------------------------------------

    /// Fetch and deserialize a cached JSON value. `Ok(None)` on miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store a JSON value with a TTL (SETEX, last-writer-wins).
    pub async fn set_json<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> StoreResult<()> {
        let payload = serde_json::to_string(value)?;
        let mut conn = self.conn().await?;
        let _: () = conn.set_ex(key, payload, ttl.as_secs()).await?;
        debug!(key, ttl_secs = ttl.as_secs(), "cache entry stored");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stats helpers
    // ------------------------------------------------------------------

    /// Atomically increment an integer counter (INCRBY).
    pub async fn incr(&self, key: &str, by: i64) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        let _: i64 = conn.incr(key, by).await?;
        Ok(())
    }

    /// Atomically increment a float counter (INCRBYFLOAT).
    pub async fn incr_float(&self, key: &str, by: f64) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        let _: f64 = conn.incr(key, by).await?;
        Ok(())
    }

    /// Read all stats counters. `intents` enumerates the per-intent keys to
    /// read; the intent set is closed, so no SCAN is needed.
    pub async fn stats_snapshot(&self, intents: &[&str]) -> StoreResult<StatsSnapshot> {
        let mut conn = self.conn().await?;

        let queries_total: Option<i64> = conn.get(keys::QUERIES_TOTAL).await?;
        let cache_hits: Option<i64> = conn.get(keys::CACHE_HITS).await?;
        let latency_sum_ms: Option<f64> = conn.get(keys::LATENCY_SUM_MS).await?;
        let latency_count: Option<i64> = conn.get(keys::LATENCY_COUNT).await?;

        let mut by_intent = Vec::with_capacity(intents.len());
        for intent in intents {
            let count: Option<i64> = conn.get(keys::by_intent(intent)).await?;
            by_intent.push((intent.to_string(), count.unwrap_or(0)));
        }

        Ok(StatsSnapshot {
            queries_total: queries_total.unwrap_or(0),
            cache_hits: cache_hits.unwrap_or(0),
            latency_sum_ms: latency_sum_ms.unwrap_or(0.0),
            latency_count: latency_count.unwrap_or(0),
            by_intent,
        })
    }
}
