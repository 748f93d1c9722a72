use std::{env, sync::Arc, time::Instant};

use redis_store::RedisStore;
use reranker::RerankService;
use search_pipeline::SearchPipeline;
use searx_client::SearxClient;
use thiserror::Error;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Auth for the classifier; the only required option.
    pub anthropic_api_key: String,
    /// Cache/stats store location.
    pub redis_url: String,
    /// Meta-search backend base URL.
    pub searxng_url: String,
    /// TTL for cached responses, in hours.
    pub cache_ttl_hours: u64,
    /// Default `limit` when the caller omits it.
    pub max_results: usize,
    /// HTTP listen port.
    pub port: u16,
    /// Log verbosity.
    pub log_level: String,
    /// `development` → human logs; `production` → JSON logs.
    pub environment: String,
    /// Load the ONNX cross-encoder at startup.
    pub enable_cross_encoder: bool,
}

/// Errors that may occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable is missing or empty.
    #[error("missing required environment variable: {name}")]
    MissingVar { name: &'static str },
    /// Variable is present but contains an invalid value.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

impl AppConfig {
    /// Load configuration from environment variables. Only the API key is
    /// strict; everything else has a sensible default.
    pub fn from_env() -> Result<Self, ConfigError> {
        fn must_var(name: &'static str) -> Result<String, ConfigError> {
            let v = env::var(name).map_err(|_| ConfigError::MissingVar { name })?;
            if v.trim().is_empty() {
                return Err(ConfigError::MissingVar { name });
            }
            Ok(v)
        }

        fn var_or(name: &str, default: &str) -> String {
            env::var(name).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string())
        }

        fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
            match env::var(name) {
                Ok(v) if !v.trim().is_empty() => {
                    v.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                        name,
                        reason: format!("could not parse {v:?}"),
                    })
                }
                _ => Ok(default),
            }
        }

        let anthropic_api_key = must_var("ANTHROPIC_API_KEY")?;
        let redis_url = var_or("REDIS_URL", "redis://127.0.0.1:6379/0");
        let searxng_url = var_or("SEARXNG_URL", "http://127.0.0.1:8888");

        if !(searxng_url.starts_with("http://") || searxng_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                name: "SEARXNG_URL",
                reason: "expected http(s) URL".into(),
            });
        }

        Ok(Self {
            anthropic_api_key,
            redis_url,
            searxng_url,
            cache_ttl_hours: parse_var("CACHE_TTL_HOURS", 24)?,
            max_results: parse_var("MAX_RESULTS", 8)?,
            port: parse_var("PORT", 7777)?,
            log_level: var_or("LOG_LEVEL", "info"),
            environment: var_or("ENVIRONMENT", "development"),
            enable_cross_encoder: parse_var("ENABLE_CROSS_ENCODER", true)?,
        })
    }
}

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Immutable configuration.
    pub config: Arc<AppConfig>,
    /// The ranking pipeline.
    pub pipeline: Arc<SearchPipeline>,
    /// Store handle for `/health` and `/stats`.
    pub redis: Arc<RedisStore>,
    /// Backend handle for `/health`.
    pub searx: Arc<SearxClient>,
    /// Reranker handle for `/health`.
    pub rerank: Arc<RerankService>,
    /// Startup instant for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        pipeline: Arc<SearchPipeline>,
        redis: Arc<RedisStore>,
        searx: Arc<SearxClient>,
        rerank: Arc<RerankService>,
    ) -> Self {
        Self {
            config,
            pipeline,
            redis,
            searx,
            rerank,
            started_at: Instant::now(),
        }
    }
}
