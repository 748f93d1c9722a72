use std::sync::Arc;

use api::{AppConfig, AppState};
use query_intel::{IntelClient, IntelConfig};
use redis_store::RedisStore;
use reranker::{OnnxCrossEncoder, RerankService};
use search_pipeline::{BACKEND_DEADLINE, PipelineConfig, SearchPipeline};
use searx_client::SearxClient;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file when one is present.
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::from_env()?);
    init_tracing(&config.environment, &config.log_level);

    info!(
        environment = %config.environment,
        port = config.port,
        "ai-search starting"
    );

    // Cache/stats store. Connection is lazy; a dead Redis only degrades.
    let redis = Arc::new(RedisStore::new(&config.redis_url)?);
    if let Err(e) = redis.ping().await {
        warn!(error = %e, "redis unreachable at startup; running without cache");
    }

    let searx = Arc::new(SearxClient::new(&config.searxng_url, BACKEND_DEADLINE)?);
    let intel = Arc::new(IntelClient::new(IntelConfig::from_env()?)?);

    // Load the cross-encoder once so the first request is not cold.
    let rerank = if config.enable_cross_encoder {
        match tokio::task::spawn_blocking(OnnxCrossEncoder::load).await? {
            Ok(model) => Arc::new(RerankService::new(Arc::new(model))),
            Err(e) => {
                warn!(error = %e, "cross-encoder load failed; running metadata-only");
                Arc::new(RerankService::disabled())
            }
        }
    } else {
        info!("cross-encoder disabled by config");
        Arc::new(RerankService::disabled())
    };

    let pipeline = Arc::new(SearchPipeline::new(
        redis.clone(),
        searx.clone(),
        intel,
        rerank.clone(),
        PipelineConfig::with_ttl_hours(config.cache_ttl_hours),
    ));

    let state = Arc::new(AppState::new(config, pipeline, redis, searx, rerank));

    info!("ai-search ready");
    api::start(state).await?;
    Ok(())
}

fn init_tracing(environment: &str, log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if environment == "production" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}
