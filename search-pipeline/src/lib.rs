//! Multi-stage search ranking pipeline.
//!
//! Transforms a free-text query into a ranked result list: cache-keyed
//! request coalescing, intent-driven engine routing, URL normalization and
//! fuzzy deduplication, a metadata coarse filter, and a semantic
//! cross-encoder re-rank with a fixed linear blend. Any stage except the
//! backend fetch degrades gracefully instead of failing the request.

pub mod coarse;
pub mod dedup;
pub mod errors;
pub mod fetch;
pub mod fingerprint;
pub mod intel;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod rerank;
pub mod respond;
pub mod router;
pub mod weights;

pub use crate::errors::{PipelineError, PipelineResult};
pub use crate::models::{
    Intent, ScoreBreakdown, ScoredHit, SearchRequest, SearchResponse,
};
pub use crate::pipeline::{BACKEND_DEADLINE, PipelineConfig, SearchPipeline};
