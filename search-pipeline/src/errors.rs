//! Fatal pipeline errors.
//!
//! Only three kinds can fail a request. Everything else (classifier, cache,
//! reranker trouble) is a degradation signal: logged, visible in `/health`,
//! never surfaced in the `/search` body.

use searx_client::SearxError;
use thiserror::Error;

/// Result alias for pipeline operations.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input validation failure, surfaced to the caller with field detail.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The meta-search backend failed; there is nothing to rank.
    #[error("search backend unavailable: {0}")]
    BackendUnavailable(#[from] SearxError),

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}
