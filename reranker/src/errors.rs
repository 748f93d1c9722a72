//! Errors for cross-encoder loading and inference.

use thiserror::Error;

/// Result alias used across the crate.
pub type RerankResult<T> = std::result::Result<T, RerankError>;

#[derive(Debug, Error)]
pub enum RerankError {
    /// No model is loaded (disabled by config or failed at startup).
    #[error("cross-encoder unavailable")]
    Unavailable,

    /// Model loading or inference failed inside the ONNX runtime.
    #[error("inference error: {0}")]
    Inference(String),

    /// The blocking inference task panicked or was cancelled.
    #[error("inference task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
