//! Cross-encoder seam for semantic re-ranking.
//!
//! The model is a process-wide, read-only resource loaded at startup (or not
//! at all). Inference is CPU-bound, so [`RerankService`] moves every call to
//! the blocking pool and the request dispatcher is never starved by scoring.

pub mod errors;
pub mod onnx;

use std::sync::Arc;

use tracing::debug;

pub use crate::errors::{RerankError, RerankResult};
pub use crate::onnx::OnnxCrossEncoder;

/// A model that scores `(query, passage)` pairs jointly, returning one raw
/// logit per passage in input order. Implementations are blocking.
pub trait CrossEncoder: Send + Sync {
    fn score_pairs(&self, query: &str, passages: &[String]) -> RerankResult<Vec<f32>>;
}

/// Async wrapper around an optional [`CrossEncoder`].
pub struct RerankService {
    encoder: Option<Arc<dyn CrossEncoder>>,
}

impl RerankService {
    pub fn new(encoder: Arc<dyn CrossEncoder>) -> Self {
        Self {
            encoder: Some(encoder),
        }
    }

    /// A service with no model; every call fails with
    /// [`RerankError::Unavailable`] and the pipeline takes its degraded path.
    pub fn disabled() -> Self {
        Self { encoder: None }
    }

    /// Whether a model is loaded (reported as `loaded|unavailable` by `/health`).
    pub fn is_loaded(&self) -> bool {
        self.encoder.is_some()
    }

    /// Score all pairs on the blocking pool, returning raw logits in input
    /// order.
    pub async fn score_pairs(&self, query: String, passages: Vec<String>) -> RerankResult<Vec<f32>> {
        let encoder = self.encoder.clone().ok_or(RerankError::Unavailable)?;
        if passages.is_empty() {
            return Ok(Vec::new());
        }

        debug!(pairs = passages.len(), "scoring on blocking pool");
        tokio::task::spawn_blocking(move || encoder.score_pairs(&query, &passages)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scores each passage by shared-token count with the query.
    struct OverlapEncoder;

    impl CrossEncoder for OverlapEncoder {
        fn score_pairs(&self, query: &str, passages: &[String]) -> RerankResult<Vec<f32>> {
            let terms: Vec<&str> = query.split_whitespace().collect();
            Ok(passages
                .iter()
                .map(|p| terms.iter().filter(|t| p.contains(**t)).count() as f32)
                .collect())
        }
    }

    #[tokio::test]
    async fn disabled_service_reports_unavailable() {
        let svc = RerankService::disabled();
        assert!(!svc.is_loaded());
        let err = svc
            .score_pairs("q".to_string(), vec!["a".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, RerankError::Unavailable));
    }

    #[tokio::test]
    async fn scores_come_back_in_input_order() {
        let svc = RerankService::new(Arc::new(OverlapEncoder));
        assert!(svc.is_loaded());
        let logits = svc
            .score_pairs(
                "rust async".to_string(),
                vec![
                    "rust async runtime".to_string(),
                    "gardening tips".to_string(),
                    "rust book".to_string(),
                ],
            )
            .await
            .unwrap();
        assert_eq!(logits, vec![2.0, 0.0, 1.0]);
    }

    #[tokio::test]
    async fn empty_input_short_circuits() {
        let svc = RerankService::new(Arc::new(OverlapEncoder));
        let logits = svc.score_pairs("q".to_string(), Vec::new()).await.unwrap();
        assert!(logits.is_empty());
    }
}
