//! ONNX cross-encoder backed by fastembed.

use std::sync::Mutex;

use fastembed::{RerankInitOptions, RerankerModel, TextRerank};
use tracing::info;

use crate::{CrossEncoder, errors::RerankError};

/// Process-wide cross-encoder handle. The ONNX session parallelizes across
/// CPU threads internally, so a single mutex-guarded session is the pool;
/// callers queue on the blocking pool.
pub struct OnnxCrossEncoder {
    model: Mutex<TextRerank>,
}

impl OnnxCrossEncoder {
    /// Load the reranker model. Blocking: call from a blocking context.
    pub fn load() -> Result<Self, RerankError> {
        info!(model = ?RerankerModel::BGERerankerBase, "loading cross-encoder");
        let model = TextRerank::try_new(RerankInitOptions::new(RerankerModel::BGERerankerBase))
            .map_err(|e| RerankError::Inference(e.to_string()))?;
        info!("cross-encoder loaded");
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl CrossEncoder for OnnxCrossEncoder {
    fn score_pairs(&self, query: &str, passages: &[String]) -> Result<Vec<f32>, RerankError> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| RerankError::Inference("model mutex poisoned".to_string()))?;
        let model = &mut *model;

        let documents: Vec<&str> = passages.iter().map(String::as_str).collect();
        let ranked = model
            .rerank(query, documents, false, None)
            .map_err(|e| RerankError::Inference(e.to_string()))?;

        // fastembed returns results sorted by score; restore input order.
        let mut logits = vec![0.0f32; passages.len()];
        for item in ranked {
            if let Some(slot) = logits.get_mut(item.index) {
                *slot = item.score;
            }
        }
        Ok(logits)
    }
}
