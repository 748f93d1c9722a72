//! Semantic re-ranking and the final score blend.

use std::time::Duration;

use reranker::RerankService;
use tracing::warn;

use crate::coarse::MetaScoredHit;
use crate::models::{ScoreBreakdown, ScoredHit};
use crate::weights::{W_AUTHORITY, W_ENGINE_TRUST, W_POSITION, W_RECENCY, W_SEMANTIC};

/// Score the survivors against the original query and keep the top `limit`.
///
/// Cross-encoder failure of any kind (not loaded, inference error, deadline)
/// degrades rather than fails: semantic goes to 0 for every hit and the
/// metadata weights are renormalized to sum to 1.
pub async fn rerank(
    svc: &RerankService,
    original_query: &str,
    hits: Vec<MetaScoredHit>,
    limit: usize,
    deadline: Duration,
) -> Vec<ScoredHit> {
    if hits.is_empty() {
        return Vec::new();
    }

    let passages: Vec<String> = hits.iter().map(|h| passage(h)).collect();
    let outcome = tokio::time::timeout(
        deadline,
        svc.score_pairs(original_query.to_string(), passages),
    )
    .await;

    let semantic: Option<Vec<f64>> = match outcome {
        Ok(Ok(logits)) => Some(logits.into_iter().map(sigmoid).collect()),
        Ok(Err(e)) => {
            warn!(error = %e, "reranker degraded; falling back to metadata scores");
            None
        }
        Err(_) => {
            warn!(deadline_ms = deadline.as_millis(), "reranker deadline exceeded; falling back to metadata scores");
            None
        }
    };

    let mut scored: Vec<ScoredHit> = hits
        .into_iter()
        .enumerate()
        .map(|(i, meta)| {
            let (sem, final_score) = match &semantic {
                Some(scores) => {
                    let sem = scores[i];
                    (sem, blend(sem, meta.authority, meta.recency, meta.engine_trust, meta.position))
                }
                None => (
                    0.0,
                    blend_degraded(meta.authority, meta.recency, meta.engine_trust, meta.position),
                ),
            };
            ScoredHit {
                title: meta.hit.title,
                url: meta.hit.url,
                canonical_url: meta.hit.canonical_url,
                domain: meta.hit.domain,
                snippet: truncate_snippet(&meta.hit.snippet),
                engine: meta.hit.engine,
                published_date: meta.hit.published_date,
                final_score: final_score.clamp(0.0, 1.0),
                score_breakdown: ScoreBreakdown {
                    semantic: sem,
                    authority: meta.authority,
                    recency: meta.recency,
                    engine_trust: meta.engine_trust,
                    position: meta.position,
                },
            }
        })
        .collect();

    // Position score decreases with rank, so descending order on it means
    // earlier hits first.
    scored.sort_by(|a, b| {
        b.final_score
            .total_cmp(&a.final_score)
            .then_with(|| b.score_breakdown.semantic.total_cmp(&a.score_breakdown.semantic))
            .then_with(|| b.score_breakdown.position.total_cmp(&a.score_breakdown.position))
    });
    scored.truncate(limit);
    scored
}

/// `(query, title + " " + snippet)` input text; title alone when the
/// snippet is empty.
fn passage(hit: &MetaScoredHit) -> String {
    let title = hit.hit.title.trim();
    let snippet = hit.hit.snippet.trim();
    if snippet.is_empty() {
        title.to_string()
    } else {
        format!("{title} {snippet}")
    }
}

fn truncate_snippet(snippet: &str) -> String {
    snippet.chars().take(500).collect()
}

/// Map a raw cross-encoder logit to `[0, 1]`.
pub(crate) fn sigmoid(logit: f32) -> f64 {
    1.0 / (1.0 + (-f64::from(logit)).exp())
}

/// The fixed linear blend reported to callers.
pub(crate) fn blend(semantic: f64, authority: f64, recency: f64, trust: f64, position: f64) -> f64 {
    W_SEMANTIC * semantic
        + W_AUTHORITY * authority
        + W_RECENCY * recency
        + W_ENGINE_TRUST * trust
        + W_POSITION * position
}

/// Metadata-only blend with weights renormalized to sum to 1
/// (each non-semantic weight divided by `1 - W_SEMANTIC`).
pub(crate) fn blend_degraded(authority: f64, recency: f64, trust: f64, position: f64) -> f64 {
    let rest = 1.0 - W_SEMANTIC;
    (W_AUTHORITY * authority + W_RECENCY * recency + W_ENGINE_TRUST * trust + W_POSITION * position)
        / rest
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reranker::{CrossEncoder, RerankResult};

    use super::*;
    use crate::models::CanonicalHit;

    struct FixedEncoder(Vec<f32>);

    impl CrossEncoder for FixedEncoder {
        fn score_pairs(&self, _query: &str, passages: &[String]) -> RerankResult<Vec<f32>> {
            Ok(self.0.iter().copied().take(passages.len()).collect())
        }
    }

    fn meta(url: &str, position: usize) -> MetaScoredHit {
        MetaScoredHit {
            hit: CanonicalHit {
                title: format!("title {url}"),
                url: url.to_string(),
                snippet: "snippet".to_string(),
                engine: "bing".to_string(),
                engines: vec!["bing".to_string()],
                published_date: None,
                position_in_engine: position,
                domain: "example.com".to_string(),
                canonical_url: url.to_string(),
            },
            authority: 0.50,
            recency: 0.30,
            engine_trust: 0.75,
            position: crate::coarse::position_score(position),
            coarse: 0.0,
        }
    }

    #[test]
    fn sigmoid_maps_logits_into_unit_interval() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(10.0) > 0.999);
        assert!(sigmoid(-10.0) < 0.001);
    }

    #[test]
    fn blend_matches_breakdown_weights() {
        let score = blend(1.0, 1.0, 1.0, 1.0, 1.0);
        assert!((score - 1.0).abs() < 1e-12);
        let score = blend(0.8, 0.5, 0.3, 0.75, 1.0);
        let expected = 0.45 * 0.8 + 0.20 * 0.5 + 0.15 * 0.3 + 0.10 * 0.75 + 0.10 * 1.0;
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn degraded_blend_renormalizes_to_unit_range() {
        // All metadata at 1.0 must still reach 1.0 without semantic.
        assert!((blend_degraded(1.0, 1.0, 1.0, 1.0) - 1.0).abs() < 1e-12);
        let expected = (0.20 * 0.5 + 0.15 * 0.3 + 0.10 * 0.75 + 0.10 * 1.0) / 0.55;
        assert!((blend_degraded(0.5, 0.3, 0.75, 1.0) - expected).abs() < 1e-12);
    }

    #[tokio::test]
    async fn semantic_scores_drive_the_order() {
        let svc = RerankService::new(Arc::new(FixedEncoder(vec![-2.0, 3.0, 0.0])));
        let hits = vec![meta("https://a.org/1", 1), meta("https://a.org/2", 2), meta("https://a.org/3", 3)];
        let ranked = rerank(&svc, "q", hits, 8, Duration::from_secs(5)).await;
        assert_eq!(ranked[0].url, "https://a.org/2");
        for hit in &ranked {
            let b = &hit.score_breakdown;
            let expected = blend(b.semantic, b.authority, b.recency, b.engine_trust, b.position);
            assert!((hit.final_score - expected).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn limit_is_enforced() {
        let svc = RerankService::new(Arc::new(FixedEncoder(vec![0.0; 12])));
        let hits: Vec<MetaScoredHit> =
            (1..=12).map(|i| meta(&format!("https://a.org/{i}"), i)).collect();
        let ranked = rerank(&svc, "q", hits, 5, Duration::from_secs(5)).await;
        assert_eq!(ranked.len(), 5);
    }

    #[tokio::test]
    async fn unavailable_model_degrades_to_metadata_ranking() {
        let svc = RerankService::disabled();
        let hits = vec![meta("https://a.org/1", 1), meta("https://a.org/2", 2)];
        let ranked = rerank(&svc, "q", hits, 8, Duration::from_secs(5)).await;
        assert_eq!(ranked.len(), 2);
        for hit in &ranked {
            assert_eq!(hit.score_breakdown.semantic, 0.0);
            let b = &hit.score_breakdown;
            let expected = blend_degraded(b.authority, b.recency, b.engine_trust, b.position);
            assert!((hit.final_score - expected).abs() < 1e-6);
        }
        // Earlier position wins once semantic is flat.
        assert_eq!(ranked[0].url, "https://a.org/1");
    }

    #[tokio::test]
    async fn flat_semantic_prefers_earlier_position() {
        // Same logit for both, so ordering falls to the metadata side.
        let svc = RerankService::new(Arc::new(FixedEncoder(vec![1.0, 1.0])));
        let hits = vec![meta("https://a.org/2", 2), meta("https://a.org/1", 1)];
        let ranked = rerank(&svc, "q", hits, 8, Duration::from_secs(5)).await;
        assert_eq!(ranked[0].url, "https://a.org/1");
    }

    #[tokio::test]
    async fn long_snippets_are_truncated() {
        let svc = RerankService::new(Arc::new(FixedEncoder(vec![0.0])));
        let mut m = meta("https://a.org/1", 1);
        m.hit.snippet = "x".repeat(2000);
        let ranked = rerank(&svc, "q", vec![m], 8, Duration::from_secs(5)).await;
        assert_eq!(ranked[0].snippet.chars().count(), 500);
    }
}
