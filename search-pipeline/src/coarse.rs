//! Coarse metadata scoring and pre-rerank pruning.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::CanonicalHit;
use crate::weights::{
    self, COARSE_W_AUTHORITY, COARSE_W_ENGINE_TRUST, COARSE_W_POSITION, COARSE_W_RECENCY,
    RECENCY_HALF_LIFE_DAYS, RECENCY_UNKNOWN,
};

/// Survivors handed to the semantic re-ranker.
pub const COARSE_KEEP: usize = 12;

/// A hit with its metadata sub-scores attached. The coarse score exists for
/// selection only and never reaches the response.
#[derive(Debug, Clone)]
pub struct MetaScoredHit {
    pub hit: CanonicalHit,
    pub authority: f64,
    pub recency: f64,
    pub engine_trust: f64,
    pub position: f64,
    pub coarse: f64,
}

/// Score all hits by metadata and keep the top [`COARSE_KEEP`]. Ties break
/// by earlier engine position, then lexicographic canonical URL.
pub fn coarse_filter(hits: Vec<CanonicalHit>, today: NaiveDate) -> Vec<MetaScoredHit> {
    let total = hits.len();
    let mut scored: Vec<MetaScoredHit> = hits
        .into_iter()
        .map(|hit| {
            let authority = weights::authority(&hit.domain);
            let recency = recency_score(hit.published_date.as_deref(), today);
            // Exact dedup may have merged engines; trust takes the best.
            let engine_trust = hit
                .engines
                .iter()
                .map(|e| weights::engine_trust(e))
                .fold(0.0, f64::max);
            let position = position_score(hit.position_in_engine);
            let coarse = COARSE_W_AUTHORITY * authority
                + COARSE_W_RECENCY * recency
                + COARSE_W_ENGINE_TRUST * engine_trust
                + COARSE_W_POSITION * position;
            MetaScoredHit {
                hit,
                authority,
                recency,
                engine_trust,
                position,
                coarse,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.coarse
            .total_cmp(&a.coarse)
            .then_with(|| a.hit.position_in_engine.cmp(&b.hit.position_in_engine))
            .then_with(|| a.hit.canonical_url.cmp(&b.hit.canonical_url))
    });
    scored.truncate(COARSE_KEEP);

    debug!(total, kept = scored.len(), "coarse filter complete");
    scored
}

/// Half-life decay over the publication age: `0.5 ^ (age_days / 365)`.
/// Unknown dates score [`RECENCY_UNKNOWN`]; future dates clamp to age 0.
pub(crate) fn recency_score(published: Option<&str>, today: NaiveDate) -> f64 {
    let Some(date) = published.and_then(parse_published) else {
        return RECENCY_UNKNOWN;
    };
    let age_days = (today - date).num_days().max(0) as f64;
    (0.5f64).powf(age_days / RECENCY_HALF_LIFE_DAYS).clamp(0.0, 1.0)
}

/// Logarithmic position dampening: `1 / (1 + ln(position))`, position ≥ 1.
pub(crate) fn position_score(position: usize) -> f64 {
    let pos = position.max(1) as f64;
    (1.0 / (1.0 + pos.ln())).clamp(0.0, 1.0)
}

/// Accepts `"YYYY-MM-DD"` and `"YYYY-MM"` (first of the month).
fn parse_published(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() == 7 {
        return NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok();
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn hit(canonical_url: &str, domain: &str, engine: &str, position: usize) -> CanonicalHit {
        CanonicalHit {
            title: "t".to_string(),
            url: canonical_url.to_string(),
            snippet: String::new(),
            engine: engine.to_string(),
            engines: vec![engine.to_string()],
            published_date: None,
            position_in_engine: position,
            domain: domain.to_string(),
            canonical_url: canonical_url.to_string(),
        }
    }

    #[test]
    fn recency_defaults_when_date_is_missing_or_garbled() {
        assert_eq!(recency_score(None, today()), RECENCY_UNKNOWN);
        assert_eq!(recency_score(Some("last tuesday"), today()), RECENCY_UNKNOWN);
    }

    #[test]
    fn recency_half_life() {
        assert_eq!(recency_score(Some("2025-06-15"), today()), 1.0);
        // One half-life back.
        let one_year = recency_score(Some("2024-06-15"), today());
        assert!((one_year - 0.5).abs() < 0.01);
        // Month-only format parses as the first of the month.
        assert!(recency_score(Some("2025-05"), today()) > 0.9);
    }

    #[test]
    fn future_dates_clamp_to_age_zero() {
        assert_eq!(recency_score(Some("2030-01-01"), today()), 1.0);
    }

    #[test]
    fn position_dampening() {
        assert_eq!(position_score(1), 1.0);
        assert!((position_score(3) - 0.4765).abs() < 0.001);
        assert!(position_score(10) < position_score(2));
        // Defensive floor for a zero position.
        assert_eq!(position_score(0), 1.0);
    }

    #[test]
    fn merged_engines_upgrade_trust() {
        let mut h = hit("https://a.org/x", "a.org", "duckduckgo", 1);
        h.engines.push("arxiv".to_string());
        let scored = coarse_filter(vec![h], today());
        assert_eq!(scored[0].engine_trust, 1.00);
    }

    #[test]
    fn keeps_top_twelve() {
        let hits: Vec<CanonicalHit> = (1..=20)
            .map(|i| hit(&format!("https://a.org/{i}"), "a.org", "bing", i))
            .collect();
        let scored = coarse_filter(hits, today());
        assert_eq!(scored.len(), COARSE_KEEP);
        // Same domain/engine/date, so earlier positions must win.
        assert_eq!(scored[0].hit.position_in_engine, 1);
        assert_eq!(scored.last().unwrap().hit.position_in_engine, COARSE_KEEP);
    }

    #[test]
    fn authoritative_domain_outranks_unknown_at_same_position() {
        let scored = coarse_filter(
            vec![
                hit("https://blog.example/x", "blog.example", "duckduckgo", 1),
                hit("https://arxiv.org/abs/1", "arxiv.org", "arxiv", 1),
            ],
            today(),
        );
        assert_eq!(scored[0].hit.domain, "arxiv.org");
    }

    #[test]
    fn exact_ties_fall_back_to_canonical_url_order() {
        let scored = coarse_filter(
            vec![
                hit("https://b.org/x", "b.org", "bing", 1),
                hit("https://a.org/x", "a.org", "bing", 1),
            ],
            today(),
        );
        assert_eq!(scored[0].hit.canonical_url, "https://a.org/x");
    }
}
