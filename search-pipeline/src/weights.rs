//! Scoring constants: authority tiers, engine trust, blend weights.
//!
//! Everything tunable lives here so the tables are edited in one place.

/// Final-blend weights. Must sum to 1.0.
pub const W_SEMANTIC: f64 = 0.45;
pub const W_AUTHORITY: f64 = 0.20;
pub const W_RECENCY: f64 = 0.15;
pub const W_ENGINE_TRUST: f64 = 0.10;
pub const W_POSITION: f64 = 0.10;

/// Coarse-filter weights (selection only, never reported). Must sum to 1.0.
pub const COARSE_W_AUTHORITY: f64 = 0.35;
pub const COARSE_W_RECENCY: f64 = 0.20;
pub const COARSE_W_ENGINE_TRUST: f64 = 0.25;
pub const COARSE_W_POSITION: f64 = 0.20;

/// Recency score when no publication date is known.
pub const RECENCY_UNKNOWN: f64 = 0.30;
/// Recency half-life in days.
pub const RECENCY_HALF_LIFE_DAYS: f64 = 365.0;

const AUTHORITY_DEFAULT: f64 = 0.50;

const TIER_A: (&[&str], f64) = (
    &[
        "arxiv.org",
        "nature.com",
        "science.org",
        "nejm.org",
        "nih.gov",
        "ieee.org",
        "acm.org",
    ],
    1.00,
);

const TIER_B: (&[&str], f64) = (
    &[
        "github.com",
        "stackoverflow.com",
        "semanticscholar.org",
        "wikipedia.org",
        "nytimes.com",
        "bbc.co.uk",
        "reuters.com",
    ],
    0.85,
);

/// Curated allowlist of decent-but-not-authoritative domains.
const TIER_C: (&[&str], f64) = (
    &[
        "thelancet.com",
        "jamanetwork.com",
        "cell.com",
        "bmj.com",
        "paperswithcode.com",
        "huggingface.co",
        "openai.com",
        "anthropic.com",
        "deepmind.google",
        "springer.com",
        "towardsdatascience.com",
        "kdnuggets.com",
        "medium.com",
        "reddit.com",
    ],
    0.70,
);

/// Authority weight for `domain`. Matching is suffix-aware so subdomains
/// inherit their parent's tier (`pubmed.ncbi.nlm.nih.gov` → `nih.gov`).
pub fn authority(domain: &str) -> f64 {
    for (table, score) in [TIER_A, TIER_B, TIER_C] {
        if table.iter().any(|entry| domain_matches(domain, entry)) {
            return score;
        }
    }
    AUTHORITY_DEFAULT
}

fn domain_matches(domain: &str, entry: &str) -> bool {
    domain == entry || domain.ends_with(&format!(".{entry}"))
}

/// Trust weight for an engine name as reported by the backend.
pub fn engine_trust(engine: &str) -> f64 {
    match engine {
        "arxiv" | "pubmed" | "semantic_scholar" => 1.00,
        "github" | "stackoverflow" => 0.90,
        "bing_news" | "duckduckgo_news" => 0.80,
        "duckduckgo" | "bing" | "brave" => 0.75,
        _ => 0.60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_sets_sum_to_one() {
        let final_sum = W_SEMANTIC + W_AUTHORITY + W_RECENCY + W_ENGINE_TRUST + W_POSITION;
        assert!((final_sum - 1.0).abs() < 1e-12);
        let coarse_sum =
            COARSE_W_AUTHORITY + COARSE_W_RECENCY + COARSE_W_ENGINE_TRUST + COARSE_W_POSITION;
        assert!((coarse_sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn authority_tiers() {
        assert_eq!(authority("arxiv.org"), 1.00);
        assert_eq!(authority("github.com"), 0.85);
        assert_eq!(authority("medium.com"), 0.70);
        assert_eq!(authority("random-blog.net"), 0.50);
    }

    #[test]
    fn authority_matches_subdomains_by_suffix() {
        assert_eq!(authority("pubmed.ncbi.nlm.nih.gov"), 1.00);
        assert_eq!(authority("en.wikipedia.org"), 0.85);
        // No accidental substring matches.
        assert_eq!(authority("notarxiv.org"), 0.50);
    }

    #[test]
    fn engine_trust_table() {
        assert_eq!(engine_trust("arxiv"), 1.00);
        assert_eq!(engine_trust("stackoverflow"), 0.90);
        assert_eq!(engine_trust("duckduckgo_news"), 0.80);
        assert_eq!(engine_trust("brave"), 0.75);
        assert_eq!(engine_trust("mystery_engine"), 0.60);
    }
}
