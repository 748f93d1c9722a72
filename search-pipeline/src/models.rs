//! Data model for the ranking pipeline and the public `/search` response.

use serde::{Deserialize, Serialize};

use crate::errors::{PipelineError, PipelineResult};

/// Maximum query length after trimming.
pub const QUERY_MAX_LEN: usize = 512;
/// Result-count ceiling; `limit` is clamped into `1..=LIMIT_MAX`.
pub const LIMIT_MAX: usize = 20;

/// A validated search request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Trimmed, non-empty query (1..=512 chars).
    pub query: String,
    /// Clamped to `1..=20`.
    pub limit: usize,
    /// Accepted and fingerprinted, otherwise ignored.
    pub domain_hint: Option<String>,
}

impl SearchRequest {
    /// Validate raw ingress values. The query is strict (empty or oversized
    /// is a caller error); `limit` is clamped, never rejected.
    pub fn new(
        query: &str,
        limit: Option<usize>,
        domain_hint: Option<String>,
        default_limit: usize,
    ) -> PipelineResult<Self> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PipelineError::InvalidRequest(
                "query must not be empty".to_string(),
            ));
        }
        if query.chars().count() > QUERY_MAX_LEN {
            return Err(PipelineError::InvalidRequest(format!(
                "query exceeds {QUERY_MAX_LEN} characters"
            )));
        }

        let limit = limit.unwrap_or(default_limit).clamp(1, LIMIT_MAX);

        Ok(Self {
            query: query.to_string(),
            limit,
            domain_hint: domain_hint.filter(|h| !h.trim().is_empty()),
        })
    }
}

/// Coarse topical label driving engine selection. Closed set; anything the
/// classifier invents maps to [`Intent::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Research,
    Biomedical,
    Code,
    News,
    General,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Research,
        Intent::Biomedical,
        Intent::Code,
        Intent::News,
        Intent::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Research => "research",
            Intent::Biomedical => "biomedical",
            Intent::Code => "code",
            Intent::News => "news",
            Intent::General => "general",
        }
    }

    /// Case-insensitive parse; unknown labels fall back to `General`.
    pub fn parse_lenient(s: &str) -> Intent {
        match s.trim().to_ascii_lowercase().as_str() {
            "research" => Intent::Research,
            "biomedical" => Intent::Biomedical,
            "code" => Intent::Code,
            "news" => Intent::News,
            _ => Intent::General,
        }
    }
}

/// Classifier output after validation.
#[derive(Debug, Clone)]
pub struct ExpandedQuery {
    pub intent: Intent,
    /// Never empty; falls back to the original query.
    pub text: String,
}

/// Upstream engines routed through the meta-searcher. Extending this set is
/// a recompile, not runtime config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Arxiv,
    SemanticScholar,
    Pubmed,
    Github,
    Stackoverflow,
    BingNews,
    DuckduckgoNews,
    Duckduckgo,
    Bing,
    Brave,
}

impl Engine {
    pub fn as_str(self) -> &'static str {
        match self {
            Engine::Arxiv => "arxiv",
            Engine::SemanticScholar => "semantic_scholar",
            Engine::Pubmed => "pubmed",
            Engine::Github => "github",
            Engine::Stackoverflow => "stackoverflow",
            Engine::BingNews => "bing_news",
            Engine::DuckduckgoNews => "duckduckgo_news",
            Engine::Duckduckgo => "duckduckgo",
            Engine::Bing => "bing",
            Engine::Brave => "brave",
        }
    }
}

/// SearXNG result categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Science,
    It,
    News,
    General,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Science => "science",
            Category::It => "it",
            Category::News => "news",
            Category::General => "general",
        }
    }
}

/// Engine/category set for one backend call. Both sets are non-empty.
#[derive(Debug, Clone)]
pub struct EnginePlan {
    pub engines: Vec<Engine>,
    pub categories: Vec<Category>,
}

/// One backend hit that survived parse-time validation: absolute http(s)
/// URL, non-empty title.
#[derive(Debug, Clone)]
pub struct RawHit {
    pub title: String,
    pub url: String,
    /// May be empty.
    pub snippet: String,
    pub engine: String,
    /// `"YYYY-MM"` or `"YYYY-MM-DD"`, as reported.
    pub published_date: Option<String>,
    /// 1-based rank within this hit's engine subset.
    pub position_in_engine: usize,
}

/// A hit after URL canonicalization, carrying dedup identity.
#[derive(Debug, Clone)]
pub struct CanonicalHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Engine of the earliest occurrence; drives position scoring.
    pub engine: String,
    /// All engines merged into this hit by exact dedup (earliest first);
    /// engine trust takes the max across the set.
    pub engines: Vec<String>,
    pub published_date: Option<String>,
    pub position_in_engine: usize,
    /// Lowercased host with any `www.` prefix stripped.
    pub domain: String,
    pub canonical_url: String,
}

/// Per-result score components, each in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub semantic: f64,
    pub authority: f64,
    pub recency: f64,
    pub engine_trust: f64,
    pub position: f64,
}

/// A ranked result as returned to the caller. Scores are serialized at full
/// precision so `final_score` stays consistent with its breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredHit {
    pub title: String,
    pub url: String,
    pub canonical_url: String,
    pub domain: String,
    pub snippet: String,
    pub engine: String,
    pub published_date: Option<String>,
    pub final_score: f64,
    pub score_breakdown: ScoreBreakdown,
}

/// Top-level response from `GET /search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub expanded_query: String,
    pub intent: Intent,
    pub cache_hit: bool,
    pub query_time_ms: f64,
    pub results: Vec<ScoredHit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_trims_and_accepts_boundary_lengths() {
        let req = SearchRequest::new("  rust  ", None, None, 8).unwrap();
        assert_eq!(req.query, "rust");
        assert_eq!(req.limit, 8);

        assert!(SearchRequest::new("a", None, None, 8).is_ok());
        let max = "q".repeat(QUERY_MAX_LEN);
        assert!(SearchRequest::new(&max, None, None, 8).is_ok());
    }

    #[test]
    fn request_rejects_empty_and_oversized_queries() {
        assert!(matches!(
            SearchRequest::new("   ", None, None, 8),
            Err(PipelineError::InvalidRequest(_))
        ));
        let too_long = "q".repeat(QUERY_MAX_LEN + 1);
        assert!(matches!(
            SearchRequest::new(&too_long, None, None, 8),
            Err(PipelineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn limit_is_clamped_not_rejected() {
        assert_eq!(SearchRequest::new("q", Some(0), None, 8).unwrap().limit, 1);
        assert_eq!(SearchRequest::new("q", Some(99), None, 8).unwrap().limit, 20);
        assert_eq!(SearchRequest::new("q", Some(5), None, 8).unwrap().limit, 5);
    }

    #[test]
    fn blank_domain_hint_is_dropped() {
        let req = SearchRequest::new("q", None, Some("  ".to_string()), 8).unwrap();
        assert!(req.domain_hint.is_none());
    }

    #[test]
    fn intent_parses_leniently() {
        assert_eq!(Intent::parse_lenient("Research"), Intent::Research);
        assert_eq!(Intent::parse_lenient(" NEWS "), Intent::News);
        assert_eq!(Intent::parse_lenient("xyz"), Intent::General);
        assert_eq!(Intent::parse_lenient(""), Intent::General);
    }

    #[test]
    fn intent_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Intent::Biomedical).unwrap(), "\"biomedical\"");
        let parsed: Intent = serde_json::from_str("\"code\"").unwrap();
        assert_eq!(parsed, Intent::Code);
    }
}
