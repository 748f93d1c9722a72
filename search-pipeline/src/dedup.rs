//! Exact and near-duplicate removal.
//!
//! Exact: same `canonical_url` keeps the earliest hit and merges engine
//! names into it. Near: token-LCS title similarity at or above the threshold
//! drops the later hit. No count cap here; trimming belongs to the coarse
//! scorer.

use std::collections::HashMap;

use tracing::debug;

use crate::models::CanonicalHit;

/// Two surviving hits whose normalized titles are at least this similar are
/// considered the same story.
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Remove exact URL duplicates, then near-duplicate titles. Input order is
/// preserved for survivors.
pub fn dedup(hits: Vec<CanonicalHit>) -> Vec<CanonicalHit> {
    let before = hits.len();

    // Pass 1: exact canonical-URL dedup with engine merge.
    let mut by_url: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<CanonicalHit> = Vec::with_capacity(hits.len());
    for hit in hits {
        match by_url.get(&hit.canonical_url) {
            Some(&idx) => {
                let kept = &mut unique[idx];
                if !kept.engines.contains(&hit.engine) {
                    kept.engines.push(hit.engine);
                }
            }
            None => {
                by_url.insert(hit.canonical_url.clone(), unique.len());
                unique.push(hit);
            }
        }
    }

    // Pass 2: near-duplicate titles against already-accepted hits.
    let mut kept: Vec<CanonicalHit> = Vec::with_capacity(unique.len());
    let mut kept_tokens: Vec<Vec<String>> = Vec::with_capacity(unique.len());
    for hit in unique {
        let tokens = normalized_title_tokens(&hit.title);
        let is_dup = kept_tokens
            .iter()
            .any(|prev| title_similarity(prev, &tokens) >= TITLE_SIMILARITY_THRESHOLD);
        if is_dup {
            continue;
        }
        kept_tokens.push(tokens);
        kept.push(hit);
    }

    debug!(before, after = kept.len(), "dedup complete");
    kept
}

/// Lowercase, strip punctuation, collapse whitespace, split into tokens.
fn normalized_title_tokens(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Ratio of token-LCS length to the longer token sequence. Empty-vs-empty
/// counts as identical.
pub(crate) fn title_similarity(a: &[String], b: &[String]) -> f64 {
    let longer = a.len().max(b.len());
    if longer == 0 {
        return 1.0;
    }
    lcs_len(a, b) as f64 / longer as f64
}

/// Longest common subsequence over tokens, two-row DP.
fn lcs_len(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ai in a {
        for (j, bj) in b.iter().enumerate() {
            curr[j + 1] = if ai == bj {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
