//! Stable request fingerprint for caching and coalescing.
//!
//! Key (stable across re-runs): SHA256("{normalized_query}\n{limit}\n{hint}")
//! where the normalized query is lowercased with whitespace collapsed.
//! Collisions are treated as impossible.

use sha2::{Digest, Sha256};

use crate::models::SearchRequest;

/// Compute the 64-char lowercase hex fingerprint for a request.
pub fn fingerprint(req: &SearchRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_query(&req.query));
    hasher.update(b"\n");
    hasher.update(req.limit.to_string());
    hasher.update(b"\n");
    hasher.update(req.domain_hint.as_deref().unwrap_or(""));
    format!("{:x}", hasher.finalize())
}

/// Lowercase and collapse runs of whitespace to single spaces.
fn normalize_query(q: &str) -> String {
    q.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(query: &str, limit: usize, hint: Option<&str>) -> SearchRequest {
        SearchRequest::new(query, Some(limit), hint.map(String::from), 8).unwrap()
    }

    #[test]
    fn deterministic() {
        assert_eq!(
            fingerprint(&req("hello world", 8, None)),
            fingerprint(&req("hello world", 8, None))
        );
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        assert_eq!(
            fingerprint(&req("Hello   World", 8, None)),
            fingerprint(&req("hello world", 8, None))
        );
    }

    #[test]
    fn limit_and_hint_are_part_of_the_key() {
        let base = fingerprint(&req("hello", 8, None));
        assert_ne!(base, fingerprint(&req("hello", 9, None)));
        assert_ne!(base, fingerprint(&req("hello", 8, Some("arxiv.org"))));
    }

    #[test]
    fn hex_format() {
        let fp = fingerprint(&req("test", 8, None));
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
