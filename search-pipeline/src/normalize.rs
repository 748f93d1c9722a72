//! URL canonicalization.
//!
//! Rules, applied in order: lowercase scheme and host; drop default ports;
//! drop the fragment; drop tracking query params; sort the remaining params
//! by name; collapse duplicate slashes in the path; drop a single trailing
//! slash except at root. The result is idempotent.

use url::Url;
use url::form_urlencoded;

use crate::models::{CanonicalHit, RawHit};

/// Query parameters that are purely tracking/analytics noise. `utm_` is a
/// prefix match; the rest are exact.
const TRACKING_PARAMS: [&str; 7] = [
    "fbclid", "gclid", "mc_eid", "mc_cid", "ref", "ref_src", "ref_url",
];

fn is_tracking_param(name: &str) -> bool {
    name.starts_with("utm_") || TRACKING_PARAMS.contains(&name)
}

/// Attach `canonical_url` and `domain` to a parsed hit. Returns `None` only
/// if the URL fails to re-parse, which parse-time validation already rules
/// out.
pub fn canonicalize(hit: RawHit) -> Option<CanonicalHit> {
    let canonical = canonical_url(&hit.url)?;
    let host = Url::parse(&canonical).ok()?.host_str()?.to_string();

    Some(CanonicalHit {
        domain: registrable_domain(&host),
        canonical_url: canonical,
        title: hit.title,
        url: hit.url,
        snippet: hit.snippet,
        engines: vec![hit.engine.clone()],
        engine: hit.engine,
        published_date: hit.published_date,
        position_in_engine: hit.position_in_engine,
    })
}

/// Canonical form of `raw` per the rules above.
pub fn canonical_url(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw).ok()?;
    url.host_str()?;

    // The parser already lowercases scheme and domain hosts and drops
    // default ports from serialization.
    url.set_fragment(None);

    let kept: Vec<(String, String)> = {
        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(name, _)| !is_tracking_param(name))
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    };
    if kept.is_empty() {
        url.set_query(None);
    } else {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(kept)
            .finish();
        url.set_query(Some(&query));
    }

    let path = clean_path(url.path());
    url.set_path(&path);

    Some(url.to_string())
}

/// Collapse duplicate slashes and drop one trailing slash (root excepted).
fn clean_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for ch in path.chars() {
        if ch == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(ch);
    }
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Lowercased host with a single `www.` prefix stripped.
pub fn registrable_domain(host: &str) -> String {
    let host = host.to_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(raw: &str) -> String {
        canonical_url(raw).unwrap()
    }

    #[test]
    fn strips_tracking_params() {
        assert_eq!(
            canon("https://a.org/x?utm_source=t&utm_campaign=c&fbclid=f&id=7"),
            "https://a.org/x?id=7"
        );
        assert_eq!(canon("https://a.org/x?gclid=1&ref=hn"), "https://a.org/x");
    }

    #[test]
    fn sorts_surviving_params_by_name() {
        assert_eq!(canon("https://a.org/x?b=2&a=1&c=3"), "https://a.org/x?a=1&b=2&c=3");
    }

    #[test]
    fn lowercases_scheme_and_host() {
        assert_eq!(canon("HTTPS://Example.COM/Path"), "https://example.com/Path");
    }

    #[test]
    fn removes_default_ports_and_fragment() {
        assert_eq!(canon("http://a.org:80/x#section"), "http://a.org/x");
        assert_eq!(canon("https://a.org:443/x"), "https://a.org/x");
        assert_eq!(canon("https://a.org:8443/x"), "https://a.org:8443/x");
    }

    #[test]
    fn collapses_duplicate_slashes() {
        assert_eq!(canon("https://a.org//x///y"), "https://a.org/x/y");
    }

    #[test]
    fn trims_single_trailing_slash_except_root() {
        assert_eq!(canon("https://a.org/x/"), "https://a.org/x");
        assert_eq!(canon("https://a.org/"), "https://a.org/");
        assert_eq!(canon("https://a.org"), "https://a.org/");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "https://A.org//x/?utm_source=t&b=2&a=1#f",
            "http://a.org:80/",
            "https://a.org/x/y/?ref=rss",
        ];
        for raw in inputs {
            let once = canon(raw);
            assert_eq!(canon(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn registrable_domain_strips_www() {
        assert_eq!(registrable_domain("www.BBC.co.uk"), "bbc.co.uk");
        assert_eq!(registrable_domain("arxiv.org"), "arxiv.org");
        assert_eq!(registrable_domain("pubmed.ncbi.nlm.nih.gov"), "pubmed.ncbi.nlm.nih.gov");
    }

    #[test]
    fn canonicalize_fills_domain_and_keeps_original_url() {
        let hit = RawHit {
            title: "t".to_string(),
            url: "https://www.Example.com/a?utm_source=x".to_string(),
            snippet: String::new(),
            engine: "bing".to_string(),
            published_date: None,
            position_in_engine: 1,
        };
        let canonical = canonicalize(hit).unwrap();
        assert_eq!(canonical.domain, "example.com");
        assert_eq!(canonical.canonical_url, "https://www.example.com/a");
        assert_eq!(canonical.url, "https://www.Example.com/a?utm_source=x");
        assert_eq!(canonical.engines, vec!["bing".to_string()]);
    }
}
