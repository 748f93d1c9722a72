//! Backend fetch and raw-hit parsing.

use searx_client::{SearxClient, SearxHit};
use tracing::{debug, warn};
use url::Url;

use crate::errors::PipelineResult;
use crate::models::{EnginePlan, RawHit};

/// Issue the single backend call for this request and parse its results.
///
/// # Errors
/// Any backend failure is fatal ([`crate::errors::PipelineError::BackendUnavailable`]);
/// there is nothing to rank without results.
pub async fn fetch_hits(
    searx: &SearxClient,
    query: &str,
    plan: &EnginePlan,
) -> PipelineResult<Vec<RawHit>> {
    let engines: Vec<&str> = plan.engines.iter().map(|e| e.as_str()).collect();
    let categories: Vec<&str> = plan.categories.iter().map(|c| c.as_str()).collect();

    let raw = searx.search(query, &engines, &categories).await?;
    let hits = parse_hits(raw);
    debug!(count = hits.len(), "parsed backend hits");
    Ok(hits)
}

/// Convert raw backend results into validated [`RawHit`]s.
///
/// Hits missing a title, a parseable absolute http(s) URL, or an engine name
/// are dropped here; later stages assume both identity fields exist.
/// `position_in_engine` counts 1-based within each engine's subset, in
/// response order.
pub fn parse_hits(raw: Vec<SearxHit>) -> Vec<RawHit> {
    let mut per_engine: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut hits = Vec::with_capacity(raw.len());

    for item in raw {
        let title = item.title.as_deref().unwrap_or("").trim().to_string();
        let url = item.url.as_deref().unwrap_or("").trim().to_string();
        let engine = item.engine.as_deref().unwrap_or("").trim().to_string();

        if title.is_empty() || engine.is_empty() || !is_valid_http_url(&url) {
            warn!(%url, "dropping malformed backend hit");
            continue;
        }

        let position = per_engine.entry(engine.clone()).or_insert(0);
        *position += 1;

        hits.push(RawHit {
            title,
            url,
            snippet: item.content.unwrap_or_default(),
            engine,
            published_date: item.published_date.filter(|d| !d.trim().is_empty()),
            position_in_engine: *position,
        });
    }

    hits
}

/// Syntactically valid absolute http(s) URL with a host.
fn is_valid_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => {
            (url.scheme() == "http" || url.scheme() == "https") && url.host_str().is_some()
        }
        Err(_) => false,
    }
}
