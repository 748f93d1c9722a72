//! Minimal HTTP client for a locally running SearXNG instance.
//!
//! One call per pipeline run: `GET {base}/search?q=..&engines=..&categories=..
//! &format=json`. No retries: the backend is local, and silent retries hide
//! outages. A hard failure here is the only fatal error in the pipeline.

pub mod errors;

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

pub use crate::errors::SearxError;

/// Ping requests get a short deadline of their own; they only answer `/health`.
const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// A single raw result as SearXNG reports it. Unknown fields are ignored;
/// required fields are validated downstream, so everything is optional here.
#[derive(Debug, Clone, Deserialize)]
pub struct SearxHit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// SearXNG calls the snippet `content`.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default, rename = "publishedDate")]
    pub published_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearxResults {
    #[serde(default)]
    results: Vec<SearxHit>,
}

/// Reusable client with a preconfigured deadline.
pub struct SearxClient {
    http: reqwest::Client,
    base: String,
}

impl SearxClient {
    /// Build a client for `base_url` with `timeout` applied to search calls.
    ///
    /// # Errors
    /// [`SearxError::InvalidEndpoint`] if the URL is empty or not http(s).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SearxError> {
        let endpoint = base_url.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(SearxError::InvalidEndpoint(base_url.to_string()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Lightweight `GET /` to verify the instance is reachable.
    pub async fn ping(&self) -> Result<(), SearxError> {
        let resp = self
            .http
            .get(format!("{}/", self.base))
            .timeout(PING_TIMEOUT)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(SearxError::HttpStatus {
                status: resp.status(),
                snippet: String::new(),
            });
        }
        Ok(())
    }

    /// Fetch raw results for `query` restricted to the given engines and
    /// categories.
    ///
    /// # Errors
    /// Any transport error, non-2xx status, or undecodable body; the caller
    /// treats all of them as a fatal backend failure.
    pub async fn search(
        &self,
        query: &str,
        engines: &[&str],
        categories: &[&str],
    ) -> Result<Vec<SearxHit>, SearxError> {
        let url = format!("{}/search", self.base);
        debug!(query, ?engines, ?categories, "GET {url}");

        let engine_list = engines.join(",");
        let category_list = categories.join(",");
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("engines", engine_list.as_str()),
                ("categories", category_list.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let snippet: String = resp.text().await.unwrap_or_default().chars().take(240).collect();
            return Err(SearxError::HttpStatus { status, snippet });
        }

        let body: SearxResults = resp
            .json()
            .await
            .map_err(|e| SearxError::Decode(e.to_string()))?;

        debug!(count = body.results.len(), "results received");
        Ok(body.results)
    }
}
