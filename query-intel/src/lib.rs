//! Claude Haiku client for query intelligence.
//!
//! One non-streaming `POST /v1/messages` per query, demanding a strict JSON
//! object `{intent, expanded_query}`. The client is strict: any transport
//! error, bad status, or unusable body is surfaced as an [`IntelError`] and
//! the caller decides how to degrade.

pub mod errors;
pub mod sanitize;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use crate::errors::{IntelError, IntelResult, must_env};
use crate::sanitize::extract_json_object;

const ANTHROPIC_VERSION: &str = "2023-06-01";

const SYSTEM_PROMPT: &str = "You are a search query optimizer. Given a user query, \
return ONLY valid JSON with these fields:\n\
- intent: one of [research, biomedical, code, news, general]\n\
- expanded_query: improved version with synonyms, related terms, year range if relevant";

/// Classifier configuration, loaded from the environment.
#[derive(Clone, Debug)]
pub struct IntelConfig {
    /// API key (`ANTHROPIC_API_KEY`, required).
    pub api_key: String,
    /// Base URL (`ANTHROPIC_BASE_URL`), overridable for tests.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Total call deadline; no retries happen within it.
    pub timeout: Duration,
}

impl IntelConfig {
    pub fn from_env() -> IntelResult<Self> {
        let api_key = must_env("ANTHROPIC_API_KEY")?;
        let base_url = std::env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com".to_string());
        Ok(Self {
            api_key,
            base_url,
            model: "claude-haiku-4-5".to_string(),
            timeout: Duration::from_secs(3),
        })
    }
}

/// Raw classifier verdict. Intent is kept as a string here; the closed-set
/// validation lives with the pipeline's intent type.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryIntelligence {
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub expanded_query: String,
}

/// Reusable messages-API client.
pub struct IntelClient {
    http: reqwest::Client,
    cfg: IntelConfig,
    url_messages: String,
}

impl IntelClient {
    /// Build a client from config, validating the endpoint scheme.
    pub fn new(cfg: IntelConfig) -> IntelResult<Self> {
        let endpoint = cfg.base_url.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(IntelError::InvalidEndpoint(cfg.base_url.clone()));
        }

        let http = reqwest::Client::builder().timeout(cfg.timeout).build()?;
        let url_messages = format!("{}/v1/messages", endpoint.trim_end_matches('/'));
        Ok(Self {
            http,
            cfg,
            url_messages,
        })
    }

    /// Ask the model to classify and expand `query`.
    ///
    /// # Errors
    /// - [`IntelError::Transport`] on network failure or deadline
    /// - [`IntelError::HttpStatus`] for non-2xx responses
    /// - [`IntelError::Decode`] when no JSON object can be pulled from the reply
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn analyze(&self, query: &str) -> IntelResult<QueryIntelligence> {
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            max_tokens: u32,
            system: &'a str,
            messages: Vec<Msg<'a>>,
        }
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Deserialize)]
        struct Resp {
            #[serde(default)]
            content: Vec<Block>,
        }
        #[derive(Deserialize)]
        struct Block {
            #[serde(default)]
            text: String,
        }

        let body = Req {
            model: &self.cfg.model,
            max_tokens: 256,
            system: SYSTEM_PROMPT,
            messages: vec![Msg {
                role: "user",
                content: query,
            }],
        };

        debug!("POST {}", self.url_messages);
        let resp = self
            .http
            .post(&self.url_messages)
            .header("x-api-key", &self.cfg.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let snippet: String = resp.text().await.unwrap_or_default().chars().take(240).collect();
            return Err(IntelError::HttpStatus { status, snippet });
        }

        let data: Resp = resp
            .json()
            .await
            .map_err(|e| IntelError::Decode(e.to_string()))?;

        let text = data
            .content
            .first()
            .map(|b| b.text.as_str())
            .unwrap_or_default();

        let object = extract_json_object(text);
        serde_json::from_str(&object).map_err(|e| IntelError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(base_url: &str) -> IntelConfig {
        IntelConfig {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            model: "claude-haiku-4-5".to_string(),
            timeout: Duration::from_secs(3),
        }
    }

    #[test]
    fn rejects_non_http_endpoint() {
        assert!(matches!(
            IntelClient::new(cfg("ftp://example.com")),
            Err(IntelError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn builds_messages_url() {
        let client = IntelClient::new(cfg("https://api.anthropic.com/")).unwrap();
        assert_eq!(client.url_messages, "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn verdict_tolerates_missing_fields() {
        let v: QueryIntelligence = serde_json::from_str(r#"{"intent":"code"}"#).unwrap();
        assert_eq!(v.intent, "code");
        assert!(v.expanded_query.is_empty());
    }
}
