//! Errors for classifier configuration and calls.

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias used across the crate.
pub type IntelResult<T> = std::result::Result<T, IntelError>;

#[derive(Debug, Error)]
pub enum IntelError {
    /// Required environment variable is missing or empty.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// Endpoint is empty or not an http(s) URL.
    #[error("invalid classifier endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the API.
    #[error("unexpected status {status}: {snippet}")]
    HttpStatus { status: StatusCode, snippet: String },

    /// The model's reply did not contain a usable JSON object.
    #[error("unparseable classifier output: {0}")]
    Decode(String),
}

/// Fetch a required, non-empty environment variable.
pub fn must_env(name: &'static str) -> IntelResult<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(IntelError::MissingVar(name)),
    }
}
