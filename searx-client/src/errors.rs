//! Typed errors for the SearXNG client.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearxError {
    /// Endpoint is empty or not an http(s) URL.
    #[error("invalid SearXNG endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the backend.
    #[error("unexpected status {status}: {snippet}")]
    HttpStatus { status: StatusCode, snippet: String },

    /// Response body could not be decoded as the expected JSON shape.
    #[error("malformed response body: {0}")]
    Decode(String),
}
