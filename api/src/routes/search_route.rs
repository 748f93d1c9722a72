//! GET /search: run the ranking pipeline.

use std::sync::Arc;

use axum::{Json, extract::Query, extract::State};
use search_pipeline::{PipelineError, SearchRequest, SearchResponse};
use serde::Deserialize;

use crate::{core::app_state::AppState, error_handler::AppResult};

/// Raw query parameters. `limit` arrives as text so a malformed value can be
/// answered with a field-level 400 instead of a framework rejection.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    limit: Option<String>,
    #[serde(default)]
    domain_hint: Option<String>,
}

/// Handler: GET /search?q=...&limit=...&domain_hint=...
///
/// # Example
/// ```bash
/// curl 'http://127.0.0.1:7777/search?q=transformer+attention&limit=5'
/// ```
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResponse>> {
    let query = params.q.as_deref().unwrap_or("");

    let limit = match params.limit.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
            PipelineError::InvalidRequest(format!("limit must be an integer, got {raw:?}"))
        })?),
    };

    let request = SearchRequest::new(query, limit, params.domain_hint, state.config.max_results)?;
    let response = state.pipeline.run(request).await?;
    Ok(Json(response))
}
