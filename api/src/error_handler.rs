use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use search_pipeline::PipelineError;
use serde::Serialize;
use thiserror::Error;

use crate::core::app_state::ConfigError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("not found")]
    NotFound,

    #[error("stats unavailable: {0}")]
    StatsUnavailable(String),

    /// Pipeline outcome mapped onto the HTTP surface.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,

            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::StatsUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,

            AppError::Pipeline(e) => match e {
                PipelineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                PipelineError::BackendUnavailable(_) => StatusCode::BAD_GATEWAY,
                PipelineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Stable error tag reported in the body.
    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "ConfigError",
            AppError::Bind(_) => "BindError",
            AppError::Server(_) => "ServerError",
            AppError::NotFound => "NotFound",
            AppError::StatsUnavailable(_) => "StatsUnavailable",
            AppError::Pipeline(e) => match e {
                PipelineError::InvalidRequest(_) => "InvalidRequest",
                PipelineError::BackendUnavailable(_) => "BackendUnavailable",
                PipelineError::Internal(_) => "Internal",
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
