use std::sync::Arc;

mod core;
mod error_handler;
mod models;
mod routes;

use axum::{Router, response::IntoResponse, routing::get};
use tokio::signal;

use crate::{
    error_handler::{AppError, AppResult},
    routes::{health_route::health, search_route::search, stats_route::stats},
};

pub use crate::core::app_state::{AppConfig, AppState, ConfigError};

pub async fn start(state: Arc<AppState>) -> AppResult<()> {
    let addr = ("0.0.0.0", state.config.port);

    // Routes
    let app = Router::new()
        .route("/search", get(search))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .fallback(handler_404) // unified 404
        .with_state(state);

    // Bind & serve with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Graceful shutdown on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        // If even listening for Ctrl+C fails, just log to stderr.
        eprintln!("failed to listen for shutdown signal: {e}");
    }
}

/// Fallback handler for unmatched routes.
async fn handler_404() -> impl IntoResponse {
    AppError::NotFound
}
