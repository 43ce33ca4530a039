//! HTTP API surface.
//!
//! Three routes: `GET /health`, `POST /query` (blocking), and
//! `POST /query/stream` (Server-Sent Events). CORS is permissive because
//! the UI is served separately.

mod handlers;
pub mod types;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::Config;
use crate::tools::ToolRegistry;

/// Shared, read-only application state. The tool registry is built once at
/// startup and shared by every request.
pub struct AppState {
    pub config: Config,
    pub tools: Arc<ToolRegistry>,
}

/// Build the application router.
pub fn router(config: Config) -> Router {
    let state = Arc::new(AppState {
        config,
        tools: Arc::new(ToolRegistry::travel_tools()),
    });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/query", post(handlers::query))
        .route("/query/stream", post(handlers::query_stream))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve the API until the process exits.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, router(config)).await?;
    Ok(())
}
