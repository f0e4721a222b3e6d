pub mod api;
pub mod pages;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::config::DashboardConfig;
use crate::services::MarketDataSource;

/// Application state shared across all handlers. Immutable: session state
/// lives with the client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub source: Arc<dyn MarketDataSource>,
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index_handler).post(pages::submit_handler))
        .route("/api/update", post(api::update_handler))
        .route("/health", get(api::health_handler))
        .with_state(app_state)
}

/// Start the axum server on the configured address
pub async fn serve(app_state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let addr = app_state.config.bind_addr();

    tracing::info!("Registering routes:");
    tracing::info!("  GET  /            (dashboard, initial load)");
    tracing::info!("  POST /            (dashboard form submit)");
    tracing::info!("  POST /api/update  (view-model as JSON)");
    tracing::info!("  GET  /health");

    let app = router(app_state);

    tracing::info!(%addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
