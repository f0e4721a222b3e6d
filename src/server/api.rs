use axum::extract::{Json, State};
use chrono::Utc;
use tracing::{debug, instrument};

use crate::models::{DashboardRequest, DashboardUpdate};
use crate::server::AppState;
use crate::services::dashboard_service;

/// POST /api/update - run one dashboard evaluation
///
/// Body: `{"event": {...}, "symbol": "ETH-USD", "state": {...}}`. The reply
/// carries the chart in Plotly figure shape (hover text included) and the
/// session state to send back with the next interaction.
#[instrument(skip(app_state))]
pub async fn update_handler(
    State(app_state): State<AppState>,
    Json(request): Json<DashboardRequest>,
) -> Json<DashboardUpdate> {
    let update = dashboard_service::evaluate(
        app_state.source.as_ref(),
        &app_state.config,
        request,
        Utc::now(),
    )
    .await;
    debug!("Returning chart titled {:?}", update.figure.layout.title);
    Json(update)
}

/// GET /health
pub async fn health_handler() -> &'static str {
    "ok"
}
