//! The dashboard view-model: one evaluation per user interaction.
//!
//! Every evaluation fetches the full history for the effective symbol, builds
//! the chart, decides the x-axis window and hands back the session state the
//! client should send with its next interaction. Failures never escape:
//! they become an empty chart titled with the error, and the session state is
//! reset to safe defaults.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::chart_service;
use super::market_data::{build_series, MarketDataSource};
use crate::api::yahoo::ApiError;
use crate::config::DashboardConfig;
use crate::models::{
    ChartFigure, DashboardEvent, DashboardRequest, DashboardUpdate, DateWindow, FetchWindow,
    PriceSeries, SessionState,
};
use crate::utils::DashboardError;

/// Normalise a ticker typed by the user. Blank input yields `None`.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Typed symbol, then the stored one, then the seed
pub fn resolve_symbol(input: Option<&str>, stored: &str, seed: &str) -> String {
    input
        .and_then(normalize_symbol)
        .or_else(|| normalize_symbol(stored))
        .unwrap_or_else(|| seed.to_string())
}

/// Axis window for this evaluation, always inside the series span.
///
/// A preset button recomputes the window from the latest bar. Otherwise the
/// stored window is reused, or the full span when nothing usable is stored.
pub fn resolve_axis_window(event: DashboardEvent, stored: DateWindow, series: &PriceSeries) -> DateWindow {
    let candidate = match event {
        DashboardEvent::RangeButtonPressed(preset) => preset.window_for(series),
        DashboardEvent::InitialLoad | DashboardEvent::SymbolChanged => stored,
    };

    candidate
        .clamp_to(series.min_date(), series.max_date())
        .unwrap_or_else(|| DateWindow::full(series))
}

async fn display_name(source: &dyn MarketDataSource, symbol: &str) -> String {
    match source.fetch_profile(symbol).await {
        Ok(profile) => profile
            .display_name()
            .map(str::to_string)
            .unwrap_or_else(|| symbol.to_string()),
        Err(e) => {
            warn!("Metadata lookup failed for {}, using the symbol as name: {}", symbol, e);
            symbol.to_string()
        }
    }
}

/// Fetch, transform and lay out one chart
async fn build_view(
    source: &dyn MarketDataSource,
    symbol: &str,
    event: DashboardEvent,
    stored_range: DateWindow,
    fetch_window: &FetchWindow,
) -> Result<(ChartFigure, DateWindow), DashboardError> {
    let bars = source
        .fetch_history(symbol, fetch_window)
        .await
        .map_err(|e| match e {
            ApiError::NotFound(_) => DashboardError::NoDataFound(symbol.to_string()),
            other => DashboardError::Upstream(other),
        })?;

    let series = build_series(symbol, bars)?;
    debug!(
        "{} bars for {} ({} to {})",
        series.len(),
        symbol,
        series.min_date(),
        series.max_date()
    );

    let axis_window = resolve_axis_window(event, stored_range, &series);
    let name = display_name(source, symbol).await;

    Ok((chart_service::price_figure(&series, &name, axis_window), axis_window))
}

/// Run one evaluation of the dashboard.
///
/// `now` anchors the upstream request period; passing the same `now`, request
/// and upstream data always yields the same update.
pub async fn evaluate(
    source: &dyn MarketDataSource,
    config: &DashboardConfig,
    request: DashboardRequest,
    now: DateTime<Utc>,
) -> DashboardUpdate {
    let DashboardRequest {
        event,
        mut symbol_input,
        mut state,
    } = request;
    let mut message = String::new();

    if state.initial_load {
        info!("Initial load, showing {}", config.seed_symbol);
        message = config.loading_notice.clone();
        symbol_input = Some(config.seed_symbol.clone());
        state.initial_load = false;
    }

    let symbol = resolve_symbol(symbol_input.as_deref(), &state.current_symbol, &config.seed_symbol);
    if symbol != state.current_symbol {
        debug!("Symbol changed {} -> {}, clearing stored range", state.current_symbol, symbol);
        state.current_range = DateWindow::unset();
    }

    let fetch_window = FetchWindow::anchored_at(now, config.lookback_days);
    info!("Evaluating {:?} for {}", event, symbol);

    match build_view(source, &symbol, event, state.current_range, &fetch_window).await {
        Ok((figure, axis_window)) => DashboardUpdate {
            figure,
            state: SessionState {
                current_range: axis_window,
                current_symbol: symbol,
                initial_load: false,
            },
            message,
        },
        Err(e) => {
            warn!("Evaluation for {} failed, falling back to defaults: {}", symbol, e);
            let error_text = e.to_string();
            if message.is_empty() {
                message = error_text.clone();
            }
            DashboardUpdate {
                figure: chart_service::error_figure(&error_text),
                state: SessionState {
                    current_range: fetch_window.as_date_window(),
                    current_symbol: config.seed_symbol.clone(),
                    initial_load: false,
                },
                message,
            }
        }
    }
}
