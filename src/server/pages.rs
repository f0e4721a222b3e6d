//! Server-rendered dashboard page.
//!
//! The page is a single form. Each button submits it with its own `action`
//! value, and hidden fields carry the session state between interactions.

use axum::extract::{Form, State};
use axum::response::Html;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::{DashboardEvent, DashboardRequest, DashboardUpdate, DateWindow, RangePreset, SessionState};
use crate::server::AppState;
use crate::services::{chart_service, dashboard_service};
use crate::utils::{escape_html, format_date};

const SEARCH_ACTION: &str = "search";

/// Fields posted by the dashboard form
#[derive(Debug, Default, Deserialize)]
pub struct DashboardForm {
    pub symbol: Option<String>,
    /// `search` or a preset button id such as `button-5d`
    pub action: Option<String>,
    pub current_symbol: Option<String>,
    pub range_start: Option<String>,
    pub range_end: Option<String>,
    pub initial_load: Option<String>,
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value?.trim(), "%Y-%m-%d").ok()
}

impl DashboardForm {
    pub fn into_request(self) -> DashboardRequest {
        let initial_load = self
            .initial_load
            .as_deref()
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let event = if initial_load {
            DashboardEvent::InitialLoad
        } else {
            match self.action.as_deref().and_then(RangePreset::from_button_id) {
                Some(preset) => DashboardEvent::RangeButtonPressed(preset),
                None => DashboardEvent::SymbolChanged,
            }
        };

        let mut state = SessionState {
            current_range: DateWindow {
                start: parse_date(self.range_start.as_deref()),
                end: parse_date(self.range_end.as_deref()),
            },
            initial_load,
            ..SessionState::default()
        };
        if let Some(symbol) = self.current_symbol.filter(|s| !s.trim().is_empty()) {
            state.current_symbol = symbol;
        }

        DashboardRequest {
            event,
            symbol_input: self.symbol,
            state,
        }
    }
}

/// GET / - first render of a new session
pub async fn index_handler(State(app_state): State<AppState>) -> Html<String> {
    info!("New dashboard session");
    let request = DashboardRequest {
        event: DashboardEvent::InitialLoad,
        symbol_input: None,
        state: SessionState::default(),
    };
    respond(&app_state, request).await
}

/// POST / - a button press or symbol submit
pub async fn submit_handler(State(app_state): State<AppState>, Form(form): Form<DashboardForm>) -> Html<String> {
    respond(&app_state, form.into_request()).await
}

async fn respond(app_state: &AppState, request: DashboardRequest) -> Html<String> {
    let typed_symbol = request
        .symbol_input
        .clone()
        .filter(|s| !s.trim().is_empty() && !request.state.initial_load);

    let update = dashboard_service::evaluate(
        app_state.source.as_ref(),
        &app_state.config,
        request,
        Utc::now(),
    )
    .await;

    let chart_svg = match chart_service::render_svg(
        &update.figure,
        app_state.config.chart_width,
        app_state.config.chart_height,
    ) {
        Ok(svg) => Some(svg),
        Err(e) => {
            warn!("Chart rendering failed: {}", e);
            None
        }
    };

    let symbol_field = typed_symbol.unwrap_or_else(|| update.state.current_symbol.clone());
    Html(render_page(&update, &symbol_field, chart_svg.as_deref()))
}

fn hidden_field(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        name,
        escape_html(value)
    )
}

/// Build the full HTML document for an update
pub fn render_page(update: &DashboardUpdate, symbol_field: &str, chart_svg: Option<&str>) -> String {
    let title_html = update
        .figure
        .title_lines()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>");

    let preset_buttons: String = RangePreset::ALL
        .iter()
        .map(|preset| {
            format!(
                r#"<button type="submit" name="action" value="{}">{}</button>"#,
                preset.button_id(),
                preset.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");

    let chart_html = match chart_svg {
        Some(svg) => svg.to_string(),
        None => r#"<p class="chart-unavailable">Chart could not be drawn.</p>"#.to_string(),
    };

    let state = &update.state;
    let hidden = [
        hidden_field("current_symbol", &state.current_symbol),
        hidden_field("range_start", &state.current_range.start.map(format_date).unwrap_or_default()),
        hidden_field("range_end", &state.current_range.end.map(format_date).unwrap_or_default()),
        hidden_field("initial_load", if state.initial_load { "true" } else { "false" }),
    ]
    .join("\n    ");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Crypto Price Evolution</title>
<style>
  body {{ font-family: sans-serif; margin: 0 auto; max-width: 1140px; padding: 10px; }}
  h1 {{ text-align: center; margin-bottom: 20px; }}
  .input-container {{ display: flex; flex-direction: column; align-items: center; margin-bottom: 10px; }}
  .input-container input {{ width: 60%; margin-bottom: 6px; }}
  .input-container button {{ width: 30%; }}
  .range-buttons {{ display: flex; flex-wrap: wrap; justify-content: center; margin-bottom: 20px; }}
  .chart-title {{ text-align: center; }}
  .chart svg {{ width: 100%; height: auto; }}
  #loading-message {{ text-align: center; margin-top: 20px; color: red; }}
</style>
</head>
<body>
<h1>Crypto Price Evolution</h1>
<form method="post" action="/">
    {hidden}
    <div class="input-container">
        <input id="crypto-symbol" type="text" name="symbol" value="{symbol}" onchange="this.form.requestSubmit()">
        <button id="search-button" type="submit" name="action" value="{search}">Search Crypto</button>
    </div>
    <div class="range-buttons">
        {buttons}
    </div>
</form>
<div id="crypto-graph">
    <h3 class="chart-title">{title}</h3>
    <div class="chart">{chart}</div>
</div>
<div id="loading-message">{message}</div>
</body>
</html>
"#,
        hidden = hidden,
        symbol = escape_html(symbol_field),
        search = SEARCH_ACTION,
        buttons = preset_buttons,
        title = title_html,
        chart = chart_html,
        message = escape_html(&update.message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::chart_service::error_figure;

    fn form(action: Option<&str>) -> DashboardForm {
        DashboardForm {
            symbol: Some("ETH-USD".to_string()),
            action: action.map(str::to_string),
            current_symbol: Some("BTC-USD".to_string()),
            range_start: Some("2024-01-01".to_string()),
            range_end: Some("2024-02-01".to_string()),
            initial_load: Some("false".to_string()),
        }
    }

    #[test]
    fn test_preset_buttons_map_to_events() {
        for preset in RangePreset::ALL {
            let request = form(Some(preset.button_id())).into_request();
            assert_eq!(request.event, DashboardEvent::RangeButtonPressed(preset));
        }
    }

    #[test]
    fn test_search_and_plain_submit_are_symbol_changes() {
        assert_eq!(form(Some("search")).into_request().event, DashboardEvent::SymbolChanged);
        assert_eq!(form(None).into_request().event, DashboardEvent::SymbolChanged);
    }

    #[test]
    fn test_form_state_fields() {
        let request = form(None).into_request();
        assert_eq!(request.symbol_input.as_deref(), Some("ETH-USD"));
        assert_eq!(request.state.current_symbol, "BTC-USD");
        assert_eq!(request.state.current_range.start.map(format_date).as_deref(), Some("2024-01-01"));
        assert!(!request.state.initial_load);
    }

    #[test]
    fn test_pending_initial_load_wins() {
        let mut f = form(Some("button-5d"));
        f.initial_load = Some("true".to_string());
        let request = f.into_request();
        assert_eq!(request.event, DashboardEvent::InitialLoad);
        assert!(request.state.initial_load);
    }

    #[test]
    fn test_blank_fields_fall_back_to_defaults() {
        let request = DashboardForm {
            range_start: Some("".to_string()),
            range_end: Some("not a date".to_string()),
            current_symbol: Some("  ".to_string()),
            ..DashboardForm::default()
        }
        .into_request();

        assert!(!request.state.current_range.is_set());
        assert_eq!(request.state.current_symbol, "BTC-USD");
    }

    #[test]
    fn test_page_layout_and_escaping() {
        let update = DashboardUpdate {
            figure: error_figure("<script>bad</script>"),
            state: SessionState {
                current_range: DateWindow::unset(),
                current_symbol: "BTC-USD".to_string(),
                initial_load: false,
            },
            message: "Rate \"limited\"".to_string(),
        };
        let html = render_page(&update, "ETH-USD", None);

        for preset in RangePreset::ALL {
            assert!(html.contains(&format!(r#"value="{}">{}</button>"#, preset.button_id(), preset.label())));
        }
        assert!(html.contains("Search Crypto"));
        assert!(html.contains(r#"name="symbol" value="ETH-USD""#));
        assert!(html.contains(r#"name="current_symbol" value="BTC-USD""#));
        assert!(html.contains(r#"name="initial_load" value="false""#));
        assert!(html.contains("Error: &lt;script&gt;bad&lt;/script&gt;"));
        assert!(!html.contains("<script>bad"));
        assert!(html.contains("Rate &quot;limited&quot;"));
        assert!(html.contains("Chart could not be drawn."));
    }
}
