//! Per-session state and the events that drive the dashboard

use serde::{Deserialize, Serialize};

use super::chart::ChartFigure;
use super::range::{DateWindow, RangePreset};
use crate::config::SEED_SYMBOL;

/// Values the client keeps between interactions and sends back with each one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub current_range: DateWindow,
    #[serde(default = "default_symbol")]
    pub current_symbol: String,
    #[serde(default = "default_initial_load")]
    pub initial_load: bool,
}

fn default_symbol() -> String {
    SEED_SYMBOL.to_string()
}

fn default_initial_load() -> bool {
    true
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_range: DateWindow::unset(),
            current_symbol: default_symbol(),
            initial_load: true,
        }
    }
}

/// What caused this evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "preset", rename_all = "snake_case")]
pub enum DashboardEvent {
    InitialLoad,
    /// Search click, field submit or field change
    SymbolChanged,
    RangeButtonPressed(RangePreset),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub event: DashboardEvent,
    /// Current contents of the symbol text box
    #[serde(default, rename = "symbol")]
    pub symbol_input: Option<String>,
    #[serde(default)]
    pub state: SessionState,
}

/// Everything the page needs to re-render, plus the state to keep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardUpdate {
    pub figure: ChartFigure,
    pub state: SessionState,
    /// Advisory text under the chart; empty when there is none
    pub message: String,
}
