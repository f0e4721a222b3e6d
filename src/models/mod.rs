//! Data models for the dashboard
//!
//! Session state travels with the client; price series and chart figures are
//! rebuilt from scratch on every interaction.

pub mod chart;
pub mod price;
pub mod range;
pub mod session;

// Re-export commonly used types for convenience
pub use chart::{ChartFigure, ChartLayout, LineTrace};
pub use price::{PriceBar, PriceSeries, TickerProfile};
pub use range::{DateWindow, FetchWindow, RangePreset};
pub use session::{DashboardEvent, DashboardRequest, DashboardUpdate, SessionState};
