pub mod chart_service;
pub mod dashboard_service;
pub mod market_data;

pub use market_data::MarketDataSource;
