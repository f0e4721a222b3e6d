//! Fixed runtime settings for the dashboard process.
//!
//! The dashboard has no configuration surface of its own: every value here is
//! a constant. Only the log filter can be changed, through `RUST_LOG`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Symbol shown on first load and restored after any failed evaluation
pub const SEED_SYMBOL: &str = "BTC-USD";

/// How far back the history request reaches (roughly a century, i.e. everything)
pub const LOOKBACK_DAYS: i64 = 36_500;

/// Advisory text shown on the very first evaluation of a session
pub const LOADING_NOTICE: &str =
    "The page is loading from a web service that has just started. Please wait...";

pub const SERVER_PORT: u16 = 10_000;

pub const UPSTREAM_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub host: IpAddr,
    pub port: u16,
    pub seed_symbol: String,
    pub lookback_days: i64,
    pub chart_width: u32,
    pub chart_height: u32,
    pub upstream_base_url: String,
    pub loading_notice: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: SERVER_PORT,
            seed_symbol: SEED_SYMBOL.to_string(),
            lookback_days: LOOKBACK_DAYS,
            chart_width: 1100,
            chart_height: 560,
            upstream_base_url: UPSTREAM_BASE_URL.to_string(),
            loading_notice: LOADING_NOTICE.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Address the HTTP server binds to (all interfaces)
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
