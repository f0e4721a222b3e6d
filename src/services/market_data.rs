use async_trait::async_trait;

use crate::api::yahoo::{ApiError, YahooClient};
use crate::models::{FetchWindow, PriceBar, PriceSeries, TickerProfile};
use crate::utils::{round2, DashboardError};

/// Where the dashboard gets its prices from
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily bars for `symbol` within `window`. An empty vector means no data.
    async fn fetch_history(&self, symbol: &str, window: &FetchWindow) -> Result<Vec<PriceBar>, ApiError>;

    /// Display metadata for `symbol`
    async fn fetch_profile(&self, symbol: &str) -> Result<TickerProfile, ApiError>;
}

#[async_trait]
impl MarketDataSource for YahooClient {
    async fn fetch_history(&self, symbol: &str, window: &FetchWindow) -> Result<Vec<PriceBar>, ApiError> {
        self.get_daily_history(symbol, window).await
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<TickerProfile, ApiError> {
        self.get_profile(symbol).await
    }
}

/// Validate raw bars and turn them into a series.
///
/// Prices are rounded to 2 decimals, bars are sorted by date and a repeated
/// date keeps its last bar.
pub fn build_series(symbol: &str, bars: Vec<PriceBar>) -> Result<PriceSeries, DashboardError> {
    if bars.is_empty() {
        return Err(DashboardError::NoDataFound(symbol.to_string()));
    }

    let mut cleaned = Vec::with_capacity(bars.len());
    for bar in bars {
        let prices = [bar.open, bar.high, bar.low, bar.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(DashboardError::MalformedData(format!(
                "non-finite price for {} on {}",
                symbol, bar.date
            )));
        }
        cleaned.push(PriceBar {
            open: round2(bar.open),
            high: round2(bar.high),
            low: round2(bar.low),
            close: round2(bar.close),
            ..bar
        });
    }

    // Stable sort keeps upstream order within a date, so the last one wins
    cleaned.sort_by_key(|bar| bar.date);
    let mut series: Vec<PriceBar> = Vec::with_capacity(cleaned.len());
    for bar in cleaned {
        match series.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => series.push(bar),
        }
    }

    PriceSeries::from_sorted(symbol, series)
        .ok_or_else(|| DashboardError::NoDataFound(symbol.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(date: &str, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 10,
        }
    }

    #[test]
    fn test_empty_history_is_no_data() {
        assert!(matches!(
            build_series("NOPE", Vec::new()),
            Err(DashboardError::NoDataFound(s)) if s == "NOPE"
        ));
    }

    #[test]
    fn test_bars_are_sorted_rounded_and_deduplicated() {
        let series = build_series(
            "ETH-USD",
            vec![
                bar("2024-01-03", 3.333),
                bar("2024-01-01", 1.0),
                bar("2024-01-02", 2.0),
                bar("2024-01-03", 3.456),
            ],
        )
        .unwrap();

        let dates: Vec<String> = series.bars().iter().map(|b| b.date.to_string()).collect();
        assert_eq!(dates, ["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(series.last_bar().close, 3.46);
        assert!(series.bars().windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_non_finite_price_is_malformed() {
        let result = build_series("BTC-USD", vec![bar("2024-01-01", f64::NAN)]);
        assert!(matches!(result, Err(DashboardError::MalformedData(_))));
    }
}
