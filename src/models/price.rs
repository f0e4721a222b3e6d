//! Daily price bars and the validated series built from them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Descriptive metadata for a symbol
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TickerProfile {
    pub symbol: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub currency: Option<String>,
}

impl TickerProfile {
    /// Short name, then long name. Blank names count as missing.
    pub fn display_name(&self) -> Option<&str> {
        [self.short_name.as_deref(), self.long_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| !name.is_empty())
    }
}

/// Ordered, non-empty daily history for one symbol.
///
/// Only `services::market_data::build_series` creates these, so dates are
/// strictly increasing and there is always at least one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Wrap bars that are already sorted, de-duplicated and rounded.
    /// Returns `None` for an empty history.
    pub(crate) fn from_sorted(symbol: &str, bars: Vec<PriceBar>) -> Option<Self> {
        if bars.is_empty() {
            return None;
        }
        Some(Self {
            symbol: symbol.to_string(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn min_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn max_date(&self) -> NaiveDate {
        self.last_bar().date
    }

    pub fn last_bar(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1,
        }
    }

    #[test]
    fn test_empty_history_is_rejected() {
        assert!(PriceSeries::from_sorted("BTC-USD", Vec::new()).is_none());
    }

    #[test]
    fn test_span_accessors() {
        let series = PriceSeries::from_sorted(
            "BTC-USD",
            vec![bar("2024-01-01", 1.0), bar("2024-01-02", 2.0), bar("2024-01-05", 3.0)],
        )
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.min_date().to_string(), "2024-01-01");
        assert_eq!(series.max_date().to_string(), "2024-01-05");
        assert_eq!(series.last_bar().close, 3.0);
        assert_eq!(series.symbol(), "BTC-USD");
    }

    #[test]
    fn test_display_name_prefers_short_name() {
        let mut profile = TickerProfile {
            symbol: "BTC-USD".to_string(),
            short_name: Some("Bitcoin USD".to_string()),
            long_name: Some("Bitcoin US Dollar".to_string()),
            currency: Some("USD".to_string()),
        };
        assert_eq!(profile.display_name(), Some("Bitcoin USD"));

        profile.short_name = Some("  ".to_string());
        assert_eq!(profile.display_name(), Some("Bitcoin US Dollar"));

        profile.long_name = None;
        assert_eq!(profile.display_name(), None);
    }
}
