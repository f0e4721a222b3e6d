//! Date windows for the x-axis and the preset zoom buttons

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::price::PriceSeries;

/// Stored x-axis window. Either end may be missing; a window only counts as
/// set when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Full span of a series
    pub fn full(series: &PriceSeries) -> Self {
        Self::new(series.min_date(), series.max_date())
    }

    pub fn is_set(&self) -> bool {
        self.bounds().is_some()
    }

    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Intersect with `[min, max]`. `None` when unset or disjoint.
    pub fn clamp_to(&self, min: NaiveDate, max: NaiveDate) -> Option<Self> {
        let (start, end) = self.bounds()?;
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let start = start.max(min);
        let end = end.min(max);
        if start > end {
            return None;
        }
        Some(Self::new(start, end))
    }
}

/// Preset zoom buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangePreset {
    #[serde(rename = "5D")]
    FiveDays,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "All")]
    All,
}

impl RangePreset {
    /// Button order on the page
    pub const ALL: [RangePreset; 7] = [
        RangePreset::FiveDays,
        RangePreset::OneMonth,
        RangePreset::ThreeMonths,
        RangePreset::SixMonths,
        RangePreset::OneYear,
        RangePreset::FiveYears,
        RangePreset::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RangePreset::FiveDays => "5D",
            RangePreset::OneMonth => "1M",
            RangePreset::ThreeMonths => "3M",
            RangePreset::SixMonths => "6M",
            RangePreset::OneYear => "1Y",
            RangePreset::FiveYears => "5Y",
            RangePreset::All => "All",
        }
    }

    pub fn button_id(self) -> &'static str {
        match self {
            RangePreset::FiveDays => "button-5d",
            RangePreset::OneMonth => "button-1m",
            RangePreset::ThreeMonths => "button-3m",
            RangePreset::SixMonths => "button-6m",
            RangePreset::OneYear => "button-1y",
            RangePreset::FiveYears => "button-5y",
            RangePreset::All => "button-all",
        }
    }

    pub fn from_button_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.button_id() == id)
    }

    /// Lookback from the latest bar. `None` means the whole history.
    pub fn lookback(self) -> Option<Duration> {
        match self {
            RangePreset::FiveDays => Some(Duration::days(5)),
            RangePreset::OneMonth => Some(Duration::days(30)),
            RangePreset::ThreeMonths => Some(Duration::days(93)),
            RangePreset::SixMonths => Some(Duration::days(182)),
            RangePreset::OneYear => Some(Duration::days(365)),
            RangePreset::FiveYears => Some(Duration::days(1825)),
            RangePreset::All => None,
        }
    }

    /// Resolve against a series' latest date
    pub fn window_for(self, series: &PriceSeries) -> DateWindow {
        let end = series.max_date();
        let start = match self.lookback() {
            Some(lookback) => end - lookback,
            None => series.min_date(),
        };
        DateWindow::new(start, end)
    }
}

/// Period requested from the upstream provider, anchored on "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FetchWindow {
    pub fn anchored_at(now: DateTime<Utc>, lookback_days: i64) -> Self {
        Self {
            start: now - Duration::days(lookback_days),
            end: now,
        }
    }

    /// Calendar-date view, used as the fallback axis window after errors
    pub fn as_date_window(&self) -> DateWindow {
        DateWindow::new(self.start.date_naive(), self.end.date_naive())
    }
}
