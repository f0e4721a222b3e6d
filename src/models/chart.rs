//! Chart description returned by the dashboard view-model.
//!
//! The shape follows Plotly's figure JSON so a browser client can hand it
//! straight to a charting library; the server also renders it to SVG.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFigure {
    #[serde(rename = "data")]
    pub traces: Vec<LineTrace>,
    pub layout: ChartLayout,
}

/// A close-price line with one hover label per point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineTrace {
    pub name: String,
    pub mode: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub text: Vec<String>,
    pub hoverinfo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub title: String,
    pub title_x: f64,
    pub xaxis: AxisLayout,
    pub margin: Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLayout {
    pub tickformat: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[NaiveDate; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

impl ChartLayout {
    pub fn titled(title: String) -> Self {
        Self {
            title,
            title_x: 0.5,
            xaxis: AxisLayout {
                tickformat: "%Y-%m-%d".to_string(),
                range: None,
            },
            margin: Margin {
                l: 10,
                r: 10,
                t: 100,
                b: 40,
            },
        }
    }
}

impl ChartFigure {
    pub fn axis_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.layout.xaxis.range.map(|[start, end]| (start, end))
    }

    pub fn title_lines(&self) -> impl Iterator<Item = &str> {
        self.layout.title.split("<br>")
    }
}
