use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level body of `GET /v8/finance/chart/{symbol}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartApiError>,
}

/// Error object embedded in the chart body (also sent with 4xx statuses)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartApiError {
    pub code: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Bar open times, unix seconds. Missing when the period holds no bars.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub currency: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub exchange_name: Option<String>,
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteArrays>,
}

/// Column-wise OHLCV values aligned with `ChartResult::timestamp`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteArrays {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

/// Errors returned by the Yahoo Finance client
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 404, or a chart body whose error code is "Not Found"
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// 429 Too Many Requests. Surfaced as-is, never retried.
    #[error("Rate Limited: {0}")]
    RateLimited(String),
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}
