use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client as HttpClient, Url};
use tracing::{debug, warn};

use super::models::{ApiError, ChartEnvelope, ChartResult};
use crate::models::{FetchWindow, PriceBar, TickerProfile};
use crate::utils::{extract_clean_error, round2};

/// Yahoo Finance chart API client for daily price history and symbol metadata
pub struct YahooClient {
    http_client: HttpClient,
    base_url: String,
}

impl YahooClient {
    /// Yahoo answers 429 to requests without a browser-like agent
    const BROWSER_AGENT: &'static str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

    /// Create a new client against `base_url` (the public endpoint, a mirror or a test server)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
        }
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(Self::BROWSER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// `{base}/v8/finance/chart/{symbol}` with the symbol percent-encoded
    fn chart_url(&self, symbol: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::RequestError(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::RequestError(format!("Invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }

    /// Map a non-success status to an error, preferring the description
    /// embedded in the chart body over the raw text
    async fn handle_error_response(status: reqwest::StatusCode, response: reqwest::Response) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        let description = serde_json::from_str::<ChartEnvelope>(&body_text)
            .ok()
            .and_then(|envelope| envelope.chart.error)
            .map(|err| err.description.unwrap_or(err.code))
            .unwrap_or_else(|| extract_clean_error(&body_text));

        match status_code {
            400 => ApiError::BadRequest(description),
            404 => ApiError::NotFound(description),
            429 => {
                warn!("Rate limited by upstream: {}", description);
                ApiError::RateLimited(description)
            }
            500..=599 => {
                warn!("Upstream server error {}: {}", status_code, description);
                ApiError::ServerError(status_code, description)
            }
            _ => ApiError::HttpError(status_code, description),
        }
    }

    async fn get_chart(&self, symbol: &str, query: &[(&str, String)]) -> Result<ChartResult, ApiError> {
        let url = self.chart_url(symbol)?;
        debug!("GET {} {:?}", url, query);

        let response = self.http_client
            .get(url)
            .headers(Self::create_headers())
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::RequestError(format!("Failed to read response: {}", e)))?;

        parse_chart_body(&body)
    }

    /// GET /v8/finance/chart/{symbol}?period1=..&period2=..&interval=1d
    ///
    /// Daily bars for the whole window, oldest first. An empty vector means
    /// the provider knows the symbol but has no bars in the window.
    pub async fn get_daily_history(&self, symbol: &str, window: &FetchWindow) -> Result<Vec<PriceBar>, ApiError> {
        let query = [
            ("period1", window.start.timestamp().to_string()),
            ("period2", window.end.timestamp().to_string()),
            ("interval", "1d".to_string()),
            ("events", "history".to_string()),
        ];
        let result = self.get_chart(symbol, &query).await?;
        let bars = bars_from_chart(&result);
        debug!("Fetched {} daily bars for {}", bars.len(), symbol);
        Ok(bars)
    }

    /// GET /v8/finance/chart/{symbol}?range=1d&interval=1d, keeping only the metadata
    pub async fn get_profile(&self, symbol: &str) -> Result<TickerProfile, ApiError> {
        let query = [("range", "1d".to_string()), ("interval", "1d".to_string())];
        let result = self.get_chart(symbol, &query).await?;
        Ok(TickerProfile {
            symbol: result.meta.symbol,
            short_name: result.meta.short_name,
            long_name: result.meta.long_name,
            currency: result.meta.currency,
        })
    }
}

/// Decode a chart body and pick its first result.
///
/// A body carrying `chart.error` is an error even with a 200 status.
pub fn parse_chart_body(body: &str) -> Result<ChartResult, ApiError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))?;

    if let Some(err) = envelope.chart.error {
        let description = err.description.unwrap_or_else(|| err.code.clone());
        return Err(if err.code.eq_ignore_ascii_case("not found") {
            ApiError::NotFound(description)
        } else {
            ApiError::BadRequest(description)
        });
    }

    envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ApiError::NotFound("Chart response has no result".to_string()))
}

/// Zip timestamps with the quote columns into daily bars.
///
/// Rows with any missing price are skipped; a missing volume counts as 0.
/// Dates are taken in exchange local time.
pub fn bars_from_chart(result: &ChartResult) -> Vec<PriceBar> {
    let Some(quote) = result.indicators.quote.first() else {
        return Vec::new();
    };

    result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let open = quote.open.get(i).copied().flatten()?;
            let high = quote.high.get(i).copied().flatten()?;
            let low = quote.low.get(i).copied().flatten()?;
            let close = quote.close.get(i).copied().flatten()?;
            let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);
            let date = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0)?.date_naive();

            Some(PriceBar {
                date,
                open: round2(open),
                high: round2(high),
                low: round2(low),
                close: round2(close),
                volume: volume.max(0.0).round() as u64,
            })
        })
        .collect()
}
