use thiserror::Error;

use crate::api::yahoo::ApiError;

/// Reasons a dashboard evaluation falls back to the empty error chart
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("No data found for the symbol {0}")]
    NoDataFound(String),
    #[error("{0}")]
    Upstream(ApiError),
    #[error("Malformed data: {0}")]
    MalformedData(String),
}

impl From<ApiError> for DashboardError {
    fn from(err: ApiError) -> Self {
        DashboardError::Upstream(err)
    }
}

/// Chart rendering errors
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("Invalid axis window: {0}")]
    InvalidWindow(String),
}

/// Reduce a multi-line upstream message to its first non-empty line so it
/// fits in a chart title
pub fn extract_clean_error(error_msg: &str) -> String {
    error_msg
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(error_msg)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_texts() {
        assert_eq!(
            DashboardError::NoDataFound("FOO".to_string()).to_string(),
            "No data found for the symbol FOO"
        );
        assert_eq!(
            DashboardError::MalformedData("close is NaN".to_string()).to_string(),
            "Malformed data: close is NaN"
        );
    }

    #[test]
    fn test_extract_clean_error() {
        assert_eq!(extract_clean_error("\n  first line \nsecond"), "first line");
        assert_eq!(extract_clean_error("single"), "single");
    }
}
