pub mod errors;
pub mod format;

pub use errors::{extract_clean_error, ChartError, DashboardError};
pub use format::{escape_html, format_date, format_thousands, round2};
