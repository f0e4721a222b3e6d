use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use plotters::prelude::*;

use crate::models::{ChartFigure, ChartLayout, DateWindow, LineTrace, PriceBar, PriceSeries};
use crate::utils::{format_date, format_thousands, ChartError};

/// Hover label for one point
pub fn hover_text(bar: &PriceBar, symbol: &str) -> String {
    format!(
        "Date: {}<br>Close: {:.2}<br>Open: {:.2}<br>High: {:.2}<br>Low: {:.2}<br>Volume: {}<br>Symbol: {}",
        format_date(bar.date),
        bar.close,
        bar.open,
        bar.high,
        bar.low,
        format_thousands(bar.volume),
        symbol
    )
}

/// Close price vs. date, one point per bar
pub fn price_trace(series: &PriceSeries) -> LineTrace {
    let symbol = series.symbol();
    let bars = series.bars();

    LineTrace {
        name: format!("{} - Close Price", symbol),
        mode: "lines".to_string(),
        x: bars.iter().map(|b| b.date).collect(),
        y: bars.iter().map(|b| b.close).collect(),
        text: bars.iter().map(|b| hover_text(b, symbol)).collect(),
        hoverinfo: "text".to_string(),
    }
}

pub fn price_title(display_name: &str, series: &PriceSeries) -> String {
    let last = series.last_bar();
    format!(
        "Price evolution for {} ({})<br>Last Close: {:.2} on {}",
        display_name,
        series.symbol(),
        last.close,
        format_date(last.date)
    )
}

/// Full chart for a series, zoomed to `window`
pub fn price_figure(series: &PriceSeries, display_name: &str, window: DateWindow) -> ChartFigure {
    let mut layout = ChartLayout::titled(price_title(display_name, series));
    layout.xaxis.range = window.bounds().map(|(start, end)| [start, end]);

    ChartFigure {
        traces: vec![price_trace(series)],
        layout,
    }
}

/// Empty chart carrying an error message as its title
pub fn error_figure(message: &str) -> ChartFigure {
    ChartFigure {
        traces: Vec::new(),
        layout: ChartLayout::titled(format!("Error: {}", message)),
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc)
}

/// Points of `trace` that fall inside `[start, end]`
pub fn visible_points(trace: &LineTrace, start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, f64)> {
    trace
        .x
        .iter()
        .zip(trace.y.iter())
        .filter(|(date, _)| **date >= start && **date <= end)
        .map(|(date, price)| (*date, *price))
        .collect()
}

/// Min/max of `prices` padded by 10% of the span, floored at zero
pub fn padded_price_range(prices: &[f64]) -> Option<(f64, f64)> {
    if prices.is_empty() {
        return None;
    }
    let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Avoid a zero-height axis for flat series
    let price_range = (max_price - min_price).max(max_price.abs() * 0.01).max(1e-8);
    let padding = price_range * 0.1;
    Some(((min_price - padding).max(0.0), max_price + padding))
}

/// Render a figure as an SVG document.
///
/// Only the axis window is drawn. A figure without traces (the error chart)
/// renders as a blank canvas; titles are left to the page.
pub fn render_svg(figure: &ChartFigure, width: u32, height: u32) -> Result<String, ChartError> {
    let mut svg = String::new();

    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::Render(format!("Failed to fill canvas: {}", e)))?;

        if let (Some(trace), Some((start, end))) = (figure.traces.first(), figure.axis_range()) {
            if start > end {
                return Err(ChartError::InvalidWindow(format!("{} is after {}", start, end)));
            }

            let mut points = visible_points(trace, start, end);
            if points.is_empty() {
                points = trace.x.iter().copied().zip(trace.y.iter().copied()).collect();
            }
            let prices: Vec<f64> = points.iter().map(|(_, p)| *p).collect();
            let (y_min, y_max) = padded_price_range(&prices)
                .ok_or_else(|| ChartError::Render("No points to draw".to_string()))?;

            let x_min = day_start(start);
            let x_max = if end > start {
                day_start(end)
            } else {
                day_start(end) + Duration::days(1)
            };

            let mut chart = ChartBuilder::on(&root)
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(70)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .map_err(|e| ChartError::Render(format!("Failed to build chart: {}", e)))?;

            chart
                .configure_mesh()
                .x_labels(8)
                .x_label_formatter(&|x: &DateTime<Utc>| x.format("%Y-%m-%d").to_string())
                .y_desc("Close")
                .draw()
                .map_err(|e| ChartError::Render(format!("Failed to draw mesh: {}", e)))?;

            chart
                .draw_series(LineSeries::new(
                    points.iter().map(|(date, price)| (day_start(*date), *price)),
                    BLUE.stroke_width(2),
                ))
                .map_err(|e| ChartError::Render(format!("Failed to draw line: {}", e)))?;
        }

        root.present()
            .map_err(|e| ChartError::Render(format!("Failed to render chart: {}", e)))?;
    }

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::market_data::build_series;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_series() -> PriceSeries {
        let bars = vec![
            PriceBar {
                date: date("2024-01-01"),
                open: 42280.23,
                high: 44175.44,
                low: 42214.98,
                close: 44167.33,
                volume: 18_426_978_443,
            },
            PriceBar {
                date: date("2024-01-02"),
                open: 44187.14,
                high: 45899.71,
                low: 44176.95,
                close: 44957.97,
                volume: 39_335_274_536,
            },
        ];
        build_series("BTC-USD", bars).unwrap()
    }

    #[test]
    fn test_trace_has_one_point_per_bar() {
        let series = sample_series();
        let trace = price_trace(&series);

        assert_eq!(trace.x.len(), series.len());
        assert_eq!(trace.y, vec![44167.33, 44957.97]);
        assert_eq!(trace.text.len(), series.len());
        assert_eq!(trace.name, "BTC-USD - Close Price");
        assert_eq!(trace.mode, "lines");
    }

    #[test]
    fn test_hover_text_format() {
        let series = sample_series();
        assert_eq!(
            hover_text(&series.bars()[0], "BTC-USD"),
            "Date: 2024-01-01<br>Close: 44167.33<br>Open: 42280.23<br>High: 44175.44<br>Low: 42214.98<br>Volume: 18,426,978,443<br>Symbol: BTC-USD"
        );
    }

    #[test]
    fn test_title_uses_last_close() {
        let series = sample_series();
        assert_eq!(
            price_title("Bitcoin USD", &series),
            "Price evolution for Bitcoin USD (BTC-USD)<br>Last Close: 44957.97 on 2024-01-02"
        );
    }

    #[test]
    fn test_price_figure_sets_axis_range() {
        let series = sample_series();
        let figure = price_figure(&series, "Bitcoin USD", DateWindow::full(&series));
        assert_eq!(figure.axis_range(), Some((date("2024-01-01"), date("2024-01-02"))));
        assert_eq!(figure.layout.xaxis.tickformat, "%Y-%m-%d");
        assert_eq!(figure.title_lines().count(), 2);
    }

    #[test]
    fn test_error_figure_is_empty() {
        let figure = error_figure("No data found for the symbol FOO");
        assert!(figure.traces.is_empty());
        assert!(figure.layout.title.starts_with("Error:"));
        assert_eq!(figure.axis_range(), None);
    }

    #[test]
    fn test_visible_points_respects_window() {
        let series = sample_series();
        let trace = price_trace(&series);
        let points = visible_points(&trace, date("2024-01-02"), date("2024-01-09"));
        assert_eq!(points, vec![(date("2024-01-02"), 44957.97)]);
    }

    #[test]
    fn test_padded_price_range() {
        assert_eq!(padded_price_range(&[]), None);
        let (lo, hi) = padded_price_range(&[100.0, 200.0]).unwrap();
        assert_eq!(lo, 90.0);
        assert_eq!(hi, 210.0);
        let (lo, hi) = padded_price_range(&[5.0]).unwrap();
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn test_render_error_figure_as_blank_svg() {
        let svg = render_svg(&error_figure("boom"), 400, 300).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
    }
}
