use chrono::NaiveDate;

/// Round a price to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Insert thousands separators: 1234567 -> "1,234,567"
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            output.push(',');
        }
        output.push(ch);
    }

    output
}

/// ISO calendar date, as shown on the x-axis and in titles
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Escape text for use inside HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_thousands(12_345_678_901), "12,345,678,901");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(42_123.456), 42_123.46);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(-1.005_1), -1.01);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"BTC" & 'ETH'</b>"#),
            "&lt;b&gt;&quot;BTC&quot; &amp; &#39;ETH&#39;&lt;/b&gt;"
        );
    }
}
