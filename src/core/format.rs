//! Display formatting shared by insight messages and the text report.
//!
//! Percentages are always percentage points (`25.0` renders as `25.00%`),
//! matching the convention of the normalized `effectiveRate` metric.

#[derive(Debug, Clone)]
pub struct FormatConfig {
    pub currency_symbol: String,
    pub thousands_separator: char,
    pub percent_decimals: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            thousands_separator: ',',
            percent_decimals: 2,
        }
    }
}

/// Rounds to the nearest whole unit (half away from zero) and groups thousands.
pub fn format_currency(value: f64, config: &FormatConfig) -> String {
    let rounded = if value.is_finite() { value.round() } else { 0.0 };
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_thousands(&digits, config.thousands_separator);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{}{grouped}", config.currency_symbol)
}

pub fn format_percentage(points: f64, config: &FormatConfig) -> String {
    let points = if points.is_finite() { points } else { 0.0 };
    format!("{:.*}%", config.percent_decimals, points)
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
