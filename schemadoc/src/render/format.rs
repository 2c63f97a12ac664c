//! Display formatting shared by every output format.

use chrono::{DateTime, Local};

/// Formats an integer with comma thousands separators (`125000` -> `125,000`).
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One decimal place followed by " MB"
pub fn megabytes(value: f64) -> String {
    format!("{:.1} MB", value)
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

pub fn or_na(value: Option<&str>) -> String {
    value.unwrap_or("N/A").to_string()
}

pub fn description_or_default(value: Option<&str>) -> String {
    value.unwrap_or("No description available").to_string()
}

/// Timestamp used in document headers
pub fn timestamp(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        let cases = [
            (0, "0"),
            (999, "999"),
            (1_000, "1,000"),
            (125_000, "125,000"),
            (1_234_567, "1,234,567"),
            (u64::MAX, "18,446,744,073,709,551,615"),
        ];
        for (value, expected) in cases {
            assert_eq!(thousands(value), expected);
        }
    }

    #[test]
    fn test_megabytes() {
        assert_eq!(megabytes(45.2), "45.2 MB");
        assert_eq!(megabytes(0.0), "0.0 MB");
        assert_eq!(megabytes(1.96), "2.0 MB");
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(or_na(None), "N/A");
        assert_eq!(or_na(Some("15.2")), "15.2");
        assert_eq!(description_or_default(None), "No description available");
        assert_eq!(yes_no(true), "Yes");
    }
}
