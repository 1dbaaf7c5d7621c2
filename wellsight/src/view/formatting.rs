//! Shared formatting utilities for the WellSight views.

use chrono::{DateTime, Utc};

/// Format a numeric value for display with appropriate scale suffix.
///
/// - Values >= 1M display as "X.XM"
/// - Values >= 1K display as "X.XK"
/// - Integer values display without decimal places
/// - Values below 1 display with 3 decimal places, others with 2
pub fn format_value(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else if value.abs() < 1.0 {
        format!("{:.3}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Format a report timestamp (Unix milliseconds, UTC) for readouts.
pub fn format_report_time(timestamp_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("{} ms", timestamp_ms),
    }
}

/// Format a span between two report times as days.
pub fn format_days(span_ms: i64) -> String {
    let days = span_ms as f64 / 86_400_000.0;
    if days.fract() == 0.0 {
        format!("{:.0} d", days)
    } else {
        format!("{:.1} d", days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1_500_000.0), "1.5M");
        assert_eq!(format_value(1_500.0), "1.5K");
        assert_eq!(format_value(42.0), "42");
        assert_eq!(format_value(3.5), "3.50");
        assert_eq!(format_value(0.125), "0.125");
    }

    #[test]
    fn test_format_report_time() {
        assert_eq!(format_report_time(1_704_067_200_000), "2024-01-01 00:00:00");
        assert_eq!(format_report_time(0), "1970-01-01 00:00:00");
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(30 * 86_400_000), "30 d");
        assert_eq!(format_days(36 * 3_600_000), "1.5 d");
    }
}
