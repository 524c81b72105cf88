//! Text formatting helpers shared by the views.

use chrono::{DateTime, Local};

/// Format a backend timestamp in the short `YYYY-MM-DD HH:MM` local form.
///
/// Values that are not RFC 3339 are returned unchanged.
pub fn short_timestamp(value: &str) -> String {
    format_timestamp(value, "%Y-%m-%d %H:%M")
}

/// Format a backend timestamp with seconds and timezone offset.
pub fn long_timestamp(value: &str) -> String {
    format_timestamp(value, "%Y-%m-%d %H:%M:%S %:z")
}

fn format_timestamp(value: &str, fmt: &str) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.with_timezone(&Local).format(fmt).to_string(),
        Err(_) => value.to_string(),
    }
}

/// Truncate a string to `max` characters, adding an ellipsis when cut.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let kept: String = value.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_value_unchanged() {
        assert_eq!(truncate("Bug", 10), "Bug");
    }

    #[test]
    fn test_truncate_long_value() {
        let out = truncate("Database performance optimization", 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_timestamp_passthrough_when_unparseable() {
        assert_eq!(short_timestamp("yesterday"), "yesterday");
        assert_eq!(short_timestamp(""), "");
    }

    #[test]
    fn test_timestamp_parses_backend_formats() {
        let short = short_timestamp("2024-01-15T10:30:00Z");
        assert!(short.starts_with("2024-01-1"));
        assert_eq!(short.len(), "2024-01-15 10:30".len());

        let with_micros = long_timestamp("2024-01-15T10:30:00.123456Z");
        assert!(with_micros.starts_with("2024-01-1"));
    }
}
