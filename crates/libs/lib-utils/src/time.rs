//! # Time Utilities
//!
//! Conversions from ledger/explorer epoch seconds to local display strings using chrono.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Current time as seconds since the Unix epoch.
pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

fn local(secs: i64) -> Option<DateTime<Local>> {
    Local.timestamp_opt(secs, 0).single()
}

/// Format epoch seconds as a local date-time string, e.g. `3/14/2024, 9:26:53 AM`.
///
/// Out-of-range input yields an empty string rather than an error.
pub fn format_local_timestamp(secs: i64) -> String {
    local(secs)
        .map(|dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_default()
}

/// Local date only, e.g. `3/14/2024`.
pub fn format_local_date(secs: i64) -> String {
    local(secs)
        .map(|dt| dt.format("%-m/%-d/%Y").to_string())
        .unwrap_or_default()
}

/// Local time only, e.g. `9:26:53 AM`.
pub fn format_local_time(secs: i64) -> String {
    local(secs)
        .map(|dt| dt.format("%-I:%M:%S %p").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_local_timestamp_shape() {
        let formatted = format_local_timestamp(1_700_000_000);
        assert!(formatted.contains("/2023, "), "{formatted}");
        assert!(formatted.ends_with("AM") || formatted.ends_with("PM"));
    }

    #[test]
    fn test_date_and_time_compose_timestamp() {
        let secs = 1_700_000_000;
        assert_eq!(
            format_local_timestamp(secs),
            format!("{}, {}", format_local_date(secs), format_local_time(secs))
        );
    }

    #[test]
    fn test_out_of_range_is_empty() {
        assert_eq!(format_local_timestamp(i64::MAX), "");
    }
}
