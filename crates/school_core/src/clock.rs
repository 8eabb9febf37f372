//! Wall-clock helpers.
//!
//! All timestamps in core are Unix epoch milliseconds (`i64`, UTC).

use chrono::{DateTime, Utc};

/// Milliseconds in one UTC day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Source of "now" used when stamping records.
pub type Clock = fn() -> i64;

/// Returns the current time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Returns the UTC day number (days since epoch) containing `epoch_ms`.
pub fn epoch_day(epoch_ms: i64) -> i64 {
    epoch_ms.div_euclid(MILLIS_PER_DAY)
}

/// Formats `epoch_ms` as an ISO `YYYY-MM-DD` date in UTC.
///
/// Out-of-range values fall back to `"unknown"`.
pub fn format_date(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|value| value.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::{epoch_day, format_date, MILLIS_PER_DAY};

    #[test]
    fn epoch_day_floors_negative_values() {
        assert_eq!(epoch_day(0), 0);
        assert_eq!(epoch_day(MILLIS_PER_DAY - 1), 0);
        assert_eq!(epoch_day(MILLIS_PER_DAY), 1);
        assert_eq!(epoch_day(-1), -1);
    }

    #[test]
    fn format_date_uses_utc_calendar_day() {
        // 2024-09-01T23:59:59Z
        assert_eq!(format_date(1_725_235_199_000), "2024-09-01");
        assert_eq!(format_date(0), "1970-01-01");
    }
}
