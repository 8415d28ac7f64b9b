//! Calendar-day date normalization
//!
//! Upstream records carry dates in whatever form the export produced:
//! RFC 3339 timestamps, naive datetimes, plain dates with `-` or `/`
//! separators. Every grouping and filtering operation works on the
//! normalized `YYYY-MM-DD` form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Reduce a raw date string to calendar-day granularity (`YYYY-MM-DD`).
///
/// Returns `None` for unparseable input; callers skip such records.
/// Normalization is idempotent: an already-normalized string comes back
/// unchanged.
pub fn normalize_day(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // RFC 3339 / ISO 8601 with offset; the day is taken in UTC
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(
            dt.with_timezone(&Utc)
                .date_naive()
                .format("%Y-%m-%d")
                .to_string(),
        );
    }

    // Naive datetime, with or without fractional seconds
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date().format("%Y-%m-%d").to_string());
        }
    }

    // Plain dates
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.format("%Y-%m-%d").to_string());
        }
    }

    None
}
