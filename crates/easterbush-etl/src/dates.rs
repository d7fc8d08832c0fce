//! Timestamp parsing for the campus data exports.
//!
//! The meter and tariff files are inconsistent about date formats, so
//! parsing tries a fixed ladder of known layouts. All stamps are GMT.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Date-time layouts seen in the exports, tried in order.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M"];

/// Date-only layouts; midnight is assumed.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d"];

/// Parse a timestamp, trying each known format.
///
/// Leading and trailing whitespace is tolerated (some exports pad their
/// cells). Returns `None` when no format matches.
#[must_use]
pub fn try_parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_iso_minute_format() {
        let parsed = try_parse_timestamp("2019-01-01 13:30");
        assert_eq!(
            parsed,
            Some(Utc.with_ymd_and_hms(2019, 1, 1, 13, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_iso_second_format() {
        let parsed = try_parse_timestamp("2019-01-01 13:30:45");
        assert_eq!(
            parsed,
            Some(Utc.with_ymd_and_hms(2019, 1, 1, 13, 30, 45).unwrap())
        );
    }

    #[test]
    fn test_uk_format() {
        let parsed = try_parse_timestamp("02/03/2019 06:00");
        assert_eq!(
            parsed,
            Some(Utc.with_ymd_and_hms(2019, 3, 2, 6, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_date_only_is_midnight() {
        let parsed = try_parse_timestamp("02/03/2019");
        assert_eq!(
            parsed,
            Some(Utc.with_ymd_and_hms(2019, 3, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_padded_cell() {
        let parsed = try_parse_timestamp(" 2019-01-01 13:30:45 ");
        assert!(parsed.is_some());
    }

    #[test]
    fn test_garbage_is_none() {
        assert!(try_parse_timestamp("not a date").is_none());
        assert!(try_parse_timestamp("").is_none());
    }
}
