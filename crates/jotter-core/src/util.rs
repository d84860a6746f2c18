//! Shared utility functions used across multiple modules.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Format a UTC instant the way note timestamps are stored
/// (`YYYY-MM-DDTHH:MM:SS.mmmZ`).
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored note timestamp.
pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Microseconds since the epoch for a stored timestamp, if it parses.
pub fn modification_instant(value: &str) -> Option<i64> {
    parse_iso(value).map(|parsed| parsed.timestamp_micros())
}

/// Order two modification dates by the instant they name.
///
/// Falls back to text order when either side does not parse.
pub fn compare_modification_dates(a: &str, b: &str) -> Ordering {
    match (parse_iso(a), parse_iso(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// A fresh modification timestamp strictly after `previous`.
///
/// Uses the wall clock, bumped by one millisecond when the clock has not
/// advanced past `previous` (fast repeated actions, clock skew).
pub fn next_modification_date(previous: Option<&str>) -> String {
    let now = Utc::now();
    let Some(previous) = previous.and_then(parse_iso) else {
        return iso_timestamp(now);
    };
    if now > previous {
        iso_timestamp(now)
    } else {
        iso_timestamp(previous + Duration::milliseconds(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ".to_string())), None);
    }

    #[test]
    fn normalize_text_option_trims_value() {
        assert_eq!(
            normalize_text_option(Some("  hello ".to_string())),
            Some("hello".to_string())
        );
    }

    #[test]
    fn iso_timestamp_uses_millis_and_zulu() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T10:20:30.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(iso_timestamp(at), "2024-05-01T10:20:30.123Z");
    }

    #[test]
    fn next_modification_date_bumps_future_previous() {
        let next = next_modification_date(Some("2999-01-01T00:00:00.000Z"));
        assert_eq!(next, "2999-01-01T00:00:00.001Z");
    }

    #[test]
    fn next_modification_date_is_strictly_increasing() {
        let mut previous = next_modification_date(None);
        for _ in 0..50 {
            let next = next_modification_date(Some(&previous));
            assert!(next > previous, "{next} should sort after {previous}");
            previous = next;
        }
    }

    #[test]
    fn modification_dates_compare_as_instants() {
        assert_eq!(
            compare_modification_dates("2024-01-01T12:00:00.000+05:00", "2024-01-01T10:00:00.000Z"),
            Ordering::Less
        );
        assert_eq!(
            compare_modification_dates("2024-01-01T10:00:01Z", "2024-01-01T10:00:00.500Z"),
            Ordering::Greater
        );
        assert_eq!(
            compare_modification_dates("2024-01-01T07:00:00.000Z", "2024-01-01T12:00:00+05:00"),
            Ordering::Equal
        );
        assert_eq!(compare_modification_dates("garbage", "2024"), Ordering::Greater);
    }

    #[test]
    fn modification_instant_parses_offsets() {
        assert_eq!(
            modification_instant("1970-01-01T01:00:00.001+01:00"),
            Some(1_000)
        );
        assert_eq!(modification_instant("not a date"), None);
    }

    #[test]
    fn next_modification_date_ignores_unparseable_previous() {
        let next = next_modification_date(Some("yesterday"));
        assert!(parse_iso(&next).is_some());
    }
}
