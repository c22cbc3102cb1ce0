//! Literal shapes shared across crates.
//!
//! Dates are accepted in a handful of common textual forms but always written
//! back in one fixed ISO-8601 form: `YYYY-MM-DDTHH:MM:SS.sssZ`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a date or timestamp string.
///
/// Accepts RFC 3339 (`2024-01-31T10:00:00Z`, `+02:00` offsets), naive
/// timestamps (interpreted as UTC) and bare dates (midnight UTC).
/// Returns `None` for anything that does not parse to a real calendar date,
/// so `2024-02-30` is rejected even though it looks like a date.
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Formats a timestamp in the fixed export form `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn to_iso8601(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Converts epoch milliseconds to a timestamp.
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Returns `true` if `text` has the shape of a document-store object
/// identifier: exactly 24 hexadecimal characters.
pub fn is_object_id(text: &str) -> bool {
    text.len() == 24 && text.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_forms() {
        let expected = "2024-01-31T10:30:00.000Z";
        for input in [
            "2024-01-31T10:30:00Z",
            "2024-01-31T12:30:00+02:00",
            "2024-01-31T10:30:00",
            "2024-01-31 10:30:00",
            "2024-01-31 10:30",
        ] {
            let parsed = parse_datetime(input).unwrap();
            assert_eq!(to_iso8601(&parsed), expected, "input: {}", input);
        }
        let date = parse_datetime("2024-01-31").unwrap();
        assert_eq!(to_iso8601(&date), "2024-01-31T00:00:00.000Z");
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse_datetime("2024-02-30").is_none());
        assert!(parse_datetime("2024-13-01T00:00:00Z").is_none());
        assert!(parse_datetime("yesterday").is_none());
        assert!(parse_datetime("").is_none());
    }

    #[test]
    fn keeps_milliseconds() {
        let parsed = parse_datetime("2024-01-31T10:30:00.123Z").unwrap();
        assert_eq!(to_iso8601(&parsed), "2024-01-31T10:30:00.123Z");
        let epoch = from_epoch_millis(0).unwrap();
        assert_eq!(to_iso8601(&epoch), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn object_id_shape() {
        assert!(is_object_id("507f1f77bcf86cd799439011"));
        assert!(is_object_id("507F1F77BCF86CD799439011"));
        assert!(!is_object_id("507f1f77bcf86cd79943901"));
        assert!(!is_object_id("507f1f77bcf86cd79943901z"));
    }
}
