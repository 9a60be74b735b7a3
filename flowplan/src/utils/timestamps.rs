//! Timestamp helpers for progress events.

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Represents a timestamp that can be serialized/deserialized.
pub type Timestamp = DateTime<Utc>;

/// Errors that can occur during timestamp parsing.
#[derive(Debug, Error)]
pub enum TimestampError {
    /// The timestamp string is empty.
    #[error("Empty timestamp string")]
    EmptyString,

    /// The timestamp value is invalid.
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),
}

/// Returns the current UTC time as an ISO 8601 string with millisecond
/// precision, e.g. `2024-05-01T12:30:00.123Z`.
///
/// # Examples
///
/// ```
/// use flowplan::utils::iso_timestamp;
///
/// let ts = iso_timestamp();
/// assert!(ts.contains('T'));
/// assert!(ts.ends_with('Z'));
/// ```
#[must_use]
pub fn iso_timestamp() -> String {
    format_timestamp(&Utc::now())
}

/// Formats a timestamp the same way [`iso_timestamp`] does.
#[must_use]
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Returns the current UTC timestamp.
#[must_use]
pub fn now_utc() -> Timestamp {
    Utc::now()
}

/// Parses an RFC 3339 / ISO 8601 timestamp into UTC.
///
/// # Errors
///
/// Returns `TimestampError` if the input is empty or not RFC 3339.
pub fn parse_timestamp(input: &str) -> Result<Timestamp, TimestampError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(TimestampError::EmptyString);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| TimestampError::InvalidFormat(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_timestamp_round_trips() {
        let ts = iso_timestamp();
        let parsed = parse_timestamp(&ts).unwrap();
        assert_eq!(format_timestamp(&parsed), ts);
    }

    #[test]
    fn test_parse_offset_is_normalized() {
        let parsed = parse_timestamp("2024-01-15T12:30:00+02:00").unwrap();
        assert_eq!(format_timestamp(&parsed), "2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(parse_timestamp("  "), Err(TimestampError::EmptyString)));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(TimestampError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_now_utc_is_recent() {
        let before = now_utc();
        let parsed = parse_timestamp(&iso_timestamp()).unwrap();
        assert!(parsed >= before - chrono::Duration::seconds(1));
    }
}
