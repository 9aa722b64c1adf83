//! Conversions between record timestamps and epoch seconds.
//!
//! Record timestamps are `YYYY-MM-DDTHH:MM:SS` wall-clock values with no offset
//! suffix; they are always interpreted as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Result, TrafficError};

/// `chrono` format of a record timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// `chrono` format of a calendar day.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Checks the fixed-width layout before handing the text to chrono, which is
/// more lenient about field widths and signs than the record grammar allows.
fn has_timestamp_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 19
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b'T',
            13 | 16 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}

/// Parses a record timestamp into a naive UTC date-time.
///
/// # Errors
///
/// Returns [`TrafficError::MalformedTimestamp`] if the text is not exactly
/// `YYYY-MM-DDTHH:MM:SS` or names a date/time that does not exist.
pub fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    if !has_timestamp_shape(text) {
        return Err(TrafficError::MalformedTimestamp(text.to_string()));
    }

    let dt = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|_| TrafficError::MalformedTimestamp(text.to_string()))?;

    // chrono accepts ":60" as a leap second, which has no epoch-seconds form of its own
    if dt.nanosecond() >= 1_000_000_000 {
        return Err(TrafficError::MalformedTimestamp(text.to_string()));
    }

    Ok(dt)
}

/// Parses a record timestamp into seconds since the Unix epoch.
pub fn parse_timestamp(text: &str) -> Result<i64> {
    Ok(parse_datetime(text)?.and_utc().timestamp())
}

/// Converts epoch seconds into a naive UTC date-time.
pub fn to_datetime(secs: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.naive_utc())
        .ok_or(TrafficError::TimestampOutOfRange(secs))
}

/// Renders epoch seconds in the record grammar, without any offset suffix.
pub fn format_timestamp(secs: i64) -> Result<String> {
    Ok(to_datetime(secs)?.format(TIMESTAMP_FORMAT).to_string())
}

/// Returns the UTC calendar date of an instant.
pub fn date_of(secs: i64) -> Result<NaiveDate> {
    Ok(to_datetime(secs)?.date())
}

/// Returns the UTC calendar date of an instant as `YYYY-MM-DD`.
pub fn day_of(secs: i64) -> Result<String> {
    Ok(format_day(date_of(secs)?))
}

/// Renders a calendar date as `YYYY-MM-DD`.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_instant() {
        assert_eq!(parse_timestamp("2021-12-01T05:00:00").unwrap(), 1638334800);
        assert_eq!(parse_timestamp("2021-12-09T00:00:00").unwrap(), 1639008000);
        assert_eq!(parse_timestamp("1970-01-01T00:00:00").unwrap(), 0);
    }

    #[test]
    fn test_format_has_no_offset_suffix() {
        let text = format_timestamp(1638334800).unwrap();
        assert_eq!(text, "2021-12-01T05:00:00");
        assert_eq!(format_timestamp(-1).unwrap(), "1969-12-31T23:59:59");
    }

    #[test]
    fn test_round_trip() {
        for t in [0, 1, -1, 1638334800, 1639008000, 4102444799] {
            let text = format_timestamp(t).unwrap();
            assert_eq!(parse_timestamp(&text).unwrap(), t, "round trip of {text}");
        }
    }

    #[test]
    fn test_rejects_grammar_violations() {
        let bad = [
            "",
            "2021-12-01",
            "2021-12-01 05:00:00",
            "2021-12-01T05:00:00Z",
            "2021-12-01T05:00:00+00:00",
            "2021-12-01T05:00:00.5",
            "2021-2-01T05:00:00",
            "21-12-01T05:00:00",
            "2021-12-01T5:00:00",
            "+021-12-01T05:00:00",
            "2021/12/01T05:00:00",
        ];
        for text in bad {
            let result = parse_timestamp(text);
            assert!(
                matches!(result, Err(TrafficError::MalformedTimestamp(_))),
                "expected {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_impossible_dates() {
        for text in [
            "2021-13-01T05:00:00",
            "2021-02-30T05:00:00",
            "2021-12-01T24:00:00",
            "2021-12-01T05:60:00",
            "2021-12-31T23:59:60",
        ] {
            assert!(
                parse_timestamp(text).is_err(),
                "expected {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_day_of_truncates_in_utc() {
        let last_second = parse_timestamp("2021-12-08T23:59:59").unwrap();
        assert_eq!(day_of(last_second).unwrap(), "2021-12-08");
        assert_eq!(day_of(last_second + 1).unwrap(), "2021-12-09");
    }

    #[test]
    fn test_out_of_range_epoch() {
        assert_eq!(
            format_timestamp(i64::MAX),
            Err(TrafficError::TimestampOutOfRange(i64::MAX))
        );
        assert!(day_of(i64::MIN).is_err());
    }
}
