//! Parser for raw `<count> <timestamp>` records.

use crate::dataset::Entry;
use crate::error::{Result, TrafficError};
use crate::timestamp::parse_datetime;

/// Decodes one raw record line into an [`Entry`].
///
/// `line_number` is 1-based and only used for error reporting.
///
/// # Errors
///
/// Returns [`TrafficError::MalformedRecord`] if the line does not hold exactly
/// two whitespace-separated tokens, if the count is not a decimal non-negative
/// integer, or if the timestamp fails to parse.
pub fn parse_record(line_number: usize, line: &str) -> Result<Entry> {
    let malformed = |reason: String| TrafficError::MalformedRecord {
        line_number,
        line: line.to_string(),
        reason,
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [count, timestamp] = tokens.as_slice() else {
        return Err(malformed(format!(
            "expected 2 whitespace-separated tokens, found {}",
            tokens.len()
        )));
    };

    let Some(count) = parse_count(count) else {
        return Err(malformed(format!("invalid count {count:?}")));
    };
    let datetime = parse_datetime(timestamp).map_err(|e| malformed(e.to_string()))?;

    Ok(Entry::from_datetime(count, datetime))
}

/// Counts are per half hour, so `u32` is ample and keeps every `u64` sum
/// over a dataset from overflowing.
///
/// `u32::from_str` also takes a leading `+`, which the record grammar does not.
fn parse_count(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
