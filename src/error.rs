//! Error types for dataset construction and queries.

use thiserror::Error;

/// Result type for traffic-count operations.
pub type Result<T> = std::result::Result<T, TrafficError>;

/// Failures reported by the codec, the dataset model and the query engines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrafficError {
    /// Text does not match `YYYY-MM-DDTHH:MM:SS` or names an impossible instant.
    #[error("malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    /// Epoch seconds outside the range chrono can represent.
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    /// A raw line that does not follow `<count> <timestamp>`.
    #[error("malformed record on line {line_number}: {reason} ({line:?})")]
    MalformedRecord {
        line_number: usize,
        line: String,
        reason: String,
    },

    /// A ranking request asked for more entries than the dataset holds.
    #[error("insufficient data: requested {requested} entries, dataset has {available}")]
    InsufficientData {
        requested: usize,
        available: usize,
    },

    /// Window length must be a positive multiple of the bucket interval.
    #[error("invalid window of {seconds}s: must be a positive multiple of the bucket interval")]
    InvalidWindow { seconds: i64 },

    /// No contiguous run is long enough to hold the requested window.
    #[error("no contiguous run fits a {window_seconds}s window (longest run: {longest_run})")]
    NoEligibleWindow {
        window_seconds: i64,
        longest_run: usize,
    },
}
