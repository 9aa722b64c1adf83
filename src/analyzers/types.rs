//! Value types derived from a dataset.
//!
//! None of these borrow from the dataset; they hold copies.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::timestamp::TIMESTAMP_FORMAT;

/// Sum of counts for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    /// `YYYY-MM-DD`
    pub day: String,
    pub total: u64,
}

/// A maximal stretch of time-sorted entries spaced exactly one bucket apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContiguousRun {
    pub start: NaiveDateTime,
    /// Start of the run's final bucket.
    pub last_bucket: NaiveDateTime,
    pub entries: usize,
}

/// A fixed-length window inside a contiguous run, with its summed count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContiguousWindow {
    pub start: NaiveDateTime,
    /// Start of the window's final bucket.
    pub last_bucket: NaiveDateTime,
    pub entries: usize,
    pub total: u64,
}

impl ContiguousWindow {
    /// Window start in seconds since the Unix epoch.
    pub fn start_timestamp(&self) -> i64 {
        self.start.and_utc().timestamp()
    }

    pub fn start_string(&self) -> String {
        self.start.format(TIMESTAMP_FORMAT).to_string()
    }
}
