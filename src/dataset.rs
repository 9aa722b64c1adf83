//! The in-memory dataset of half-hourly counts.

use std::collections::HashSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::parser::parse_record;
use crate::timestamp::{TIMESTAMP_FORMAT, format_day, to_datetime};

/// Spacing between consecutive observations, in seconds.
pub const BUCKET_SECONDS: i64 = 30 * 60;

/// One half-hour observation: the number of vehicles counted in the window
/// starting at `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    count: u32,
    datetime: NaiveDateTime,
}

impl Entry {
    /// Creates an entry from a count and epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampOutOfRange`](crate::error::TrafficError::TimestampOutOfRange) if
    /// `timestamp` cannot be represented as a calendar instant.
    pub fn new(count: u32, timestamp: i64) -> Result<Self> {
        Ok(Self::from_datetime(count, to_datetime(timestamp)?))
    }

    pub(crate) fn from_datetime(count: u32, datetime: NaiveDateTime) -> Self {
        Self { count, datetime }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Start of the observation window in seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.datetime.and_utc().timestamp()
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    /// UTC calendar day the observation starts on.
    pub fn day(&self) -> NaiveDate {
        self.datetime.date()
    }

    /// The `YYYY-MM-DD` form of [`Entry::day`].
    pub fn day_string(&self) -> String {
        format_day(self.day())
    }

    /// The timestamp in record form, e.g. `2021-12-01T05:00:00`.
    pub fn timestamp_string(&self) -> String {
        self.datetime.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Renders the entry back in raw record form: `<count> <timestamp>`.
impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.timestamp_string())
    }
}

impl Serialize for Entry {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("Entry", 2)?;
        s.serialize_field("timestamp", &self.timestamp_string())?;
        s.serialize_field("count", &self.count)?;
        s.end()
    }
}

/// An ordered multiset of entries.
///
/// The order is only a view: duplicates are kept, and the sort methods
/// reorder in place for later queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    entries: Vec<Entry>,
}

impl Dataset {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Builds a dataset from raw record lines.
    ///
    /// A single empty final line (what a trailing newline leaves behind) is
    /// skipped. Any other line must be a valid record; the first bad line
    /// aborts construction.
    ///
    /// # Errors
    ///
    /// Returns [`TrafficError::MalformedRecord`](crate::error::TrafficError::MalformedRecord)
    /// for the first line that fails to parse.
    #[tracing::instrument(skip_all)]
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = lines.into_iter().enumerate().peekable();
        let mut entries = Vec::new();

        while let Some((idx, line)) = lines.next() {
            let line = line.as_ref();
            if lines.peek().is_none() && line.trim().is_empty() {
                debug!(line_number = idx + 1, "Skipping empty trailing line");
                break;
            }
            entries.push(parse_record(idx + 1, line)?);
        }

        let dataset = Self { entries };
        dataset.warn_on_duplicates();
        info!(
            entries = dataset.len(),
            total = dataset.total_count(),
            "Dataset built"
        );
        Ok(dataset)
    }

    /// Builds a dataset from a whole raw text blob, one record per line.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_lines(text.split('\n'))
    }

    fn warn_on_duplicates(&self) {
        let mut seen = HashSet::with_capacity(self.entries.len());
        let duplicates = self
            .entries
            .iter()
            .filter(|e| !seen.insert(e.timestamp()))
            .count();
        if duplicates > 0 {
            warn!(duplicates, "Dataset contains repeated timestamps");
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Stable in-place sort, earliest first.
    pub fn sort_by_timestamp(&mut self) {
        self.entries.sort_by_key(Entry::datetime);
    }

    /// Stable in-place sort, lowest count first.
    pub fn sort_by_count(&mut self) {
        self.entries.sort_by_key(Entry::count);
    }

    /// Sum of all counts; `0` for an empty dataset.
    ///
    /// Counts are `u32` and the sum is `u64`, so no realistic dataset can
    /// overflow it.
    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Vec<Entry>> for Dataset {
    fn from(entries: Vec<Entry>) -> Self {
        Self::new(entries)
    }
}
