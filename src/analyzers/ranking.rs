//! Ranking by count and contiguous-window search.
//!
//! Both rankings sort a copy of the entries with a stable sort, so equal
//! counts keep the relative order they have in the dataset. [`top_k`] is
//! exactly "sort ascending by count, take the last `k`, reverse".
//!
//! Window search works on time-sorted entries split into contiguous runs:
//! maximal stretches where each entry starts one [`BUCKET_SECONDS`] after the
//! previous. A window of `n` buckets is eligible only if it sits entirely
//! inside one run.

use crate::analyzers::types::{ContiguousRun, ContiguousWindow};
use crate::dataset::{BUCKET_SECONDS, Dataset, Entry};
use crate::error::{Result, TrafficError};
use tracing::debug;

fn ensure_available(dataset: &Dataset, k: usize) -> Result<()> {
    if k > dataset.len() {
        return Err(TrafficError::InsufficientData {
            requested: k,
            available: dataset.len(),
        });
    }
    Ok(())
}

fn sorted_by_count(dataset: &Dataset) -> Vec<Entry> {
    let mut entries = dataset.entries().to_vec();
    entries.sort_by_key(Entry::count);
    entries
}

/// The `k` busiest entries, highest count first.
///
/// # Errors
///
/// Returns [`TrafficError::InsufficientData`] if `k` exceeds the dataset size.
pub fn top_k(dataset: &Dataset, k: usize) -> Result<Vec<Entry>> {
    ensure_available(dataset, k)?;

    let sorted = sorted_by_count(dataset);
    let top: Vec<Entry> = sorted[sorted.len() - k..].iter().rev().copied().collect();

    debug!(k, counts = ?top.iter().map(Entry::count).collect::<Vec<_>>(), "Top entries");
    Ok(top)
}

/// The `k` quietest entries, lowest count first.
///
/// # Errors
///
/// Returns [`TrafficError::InsufficientData`] if `k` exceeds the dataset size.
pub fn bottom_k(dataset: &Dataset, k: usize) -> Result<Vec<Entry>> {
    ensure_available(dataset, k)?;

    let mut sorted = sorted_by_count(dataset);
    sorted.truncate(k);
    Ok(sorted)
}

fn sorted_by_time(dataset: &Dataset) -> Vec<Entry> {
    let mut entries = dataset.entries().to_vec();
    entries.sort_by_key(Entry::datetime);
    entries
}

fn runs(sorted: &[Entry]) -> impl Iterator<Item = &[Entry]> {
    sorted.chunk_by(|a, b| b.timestamp() - a.timestamp() == BUCKET_SECONDS)
}

/// Splits the time-sorted entries into maximal contiguous runs, earliest
/// first. Repeated timestamps break a run.
pub fn contiguous_runs(dataset: &Dataset) -> Vec<ContiguousRun> {
    let sorted = sorted_by_time(dataset);
    runs(&sorted)
        .map(|run| ContiguousRun {
            start: run[0].datetime(),
            last_bucket: run[run.len() - 1].datetime(),
            entries: run.len(),
        })
        .collect()
}

fn buckets_in(window_seconds: i64) -> Result<usize> {
    let invalid = TrafficError::InvalidWindow {
        seconds: window_seconds,
    };
    if window_seconds <= 0 || window_seconds % BUCKET_SECONDS != 0 {
        return Err(invalid);
    }
    usize::try_from(window_seconds / BUCKET_SECONDS).map_err(|_| invalid)
}

/// Every eligible window of `window_seconds`, lowest sum first; equal sums
/// are ordered by earliest start.
///
/// # Errors
///
/// - [`TrafficError::InvalidWindow`] if `window_seconds` is not a positive
///   multiple of [`BUCKET_SECONDS`].
/// - [`TrafficError::NoEligibleWindow`] if no contiguous run is long enough.
pub fn contiguous_windows(
    dataset: &Dataset,
    window_seconds: i64,
) -> Result<Vec<ContiguousWindow>> {
    let width = buckets_in(window_seconds)?;
    let sorted = sorted_by_time(dataset);

    let mut longest_run = 0;
    let mut windows = Vec::new();

    for run in runs(&sorted) {
        longest_run = longest_run.max(run.len());
        for w in run.windows(width) {
            windows.push(ContiguousWindow {
                start: w[0].datetime(),
                last_bucket: w[width - 1].datetime(),
                entries: width,
                total: w.iter().map(|e| u64::from(e.count())).sum(),
            });
        }
    }

    if windows.is_empty() {
        return Err(TrafficError::NoEligibleWindow {
            window_seconds,
            longest_run,
        });
    }

    // windows were collected in start order, so the stable sort keeps the
    // earliest start first among equal sums
    windows.sort_by_key(|w| w.total);
    debug!(
        window_seconds,
        eligible = windows.len(),
        longest_run,
        "Ranked contiguous windows"
    );
    Ok(windows)
}

/// The eligible window of `window_seconds` with the smallest summed count,
/// earliest start on ties.
///
/// # Errors
///
/// Same as [`contiguous_windows`].
pub fn lowest_contiguous_window(
    dataset: &Dataset,
    window_seconds: i64,
) -> Result<ContiguousWindow> {
    // contiguous_windows errors rather than return an empty list
    let mut windows = contiguous_windows(dataset, window_seconds)?;
    Ok(windows.swap_remove(0))
}
