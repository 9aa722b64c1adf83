//! Output formatting and persistence for derived results.
//!
//! Supports plain-text lines, JSON serialization, and CSV append.

use anyhow::Result;
use tracing::debug;

use crate::analyzers::report::Report;
use crate::analyzers::types::{ContiguousWindow, DailyTotal};
use crate::dataset::Entry;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Writes one `YYYY-MM-DD <total>` line per day.
pub fn write_daily_totals<W: Write>(out: &mut W, totals: &[DailyTotal]) -> Result<()> {
    for t in totals {
        writeln!(out, "{} {}", t.day, t.total)?;
    }
    Ok(())
}

/// Writes entries in raw record form, one per line.
pub fn write_entries<W: Write>(out: &mut W, entries: &[Entry]) -> Result<()> {
    for e in entries {
        writeln!(out, "{} {}", e.timestamp_string(), e.count())?;
    }
    Ok(())
}

/// Writes `<start> <total>` per window.
pub fn write_windows<W: Write>(out: &mut W, windows: &[ContiguousWindow]) -> Result<()> {
    for w in windows {
        writeln!(out, "{} {}", w.start_string(), w.total)?;
    }
    Ok(())
}

/// Writes the full report as human-readable sections.
pub fn write_text<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    writeln!(out, "Total cars counted: {}", report.total)?;

    writeln!(out, "\nTotals by day:")?;
    write_daily_totals(out, &report.daily_totals)?;

    let top = report.top.len();
    writeln!(out, "\nTop {top} half hours with the most cars:")?;
    write_entries(out, &report.top)?;

    let minutes = report.window_seconds / 60;
    writeln!(out, "\nThe {minutes}-minute period with the fewest cars:")?;
    match &report.lowest_window {
        Some(w) => write_windows(out, std::slice::from_ref(w))?,
        None => writeln!(out, "none (no unbroken {minutes}-minute run in the data)")?,
    }

    Ok(())
}

/// Writes the report as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Appends [`DailyTotal`] rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_daily_totals(path: &str, totals: &[DailyTotal]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(
        path,
        file_exists,
        rows = totals.len(),
        "Appending CSV records"
    );

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for total in totals {
        writer.serialize(total)?;
    }
    writer.flush()?;

    Ok(())
}
