use crate::analyzers::aggregate::totals_by_day;
use crate::analyzers::ranking::{lowest_contiguous_window, top_k};
use crate::analyzers::types::{ContiguousWindow, DailyTotal};
use crate::dataset::{Dataset, Entry};
use crate::error::{Result, TrafficError};
use serde::Serialize;
use tracing::info;

/// Everything the summary report shows, computed in one pass over a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub total: u64,
    /// Calendar order.
    pub daily_totals: Vec<DailyTotal>,
    /// Highest count first.
    pub top: Vec<Entry>,
    pub window_seconds: i64,
    /// `None` when no contiguous run is long enough for the window.
    pub lowest_window: Option<ContiguousWindow>,
}

impl Report {
    /// Builds the report without reordering the caller's dataset.
    ///
    /// A missing eligible window is not an error here; it leaves
    /// `lowest_window` empty. Every other failure is returned.
    #[tracing::instrument(skip(dataset), fields(entries = dataset.len()))]
    pub fn build(dataset: &Dataset, top: usize, window_seconds: i64) -> Result<Self> {
        let lowest_window = match lowest_contiguous_window(dataset, window_seconds) {
            Ok(window) => Some(window),
            Err(TrafficError::NoEligibleWindow { longest_run, .. }) => {
                info!(longest_run, "No contiguous run covers the window");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Report {
            total: dataset.total_count(),
            daily_totals: totals_by_day(dataset),
            top: top_k(dataset, top)?,
            window_seconds,
            lowest_window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_lines([
            "33 2021-12-08T18:00:00",
            "5 2021-12-01T05:00:00",
            "12 2021-12-01T05:30:00",
            "14 2021-12-01T06:00:00",
            "4 2021-12-09T00:00:00",
        ])
        .unwrap()
    }

    #[test]
    fn test_build_report() {
        let report = Report::build(&sample(), 2, 90 * 60).unwrap();

        assert_eq!(report.total, 68);
        let days: Vec<&str> = report
            .daily_totals
            .iter()
            .map(|t| t.day.as_str())
            .collect();
        assert_eq!(days, vec!["2021-12-01", "2021-12-08", "2021-12-09"]);
        assert_eq!(report.top[0].count(), 33);
        assert_eq!(report.top[1].count(), 14);
        assert_eq!(report.lowest_window.map(|w| w.total), Some(31));
    }

    #[test]
    fn test_build_without_eligible_window() {
        let report = Report::build(&sample(), 1, 4 * 60 * 60).unwrap();
        assert!(report.lowest_window.is_none());
    }

    #[test]
    fn test_build_propagates_ranking_errors() {
        assert!(matches!(
            Report::build(&sample(), 10, 90 * 60),
            Err(TrafficError::InsufficientData { .. })
        ));
        assert!(matches!(
            Report::build(&sample(), 1, 45 * 60),
            Err(TrafficError::InvalidWindow { .. })
        ));
    }
}
