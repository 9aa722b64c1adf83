use crate::analyzers::types::DailyTotal;
use crate::dataset::Dataset;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Lists the distinct UTC days present, in first-occurrence order of the
/// dataset's current ordering.
///
/// Sort the dataset by timestamp first to get calendar order.
pub fn unique_days(dataset: &Dataset) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut days = Vec::new();

    for entry in dataset {
        let day = entry.day_string();
        if seen.insert(day.clone()) {
            days.push(day);
        }
    }

    days
}

/// Sums counts per requested day, one [`DailyTotal`] per input day in input
/// order. Days with no entries total `0`.
pub fn daily_totals<S: AsRef<str>>(dataset: &Dataset, days: &[S]) -> Vec<DailyTotal> {
    let mut by_day: HashMap<String, u64> = HashMap::new();
    for entry in dataset {
        *by_day.entry(entry.day_string()).or_default() += u64::from(entry.count());
    }

    days.iter()
        .map(|day| {
            let day = day.as_ref();
            let total = by_day.get(day).copied().unwrap_or(0);
            debug!(day, total, "Daily total");
            DailyTotal {
                day: day.to_string(),
                total,
            }
        })
        .collect()
}

/// Per-day totals for every day present, in calendar order.
///
/// Leaves the caller's dataset ordering untouched.
pub fn totals_by_day(dataset: &Dataset) -> Vec<DailyTotal> {
    let mut sorted = dataset.clone();
    sorted.sort_by_timestamp();
    daily_totals(&sorted, &unique_days(&sorted))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_lines([
            "4 2021-12-09T00:00:00",
            "5 2021-12-01T05:00:00",
            "18 2021-12-05T09:30:00",
            "12 2021-12-01T05:30:00",
            "11 2021-12-08T23:00:00",
        ])
        .unwrap()
    }

    #[test]
    fn test_unique_days_first_occurrence_order() {
        let days = unique_days(&sample());
        assert_eq!(
            days,
            vec!["2021-12-09", "2021-12-01", "2021-12-05", "2021-12-08"]
        );
    }

    #[test]
    fn test_unique_days_calendar_order_after_sort() {
        let mut data = sample();
        data.sort_by_timestamp();
        assert_eq!(
            unique_days(&data),
            vec!["2021-12-01", "2021-12-05", "2021-12-08", "2021-12-09"]
        );
    }

    #[test]
    fn test_daily_totals_follow_input_order() {
        let totals = daily_totals(&sample(), &["2021-12-05", "2021-12-01"]);
        assert_eq!(
            totals,
            vec![
                DailyTotal {
                    day: "2021-12-05".into(),
                    total: 18,
                },
                DailyTotal {
                    day: "2021-12-01".into(),
                    total: 17,
                },
            ]
        );
    }

    #[test]
    fn test_daily_totals_missing_day_is_zero() {
        let totals = daily_totals(&sample(), &["2021-12-02"]);
        assert_eq!(totals[0].total, 0);
    }

    #[test]
    fn test_daily_totals_no_partial_matches() {
        // "2021-12-0" is a prefix of every day in the sample
        let totals = daily_totals(&sample(), &["2021-12-0", "12-01"]);
        assert!(totals.iter().all(|t| t.total == 0));
    }

    #[test]
    fn test_totals_partition_total_count() {
        let data = sample();
        let totals = daily_totals(&data, &unique_days(&data));
        let sum: u64 = totals.iter().map(|t| t.total).sum();
        assert_eq!(sum, data.total_count());
    }

    #[test]
    fn test_totals_by_day_keeps_caller_order() {
        let data = sample();
        let totals = totals_by_day(&data);
        assert_eq!(totals.first().map(|t| t.day.as_str()), Some("2021-12-01"));
        assert_eq!(data.entries()[0].count(), 4);
    }

    #[test]
    fn test_daily_total_of_maximal_counts() {
        let data = Dataset::from_lines([
            "4294967295 2021-12-01T05:00:00",
            "4294967295 2021-12-01T05:30:00",
            "4294967295 2021-12-01T06:00:00",
        ])
        .unwrap();
        let totals = daily_totals(&data, &["2021-12-01"]);
        assert_eq!(totals[0].total, 3 * u64::from(u32::MAX));
    }

    #[test]
    fn test_empty_dataset() {
        let data = Dataset::default();
        assert!(unique_days(&data).is_empty());
        assert!(totals_by_day(&data).is_empty());
    }
}
