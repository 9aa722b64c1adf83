//! Loads raw record text from disk.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::dataset::Dataset;

/// Reads the whole source file as UTF-8 text.
///
/// # Errors
///
/// Returns an error naming the path if the file is missing, unreadable or not
/// valid UTF-8.
pub fn read_source(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read traffic data from {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "Source loaded");
    Ok(text)
}

/// Reads the source file and builds a [`Dataset`] from it.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let text = read_source(&path)?;
    let dataset = Dataset::from_text(&text)
        .with_context(|| format!("invalid traffic data in {}", path.as_ref().display()))?;
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrafficError;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_source(temp_path("traffic_counter_does_not_exist.txt")).unwrap_err();
        assert!(err.to_string().contains("traffic_counter_does_not_exist.txt"));
    }

    #[test]
    fn test_load_dataset_from_file() {
        let path = temp_path("traffic_counter_test_load.txt");
        fs::write(&path, "5 2021-12-01T05:00:00\n12 2021-12-01T05:30:00\n").unwrap();

        let data = load_dataset(&path).unwrap();
        assert_eq!(data.len(), 2);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_dataset_rejects_bad_line() {
        let path = temp_path("traffic_counter_test_bad.txt");
        fs::write(&path, "5 2021-12-01T05:00:00\nabc 2021-12-01T00:00:00\n").unwrap();

        let err = load_dataset(&path).unwrap_err();
        match err.downcast_ref::<TrafficError>() {
            Some(TrafficError::MalformedRecord { line_number, .. }) => {
                assert_eq!(*line_number, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        fs::remove_file(&path).unwrap();
    }
}
