//! Error types returned by the analysis core and the CSV loader.
//!
//! Nothing here aborts the process: every failure comes back to the caller
//! as a typed value so the CLI can decide whether to retry with new filters.

use std::fmt;

/// Which filter dimension a rejected token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Month,
    Weekday,
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterDimension::Month => f.write_str("month"),
            FilterDimension::Weekday => f.write_str("weekday"),
        }
    }
}

/// Failures of a single analysis run.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A month or weekday token outside the recognized vocabulary
    #[error("invalid {dimension} filter value: '{value}'")]
    InvalidFilterValue {
        dimension: FilterDimension,
        value: String,
    },

    /// The filtered collection has no records to aggregate
    #[error("no data matches these filters")]
    EmptyResultSet,

    /// City key not present in the dataset catalog
    #[error("unknown city: '{0}'")]
    UnknownCity(String),

    /// The dataset could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Failures while reading a trip dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from the header row
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Failures while reading a city catalog override file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("reading city catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing city catalog {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::InvalidFilterValue {
            dimension: FilterDimension::Month,
            value: "july".into(),
        };
        assert_eq!(err.to_string(), "invalid month filter value: 'july'");

        let err = AnalysisError::EmptyResultSet;
        assert_eq!(err.to_string(), "no data matches these filters");

        let err = AnalysisError::UnknownCity("boston".into());
        assert_eq!(err.to_string(), "unknown city: 'boston'");

        let err = LoadError::MissingColumn("Start Time");
        assert_eq!(
            err.to_string(),
            "dataset is missing required column 'Start Time'"
        );
    }

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Io {
            path: "cities.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "reading city catalog cities.json: not found");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_load_error_is_transparent() {
        let err = AnalysisError::from(LoadError::MissingColumn("End Station"));
        assert_eq!(
            err.to_string(),
            "dataset is missing required column 'End Station'"
        );
    }
}
