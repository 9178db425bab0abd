//! Orchestration of one analysis run: load, filter, aggregate.
//!
//! The session keeps no state between runs. Every run builds its own
//! filtered view and result records and hands them back to the caller.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analyzers::types::{DurationStats, RiderStats, StationStats, TimeStats};
use crate::analyzers::{duration_stats, rider_stats, station_stats, time_stats};
use crate::calendar::Calendar;
use crate::error::AnalysisError;
use crate::filter::{FilterCriteria, filter};
use crate::loader::{LoadReport, LoadedTrips, TripSource};
use crate::trip::TripRecord;

/// How the four aggregators are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// Fan the aggregators out on the rayon pool.
    Parallel,
}

/// One city plus the filter to apply to it.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub city: String,
    pub criteria: FilterCriteria,
}

impl RunRequest {
    pub fn new(city: impl Into<String>, criteria: FilterCriteria) -> Self {
        Self {
            city: city.into(),
            criteria,
        }
    }
}

/// The four aggregate results over one filtered collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub riders: RiderStats,
}

/// Everything a presenter needs about one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub city: String,
    pub criteria: FilterCriteria,
    pub load: LoadReport,
    pub matched: usize,
    pub summary: TripSummary,
}

/// Runs all four aggregators over `trips`.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyResultSet`] before any aggregator runs if
/// `trips` is empty.
pub fn summarize(
    trips: &[&TripRecord],
    mode: ExecutionMode,
) -> Result<TripSummary, AnalysisError> {
    if trips.is_empty() {
        return Err(AnalysisError::EmptyResultSet);
    }

    let (time, stations, durations, riders) = match mode {
        ExecutionMode::Sequential => (
            time_stats(trips),
            station_stats(trips),
            duration_stats(trips),
            rider_stats(trips),
        ),
        ExecutionMode::Parallel => {
            let ((time, stations), (durations, riders)) = rayon::join(
                || rayon::join(|| time_stats(trips), || station_stats(trips)),
                || rayon::join(|| duration_stats(trips), || rider_stats(trips)),
            );
            (time, stations, durations, riders)
        }
    };

    Ok(TripSummary {
        time: time?,
        stations: stations?,
        durations: durations?,
        riders: riders?,
    })
}

/// Drives runs against a [`TripSource`].
pub struct AnalysisSession<'a, S> {
    source: S,
    calendar: &'a Calendar,
    mode: ExecutionMode,
}

impl<'a, S: TripSource> AnalysisSession<'a, S> {
    pub fn new(source: S, calendar: &'a Calendar) -> Self {
        Self {
            source,
            calendar,
            mode: ExecutionMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Loads the dataset for `city` from the source.
    pub fn load(&self, city: &str) -> Result<LoadedTrips, AnalysisError> {
        self.source.load(city)
    }

    /// Loads, filters, and aggregates a single request.
    #[tracing::instrument(skip_all, fields(city = %request.city))]
    pub fn run(&self, request: &RunRequest) -> Result<AnalysisReport, AnalysisError> {
        let loaded = self.load(&request.city)?;
        self.analyze(&loaded, &request.city, &request.criteria)
    }

    /// Loads `city` once and runs every criteria set against it.
    ///
    /// The outer error is a load failure; each inner result is independent,
    /// so an empty month does not stop the others.
    #[tracing::instrument(skip_all, fields(city = %city, runs = filters.len()))]
    pub fn run_filters(
        &self,
        city: &str,
        filters: &[FilterCriteria],
    ) -> Result<Vec<Result<AnalysisReport, AnalysisError>>, AnalysisError> {
        let loaded = self.load(city)?;
        Ok(filters
            .iter()
            .map(|criteria| self.analyze(&loaded, city, criteria))
            .collect())
    }

    /// Filters an already loaded dataset and aggregates the result.
    #[tracing::instrument(
        skip_all,
        fields(month = criteria.month(), weekday = criteria.weekday())
    )]
    pub fn analyze(
        &self,
        loaded: &LoadedTrips,
        city: &str,
        criteria: &FilterCriteria,
    ) -> Result<AnalysisReport, AnalysisError> {
        let trips = filter(&loaded.records, criteria, self.calendar)?;
        debug!(
            loaded = loaded.records.len(),
            matched = trips.len(),
            "Collection filtered"
        );

        let summary = match summarize(&trips, self.mode) {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "Run aborted");
                return Err(e);
            }
        };

        info!(matched = trips.len(), "Run complete");
        Ok(AnalysisReport {
            city: city.to_string(),
            criteria: criteria.clone(),
            load: loaded.report.clone(),
            matched: trips.len(),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::fixtures::trip;
    use crate::analyzers::types::{FieldValue, StationPair};
    use std::collections::HashMap;

    struct MemorySource(HashMap<String, Vec<TripRecord>>);

    impl TripSource for MemorySource {
        fn load(&self, city: &str) -> Result<LoadedTrips, AnalysisError> {
            let records = self
                .0
                .get(city)
                .cloned()
                .ok_or_else(|| AnalysisError::UnknownCity(city.to_string()))?;
            Ok(LoadedTrips {
                report: LoadReport {
                    rows_read: records.len(),
                    ..Default::default()
                },
                records,
            })
        }
    }

    fn source() -> MemorySource {
        let records = vec![
            trip("2024-01-01T08:00", "2024-01-01T08:15", "A", "B"),
            trip("2024-01-02T08:00", "2024-01-02T08:05", "A", "B"),
            trip("2024-02-07T17:30", "2024-02-07T17:50", "C", "A")
                .with_user_type(Some("Customer".into())),
        ];
        MemorySource(HashMap::from([("testville".to_string(), records)]))
    }

    #[test]
    fn test_run_january() {
        let calendar = Calendar::bikeshare();
        let session = AnalysisSession::new(source(), &calendar);
        let report = session
            .run(&RunRequest::new(
                "testville",
                FilterCriteria::new("january", "all"),
            ))
            .unwrap();

        assert_eq!(report.matched, 2);
        assert_eq!(report.criteria.month(), "January");
        assert_eq!(report.summary.durations.total_travel_hours, 0.33);
        assert_eq!(report.summary.durations.mean_travel_minutes, 10.0);
        assert_eq!(
            report.summary.stations.top_pair,
            StationPair {
                start: "A".into(),
                end: "B".into()
            }
        );
        assert_eq!(report.summary.stations.top_pair_count, 2);
        assert_eq!(report.summary.time.mode_weekday, "Monday");
        assert_eq!(report.summary.riders.user_types, FieldValue::Absent);
    }

    #[test]
    fn test_run_with_no_matches() {
        let calendar = Calendar::bikeshare();
        let session = AnalysisSession::new(source(), &calendar);
        let result = session.run(&RunRequest::new(
            "testville",
            FilterCriteria::new("january", "wednesday"),
        ));
        assert!(matches!(result, Err(AnalysisError::EmptyResultSet)));
    }

    #[test]
    fn test_run_with_invalid_filter() {
        let calendar = Calendar::bikeshare();
        let session = AnalysisSession::new(source(), &calendar);
        let result = session.run(&RunRequest::new(
            "testville",
            FilterCriteria::new("december", "all"),
        ));
        assert!(matches!(
            result,
            Err(AnalysisError::InvalidFilterValue { .. })
        ));
    }

    #[test]
    fn test_run_unknown_city() {
        let calendar = Calendar::bikeshare();
        let session = AnalysisSession::new(source(), &calendar);
        let result = session.run(&RunRequest::new("nowhere", FilterCriteria::all()));
        assert!(matches!(result, Err(AnalysisError::UnknownCity(_))));
    }

    #[test]
    fn test_run_filters_are_independent() {
        let calendar = Calendar::bikeshare();
        let session = AnalysisSession::new(source(), &calendar);
        let filters = vec![
            FilterCriteria::new("january", "all"),
            FilterCriteria::new("march", "all"),
            FilterCriteria::new("february", "all"),
        ];
        let results = session.run_filters("testville", &filters).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().matched, 2);
        assert!(matches!(results[1], Err(AnalysisError::EmptyResultSet)));
        let feb = results[2].as_ref().unwrap();
        assert_eq!(feb.matched, 1);
        assert_eq!(feb.summary.stations.top_start_station, "C");
        assert!(!feb.summary.riders.user_types.is_absent());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let calendar = Calendar::bikeshare();
        let request = RunRequest::new("testville", FilterCriteria::all());

        let sequential = AnalysisSession::new(source(), &calendar)
            .run(&request)
            .unwrap();
        let parallel = AnalysisSession::new(source(), &calendar)
            .with_mode(ExecutionMode::Parallel)
            .run(&request)
            .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_summarize_empty_rejected_in_both_modes() {
        assert!(matches!(
            summarize(&[], ExecutionMode::Sequential),
            Err(AnalysisError::EmptyResultSet)
        ));
        assert!(matches!(
            summarize(&[], ExecutionMode::Parallel),
            Err(AnalysisError::EmptyResultSet)
        ));
    }
}
