use tracing::warn;

use crate::analyzers::types::DurationStats;
use crate::analyzers::utility::{mean, round2};
use crate::error::AnalysisError;
use crate::trip::TripRecord;

/// Total travel time in hours and mean trip length in minutes, both rounded
/// to two decimals.
///
/// Trips that end before they start keep their negative duration and count
/// toward the total and mean; they are reported in `negative_trips`.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyResultSet`] for an empty collection.
pub fn duration_stats(trips: &[&TripRecord]) -> Result<DurationStats, AnalysisError> {
    if trips.is_empty() {
        return Err(AnalysisError::EmptyResultSet);
    }

    let minutes: Vec<f64> = trips.iter().map(|t| t.duration_minutes()).collect();
    let negative_trips = trips.iter().filter(|t| t.duration_seconds() < 0).count();

    if negative_trips > 0 {
        warn!(negative_trips, "Trips end before they start; durations kept as-is");
    }

    let total_minutes: f64 = minutes.iter().sum();

    Ok(DurationStats {
        total_travel_hours: round2(total_minutes / 60.0),
        mean_travel_minutes: round2(mean(&minutes)),
        trip_count: trips.len(),
        negative_trips,
    })
}
