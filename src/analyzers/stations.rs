use crate::analyzers::types::{StationPair, StationStats};
use crate::analyzers::utility::FrequencyTable;
use crate::error::AnalysisError;
use crate::trip::TripRecord;

/// Most used start station, end station, and start/end combination.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyResultSet`] for an empty collection.
pub fn station_stats(trips: &[&TripRecord]) -> Result<StationStats, AnalysisError> {
    let starts: FrequencyTable<&str> = trips.iter().map(|t| t.start_station()).collect();
    let ends: FrequencyTable<&str> = trips.iter().map(|t| t.end_station()).collect();
    let pairs: FrequencyTable<(&str, &str)> = trips
        .iter()
        .map(|t| (t.start_station(), t.end_station()))
        .collect();

    let (Some((start, start_count)), Some((end, end_count)), Some(((from, to), pair_count))) =
        (starts.mode(), ends.mode(), pairs.mode())
    else {
        return Err(AnalysisError::EmptyResultSet);
    };

    Ok(StationStats {
        top_start_station: start.to_string(),
        top_start_count: start_count,
        top_end_station: end.to_string(),
        top_end_count: end_count,
        top_pair: StationPair {
            start: from.to_string(),
            end: to.to_string(),
        },
        top_pair_count: pair_count,
    })
}
