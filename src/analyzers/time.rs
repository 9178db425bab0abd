use crate::analyzers::types::TimeStats;
use crate::analyzers::utility::FrequencyTable;
use crate::calendar::weekday_name;
use crate::error::AnalysisError;
use crate::trip::TripRecord;

/// Most frequent month, weekday, and start hour of the given trips.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyResultSet`] for an empty collection.
pub fn time_stats(trips: &[&TripRecord]) -> Result<TimeStats, AnalysisError> {
    let months: FrequencyTable<_> = trips.iter().map(|t| t.month()).collect();
    let weekdays: FrequencyTable<_> = trips.iter().map(|t| t.weekday()).collect();
    let hours: FrequencyTable<_> = trips.iter().map(|t| t.start_hour()).collect();

    let (Some((month, _)), Some((weekday, _)), Some((hour, _))) =
        (months.mode(), weekdays.mode(), hours.mode())
    else {
        return Err(AnalysisError::EmptyResultSet);
    };

    Ok(TimeStats {
        mode_month: month.name().to_string(),
        mode_weekday: weekday_name(*weekday).to_string(),
        mode_start_hour: *hour,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::fixtures::{trip, view};

    #[test]
    fn test_time_stats() {
        let records = vec![
            trip("2024-01-01T08:00", "2024-01-01T08:15", "A", "B"),
            trip("2024-02-06T17:00", "2024-02-06T17:30", "A", "B"),
            trip("2024-02-13T17:20", "2024-02-13T17:30", "A", "B"),
        ];
        let stats = time_stats(&view(&records)).unwrap();
        assert_eq!(stats.mode_month, "February");
        assert_eq!(stats.mode_weekday, "Tuesday");
        assert_eq!(stats.mode_start_hour, 17);
    }

    #[test]
    fn test_ties_resolve_to_first_seen() {
        let records = vec![
            trip("2024-03-05T09:00", "2024-03-05T09:10", "A", "B"),
            trip("2024-01-01T07:00", "2024-01-01T07:10", "A", "B"),
        ];
        let stats = time_stats(&view(&records)).unwrap();
        assert_eq!(stats.mode_month, "March");
        assert_eq!(stats.mode_weekday, "Tuesday");
        assert_eq!(stats.mode_start_hour, 9);

        // same answer on a repeat run
        assert_eq!(time_stats(&view(&records)).unwrap(), stats);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(time_stats(&[]), Err(AnalysisError::EmptyResultSet)));
    }
}
