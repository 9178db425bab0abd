use crate::analyzers::types::{FieldValue, RiderStats, ValueCount};
use crate::analyzers::utility::FrequencyTable;
use crate::error::AnalysisError;
use crate::trip::TripRecord;

/// Counts of user types and genders plus birth-year extremes and mode.
///
/// A field no trip carries comes back as [`FieldValue::Absent`]; the other
/// fields are still computed.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyResultSet`] for an empty collection.
pub fn rider_stats(trips: &[&TripRecord]) -> Result<RiderStats, AnalysisError> {
    if trips.is_empty() {
        return Err(AnalysisError::EmptyResultSet);
    }

    let user_types = value_counts(trips.iter().filter_map(|t| t.user_type()));
    let genders = value_counts(trips.iter().filter_map(|t| t.gender()));

    let birth_years: Vec<i32> = trips.iter().filter_map(|t| t.birth_year()).collect();
    let most_common = birth_years
        .iter()
        .copied()
        .collect::<FrequencyTable<i32>>()
        .mode()
        .map(|(year, _)| *year);

    Ok(RiderStats {
        user_types,
        genders,
        earliest_birth_year: birth_years.iter().copied().min().into(),
        latest_birth_year: birth_years.iter().copied().max().into(),
        most_common_birth_year: most_common.into(),
    })
}

fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> FieldValue<Vec<ValueCount>> {
    let table: FrequencyTable<&str> = values.collect();
    if table.is_empty() {
        return FieldValue::Absent;
    }
    FieldValue::Present(
        table
            .descending()
            .into_iter()
            .map(|(value, count)| ValueCount {
                value: value.to_string(),
                count,
            })
            .collect(),
    )
}
