//! Result records produced by the aggregators.

use serde::Serialize;

/// Most frequent month, weekday, and start hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub mode_month: String,
    pub mode_weekday: String,
    pub mode_start_hour: u32,
}

/// A start/end station combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub top_start_station: String,
    pub top_start_count: usize,
    pub top_end_station: String,
    pub top_end_count: usize,
    pub top_pair: StationPair,
    pub top_pair_count: usize,
}

/// Total and mean trip duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_travel_hours: f64,
    pub mean_travel_minutes: f64,
    pub trip_count: usize,
    /// Trips whose end time precedes their start time. They are still
    /// included in the total and mean.
    pub negative_trips: usize,
}

/// A demographic statistic that may be missing from the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FieldValue<T> {
    Present(T),
    Absent,
}

impl<T> FieldValue<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            FieldValue::Present(v) => Some(v),
            FieldValue::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for FieldValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldValue::Present(v),
            None => FieldValue::Absent,
        }
    }
}

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Rider demographics. Each field is computed independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiderStats {
    pub user_types: FieldValue<Vec<ValueCount>>,
    pub genders: FieldValue<Vec<ValueCount>>,
    pub earliest_birth_year: FieldValue<i32>,
    pub latest_birth_year: FieldValue<i32>,
    pub most_common_birth_year: FieldValue<i32>,
}
