//! Trip builders shared by the aggregator tests.

use chrono::NaiveDateTime;

use crate::trip::TripRecord;

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
}

pub fn trip(start: &str, end: &str, from: &str, to: &str) -> TripRecord {
    TripRecord::new(ts(start), ts(end), from, to)
}

pub fn rider(user_type: Option<&str>, gender: Option<&str>, birth_year: Option<i32>) -> TripRecord {
    trip("2024-01-01T08:00", "2024-01-01T08:10", "A", "B")
        .with_user_type(user_type.map(str::to_string))
        .with_gender(gender.map(str::to_string))
        .with_birth_year(birth_year)
}

pub fn view(records: &[TripRecord]) -> Vec<&TripRecord> {
    records.iter().collect()
}
