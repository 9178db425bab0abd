//! The in-memory trip record.

use chrono::{Datelike, Month, NaiveDateTime, Timelike, Weekday};
use serde::{Serialize, Serializer};

use crate::calendar::weekday_name;

/// One bike rental event.
///
/// `month` and `weekday` are derived from `start_time` and can only change
/// through [`TripRecord::set_start_time`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    start_station: String,
    end_station: String,
    user_type: Option<String>,
    gender: Option<String>,
    birth_year: Option<i32>,

    #[serde(serialize_with = "serialize_month")]
    month: Month,
    #[serde(serialize_with = "serialize_weekday")]
    weekday: Weekday,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        let (month, weekday) = derive_calendar_fields(&start_time);
        Self {
            start_time,
            end_time,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            month,
            weekday,
        }
    }

    pub fn with_user_type(mut self, user_type: Option<String>) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    /// Replaces the start time and recomputes the derived month and weekday.
    pub fn set_start_time(&mut self, start_time: NaiveDateTime) {
        let (month, weekday) = derive_calendar_fields(&start_time);
        self.start_time = start_time;
        self.month = month;
        self.weekday = weekday;
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    pub fn start_station(&self) -> &str {
        &self.start_station
    }

    pub fn end_station(&self) -> &str {
        &self.end_station
    }

    pub fn user_type(&self) -> Option<&str> {
        self.user_type.as_deref()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Hour of day (0–23) the trip started.
    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// Trip length in whole seconds. Negative when `end_time < start_time`.
    pub fn duration_seconds(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds()
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds() as f64 / 60.0
    }
}

fn derive_calendar_fields(start_time: &NaiveDateTime) -> (Month, Weekday) {
    // month() is always 1..=12, so the conversion cannot fail
    let month = Month::try_from(start_time.month() as u8).unwrap_or(Month::January);
    (month, start_time.weekday())
}

fn serialize_month<S: Serializer>(month: &Month, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(month.name())
}

fn serialize_weekday<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*day))
}
