//! Month and weekday vocabulary used to validate and resolve filter values.
//!
//! A [`Calendar`] is built once at startup and handed to both the CLI (which
//! validates user input) and the temporal filter (which resolves tokens).

use chrono::{Month, Weekday};

use crate::error::{AnalysisError, FilterDimension};

/// Token that disables filtering on a dimension.
pub const ALL: &str = "all";

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The closed set of months and weekdays a filter may name.
#[derive(Debug, Clone)]
pub struct Calendar {
    months: Vec<Month>,
    weekdays: Vec<Weekday>,
}

impl Calendar {
    pub fn new(months: Vec<Month>, weekdays: Vec<Weekday>) -> Self {
        Self { months, weekdays }
    }

    /// The bikeshare datasets cover January through June.
    pub fn bikeshare() -> Self {
        Self::new(
            vec![
                Month::January,
                Month::February,
                Month::March,
                Month::April,
                Month::May,
                Month::June,
            ],
            ALL_WEEKDAYS.to_vec(),
        )
    }

    pub fn months(&self) -> &[Month] {
        &self.months
    }

    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    /// Resolves a month token. `Ok(None)` means "all".
    pub fn resolve_month(&self, token: &str) -> Result<Option<Month>, AnalysisError> {
        let canonical = canonicalize(token);
        if canonical == ALL {
            return Ok(None);
        }
        self.months
            .iter()
            .copied()
            .find(|m| m.name() == canonical)
            .map(Some)
            .ok_or_else(|| AnalysisError::InvalidFilterValue {
                dimension: FilterDimension::Month,
                value: token.to_string(),
            })
    }

    /// Resolves a weekday token. `Ok(None)` means "all".
    pub fn resolve_weekday(&self, token: &str) -> Result<Option<Weekday>, AnalysisError> {
        let canonical = canonicalize(token);
        if canonical == ALL {
            return Ok(None);
        }
        self.weekdays
            .iter()
            .copied()
            .find(|d| weekday_name(*d) == canonical)
            .map(Some)
            .ok_or_else(|| AnalysisError::InvalidFilterValue {
                dimension: FilterDimension::Weekday,
                value: token.to_string(),
            })
    }

    /// Lower-case tokens accepted for the month dimension, `all` first.
    pub fn month_tokens(&self) -> Vec<String> {
        std::iter::once(ALL.to_string())
            .chain(self.months.iter().map(|m| m.name().to_lowercase()))
            .collect()
    }

    /// Lower-case tokens accepted for the weekday dimension, `all` first.
    pub fn weekday_tokens(&self) -> Vec<String> {
        std::iter::once(ALL.to_string())
            .chain(self.weekdays.iter().map(|d| weekday_name(*d).to_lowercase()))
            .collect()
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::bikeshare()
    }
}

/// Full English name of a weekday, e.g. `Monday`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Trims and title-cases a filter token. `all` stays lower case.
pub fn canonicalize(token: &str) -> String {
    let lower = token.trim().to_lowercase();
    if lower == ALL {
        return lower;
    }
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
