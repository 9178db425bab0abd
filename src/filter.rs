//! Month/weekday narrowing of a trip collection.

use serde::Serialize;
use tracing::debug;

use crate::calendar::{ALL, Calendar, canonicalize};
use crate::error::AnalysisError;
use crate::trip::TripRecord;

/// Month and weekday selection for one analysis run.
///
/// Tokens are stored canonicalized (`all` or title case). Validation against
/// a [`Calendar`] happens in [`filter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    month: String,
    weekday: String,
}

impl FilterCriteria {
    pub fn new(month: &str, weekday: &str) -> Self {
        Self {
            month: canonicalize(month),
            weekday: canonicalize(weekday),
        }
    }

    /// Criteria that keep every record.
    pub fn all() -> Self {
        Self::new(ALL, ALL)
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn weekday(&self) -> &str {
        &self.weekday
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::all()
    }
}

/// Keeps the records matching `criteria`, preserving input order.
///
/// The input is never modified; the result borrows from it, so a filtered
/// collection can itself be filtered again.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidFilterValue`] if either token is not in
/// the calendar.
pub fn filter<'a, I>(
    records: I,
    criteria: &FilterCriteria,
    calendar: &Calendar,
) -> Result<Vec<&'a TripRecord>, AnalysisError>
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    let month = calendar.resolve_month(criteria.month())?;
    let weekday = calendar.resolve_weekday(criteria.weekday())?;

    let kept: Vec<&TripRecord> = records
        .into_iter()
        .filter(|r| month.is_none_or(|m| r.month() == m))
        .filter(|r| weekday.is_none_or(|d| r.weekday() == d))
        .collect();

    debug!(
        month = criteria.month(),
        weekday = criteria.weekday(),
        kept = kept.len(),
        "Filter applied"
    );
    Ok(kept)
}
