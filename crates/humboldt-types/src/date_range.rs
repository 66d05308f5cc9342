//! Calendar date ranges.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::ValidationError;

/// An inclusive range of calendar dates.
///
/// The range lifts to the half-open instant range
/// `[start 00:00Z, (end + 1 day) 00:00Z)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDateRange`] if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange(format!(
                "{start} > {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Creates a date range covering a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Lifts the inclusive calendar range to half-open UTC instants.
    #[must_use]
    pub fn to_utc(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = midnight(self.start);
        let to = midnight(self.end.succ_opt().unwrap_or(NaiveDate::MAX));
        (from, to)
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// UTC midnight at the start of the given date.
#[must_use]
pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
