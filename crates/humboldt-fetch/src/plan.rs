//! Period planning: mapping a request range onto remote fetch units.
//!
//! The remote publishes tick data as one file per UTC hour, minute bars
//! as one file per UTC day, hour bars as one file per UTC month and day
//! bars as one file per UTC year. An aggregated file only appears once
//! its covering period is complete, so a plan whose last unit covers
//! the wall-clock "now" substitutes finer-grained files for that
//! remainder (`day -> hour -> minute`; ticks are never used as a bar
//! fallback).

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

use humboldt_types::Granularity;

/// A single remote file to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchUnit {
    granularity: Granularity,
    start: DateTime<Utc>,
}

impl FetchUnit {
    pub(crate) const fn new(granularity: Granularity, start: DateTime<Utc>) -> Self {
        Self { granularity, start }
    }

    /// The granularity of the remote file.
    ///
    /// May be finer than the requested granularity when the planner
    /// fell back for an in-progress period.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Start of the file's covering period (UTC).
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the file's covering period (exclusive).
    #[must_use]
    pub fn period_end(&self) -> DateTime<Utc> {
        period_end(self.granularity, self.start)
    }
}

impl std::fmt::Display for FetchUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} file starting {}",
            self.granularity,
            self.start.format("%Y-%m-%dT%H:%MZ")
        )
    }
}

/// Returns the lazy plan covering `[from, to)` at the given granularity.
///
/// `now` drives the current-period fallback; the orchestrator passes
/// wall-clock time. The plan is empty when `from >= to`. The first unit
/// is aligned down to the start of its covering period; records before
/// `from` are dropped later by the range filter.
#[must_use]
pub fn plan(
    granularity: Granularity,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Plan {
    Plan {
        granularity,
        cursor: align_down(granularity, from),
        to,
        now,
    }
}

/// Lazy iterator over the fetch units of one request.
///
/// Never materializes the full plan, so arbitrarily large ranges stay
/// cheap until consumed.
#[derive(Debug, Clone)]
pub struct Plan {
    granularity: Granularity,
    cursor: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
}

impl Iterator for Plan {
    type Item = FetchUnit;

    fn next(&mut self) -> Option<FetchUnit> {
        loop {
            if self.cursor >= self.to {
                return None;
            }

            let end = period_end(self.granularity, self.cursor);
            let is_last = end >= self.to;
            let in_progress = self.cursor <= self.now && self.now < end;

            if is_last && in_progress {
                if let Some(finer) = fallback(self.granularity) {
                    self.granularity = finer;
                    continue;
                }
            }

            let unit = FetchUnit::new(self.granularity, self.cursor);
            self.cursor = end;
            return Some(unit);
        }
    }
}

/// The granularity the planner substitutes when the last unit's
/// covering period is still in progress.
const fn fallback(granularity: Granularity) -> Option<Granularity> {
    match granularity {
        Granularity::Day => Some(Granularity::Hour),
        Granularity::Hour => Some(Granularity::Minute),
        // Minute files exist for the current day (possibly empty), and
        // ticks are already the finest unit.
        Granularity::Minute | Granularity::Ticks => None,
    }
}

/// Truncates a timestamp down to the start of the covering period.
fn align_down(granularity: Granularity, t: DateTime<Utc>) -> DateTime<Utc> {
    match granularity {
        Granularity::Ticks => Utc
            .with_ymd_and_hms(t.year(), t.month(), t.day(), t.hour(), 0, 0)
            .unwrap(),
        Granularity::Minute => Utc
            .with_ymd_and_hms(t.year(), t.month(), t.day(), 0, 0, 0)
            .unwrap(),
        Granularity::Hour => Utc.with_ymd_and_hms(t.year(), t.month(), 1, 0, 0, 0).unwrap(),
        Granularity::Day => Utc.with_ymd_and_hms(t.year(), 1, 1, 0, 0, 0).unwrap(),
    }
}

/// End (exclusive) of the period starting at the aligned `start`.
fn period_end(granularity: Granularity, start: DateTime<Utc>) -> DateTime<Utc> {
    match granularity {
        Granularity::Ticks => start + chrono::TimeDelta::hours(1),
        Granularity::Minute => start + chrono::TimeDelta::days(1),
        Granularity::Hour => {
            let (year, month) = if start.month() == 12 {
                (start.year() + 1, 1)
            } else {
                (start.year(), start.month() + 1)
            };
            Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
        }
        Granularity::Day => Utc
            .with_ymd_and_hms(start.year() + 1, 1, 1, 0, 0, 0)
            .unwrap(),
    }
}
