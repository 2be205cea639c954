//! Calendar helpers for availability lookups.
//!
//! Availability is requested per local calendar date, while slots are stored
//! as UTC instants. This module converts between the two:
//! - [`local_date`] and [`today_and_tomorrow`] derive dates from an instant
//! - [`parse_wall_time`] and [`local_instant`] turn `date + HH:MM[:SS]` rows
//!   into instants
//! - [`DateRange`] bounds a set of requested dates

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Returns the calendar date of `now` in the local timezone.
///
/// Dates are taken from local year/month/day components, not from UTC, so
/// that "today" does not shift near midnight in offset timezones.
pub fn local_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Local).date_naive()
}

/// Returns today's local date and, if requested, tomorrow's.
pub fn today_and_tomorrow(now: DateTime<Utc>, include_tomorrow: bool) -> Vec<NaiveDate> {
    let today = local_date(now);
    let mut dates = vec![today];
    if include_tomorrow && let Some(tomorrow) = today.succ_opt() {
        dates.push(tomorrow);
    }
    dates
}

/// Parses a database wall-clock time (`HH:MM:SS`, `HH:MM:SS.ffffff` or `HH:MM`).
pub fn parse_wall_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Returns true for the `24:00[:00]` spelling of end-of-day midnight.
fn is_end_of_day(value: &str) -> bool {
    value
        .trim()
        .strip_prefix("24:00")
        .map(|rest| rest.trim_start_matches([':', '.', '0']))
        .is_some_and(str::is_empty)
}

/// Resolves the end of a wall-clock interval starting at `start` on `date`.
///
/// Midnight closes the interval on the following day, whether spelled
/// `24:00[:00]` or `00:00[:00]` after a later start.
pub fn local_end_instant(date: NaiveDate, start: NaiveTime, end: &str) -> Option<DateTime<Utc>> {
    if is_end_of_day(end) {
        return local_instant(date.succ_opt()?, NaiveTime::MIN);
    }
    let end = parse_wall_time(end)?;
    if end == NaiveTime::MIN && start > NaiveTime::MIN {
        return local_instant(date.succ_opt()?, end);
    }
    local_instant(date, end)
}

/// Combines a date and a local wall-clock time into a UTC instant.
///
/// Returns `None` for local times that do not exist (DST gaps). Ambiguous
/// times resolve to the earlier instant.
pub fn local_instant(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First date (inclusive).
    pub from: NaiveDate,
    /// Last date (inclusive).
    pub to: NaiveDate,
}

impl DateRange {
    /// Returns the smallest range covering every date in `dates`.
    ///
    /// Gaps between non-contiguous dates are included. Returns `None` when
    /// `dates` is empty.
    pub fn covering(dates: &[NaiveDate]) -> Option<Self> {
        let from = dates.iter().min()?;
        let to = dates.iter().max()?;
        Some(Self {
            from: *from,
            to: *to,
        })
    }

    /// Returns true if `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Returns the number of days in the range.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}
