//! Timezone-free calendar days with explicit day-count arithmetic.
//!
//! Every booking boundary in this crate is a whole calendar day. Backends hand
//! dates over as ISO-8601 strings, sometimes with a time and an offset attached
//! (`2025-01-15T00:00:00+00:00`); only the calendar-day part is kept, so no
//! arithmetic ever crosses a timezone or DST boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// A single calendar day, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    /// Build a day from year/month/day components.
    ///
    /// # Errors
    /// Returns `BookingError::InvalidDate` if the components do not name a real date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| BookingError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Parse an ISO-8601 date or date-time, keeping only the calendar day.
    ///
    /// Accepted forms:
    /// - `2025-01-15`
    /// - `2025-01-15T10:30:00`, `2025-01-15T10:30:00.250`
    /// - `2025-01-15 10:30:00`
    /// - RFC 3339 with offset, e.g. `2025-01-15T00:00:00+02:00` or `...Z`
    ///   (the day is taken in the string's own offset)
    ///
    /// # Errors
    /// Returns `BookingError::InvalidDate` if none of the forms match.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.date_naive()));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self(ndt.date()));
            }
        }
        Err(BookingError::InvalidDate(s.to_string()))
    }

    /// Today's date on the local clock.
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    /// Shift forward by `n` days (backward when negative).
    ///
    /// Saturates at the representable range instead of panicking.
    pub fn add_days(self, n: i64) -> Self {
        let shifted = if n >= 0 {
            self.0.checked_add_days(Days::new(n.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(n.unsigned_abs()))
        };
        match shifted {
            Some(date) => Self(date),
            None if n >= 0 => Self(NaiveDate::MAX),
            None => Self(NaiveDate::MIN),
        }
    }

    /// Shift backward by `n` days.
    pub fn sub_days(self, n: i64) -> Self {
        self.add_days(n.saturating_neg())
    }

    /// The following day.
    pub fn succ(self) -> Self {
        self.add_days(1)
    }

    /// The preceding day.
    pub fn pred(self) -> Self {
        self.add_days(-1)
    }

    /// Signed number of days from `self` to `other` (`0` for the same day).
    pub fn days_until(self, other: Self) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }

    /// Number of days in the closed range `[self, end]`, or `0` if `end < self`.
    pub fn inclusive_span(self, end: Self) -> i64 {
        (self.days_until(end) + 1).max(0)
    }

    /// The underlying chrono date.
    pub fn as_naive(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for CalendarDay {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarDay {
    type Error = BookingError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<CalendarDay> for String {
    fn from(day: CalendarDay) -> Self {
        day.to_string()
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Iterator over the closed range `[first, last]`, in ascending order.
///
/// Empty when `first > last`.
#[derive(Debug, Clone)]
pub struct DayRange {
    next: Option<CalendarDay>,
    last: CalendarDay,
}

impl DayRange {
    pub fn new(first: CalendarDay, last: CalendarDay) -> Self {
        Self {
            next: (first <= last).then_some(first),
            last,
        }
    }
}

impl Iterator for DayRange {
    type Item = CalendarDay;

    fn next(&mut self) -> Option<CalendarDay> {
        let current = self.next?;
        // `succ` saturates, so stop explicitly at the last day.
        self.next = (current < self.last).then(|| current.succ());
        Some(current)
    }
}
