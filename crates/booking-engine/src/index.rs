//! Availability index: expands bookings, loans, and holidays into a per-day,
//! per-resource map of blocking reasons.
//!
//! The index is rebuilt from scratch on every call. Each booking contributes
//! its core interval plus lead and trail buffers; loans block their due day;
//! holidays block every known resource. Rows with unparseable dates are
//! skipped and logged, never fatal.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::day::{CalendarDay, DayRange};
use crate::model::{Booking, BookingId, CirculationPolicy, Loan, Resource, ResourceId};

/// Why a resource is blocked on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Inside a booking's own `[start, end]`.
    Core,
    /// Advance-notice buffer ahead of a booking start.
    Lead,
    /// Rest buffer after a booking end.
    Trail,
    /// Due day of an active loan.
    Checkout,
    /// Library closed.
    Holiday,
}

impl Reason {
    /// Whether this reason makes the day itself unavailable.
    ///
    /// Holidays are excluded: they only restrict start-date selection.
    pub fn blocks_day(self) -> bool {
        match self {
            Reason::Core | Reason::Lead | Reason::Trail | Reason::Checkout => true,
            Reason::Holiday => false,
        }
    }

    /// Whether a new booking's lead buffer may not overlap this reason.
    pub fn blocks_lead(self) -> bool {
        match self {
            Reason::Core | Reason::Trail | Reason::Checkout => true,
            Reason::Lead | Reason::Holiday => false,
        }
    }

    /// Whether a new booking's trail buffer may not overlap this reason.
    pub fn blocks_trail(self) -> bool {
        match self {
            Reason::Core | Reason::Lead | Reason::Checkout => true,
            Reason::Trail | Reason::Holiday => false,
        }
    }
}

/// Blocking reasons recorded for one resource on one day.
pub type ReasonSet = BTreeSet<Reason>;

/// Per-day, per-resource blocking reasons.
///
/// Days and resources without any entry are free.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AvailabilityIndex {
    days: BTreeMap<CalendarDay, BTreeMap<ResourceId, ReasonSet>>,
    holidays: BTreeSet<CalendarDay>,
}

impl AvailabilityIndex {
    /// Reasons recorded for `resource` on `day`, if any.
    pub fn reasons(&self, day: CalendarDay, resource: &ResourceId) -> Option<&ReasonSet> {
        self.days.get(&day).and_then(|by_resource| by_resource.get(resource))
    }

    /// All resources with at least one reason on `day`.
    pub fn entries_on(&self, day: CalendarDay) -> Option<&BTreeMap<ResourceId, ReasonSet>> {
        self.days.get(&day)
    }

    /// Whether `resource` has a reason on `day` matching `blocks`.
    pub fn is_blocked(
        &self,
        day: CalendarDay,
        resource: &ResourceId,
        blocks: impl Fn(Reason) -> bool,
    ) -> bool {
        self.reasons(day, resource)
            .is_some_and(|reasons| reasons.iter().any(|&reason| blocks(reason)))
    }

    /// Whether the library is closed on `day`.
    pub fn is_holiday(&self, day: CalendarDay) -> bool {
        self.holidays.contains(&day)
    }

    /// Days carrying at least one entry, in ascending order.
    pub fn days(&self) -> impl Iterator<Item = CalendarDay> + '_ {
        self.days.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty() && self.holidays.is_empty()
    }

    fn insert(&mut self, day: CalendarDay, resource: &ResourceId, reason: Reason) {
        self.days
            .entry(day)
            .or_default()
            .entry(resource.clone())
            .or_default()
            .insert(reason);
    }
}

/// The raw facts an index is built from.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarInputs<'a> {
    pub resources: &'a [Resource],
    pub bookings: &'a [Booking],
    pub loans: &'a [Loan],
    /// Closed-library days as ISO-8601 strings.
    pub holidays: &'a [String],
}

/// Build the availability index for one data refresh.
///
/// # Arguments
///
/// * `inputs` — Resources, bookings, loans, and holidays to expand.
/// * `policy` — Supplies the lead and trail buffer lengths.
/// * `editing` — A booking being edited; it is left out so it never conflicts
///   with itself.
///
/// For a booking `[start, end]` with lead `L` and trail `T`:
///
/// - `[start - L, start)` is tagged [`Reason::Lead`]
/// - `[start, end]` is tagged [`Reason::Core`]
/// - `(end, end + T]` is tagged [`Reason::Trail`]
/// - `(end + T, end + T + L]` is tagged [`Reason::Lead`]: a booking starting
///   there would need a lead buffer reaching back into the trail.
pub fn build_index(
    inputs: CalendarInputs<'_>,
    policy: &CirculationPolicy,
    editing: Option<&BookingId>,
) -> AvailabilityIndex {
    let mut index = AvailabilityIndex::default();
    let lead = i64::from(policy.lead_days);
    let trail = i64::from(policy.trail_days);

    let mut skipped = 0usize;

    for booking in inputs.bookings {
        if editing == Some(&booking.id) {
            continue;
        }
        if booking.resource_id.as_str().is_empty() {
            tracing::warn!(booking = %booking.id, "skipping booking without a resource");
            skipped += 1;
            continue;
        }
        let (start, end) = match booking.interval() {
            Ok(interval) => interval,
            Err(e) => {
                tracing::warn!(booking = %booking.id, "skipping booking: {e}");
                skipped += 1;
                continue;
            }
        };

        for day in DayRange::new(start.sub_days(lead), end.add_days(trail)) {
            let reason = if day < start {
                Reason::Lead
            } else if day > end {
                Reason::Trail
            } else {
                Reason::Core
            };
            index.insert(day, &booking.resource_id, reason);
        }

        if lead > 0 {
            let rest_end = end.add_days(trail);
            for day in DayRange::new(rest_end.succ(), rest_end.add_days(lead)) {
                index.insert(day, &booking.resource_id, Reason::Lead);
            }
        }
    }

    for loan in inputs.loans {
        match CalendarDay::parse(&loan.due_date) {
            Ok(due) => index.insert(due, &loan.resource_id, Reason::Checkout),
            Err(e) => {
                tracing::warn!(resource = %loan.resource_id, "skipping loan: {e}");
                skipped += 1;
            }
        }
    }

    for raw in inputs.holidays {
        match CalendarDay::parse(raw) {
            Ok(day) => {
                index.holidays.insert(day);
                for resource in inputs.resources {
                    index.insert(day, &resource.id, Reason::Holiday);
                }
            }
            Err(e) => {
                tracing::warn!("skipping holiday: {e}");
                skipped += 1;
            }
        }
    }

    tracing::debug!(
        bookings = inputs.bookings.len(),
        loans = inputs.loans.len(),
        holidays = index.holidays.len(),
        days = index.days.len(),
        skipped,
        "built availability index"
    );

    index
}
