//! End-to-end validation of a tentative `[start, end]` selection.
//!
//! All applicable checks run and every problem is reported, so the caller can
//! show them at once. Failures are values, never errors.

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::day::{CalendarDay, DayRange};
use crate::index::{build_index, CalendarInputs};
use crate::model::{
    BookingId, CirculationPolicy, ConstraintMode, ResourceId, Selection, SelectionContext,
};
use crate::predicate::DisablePredicate;

/// A single problem with a selection. Displays as a user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeIssue {
    #[error("Start date is required")]
    MissingStart,

    #[error("Start date {start} is too soon: bookings need {lead_days} days notice, earliest start is {earliest}")]
    StartTooSoon {
        start: CalendarDay,
        earliest: CalendarDay,
        lead_days: u32,
    },

    #[error("End date {end} is before start date {start}")]
    EndBeforeStart { start: CalendarDay, end: CalendarDay },

    #[error("Booking length of {days} days exceeds the maximum of {max_period} days")]
    TooLong { days: i64, max_period: u32 },

    #[error("End date {end} is after the due date {due}")]
    PastDueDate { end: CalendarDay, due: CalendarDay },

    #[error("Date {0} is unavailable")]
    Unavailable(CalendarDay),

    #[error("End date {end} leaves no room for the {trail_days}-day return period")]
    TrailConflict { end: CalendarDay, trail_days: u32 },
}

impl Serialize for RangeIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of [`validate_range`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeValidation {
    pub valid: bool,
    /// Problems in the order the checks ran.
    pub errors: Vec<RangeIssue>,
    /// The day after the start.
    pub min_end_date: Option<CalendarDay>,
    /// The latest permitted end, if the policy caps bookings.
    pub max_end_date: Option<CalendarDay>,
}

/// Validate a complete or partial selection against policy and current data.
///
/// # Arguments
///
/// * `selection` — Zero, one, or two selected days.
/// * `inputs` — Resources, bookings, loans, and holidays.
/// * `policy` — Buffers, cap, constraint mode, and due-date override.
/// * `target` — A single chosen resource, or `None` for any resource.
/// * `editing` — A booking being edited, excluded from conflicts.
/// * `today` — Reference day for the lead-period check.
pub fn validate_range(
    selection: Selection,
    inputs: CalendarInputs<'_>,
    policy: &CirculationPolicy,
    target: Option<&ResourceId>,
    editing: Option<&BookingId>,
    today: CalendarDay,
) -> RangeValidation {
    let Some(start) = selection.start() else {
        return RangeValidation {
            valid: false,
            errors: vec![RangeIssue::MissingStart],
            min_end_date: None,
            max_end_date: None,
        };
    };
    let end = selection.end();

    let mut errors = Vec::new();
    let min_end_date = Some(start.succ());
    let max_end_date = policy.max_end_date(start);

    let earliest = today.add_days(i64::from(policy.lead_days));
    if start < earliest {
        errors.push(RangeIssue::StartTooSoon {
            start,
            earliest,
            lead_days: policy.lead_days,
        });
    }

    if let Some(end) = end {
        if end < start {
            errors.push(RangeIssue::EndBeforeStart { start, end });
        } else {
            match (policy.constraint_mode, policy.due_date_override, max_end_date) {
                (ConstraintMode::EndDateOnly, Some(_), Some(due)) => {
                    if end > due {
                        errors.push(RangeIssue::PastDueDate { end, due });
                    }
                }
                _ => {
                    let days = start.inclusive_span(end);
                    if let Some(max_period) = policy.max_period() {
                        if days > i64::from(max_period) {
                            errors.push(RangeIssue::TooLong { days, max_period });
                        }
                    }
                }
            }
        }
    }

    let index = build_index(inputs, policy, editing);
    let mut context = SelectionContext::new(Selection::Empty);
    context.target_resource = target.cloned();
    let predicate = DisablePredicate::new(&index, inputs.resources, &context, policy, today);

    if predicate.start_conflict(start) {
        errors.push(RangeIssue::Unavailable(start));
    }
    let last = end.filter(|&end| end > start).unwrap_or(start);
    for day in DayRange::new(start.succ(), last) {
        if predicate.all_unavailable(day) {
            errors.push(RangeIssue::Unavailable(day));
        }
    }
    // A chosen end, one-day bookings included, needs room for the trail period.
    if let Some(end) = end.filter(|&end| end >= start) {
        if predicate.trail_conflict(end) {
            errors.push(RangeIssue::TrailConflict {
                end,
                trail_days: policy.trail_days,
            });
        }
    }

    RangeValidation {
        valid: errors.is_empty(),
        errors,
        min_end_date,
        max_end_date,
    }
}
