//! Range highlighting for a chosen start date.
//!
//! Once a start is picked the calendar shades the span the policy allows:
//! in `end_date_only` mode the fixed booking span, otherwise the span up to
//! the booking cap.

use serde::Serialize;

use crate::day::{CalendarDay, DayRange};
use crate::model::{CirculationPolicy, ConstraintMode};

/// The span to shade in the calendar once a start date is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintHighlight {
    pub start: CalendarDay,
    pub target_end: CalendarDay,
    pub mode: ConstraintMode,
    /// Days strictly between `start` and `target_end`.
    pub intermediate: Vec<CalendarDay>,
}

/// Compute the span to highlight after `start` is picked.
///
/// Returns `None` when the policy puts no bound on the end date.
pub fn constraint_highlight(
    start: CalendarDay,
    policy: &CirculationPolicy,
) -> Option<ConstraintHighlight> {
    let target_end = match policy.constraint_mode {
        ConstraintMode::EndDateOnly => policy.target_end_date(start),
        ConstraintMode::Normal => policy.max_end_date(start)?,
    };
    Some(ConstraintHighlight {
        start,
        target_end,
        mode: policy.constraint_mode,
        intermediate: DayRange::new(start.succ(), target_end.pred()).collect(),
    })
}
