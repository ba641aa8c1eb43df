//! The disable predicate: "may the user click this day right now?"
//!
//! A day is disabled when every candidate resource is blocked on it, or when
//! picking it would violate the circulation policy given what is already
//! selected:
//!
//! - choosing a start: past days, holidays, and days whose lead buffer would
//!   run into a booking, trail, or loan are disabled
//! - choosing an end: days before the start, days past the booking cap, and
//!   days whose trail buffer would run into a booking are disabled
//! - in `end_date_only` mode the whole derived range is checked on the start
//!   click, and afterwards only the derived end day stays enabled
//!
//! Holidays restrict start dates only. The end-date branch ignores them so a
//! range that merely spans a closed day is left to the widget's own checks.

use crate::day::{CalendarDay, DayRange};
use crate::index::{AvailabilityIndex, Reason};
use crate::model::{
    CirculationPolicy, ConstraintMode, Resource, ResourceId, Selection, SelectionContext,
};

/// Answers whether a calendar day is selectable for a fixed index, policy,
/// and selection state.
///
/// Pure and cheap to call once per rendered cell. Rebuild it whenever any of
/// its inputs change.
#[derive(Debug, Clone)]
pub struct DisablePredicate<'a> {
    index: &'a AvailabilityIndex,
    policy: &'a CirculationPolicy,
    candidates: Vec<ResourceId>,
    selection: Selection,
    today: CalendarDay,
}

impl<'a> DisablePredicate<'a> {
    /// # Arguments
    ///
    /// * `index` — Built by [`crate::index::build_index`] from the same data.
    /// * `resources` — Candidate resources, already narrowed by the caller's
    ///   facet selections. Ignored when the context names a target resource.
    /// * `context` — Current selection and optional target resource.
    /// * `policy` — Buffers, cap, and constraint mode.
    /// * `today` — Reference day; earlier days cannot start a booking.
    pub fn new(
        index: &'a AvailabilityIndex,
        resources: &[Resource],
        context: &SelectionContext,
        policy: &'a CirculationPolicy,
        today: CalendarDay,
    ) -> Self {
        let candidates = match &context.target_resource {
            Some(target) => vec![target.clone()],
            None => resources.iter().map(|r| r.id.clone()).collect(),
        };
        Self {
            index,
            policy,
            candidates,
            selection: context.selection,
            today,
        }
    }

    /// Whether `day` must be disabled in the calendar.
    pub fn is_disabled(&self, day: CalendarDay) -> bool {
        if self.all_unavailable(day) {
            return true;
        }
        match (self.selection, self.policy.constraint_mode) {
            (Selection::Empty | Selection::Complete(..), _) => {
                day < self.today || self.start_conflict(day)
            }
            (Selection::Start(start), ConstraintMode::Normal) => self.end_conflict(start, day),
            (Selection::Start(start), ConstraintMode::EndDateOnly) => {
                day != self.policy.target_end_date(start)
            }
        }
    }

    /// Every disabled day in the closed window `[from, to]`.
    pub fn disabled_days(&self, from: CalendarDay, to: CalendarDay) -> Vec<CalendarDay> {
        DayRange::new(from, to)
            .filter(|&day| self.is_disabled(day))
            .collect()
    }

    /// Borrow the predicate as a plain `day -> bool` function.
    pub fn as_fn(&self) -> impl Fn(CalendarDay) -> bool + '_ {
        move |day| self.is_disabled(day)
    }

    /// True iff no candidate resource is free on `day`.
    ///
    /// With no candidates at all every day is unavailable.
    pub fn all_unavailable(&self, day: CalendarDay) -> bool {
        self.all_blocked(day, Reason::blocks_day)
    }

    /// Why `day` cannot start a booking, ignoring whether it lies in the past.
    pub fn start_conflict(&self, day: CalendarDay) -> bool {
        if self.all_unavailable(day) || self.index.is_holiday(day) || self.lead_conflict(day) {
            return true;
        }
        match self.policy.constraint_mode {
            ConstraintMode::Normal => false,
            ConstraintMode::EndDateOnly => {
                let end = self.policy.target_end_date(day);
                DayRange::new(day, end).any(|d| self.all_unavailable(d)) || self.trail_conflict(end)
            }
        }
    }

    /// Whether `day` cannot end a booking that started on `start`.
    ///
    /// The cap admits an end exactly `max_period` days after the start.
    pub fn end_conflict(&self, start: CalendarDay, day: CalendarDay) -> bool {
        if day < start {
            return true;
        }
        if let Some(max) = self.policy.max_period() {
            if day > start.add_days(i64::from(max)) {
                return true;
            }
        }
        self.trail_conflict(day)
    }

    /// Whether the `lead_days` before `day` collide with existing use.
    pub fn lead_conflict(&self, day: CalendarDay) -> bool {
        (1..=i64::from(self.policy.lead_days))
            .any(|offset| self.all_blocked(day.sub_days(offset), Reason::blocks_lead))
    }

    /// Whether the `trail_days` after `day` collide with existing use.
    pub fn trail_conflict(&self, day: CalendarDay) -> bool {
        (1..=i64::from(self.policy.trail_days))
            .any(|offset| self.all_blocked(day.add_days(offset), Reason::blocks_trail))
    }

    fn all_blocked(&self, day: CalendarDay, blocks: fn(Reason) -> bool) -> bool {
        self.candidates
            .iter()
            .all(|resource| self.index.is_blocked(day, resource, blocks))
    }
}
