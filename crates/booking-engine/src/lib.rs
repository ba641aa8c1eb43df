//! # booking-engine
//!
//! Date availability for resource-booking calendars.
//!
//! Given existing bookings, active loans, closed-library days, and a
//! circulation policy, the engine decides which calendar days a user may pick
//! as a booking start or end, validates a tentative selection, and projects
//! per-day conflict reasons into calendar markers. It is pure and synchronous:
//! every call takes value snapshots and keeps no state.
//!
//! ## Modules
//!
//! - [`day`] — Timezone-free calendar days and inclusive ranges
//! - [`model`] — Resources, bookings, loans, policy, selection state
//! - [`index`] — Bookings/loans/holidays → per-day, per-resource reasons
//! - [`predicate`] — "Is this day selectable?" for the current selection
//! - [`validate`] — Whole-range validation with user-facing messages
//! - [`markers`] — Index → calendar-cell markers
//! - [`highlight`] — Span to shade once a start is chosen
//! - [`filter`] — Cascading pickup-location / type / resource filters
//! - [`snapshot`] — One JSON document holding a full data refresh
//! - [`error`] — Error types

pub mod day;
pub mod error;
pub mod filter;
pub mod highlight;
pub mod index;
pub mod markers;
pub mod model;
pub mod predicate;
pub mod snapshot;
pub mod validate;

pub use day::{CalendarDay, DayRange};
pub use error::BookingError;
pub use filter::{filter_item_types, filter_pickup_locations, filter_resources, FilterOutcome};
pub use highlight::{constraint_highlight, ConstraintHighlight};
pub use index::{build_index, AvailabilityIndex, CalendarInputs, Reason};
pub use markers::{aggregate_markers, markers_for_date, Marker, MarkerKind};
pub use model::{
    Booking, BookingId, CirculationPolicy, ConstraintMode, ItemType, Loan, PickupLocation,
    Resource, ResourceId, Selection, SelectionContext,
};
pub use predicate::DisablePredicate;
pub use snapshot::CalendarSnapshot;
pub use validate::{validate_range, RangeIssue, RangeValidation};
