//! Input snapshots: resources, bookings, loans, policy, and selection state.
//!
//! Everything here is a plain value handed over by the caller per call. Dates
//! on bookings and loans are kept as the backend sent them and parsed during
//! index construction, so a single malformed row cannot reject a whole payload.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::day::CalendarDay;
use crate::error::{BookingError, Result};

/// Identifier as it may arrive from a JSON backend: a number or a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Signed(i64),
    Unsigned(u64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Declares a string-backed identifier that accepts numeric JSON ids, so that
/// `42` and `"42"` compare equal.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a bookable resource (a library item).
    ResourceId
);
id_type!(
    /// Identifier of a booking.
    BookingId
);
id_type!(
    /// Identifier of the patron owning a booking.
    PatronId
);

/// Text form of a JSON scalar as a backend may send it. `null` is `None`;
/// numbers and booleans keep their JSON spelling.
pub(crate) fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Any scalar as a string, `null` as empty. Dates loaded this way are checked
/// at index build, where a bad one skips only its own row.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// Identifier text from a number or a string; `null` is rejected.
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_string)
}

/// An optional day that is dropped with a warning when it does not parse.
fn lenient_day<'de, D>(deserializer: D) -> std::result::Result<Option<CalendarDay>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let Some(text) = scalar_text(Value::deserialize(deserializer)?) else {
        return Ok(None);
    };
    match CalendarDay::parse(&text) {
        Ok(day) => Ok(Some(day)),
        Err(e) => {
            tracing::warn!("ignoring due date override: {e}");
            Ok(None)
        }
    }
}

/// A bookable resource. Reference data, never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(alias = "item_id")]
    pub id: ResourceId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, alias = "item_type_id", deserialize_with = "lenient_opt_string")]
    pub item_type: Option<String>,
    #[serde(default, alias = "home_library_id", deserialize_with = "lenient_opt_string")]
    pub home_location: Option<String>,
    #[serde(default, alias = "external_id", deserialize_with = "lenient_opt_string")]
    pub barcode: Option<String>,
}

impl Resource {
    pub fn new(id: impl Into<ResourceId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            item_type: None,
            home_location: None,
            barcode: None,
        }
    }

    pub fn with_item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }
}

/// A confirmed reservation of exactly one resource over `[start, end]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, alias = "booking_id")]
    pub id: BookingId,
    #[serde(default, alias = "item_id")]
    pub resource_id: ResourceId,
    #[serde(default, alias = "start_date", deserialize_with = "lenient_string")]
    pub start: String,
    #[serde(default, alias = "end_date", deserialize_with = "lenient_string")]
    pub end: String,
    #[serde(default)]
    pub patron_id: Option<PatronId>,
}

impl Booking {
    pub fn new(
        id: impl Into<BookingId>,
        resource_id: impl Into<ResourceId>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            resource_id: resource_id.into(),
            start: start.into(),
            end: end.into(),
            patron_id: None,
        }
    }

    /// Parse the booking's closed interval.
    ///
    /// # Errors
    /// Returns `BookingError::InvalidDate` if either date is unparseable or
    /// the start falls after the end.
    pub fn interval(&self) -> Result<(CalendarDay, CalendarDay)> {
        let start = CalendarDay::parse(&self.start)?;
        let end = CalendarDay::parse(&self.end)?;
        if start > end {
            return Err(BookingError::InvalidDate(format!(
                "booking {} starts ({start}) after it ends ({end})",
                self.id
            )));
        }
        Ok((start, end))
    }
}

/// An active checkout. Only the due date takes part in availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    #[serde(default, alias = "item_id")]
    pub resource_id: ResourceId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub due_date: String,
}

impl Loan {
    pub fn new(resource_id: impl Into<ResourceId>, due_date: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            due_date: due_date.into(),
        }
    }
}

/// How start and end dates are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintMode {
    /// The user picks a start date and then an end date.
    #[default]
    Normal,
    /// The user picks only a start date; the end date is derived from policy.
    EndDateOnly,
}

/// Circulation rules that shape which dates may be booked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CirculationPolicy {
    /// Days of advance notice required before a booking may start.
    pub lead_days: u32,
    /// Days the resource rests after a booking ends.
    pub trail_days: u32,
    /// Longest booking in days, both endpoints included. `None` or `0` means uncapped.
    pub max_period: Option<u32>,
    pub constraint_mode: ConstraintMode,
    /// Externally calculated due date; in `EndDateOnly` mode it replaces the
    /// end date derived from `max_period`. An unparseable value is ignored.
    #[serde(deserialize_with = "lenient_day")]
    pub due_date_override: Option<CalendarDay>,
}

impl CirculationPolicy {
    /// The effective booking cap, ignoring a configured `0`.
    pub fn max_period(&self) -> Option<u32> {
        self.max_period.filter(|&days| days > 0)
    }

    /// Latest end date allowed for a booking starting on `start`.
    ///
    /// In `EndDateOnly` mode a supplied override always wins over the
    /// `max_period` formula, clamped so it never precedes `start`.
    pub fn max_end_date(&self, start: CalendarDay) -> Option<CalendarDay> {
        if self.constraint_mode == ConstraintMode::EndDateOnly {
            if let Some(due) = self.due_date_override {
                return Some(due.max(start));
            }
        }
        self.max_period()
            .map(|days| start.add_days(i64::from(days) - 1))
    }

    /// The end date implied by `start` when only the start may be picked.
    ///
    /// Falls back to a single-day booking when neither a cap nor an override
    /// is configured.
    pub fn target_end_date(&self, start: CalendarDay) -> CalendarDay {
        self.max_end_date(start).unwrap_or(start)
    }
}

/// Which dates the user has clicked so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Nothing selected: the next click picks a start date.
    #[default]
    Empty,
    /// A start date is selected: the next click picks an end date.
    Start(CalendarDay),
    /// Both dates are selected.
    Complete(CalendarDay, CalendarDay),
}

impl Selection {
    /// Build a selection from the widget's list of selected days.
    ///
    /// # Errors
    /// Returns `BookingError::InvalidSelection` for more than two days.
    pub fn from_days(days: &[CalendarDay]) -> Result<Self> {
        match *days {
            [] => Ok(Self::Empty),
            [start] => Ok(Self::Start(start)),
            [start, end] => Ok(Self::Complete(start, end)),
            _ => Err(BookingError::InvalidSelection(days.len())),
        }
    }

    pub fn start(&self) -> Option<CalendarDay> {
        match *self {
            Self::Empty => None,
            Self::Start(start) | Self::Complete(start, _) => Some(start),
        }
    }

    pub fn end(&self) -> Option<CalendarDay> {
        match *self {
            Self::Complete(_, end) => Some(end),
            Self::Empty | Self::Start(_) => None,
        }
    }
}

/// Selection state plus the resource and booking the user is working with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionContext {
    pub selection: Selection,
    /// A single chosen resource. `None` means any candidate resource will do.
    pub target_resource: Option<ResourceId>,
    /// A booking being edited; its own interval never conflicts with itself.
    pub editing_booking: Option<BookingId>,
}

impl SelectionContext {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            ..Self::default()
        }
    }

    pub fn with_target(mut self, resource: impl Into<ResourceId>) -> Self {
        self.target_resource = Some(resource.into());
        self
    }

    pub fn editing(mut self, booking: impl Into<BookingId>) -> Self {
        self.editing_booking = Some(booking.into());
        self
    }
}

/// A pickup location and the resources that may be collected there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupLocation {
    #[serde(alias = "library_id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pickup_items: Vec<ResourceId>,
}

impl PickupLocation {
    /// Whether `resource` may be picked up here.
    pub fn allows(&self, resource: &ResourceId) -> bool {
        self.pickup_items.contains(resource)
    }
}

/// A resource type as offered by the type selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    #[serde(alias = "item_type_id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub description: String,
}
