//! A complete data refresh loaded from one JSON document.
//!
//! ```json
//! {
//!   "resources": [{"id": 1, "title": "Projector", "barcode": "39999000001"}],
//!   "bookings": [{"id": 7, "resource_id": 1, "start": "2025-01-15", "end": "2025-01-20"}],
//!   "checkouts": [{"resource_id": 1, "due_date": "2025-01-05"}],
//!   "holidays": ["2025-01-01"],
//!   "policy": {"lead_days": 2, "trail_days": 1, "max_period": 14}
//! }
//! ```
//!
//! Row lists are read one row at a time: a row that does not fit its shape
//! (a resource without an id, a booking that is not an object) is dropped
//! with a warning and the rest of the document still loads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::index::CalendarInputs;
use crate::model::{
    scalar_text, Booking, CirculationPolicy, ItemType, Loan, PickupLocation, Resource,
};

/// Every input the engine needs for one refresh of the calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSnapshot {
    #[serde(deserialize_with = "rows")]
    pub resources: Vec<Resource>,
    #[serde(deserialize_with = "rows")]
    pub bookings: Vec<Booking>,
    #[serde(alias = "loans", deserialize_with = "rows")]
    pub checkouts: Vec<Loan>,
    /// Closed days as sent; `null` entries load as empty strings and are
    /// skipped at index build.
    #[serde(deserialize_with = "holiday_list")]
    pub holidays: Vec<String>,
    pub policy: CirculationPolicy,
    #[serde(deserialize_with = "rows")]
    pub pickup_locations: Vec<PickupLocation>,
    #[serde(deserialize_with = "rows")]
    pub item_types: Vec<ItemType>,
}

/// A snapshot row type, named in skip warnings.
trait Row: DeserializeOwned {
    const KIND: &'static str;
}

impl Row for Resource {
    const KIND: &'static str = "resource";
}

impl Row for Booking {
    const KIND: &'static str = "booking";
}

impl Row for Loan {
    const KIND: &'static str = "checkout";
}

impl Row for PickupLocation {
    const KIND: &'static str = "pickup location";
}

impl Row for ItemType {
    const KIND: &'static str = "item type";
}

fn rows<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Row,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(position, row)| match serde_json::from_value(row) {
            Ok(row) => Some(row),
            Err(e) => {
                tracing::warn!(position, "skipping {} row: {e}", T::KIND);
                None
            }
        })
        .collect())
}

fn holiday_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|entry| scalar_text(entry).unwrap_or_default())
        .collect())
}

impl CalendarSnapshot {
    /// Parse a snapshot. Missing sections default to empty.
    ///
    /// # Errors
    /// Returns `BookingError::Snapshot` if the document is not valid JSON or a
    /// section has the wrong shape.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Borrow the facts the availability index is built from.
    pub fn inputs(&self) -> CalendarInputs<'_> {
        CalendarInputs {
            resources: &self.resources,
            bookings: &self.bookings,
            loans: &self.checkouts,
            holidays: &self.holidays,
        }
    }
}
