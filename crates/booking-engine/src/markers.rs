//! Calendar-cell decorations projected from the availability index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::day::CalendarDay;
use crate::index::{AvailabilityIndex, Reason};
use crate::model::{Resource, ResourceId};

/// Display type of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    Booked,
    CheckedOut,
    Lead,
    Trail,
    Holiday,
}

impl MarkerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerKind::Booked => "booked",
            MarkerKind::CheckedOut => "checked-out",
            MarkerKind::Lead => "lead",
            MarkerKind::Trail => "trail",
            MarkerKind::Holiday => "holiday",
        }
    }
}

impl From<Reason> for MarkerKind {
    fn from(reason: Reason) -> Self {
        match reason {
            Reason::Core => MarkerKind::Booked,
            Reason::Checkout => MarkerKind::CheckedOut,
            Reason::Lead => MarkerKind::Lead,
            Reason::Trail => MarkerKind::Trail,
            Reason::Holiday => MarkerKind::Holiday,
        }
    }
}

/// One (resource, reason) pair recorded on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub barcode: Option<String>,
}

/// List the markers for `day`, one per recorded (resource, reason) pair.
///
/// A missing index or a day without entries yields an empty list. Resources
/// absent from `resources` fall back to their raw id as the name and no barcode.
pub fn markers_for_date(
    index: Option<&AvailabilityIndex>,
    day: CalendarDay,
    resources: &[Resource],
) -> Vec<Marker> {
    let Some(entries) = index.and_then(|index| index.entries_on(day)) else {
        return Vec::new();
    };

    entries
        .iter()
        .flat_map(|(resource_id, reasons)| {
            let resource = resources.iter().find(|r| &r.id == resource_id);
            let resource_name = resource
                .map(|r| r.title.clone())
                .unwrap_or_else(|| resource_id.to_string());
            let barcode = resource.and_then(|r| r.barcode.clone());
            reasons.iter().map(move |&reason| Marker {
                kind: reason.into(),
                resource_id: resource_id.clone(),
                resource_name: resource_name.clone(),
                barcode: barcode.clone(),
            })
        })
        .collect()
}

/// Count markers per display type, for compact per-cell badges.
pub fn aggregate_markers(markers: &[Marker]) -> BTreeMap<MarkerKind, usize> {
    let mut counts = BTreeMap::new();
    for marker in markers {
        *counts.entry(marker.kind).or_insert(0) += 1;
    }
    counts
}
