//! Cascading constraint filters for the pickup-location, item-type, and
//! resource selectors.
//!
//! Each filter narrows the option list of one selector given the current
//! choices in the others. Filters are independent passes: applying them in
//! order (location, then type, then resource) shrinks the reachable resource
//! set, and re-deriving the other selectors from that set is up to the caller.

use serde::Serialize;

use crate::model::{ItemType, PickupLocation, Resource, ResourceId};

/// The narrowed option list plus how much was removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOutcome<T> {
    pub filtered: Vec<T>,
    pub filtered_out_count: usize,
    pub total: usize,
}

impl<T: Clone> FilterOutcome<T> {
    fn keep(all: &[T], keep: impl Fn(&T) -> bool) -> Self {
        let filtered: Vec<T> = all.iter().filter(|item| keep(item)).cloned().collect();
        Self {
            filtered_out_count: all.len() - filtered.len(),
            total: all.len(),
            filtered,
        }
    }
}

fn has_type(resource: &Resource, item_type: &str) -> bool {
    resource.item_type.as_deref() == Some(item_type)
}

/// Narrow pickup locations to those that can serve the current selection.
///
/// A selected resource keeps the locations whose allow-list contains it. A
/// selected type keeps the locations offering at least one resource of that
/// type; with both selected, that resource must itself be of the type. With
/// neither, every location is kept.
pub fn filter_pickup_locations(
    locations: &[PickupLocation],
    resources: &[Resource],
    selected_resource: Option<&ResourceId>,
    selected_type: Option<&str>,
) -> FilterOutcome<PickupLocation> {
    match (selected_resource, selected_type) {
        (None, None) => FilterOutcome::keep(locations, |_| true),
        (Some(resource), None) => FilterOutcome::keep(locations, |loc| loc.allows(resource)),
        (resource, Some(item_type)) => FilterOutcome::keep(locations, |loc| {
            resources.iter().any(|r| {
                has_type(r, item_type)
                    && resource.is_none_or(|id| &r.id == id)
                    && loc.allows(&r.id)
            })
        }),
    }
}

/// Narrow resources to those collectable at the selected location and of the
/// selected type.
pub fn filter_resources(
    resources: &[Resource],
    selected_location: Option<&PickupLocation>,
    selected_type: Option<&str>,
) -> FilterOutcome<Resource> {
    FilterOutcome::keep(resources, |r| {
        selected_location.is_none_or(|loc| loc.allows(&r.id))
            && selected_type.is_none_or(|item_type| has_type(r, item_type))
    })
}

/// Narrow item types to those of resources still reachable under the selected
/// location and resource.
pub fn filter_item_types(
    item_types: &[ItemType],
    resources: &[Resource],
    selected_location: Option<&PickupLocation>,
    selected_resource: Option<&ResourceId>,
) -> Vec<ItemType> {
    if selected_location.is_none() && selected_resource.is_none() {
        return item_types.to_vec();
    }
    let reachable: Vec<&Resource> = resources
        .iter()
        .filter(|r| selected_resource.is_none_or(|id| &r.id == id))
        .filter(|r| selected_location.is_none_or(|loc| loc.allows(&r.id)))
        .collect();
    item_types
        .iter()
        .filter(|t| reachable.iter().any(|r| has_type(r, &t.id)))
        .cloned()
        .collect()
}
