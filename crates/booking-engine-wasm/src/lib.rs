//! WASM bindings for booking-engine.
//!
//! Exposes the disable predicate, marker projection, range validation, and
//! selector filters to the booking calendar widget via `wasm-bindgen`. All
//! complex types cross the boundary as JSON strings; dates are ISO-8601
//! calendar-day strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p booking-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/booking-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/booking_engine_wasm.wasm
//! ```
//!
//! The widget calls `disabledDates` once per render pass for the visible
//! month instead of once per cell, since every call re-parses the snapshot
//! and rebuilds the index.

use booking_engine::{
    build_index, BookingId, CalendarDay, CalendarSnapshot, DisablePredicate, PickupLocation,
    ResourceId, Selection, SelectionContext,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Selection state sent by the widget on every change.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ContextInput {
    /// Zero, one, or two ISO dates already clicked.
    selected_dates: Vec<String>,
    target_resource: Option<ResourceId>,
    editing_booking: Option<BookingId>,
}

/// Current picks in the pickup-location, type, and resource selectors.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct FacetInput {
    pickup_location: Option<String>,
    item_type: Option<String>,
    resource: Option<ResourceId>,
}

// ---------------------------------------------------------------------------
// Helpers: parse JSON inputs, serialize outputs
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_snapshot(json: &str) -> Result<CalendarSnapshot, JsValue> {
    CalendarSnapshot::from_json(json).map_err(js_err)
}

fn parse_day(s: &str) -> Result<CalendarDay, JsValue> {
    CalendarDay::parse(s).map_err(js_err)
}

fn parse_context(json: &str) -> Result<SelectionContext, JsValue> {
    let input: ContextInput = if json.trim().is_empty() {
        ContextInput::default()
    } else {
        serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("Invalid context JSON: {}", e)))?
    };
    let days = input
        .selected_dates
        .iter()
        .map(|s| parse_day(s))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SelectionContext {
        selection: Selection::from_days(&days).map_err(js_err)?,
        target_resource: input.target_resource,
        editing_booking: input.editing_booking,
    })
}

fn parse_facets(json: &str) -> Result<FacetInput, JsValue> {
    if json.trim().is_empty() {
        return Ok(FacetInput::default());
    }
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid facet JSON: {}", e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn find_location<'a>(
    snapshot: &'a CalendarSnapshot,
    id: Option<&str>,
) -> Result<Option<&'a PickupLocation>, JsValue> {
    match id {
        None => Ok(None),
        Some(id) => snapshot
            .pickup_locations
            .iter()
            .find(|loc| loc.id == id)
            .map(Some)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown pickup location: {}", id))),
    }
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// List every disabled day in the closed window `[from, to]`.
///
/// # Arguments
/// - `snapshot_json` -- Resources, bookings, checkouts, holidays, and policy
/// - `context_json` -- `{selectedDates, targetResource, editingBooking}` (may be empty)
/// - `from`, `to` -- ISO dates bounding the visible calendar
/// - `today` -- ISO date used as the reference "today"
///
/// Returns a JSON array of ISO date strings.
#[wasm_bindgen(js_name = "disabledDates")]
pub fn disabled_dates(
    snapshot_json: &str,
    context_json: &str,
    from: &str,
    to: &str,
    today: &str,
) -> Result<String, JsValue> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let context = parse_context(context_json)?;
    let index = build_index(
        snapshot.inputs(),
        &snapshot.policy,
        context.editing_booking.as_ref(),
    );
    let predicate = DisablePredicate::new(
        &index,
        &snapshot.resources,
        &context,
        &snapshot.policy,
        parse_day(today)?,
    );
    to_json(&predicate.disabled_days(parse_day(from)?, parse_day(to)?))
}

/// Whether a single day is disabled. Prefer [`disabled_dates`] for whole views.
#[wasm_bindgen(js_name = "isDateDisabled")]
pub fn is_date_disabled(
    snapshot_json: &str,
    context_json: &str,
    date: &str,
    today: &str,
) -> Result<bool, JsValue> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let context = parse_context(context_json)?;
    let index = build_index(
        snapshot.inputs(),
        &snapshot.policy,
        context.editing_booking.as_ref(),
    );
    let predicate = DisablePredicate::new(
        &index,
        &snapshot.resources,
        &context,
        &snapshot.policy,
        parse_day(today)?,
    );
    Ok(predicate.is_disabled(parse_day(date)?))
}

/// Markers for one calendar cell.
///
/// Returns a JSON object `{markers: [...], counts: {type: n}}` where each
/// marker is `{type, resourceId, resourceName, barcode}`.
#[wasm_bindgen(js_name = "markersForDate")]
pub fn markers_for_date(
    snapshot_json: &str,
    date: &str,
    editing_booking: Option<String>,
) -> Result<String, JsValue> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let editing = editing_booking.map(BookingId::new);
    let index = build_index(snapshot.inputs(), &snapshot.policy, editing.as_ref());
    let markers =
        booking_engine::markers_for_date(Some(&index), parse_day(date)?, &snapshot.resources);
    let counts = booking_engine::aggregate_markers(&markers);
    to_json(&serde_json::json!({ "markers": markers, "counts": counts }))
}

/// Validate the current selection.
///
/// Returns `{valid, errors, minEndDate, maxEndDate}` as JSON.
#[wasm_bindgen(js_name = "validateRange")]
pub fn validate_range(
    snapshot_json: &str,
    context_json: &str,
    today: &str,
) -> Result<String, JsValue> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let context = parse_context(context_json)?;
    let result = booking_engine::validate_range(
        context.selection,
        snapshot.inputs(),
        &snapshot.policy,
        context.target_resource.as_ref(),
        context.editing_booking.as_ref(),
        parse_day(today)?,
    );
    to_json(&result)
}

/// Span to highlight once `start` is chosen, or `null` when unbounded.
#[wasm_bindgen(js_name = "constraintHighlight")]
pub fn constraint_highlight(snapshot_json: &str, start: &str) -> Result<String, JsValue> {
    let snapshot = parse_snapshot(snapshot_json)?;
    to_json(&booking_engine::constraint_highlight(
        parse_day(start)?,
        &snapshot.policy,
    ))
}

/// Narrow the pickup-location selector.
///
/// `facets_json` is `{pickupLocation, itemType, resource}`; returns
/// `{filtered, filteredOutCount, total}`.
#[wasm_bindgen(js_name = "filterPickupLocations")]
pub fn filter_pickup_locations(snapshot_json: &str, facets_json: &str) -> Result<String, JsValue> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let facets = parse_facets(facets_json)?;
    let outcome = booking_engine::filter_pickup_locations(
        &snapshot.pickup_locations,
        &snapshot.resources,
        facets.resource.as_ref(),
        facets.item_type.as_deref(),
    );
    to_json(&outcome)
}

/// Narrow the resource selector.
#[wasm_bindgen(js_name = "filterResources")]
pub fn filter_resources(snapshot_json: &str, facets_json: &str) -> Result<String, JsValue> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let facets = parse_facets(facets_json)?;
    let location = find_location(&snapshot, facets.pickup_location.as_deref())?;
    let outcome = booking_engine::filter_resources(
        &snapshot.resources,
        location,
        facets.item_type.as_deref(),
    );
    to_json(&outcome)
}

/// Narrow the item-type selector. Returns a JSON array of item types.
#[wasm_bindgen(js_name = "filterItemTypes")]
pub fn filter_item_types(snapshot_json: &str, facets_json: &str) -> Result<String, JsValue> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let facets = parse_facets(facets_json)?;
    let location = find_location(&snapshot, facets.pickup_location.as_deref())?;
    to_json(&booking_engine::filter_item_types(
        &snapshot.item_types,
        &snapshot.resources,
        location,
        facets.resource.as_ref(),
    ))
}
