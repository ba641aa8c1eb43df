//! Tests for snapshot loading and constraint highlighting.

use booking_engine::{
    build_index, constraint_highlight, CalendarDay, CalendarSnapshot,
    CirculationPolicy, ConstraintMode, DisablePredicate, Selection, SelectionContext,
};

fn day(s: &str) -> CalendarDay {
    CalendarDay::parse(s).unwrap()
}

const SNAPSHOT: &str = r#"{
    "resources": [
        {"item_id": 1, "title": "Projector", "external_id": "39999000001", "item_type_id": "AV"},
        {"item_id": 2, "title": "Projector", "external_id": "39999000002", "item_type_id": "AV"}
    ],
    "bookings": [
        {"booking_id": 10, "item_id": 1, "start_date": "2025-01-15T00:00:00+00:00", "end_date": "2025-01-20T23:59:59+00:00", "patron_id": 42},
        {"booking_id": 11, "item_id": 2, "start_date": "2025-01-16", "end_date": "2025-01-18"},
        {"booking_id": 12, "item_id": 2, "start_date": null}
    ],
    "loans": [{"item_id": 2, "due_date": "2025-01-10"}],
    "holidays": ["2025-01-01"],
    "policy": {"lead_days": 1, "trail_days": 1, "max_period": 14, "constraint_mode": "normal"},
    "pickup_locations": [{"library_id": "CPL", "name": "Centerville", "pickup_items": [1, 2]}]
}"#;

#[test]
fn loads_backend_field_names_and_defaults() {
    let snapshot = CalendarSnapshot::from_json(SNAPSHOT).unwrap();

    assert_eq!(snapshot.resources.len(), 2);
    assert_eq!(snapshot.resources[0].id.as_str(), "1");
    assert_eq!(snapshot.resources[0].barcode.as_deref(), Some("39999000001"));
    assert_eq!(snapshot.bookings[0].patron_id.as_ref().map(|p| p.as_str()), Some("42"));
    assert_eq!(snapshot.checkouts.len(), 1);
    assert_eq!(snapshot.policy.max_period(), Some(14));
    assert!(snapshot.item_types.is_empty());
}

#[test]
fn null_dates_load_and_the_row_is_skipped() {
    let snapshot = CalendarSnapshot::from_json(SNAPSHOT).unwrap();
    assert_eq!(snapshot.bookings[2].start, "");

    let index = build_index(snapshot.inputs(), &snapshot.policy, None);
    // Only the two well-formed bookings, the loan, and the holiday remain.
    assert!(index.reasons(day("2025-01-16"), &"2".into()).is_some());
    assert!(index.days().all(|d| d >= day("2025-01-01") && d <= day("2025-01-22")));
}

#[test]
fn empty_document_is_an_empty_snapshot() {
    let snapshot = CalendarSnapshot::from_json("{}").unwrap();
    assert_eq!(snapshot, CalendarSnapshot::default());
    assert_eq!(snapshot.policy, CirculationPolicy::default());
}

#[test]
fn invalid_json_is_an_error() {
    assert!(CalendarSnapshot::from_json("{not json").is_err());
}

#[test]
fn any_resource_mode_over_a_loaded_snapshot() {
    let snapshot = CalendarSnapshot::from_json(SNAPSHOT).unwrap();
    let index = build_index(snapshot.inputs(), &snapshot.policy, None);
    let context = SelectionContext::new(Selection::Empty);
    let predicate = DisablePredicate::new(
        &index,
        &snapshot.resources,
        &context,
        &snapshot.policy,
        day("2025-01-02"),
    );

    // On 01-15 item 1 is booked and item 2 is in its lead period.
    assert!(predicate.is_disabled(day("2025-01-15")));
    // Only item 2 has its loan due on 01-10.
    assert!(!predicate.is_disabled(day("2025-01-10")));
    assert!(predicate.is_disabled(day("2025-01-01")));
}

#[test]
fn highlight_for_end_date_only_spans_the_fixed_period() {
    let policy = CirculationPolicy {
        max_period: Some(4),
        constraint_mode: ConstraintMode::EndDateOnly,
        ..CirculationPolicy::default()
    };

    let highlight = constraint_highlight(day("2025-03-10"), &policy).unwrap();

    assert_eq!(highlight.target_end, day("2025-03-13"));
    assert_eq!(highlight.intermediate, vec![day("2025-03-11"), day("2025-03-12")]);
    assert_eq!(highlight.mode, ConstraintMode::EndDateOnly);
}

#[test]
fn highlight_is_absent_without_a_bound() {
    assert!(constraint_highlight(day("2025-03-10"), &CirculationPolicy::default()).is_none());
}

#[test]
fn override_earlier_than_formula_still_wins() {
    let policy = CirculationPolicy {
        max_period: Some(10),
        constraint_mode: ConstraintMode::EndDateOnly,
        due_date_override: Some(day("2025-03-12")),
        ..CirculationPolicy::default()
    };

    assert_eq!(policy.target_end_date(day("2025-03-10")), day("2025-03-12"));
    // An override before the start collapses to a one-day booking.
    assert_eq!(policy.target_end_date(day("2025-03-20")), day("2025-03-20"));
}

// ── Malformed rows ──────────────────────────────────────────────────────────

#[test]
fn null_holiday_entry_is_skipped() {
    let snapshot = CalendarSnapshot::from_json(r#"{"holidays": ["2025-01-01", null]}"#).unwrap();
    assert_eq!(snapshot.holidays, vec!["2025-01-01".to_string(), String::new()]);

    let index = build_index(snapshot.inputs(), &snapshot.policy, None);
    assert!(index.is_holiday(day("2025-01-01")));
    assert_eq!(index.days().count(), 0);
}

#[test]
fn resource_without_an_id_is_dropped() {
    let snapshot =
        CalendarSnapshot::from_json(r#"{"resources": [{"id": 1}, {"title": "no id"}, "junk"]}"#)
            .unwrap();

    assert_eq!(snapshot.resources.len(), 1);
    assert_eq!(snapshot.resources[0].id.as_str(), "1");
}

#[test]
fn numeric_booking_date_skips_only_that_booking() {
    let snapshot = CalendarSnapshot::from_json(
        r#"{
            "resources": [{"id": 1}],
            "bookings": [
                {"id": 5, "resource_id": 1, "start": 20250110, "end": "2025-01-12"},
                {"id": 6, "resource_id": 1, "start": "2025-01-20", "end": "2025-01-21"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(snapshot.bookings.len(), 2);
    assert_eq!(snapshot.bookings[0].start, "20250110");

    let index = build_index(snapshot.inputs(), &snapshot.policy, None);
    assert!(index.reasons(day("2025-01-11"), &"1".into()).is_none());
    assert!(index.reasons(day("2025-01-20"), &"1".into()).is_some());
}

#[test]
fn malformed_due_date_override_is_ignored() {
    let snapshot = CalendarSnapshot::from_json(
        r#"{"policy": {"lead_days": 2, "max_period": 7, "constraint_mode": "end_date_only",
                       "due_date_override": "not-a-date"}}"#,
    )
    .unwrap();

    assert_eq!(snapshot.policy.due_date_override, None);
    assert_eq!(snapshot.policy.lead_days, 2);
    assert_eq!(snapshot.policy.target_end_date(day("2025-03-10")), day("2025-03-16"));
}

#[test]
fn numeric_pickup_location_and_item_type_ids_load_as_strings() {
    let snapshot = CalendarSnapshot::from_json(
        r#"{
            "resources": [{"id": 1, "item_type": 4, "barcode": 39999000001}],
            "pickup_locations": [{"id": 7, "pickup_items": [1]}, {"name": "no id"}],
            "item_types": [{"id": 4, "description": "Camera"}]
        }"#,
    )
    .unwrap();

    assert_eq!(snapshot.pickup_locations.len(), 1);
    assert_eq!(snapshot.pickup_locations[0].id, "7");
    assert_eq!(snapshot.item_types[0].id, "4");
    assert_eq!(snapshot.resources[0].item_type.as_deref(), Some("4"));
    assert_eq!(snapshot.resources[0].barcode.as_deref(), Some("39999000001"));
}

#[test]
fn null_sections_load_as_empty() {
    let snapshot =
        CalendarSnapshot::from_json(r#"{"bookings": null, "holidays": null}"#).unwrap();
    assert!(snapshot.bookings.is_empty());
    assert!(snapshot.holidays.is_empty());
}
