//! Tests for availability index construction.

use std::collections::BTreeSet;

use booking_engine::{
    build_index, Booking, BookingId, CalendarDay, CalendarInputs, CirculationPolicy, Loan,
    Reason, Resource, ResourceId,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn day(s: &str) -> CalendarDay {
    CalendarDay::parse(s).unwrap()
}

fn item(id: &str) -> Resource {
    Resource::new(id, format!("Item {id}"))
}

fn policy(lead: u32, trail: u32) -> CirculationPolicy {
    CirculationPolicy {
        lead_days: lead,
        trail_days: trail,
        ..CirculationPolicy::default()
    }
}

fn reasons_on(
    index: &booking_engine::AvailabilityIndex,
    date: &str,
    resource: &str,
) -> Vec<Reason> {
    index
        .reasons(day(date), &ResourceId::new(resource))
        .map(|set| set.iter().copied().collect())
        .unwrap_or_default()
}

// ── Bookings ────────────────────────────────────────────────────────────────

#[test]
fn zero_buffers_tag_only_core_days() {
    let resources = vec![item("1")];
    let bookings = vec![Booking::new("b1", "1", "2025-03-10", "2025-03-12")];
    let inputs = CalendarInputs {
        resources: &resources,
        bookings: &bookings,
        ..CalendarInputs::default()
    };

    let index = build_index(inputs, &policy(0, 0), None);

    assert!(reasons_on(&index, "2025-03-09", "1").is_empty());
    assert_eq!(reasons_on(&index, "2025-03-10", "1"), vec![Reason::Core]);
    assert_eq!(reasons_on(&index, "2025-03-11", "1"), vec![Reason::Core]);
    assert_eq!(reasons_on(&index, "2025-03-12", "1"), vec![Reason::Core]);
    assert!(reasons_on(&index, "2025-03-13", "1").is_empty());
}

#[test]
fn lead_and_trail_buffers_surround_the_core() {
    let bookings = vec![Booking::new("b1", "1", "2025-03-10", "2025-03-12")];
    let inputs = CalendarInputs {
        bookings: &bookings,
        ..CalendarInputs::default()
    };

    let index = build_index(inputs, &policy(2, 1), None);

    assert!(reasons_on(&index, "2025-03-07", "1").is_empty());
    assert_eq!(reasons_on(&index, "2025-03-08", "1"), vec![Reason::Lead]);
    assert_eq!(reasons_on(&index, "2025-03-09", "1"), vec![Reason::Lead]);
    assert_eq!(reasons_on(&index, "2025-03-10", "1"), vec![Reason::Core]);
    assert_eq!(reasons_on(&index, "2025-03-12", "1"), vec![Reason::Core]);
    assert_eq!(reasons_on(&index, "2025-03-13", "1"), vec![Reason::Trail]);
}

#[test]
fn lead_window_follows_the_trail_buffer() {
    // Booking 15..20 with lead 3 / trail 2: 21-22 rest, 23-25 would need a
    // lead buffer reaching back into the rest period.
    let bookings = vec![Booking::new("b1", "1", "2025-01-15", "2025-01-20")];
    let inputs = CalendarInputs {
        bookings: &bookings,
        ..CalendarInputs::default()
    };

    let index = build_index(inputs, &policy(3, 2), None);

    assert_eq!(reasons_on(&index, "2025-01-20", "1"), vec![Reason::Core]);
    assert_eq!(reasons_on(&index, "2025-01-21", "1"), vec![Reason::Trail]);
    assert_eq!(reasons_on(&index, "2025-01-22", "1"), vec![Reason::Trail]);
    for date in ["2025-01-23", "2025-01-24", "2025-01-25"] {
        assert_eq!(
            reasons_on(&index, date, "1"),
            vec![Reason::Lead],
            "{date} should carry lead, not trail"
        );
    }
    assert!(reasons_on(&index, "2025-01-26", "1").is_empty());
}

#[test]
fn adjacent_bookings_merge_reasons_on_shared_days() {
    let bookings = vec![
        Booking::new("b1", "1", "2025-05-01", "2025-05-03"),
        Booking::new("b2", "1", "2025-05-05", "2025-05-06"),
    ];
    let inputs = CalendarInputs {
        bookings: &bookings,
        ..CalendarInputs::default()
    };

    let index = build_index(inputs, &policy(1, 1), None);

    // 05-04 is b1's trail and b2's lead at the same time.
    let expected: BTreeSet<Reason> = [Reason::Lead, Reason::Trail].into_iter().collect();
    assert_eq!(
        index.reasons(day("2025-05-04"), &ResourceId::new("1")),
        Some(&expected)
    );
}

#[test]
fn bookings_only_block_their_own_resource() {
    let bookings = vec![Booking::new("b1", "1", "2025-03-10", "2025-03-12")];
    let inputs = CalendarInputs {
        bookings: &bookings,
        ..CalendarInputs::default()
    };

    let index = build_index(inputs, &policy(0, 0), None);

    assert!(reasons_on(&index, "2025-03-11", "2").is_empty());
}

#[test]
fn edited_booking_is_excluded() {
    let bookings = vec![
        Booking::new("b1", "1", "2025-03-10", "2025-03-12"),
        Booking::new("b2", "1", "2025-03-20", "2025-03-22"),
    ];
    let inputs = CalendarInputs {
        bookings: &bookings,
        ..CalendarInputs::default()
    };

    let index = build_index(inputs, &policy(0, 0), Some(&BookingId::new("b1")));

    assert!(reasons_on(&index, "2025-03-11", "1").is_empty());
    assert_eq!(reasons_on(&index, "2025-03-21", "1"), vec![Reason::Core]);
}

// ── Loans and holidays ──────────────────────────────────────────────────────

#[test]
fn loan_blocks_only_its_due_day() {
    let loans = vec![Loan::new("1", "2025-04-02")];
    let inputs = CalendarInputs {
        loans: &loans,
        ..CalendarInputs::default()
    };

    let index = build_index(inputs, &policy(2, 2), None);

    assert!(reasons_on(&index, "2025-04-01", "1").is_empty());
    assert_eq!(reasons_on(&index, "2025-04-02", "1"), vec![Reason::Checkout]);
    assert!(reasons_on(&index, "2025-04-03", "1").is_empty());
}

#[test]
fn holiday_is_recorded_for_every_resource() {
    let resources = vec![item("1"), item("2"), item("3")];
    let holidays = vec!["2025-08-10".to_string()];
    let inputs = CalendarInputs {
        resources: &resources,
        holidays: &holidays,
        ..CalendarInputs::default()
    };

    let index = build_index(inputs, &policy(0, 0), None);

    assert!(index.is_holiday(day("2025-08-10")));
    for id in ["1", "2", "3"] {
        assert_eq!(reasons_on(&index, "2025-08-10", id), vec![Reason::Holiday]);
    }
    assert!(!index.is_holiday(day("2025-08-11")));
}

#[test]
fn holiday_without_resources_is_still_known() {
    let holidays = vec!["2025-08-10".to_string()];
    let inputs = CalendarInputs {
        holidays: &holidays,
        ..CalendarInputs::default()
    };

    let index = build_index(inputs, &policy(0, 0), None);

    assert!(index.is_holiday(day("2025-08-10")));
    assert!(index.entries_on(day("2025-08-10")).is_none());
}

// ── Malformed input ─────────────────────────────────────────────────────────

#[test]
fn malformed_rows_are_skipped_not_fatal() {
    let resources = vec![item("1")];
    let bookings = vec![
        Booking::new("bad-start", "1", "not a date", "2025-03-12"),
        Booking::new("inverted", "1", "2025-03-20", "2025-03-18"),
        Booking::new("orphan", "", "2025-03-25", "2025-03-26"),
        Booking::new("good", "1", "2025-03-01", "2025-03-01"),
    ];
    let loans = vec![Loan::new("1", "2025-13-45")];
    let holidays = vec!["someday".to_string(), "2025-03-30".to_string()];
    let inputs = CalendarInputs {
        resources: &resources,
        bookings: &bookings,
        loans: &loans,
        holidays: &holidays,
    };

    let index = build_index(inputs, &policy(0, 0), None);

    let days: Vec<CalendarDay> = index.days().collect();
    assert_eq!(days, vec![day("2025-03-01"), day("2025-03-30")]);
}

#[test]
fn backend_datetime_strings_use_their_calendar_day() {
    let bookings = vec![Booking::new(
        "b1",
        "1",
        "2025-03-10T00:00:00+00:00",
        "2025-03-11 23:59:59",
    )];
    let inputs = CalendarInputs {
        bookings: &bookings,
        ..CalendarInputs::default()
    };

    let index = build_index(inputs, &policy(0, 0), None);

    let days: Vec<CalendarDay> = index.days().collect();
    assert_eq!(days, vec![day("2025-03-10"), day("2025-03-11")]);
}

#[test]
fn empty_inputs_build_an_empty_index() {
    let index = build_index(CalendarInputs::default(), &policy(3, 3), None);
    assert!(index.is_empty());
}
