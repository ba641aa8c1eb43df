//! Tests for calendar-day parsing and arithmetic.

use booking_engine::{BookingError, CalendarDay, DayRange};

fn day(s: &str) -> CalendarDay {
    CalendarDay::parse(s).unwrap()
}

#[test]
fn parses_plain_and_timestamped_dates() {
    let expected = CalendarDay::from_ymd(2025, 1, 15).unwrap();
    for input in [
        "2025-01-15",
        " 2025-01-15 ",
        "2025-01-15T10:30:00",
        "2025-01-15T10:30:00.250",
        "2025-01-15 23:59:59",
        "2025-01-15T00:00:00Z",
        "2025-01-15T00:00:00+02:00",
        "2025-01-15T23:30:00-05:00",
    ] {
        assert_eq!(day(input), expected, "input {input:?}");
    }
}

#[test]
fn rejects_garbage() {
    for input in ["", "tomorrow", "2025-02-30", "15/01/2025", "2025-1"] {
        let err = CalendarDay::parse(input).unwrap_err();
        assert!(matches!(err, BookingError::InvalidDate(_)), "input {input:?}");
    }
    assert!(CalendarDay::from_ymd(2025, 13, 1).is_err());
}

#[test]
fn arithmetic_crosses_month_and_leap_boundaries() {
    assert_eq!(day("2024-02-28").add_days(1), day("2024-02-29"));
    assert_eq!(day("2024-02-29").succ(), day("2024-03-01"));
    assert_eq!(day("2025-03-01").pred(), day("2025-02-28"));
    assert_eq!(day("2025-01-01").sub_days(1), day("2024-12-31"));
    assert_eq!(day("2025-01-10").add_days(-3), day("2025-01-07"));
}

#[test]
fn day_counts_are_inclusive_where_asked() {
    let start = day("2025-01-10");
    assert_eq!(start.days_until(day("2025-01-15")), 5);
    assert_eq!(start.days_until(day("2025-01-05")), -5);
    assert_eq!(start.inclusive_span(day("2025-01-14")), 5);
    assert_eq!(start.inclusive_span(start), 1);
    assert_eq!(start.inclusive_span(day("2025-01-09")), 0);
}

#[test]
fn arithmetic_saturates_instead_of_panicking() {
    let far = day("2025-01-01").add_days(i64::MAX);
    assert_eq!(far.add_days(1), far);
    let early = day("2025-01-01").sub_days(i64::MAX);
    assert_eq!(early.pred(), early);
}

#[test]
fn day_range_is_closed_and_ordered() {
    let days: Vec<String> = DayRange::new(day("2025-12-30"), day("2026-01-02"))
        .map(|d| d.to_string())
        .collect();
    assert_eq!(days, vec!["2025-12-30", "2025-12-31", "2026-01-01", "2026-01-02"]);

    assert_eq!(DayRange::new(day("2025-01-02"), day("2025-01-02")).count(), 1);
    assert_eq!(DayRange::new(day("2025-01-03"), day("2025-01-02")).count(), 0);
}

#[test]
fn serializes_as_iso_date_string() {
    let json = serde_json::to_string(&day("2025-07-04")).unwrap();
    assert_eq!(json, r#""2025-07-04""#);

    let back: CalendarDay = serde_json::from_str(r#""2025-07-04T12:00:00Z""#).unwrap();
    assert_eq!(back, day("2025-07-04"));

    assert!(serde_json::from_str::<CalendarDay>(r#""nope""#).is_err());
}
