use super::*;

use std::collections::BTreeSet;

use chrono::NaiveDate;

use timetable_core::calendar::Calendar;
use timetable_core::domain::Session;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn morning_hours_map_to_eight_oclock_base() {
    assert_eq!(display_clock_hour(0, false), 8);
    assert_eq!(display_clock_hour(3, false), 11);
}

#[test]
fn afternoon_hours_skip_the_noon_lunch_hour() {
    assert_eq!(display_clock_hour(4, false), 13);
    assert_eq!(display_clock_hour(7, false), 16);
}

#[test]
fn an_end_time_landing_at_hour_four_does_not_get_the_lunch_skip() {
    assert_eq!(display_clock_hour(4, true), 12);
}

#[test]
fn format_clock_pads_to_two_digits() {
    assert_eq!(format_clock(0, false), "08:00");
    assert_eq!(format_clock(4, true), "12:00");
}

#[test]
fn converts_a_session_into_its_export_row() {
    let start = date(2026, 7, 27); // Monday
    let calendar = Calendar::new(start, 5, &BTreeSet::new()).unwrap();

    let session = Session {
        course_batch_identity: "acme-Safety-0".into(),
        session_index: 0,
        group_id: "acme-group-0".into(),
        start_hour: 8, // day 1, hour 0
        end_hour: 12,
        day: 1,
        venue: "Room A".into(),
        trainer: "t1".into(),
        active: true,
    };

    let row = to_stage2_row(&session, &calendar, 8, 5, 3).unwrap();

    assert_eq!(row.day_index, 1);
    assert_eq!(row.date, date(2026, 7, 28));
    assert_eq!(row.day_name, "Tuesday");
    assert_eq!(row.start_hour_of_day, 0);
    assert_eq!(row.end_hour_of_day, 4);
    assert_eq!(row.start_clock, "08:00");
    assert_eq!(row.end_clock, "12:00");
    assert_eq!(row.venue_max_capacity, 5);
    assert_eq!(row.venue_occupancy, 3);
}

#[test]
fn in_memory_sink_accumulates_rows_across_calls() {
    let mut sink = InMemorySink::default();
    sink.write_stage2(vec![]);
    assert!(sink.stage2.is_empty());
}
