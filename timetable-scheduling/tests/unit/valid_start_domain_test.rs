use super::*;

use chrono::NaiveDate;
use std::collections::BTreeSet;

use timetable_core::domain::BatchAssignmentRow;

fn row(week1: u8, week2: u8, week3: u8, week4: u8) -> BatchAssignmentRow {
    BatchAssignmentRow {
        company: "acme".into(),
        course: "c1".into(),
        batch_no: 0,
        trainee_id: "e1".into(),
        week1,
        week2,
        week3,
        week4,
        rotating_shift: "0".into(),
    }
}

#[test]
fn finds_the_first_week_that_is_not_marked_unavailable() {
    let rows = vec![row(3, 3, 1, 3)];
    let (week, shift) = realized_week(&rows).expect("a realized week exists");
    assert_eq!(week, 3);
    assert_eq!(shift, Shift::S1);
}

#[test]
fn yields_no_domain_for_a_fully_unavailable_batch() {
    let rows = vec![row(3, 3, 3, 3)];
    assert!(realized_week(&rows).is_none());
}

#[test]
fn non_shift_domain_covers_the_whole_working_day_for_every_day_of_the_week() {
    let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(); // a Monday
    let calendar = Calendar::new(start, 7, &BTreeSet::new()).expect("calendar builds");

    let domain = derive_valid_start_domain(&calendar, 8, 1, Shift::NonShift);

    // Week 0 covers Monday..Saturday (Sunday excluded), 8 hours each.
    assert_eq!(domain.len(), 6 * 8);
    assert!(domain.contains(&0));
    assert!(domain.contains(&7));
}

#[test]
fn s1_domain_is_restricted_to_the_second_half_of_each_day() {
    let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
    let calendar = Calendar::new(start, 7, &BTreeSet::new()).expect("calendar builds");

    let domain = derive_valid_start_domain(&calendar, 8, 1, Shift::S1);

    assert!(domain.iter().all(|&h| h % 8 >= 4));
}
