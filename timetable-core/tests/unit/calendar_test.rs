use super::*;
use std::collections::BTreeSet;

use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn excludes_sundays_from_the_grid() {
    // 2026-07-27 is a Monday; the following Sunday is 2026-08-02.
    let start = date(2026, 7, 27);
    let calendar = Calendar::new(start, 7, &BTreeSet::new()).unwrap();

    assert_eq!(calendar.len(), 7);
    assert!(calendar.index_of(date(2026, 8, 2)).is_none());
}

#[test]
fn includes_saturdays_flagged_as_weekend() {
    let start = date(2026, 7, 27); // Monday
    let calendar = Calendar::new(start, 7, &BTreeSet::new()).unwrap();

    let saturday_index = calendar.index_of(date(2026, 8, 1)).unwrap();
    assert!(calendar.weekend_index().contains(&saturday_index));
    assert!(calendar.day(saturday_index).unwrap().is_weekend);
}

#[test]
fn skips_listed_holidays() {
    let start = date(2026, 7, 27); // Monday
    let mut holidays = BTreeSet::new();
    holidays.insert(date(2026, 7, 29)); // Wednesday

    let calendar = Calendar::new(start, 5, &holidays).unwrap();

    assert_eq!(calendar.len(), 5);
    assert!(calendar.index_of(date(2026, 7, 29)).is_none());
    // The 5th business day spills past the skipped Wednesday onto Saturday.
    assert_eq!(calendar.day(4).unwrap().date, date(2026, 8, 1));
}

#[test]
fn produces_monotonically_increasing_indices() {
    let start = date(2026, 7, 27);
    let calendar = Calendar::new(start, 10, &BTreeSet::new()).unwrap();

    let mut prev = calendar.day(0).unwrap().date;
    for i in 1..calendar.len() {
        let current = calendar.day(i).unwrap().date;
        assert!(current > prev);
        prev = current;
    }
}

#[test]
fn groups_days_by_week_from_first_monday() {
    let start = date(2026, 7, 27); // Monday, week 0
    let calendar = Calendar::new(start, 14, &BTreeSet::new()).unwrap();

    let week0 = calendar.week_group(0);
    let week1 = calendar.week_group(1);

    assert!(!week0.is_empty());
    assert!(!week1.is_empty());
    assert!(week0.iter().all(|&i| !week1.contains(&i)));
}

#[test]
fn rejects_non_positive_day_count() {
    let start = date(2026, 7, 27);
    let result = Calendar::new(start, 0, &BTreeSet::new());
    assert!(result.is_err());
}
