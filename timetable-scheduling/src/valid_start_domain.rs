//! Derives a `CourseBatch::valid_start_domain` from stage 1's per-week
//! shift assignment, per spec.md §4.3's rule: "NonShift → all hours of
//! that week's days; S1 → second half of each day; S2 → first half;
//! S3 → no hours."

use timetable_core::calendar::Calendar;
use timetable_core::domain::{BatchAssignmentRow, Shift};

/// The batch's realized week number (1..4) and shift, read off any one of
/// its `BatchAssignmentRow`s — stage 1's shift-compatibility rule (§4.2
/// #7) guarantees every trainee in a batch shares the same per-week shift,
/// so any row is representative. Returns `None` if `rows` is empty or no
/// week is marked anything other than unavailable, which should not
/// happen for a batch stage 1 actually emitted (every used batch runs on
/// exactly one week, §4.2 #4/P3).
pub fn realized_week(rows: &[BatchAssignmentRow]) -> Option<(u8, Shift)> {
    let row = rows.first()?;
    (1..=4u8).find_map(|week| {
        let shift = row.shift_for_week(week);
        (!matches!(shift, Shift::Unavailable)).then_some((week, shift))
    })
}

/// Expands a `(week, shift)` pair into the explicit set of horizon hour
/// indices a session of that batch may start at, per the rule quoted
/// above. `week` is 1-based and indexes `calendar.week_group(week - 1)`,
/// i.e. the scheduling horizon's weeks line up one-to-one with the
/// batching rotation's weeks.
pub fn derive_valid_start_domain(calendar: &Calendar, hours_per_day: u32, week: u8, shift: Shift) -> Vec<u32> {
    if matches!(shift, Shift::Unavailable) {
        return Vec::new();
    }

    let days = calendar.week_group((week - 1) as u32);
    let (start_hour, end_hour) = shift.window(hours_per_day);

    let mut domain = Vec::with_capacity(days.len() * (end_hour - start_hour) as usize);
    for &day in days {
        for hour in start_hour..end_hour {
            domain.push(day as u32 * hours_per_day + hour);
        }
    }
    domain
}

/// Convenience wrapper combining `realized_week` and
/// `derive_valid_start_domain`; `None` input (no rows, or no realized
/// week) yields `None` (no restriction — the synthetic single-batch
/// grouping used when batching is disabled has no stage-1 output to
/// derive a domain from, per spec.md §1).
pub fn valid_start_domain_for_batch(calendar: &Calendar, hours_per_day: u32, rows: &[BatchAssignmentRow]) -> Option<Vec<u32>> {
    let (week, shift) = realized_week(rows)?;
    Some(derive_valid_start_domain(calendar, hours_per_day, week, shift))
}

#[cfg(test)]
#[path = "../tests/unit/valid_start_domain_test.rs"]
mod valid_start_domain_test;
