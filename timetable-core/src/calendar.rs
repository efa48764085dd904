//! Maps a start date and a business-day count to an ordered grid of
//! schedulable days, per spec.md §4.1.

#[cfg(test)]
#[path = "../tests/unit/calendar_test.rs"]
mod calendar_test;

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::CoreError;

/// A single collected business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    /// Calendar date.
    pub date: NaiveDate,
    /// True for Saturdays that made it into the grid (Sundays never do).
    pub is_weekend: bool,
}

/// The business-day grid for the planning horizon.
///
/// Built by walking forward from `start_date` day by day, skipping Sundays
/// and listed holidays, until `days` business days have been collected.
/// `dates[i]` is stable once built; index `i` never changes.
pub struct Calendar {
    dates: Vec<CalendarDay>,
    index: HashMap<NaiveDate, usize>,
    weekend_index: Vec<usize>,
    week_groups: HashMap<u32, Vec<usize>>,
}

impl Calendar {
    /// Builds a calendar from `start_date`, a target business-day count and
    /// a holiday set. Sundays are always excluded; Saturdays are included
    /// but flagged `is_weekend`; holidays (any weekday) are excluded.
    pub fn new(start_date: NaiveDate, days: i64, holidays: &BTreeSet<NaiveDate>) -> Result<Self, CoreError> {
        if days <= 0 {
            return Err(CoreError::EmptyHorizon { days });
        }

        let mut dates = Vec::with_capacity(days as usize);
        let mut index = HashMap::with_capacity(days as usize);
        let mut weekend_index = Vec::new();
        let mut cursor = start_date;

        while (dates.len() as i64) < days {
            let weekday = cursor.weekday();
            let is_holiday = holidays.contains(&cursor);

            if weekday != Weekday::Sun && !is_holiday {
                let is_weekend = weekday == Weekday::Sat;
                let i = dates.len();
                if is_weekend {
                    weekend_index.push(i);
                }
                index.insert(cursor, i);
                dates.push(CalendarDay { date: cursor, is_weekend });
            }

            cursor += Duration::days(1);
        }

        let week_groups = group_by_week(&dates);

        Ok(Self { dates, index, weekend_index, week_groups })
    }

    /// Number of business days in the grid.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True if the grid is empty (never happens via `new`, kept for API
    /// symmetry with `len`).
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The day at index `i`, if in range.
    pub fn day(&self, i: usize) -> Option<CalendarDay> {
        self.dates.get(i).copied()
    }

    /// The stable index of `date`, if it is part of the grid.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.index.get(&date).copied()
    }

    /// Indices of every included Saturday, in ascending order.
    pub fn weekend_index(&self) -> &[usize] {
        &self.weekend_index
    }

    /// Day indices belonging to week `w`, where week 0 is the ISO week
    /// containing day 0's Monday.
    pub fn week_group(&self, w: u32) -> &[usize] {
        self.week_groups.get(&w).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct weeks spanned by the grid.
    pub fn week_count(&self) -> u32 {
        self.week_groups.keys().copied().max().map(|m| m + 1).unwrap_or(0)
    }
}

fn group_by_week(dates: &[CalendarDay]) -> HashMap<u32, Vec<usize>> {
    let Some(first) = dates.first() else {
        return HashMap::new();
    };

    // Monday of the ISO week containing day 0.
    let first_monday = first.date - Duration::days(first.date.weekday().num_days_from_monday() as i64);

    let mut groups: HashMap<u32, Vec<usize>> = HashMap::new();
    for (i, day) in dates.iter().enumerate() {
        let delta_days = (day.date - first_monday).num_days();
        let week = (delta_days / 7) as u32;
        groups.entry(week).or_default().push(i);
    }
    groups
}
