//! Stage-1 / stage-2 output row shapes and the time-display convention
//! (spec.md §6). Export format beyond these row shapes is a non-goal;
//! `ResultSink` is the seam a real exporter plugs into.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use timetable_core::calendar::Calendar;
use timetable_core::domain::BatchAssignmentRow;
use timetable_core::domain::Session;

/// One row of the stage-1 export: spec.md §6, "one row per (company,
/// course, batch_no, trainee_id) with columns week1..week4 ... and the
/// original per-trainee rotating_shift vector." Identical in shape to
/// `BatchAssignmentRow`; kept as a distinct type so export-facing code
/// doesn't couple to the solver's internal record.
pub type Stage1OutputRow = BatchAssignmentRow;

/// One row of the stage-2 export: spec.md §6, "one row per (group, course)
/// with columns start/end day & hour, ISO date and day name, start/end
/// clock time ..., venue name, venue max capacity, venue occupancy,
/// trainer id."
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage2OutputRow {
    /// Group identifier.
    pub group_id: String,
    /// Course-batch identity (`[company]-[name]-[batch_number]`).
    pub course_batch: String,
    /// Calendar day index.
    pub day_index: u32,
    /// ISO date of `day_index`.
    pub date: NaiveDate,
    /// Weekday name of `date` ("Monday", ...).
    pub day_name: String,
    /// Start hour-of-day (0-based, within `hours_per_day`).
    pub start_hour_of_day: u32,
    /// End hour-of-day.
    pub end_hour_of_day: u32,
    /// Start clock time, display convention applied (spec.md §6).
    pub start_clock: String,
    /// End clock time, display convention applied.
    pub end_clock: String,
    /// Assigned venue name.
    pub venue: String,
    /// Assigned venue's maximum capacity.
    pub venue_max_capacity: u32,
    /// This session's occupancy of the venue (the group's trainee count).
    pub venue_occupancy: u32,
    /// Assigned trainer id.
    pub trainer: String,
}

/// Full English weekday name, since `chrono::Weekday`'s own `Display`
/// prints the three-letter abbreviation and spec.md §6 wants the day name
/// spelled out.
fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Maps an hour-of-day index to a 9-to-5-style clock hour, skipping a
/// one-hour lunch break at noon (spec.md §6's "Time display convention"):
/// `h + 8` o'clock, plus one more hour once `h > 3`, except that an *end*
/// time landing exactly at `h == 4` does not get the extra hour (it reads
/// as the natural end of the morning, not post-lunch).
pub fn display_clock_hour(h: u32, is_end: bool) -> u32 {
    let mut clock = h + 8;
    if h > 3 && !(is_end && h == 4) {
        clock += 1;
    }
    clock
}

/// Formats `h` (hour-of-day) as a `"HH:MM"` clock string via
/// `display_clock_hour`.
pub fn format_clock(h: u32, is_end: bool) -> String {
    format!("{:02}:00", display_clock_hour(h, is_end))
}

/// Converts a solved `Session` plus the calendar and venue capacity table
/// into its stage-2 export row.
pub fn to_stage2_row(session: &Session, calendar: &Calendar, hours_per_day: u32, venue_max_capacity: u32, venue_occupancy: u32) -> Option<Stage2OutputRow> {
    let day = calendar.day(session.day as usize)?;
    let start_hour_of_day = session.start_hour % hours_per_day;
    let end_hour_of_day = session.end_hour - session.day * hours_per_day;

    Some(Stage2OutputRow {
        group_id: session.group_id.clone(),
        course_batch: session.course_batch_identity.clone(),
        day_index: session.day,
        date: day.date,
        day_name: weekday_name(day.date.weekday()).to_string(),
        start_hour_of_day,
        end_hour_of_day,
        start_clock: format_clock(start_hour_of_day, false),
        end_clock: format_clock(end_hour_of_day, true),
        venue: session.venue.clone(),
        venue_max_capacity,
        venue_occupancy,
        trainer: session.trainer.clone(),
    })
}

/// The seam a real exporter plugs into. Export file format beyond the row
/// shapes above is a non-goal; this crate ships only `InMemorySink`.
pub trait ResultSink {
    /// Consumes the stage-1 output rows.
    fn write_stage1(&mut self, rows: Vec<Stage1OutputRow>);
    /// Consumes the stage-2 output rows.
    fn write_stage2(&mut self, rows: Vec<Stage2OutputRow>);
}

/// The minimal in-memory `ResultSink` this crate ships for its own tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    /// Every stage-1 row written so far.
    pub stage1: Vec<Stage1OutputRow>,
    /// Every stage-2 row written so far.
    pub stage2: Vec<Stage2OutputRow>,
}

impl ResultSink for InMemorySink {
    fn write_stage1(&mut self, rows: Vec<Stage1OutputRow>) {
        self.stage1.extend(rows);
    }

    fn write_stage2(&mut self, rows: Vec<Stage2OutputRow>) {
        self.stage2.extend(rows);
    }
}

#[cfg(test)]
#[path = "../tests/unit/output_test.rs"]
mod output_test;
