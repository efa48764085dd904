//! Stage-1 output / stage-2 input record (spec.md §3 "Batch assignment
//! record").

use serde::{Deserialize, Serialize};

use super::Shift;

/// One row of the table the two stages communicate through: a single
/// trainee's realized per-week shift vector within one batch of one
/// course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAssignmentRow {
    /// Owning company.
    pub company: String,
    /// Course name.
    pub course: String,
    /// Batch number within the course.
    pub batch_no: u32,
    /// Trainee id.
    pub trainee_id: String,
    /// Realized shift for week 1 (`0..3`, 3 = unavailable).
    pub week1: u8,
    /// Realized shift for week 2.
    pub week2: u8,
    /// Realized shift for week 3.
    pub week3: u8,
    /// Realized shift for week 4.
    pub week4: u8,
    /// The trainee's original per-trainee rotating-shift label, passed
    /// through unchanged (spec.md §6 stage-1 output bullet; see
    /// SPEC_FULL.md §3 for why this survives the distillation).
    pub rotating_shift: String,
}

impl BatchAssignmentRow {
    /// The week-code (`0..3`) for 1-based `week` (1..=4).
    pub fn week_code(&self, week: u8) -> u8 {
        match week {
            1 => self.week1,
            2 => self.week2,
            3 => self.week3,
            4 => self.week4,
            _ => panic!("week must be 1..=4, got {week}"),
        }
    }

    /// The decoded `Shift` for 1-based `week` (1..=4).
    pub fn shift_for_week(&self, week: u8) -> Shift {
        Shift::from_week_code(self.week_code(week)).expect("week code is always produced via Shift::to_week_code")
    }
}
