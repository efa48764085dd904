//! Trainees, their shift pattern and cycle (spec.md §3 "Trainee").
//!
//! Shift codes are not a true enum across the original system (spec.md §9):
//! weekly codes are `0..3`, trainee labels are free-form strings like
//! "Shift 1"/"Non Shift". `Shift` is the single canonical mapping; callers
//! convert at ingestion via `Shift::from_week_code`/`Shift::from_label`.

#[cfg(test)]
#[path = "../../tests/unit/domain/trainee_test.rs"]
mod trainee_test;

/// A trainee's shift for a given week, or their standing shift pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shift {
    /// Full working day, no shift restriction.
    NonShift,
    /// First half of the working day.
    S1,
    /// Second half of the working day.
    S2,
    /// Unavailable this week (week-code 3 only; never a standing trainee
    /// shift in spec.md §3, which only lists `NonShift | S1 | S2 | NS`, but
    /// the stage-1 per-week vector uses code 3 for "unavailable").
    Unavailable,
}

impl Shift {
    /// Canonical mapping from a stage-1 per-week shift code (`0..3`).
    pub fn from_week_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::NonShift),
            1 => Some(Self::S1),
            2 => Some(Self::S2),
            3 => Some(Self::Unavailable),
            _ => None,
        }
    }

    /// Canonical mapping back to a stage-1 per-week shift code.
    pub fn to_week_code(self) -> u8 {
        match self {
            Self::NonShift => 0,
            Self::S1 => 1,
            Self::S2 => 2,
            Self::Unavailable => 3,
        }
    }

    /// Canonical mapping from free-form trainee shift labels ("Shift 1",
    /// "Shift 2", "Non Shift", "NS") to `Shift`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "shift 1" | "s1" => Self::S1,
            "shift 2" | "s2" => Self::S2,
            _ => Self::NonShift,
        }
    }

    /// `[start, end)` hour-of-day window for this shift, given an
    /// `hours_per_day`-hour working day split into equal halves. `S1` is
    /// the second half, `S2` the first half, per spec.md §3.
    pub fn window(self, hours_per_day: u32) -> (u32, u32) {
        let half = hours_per_day / 2;
        match self {
            Self::S1 => (half, hours_per_day),
            Self::S2 => (0, half),
            Self::NonShift | Self::Unavailable => (0, hours_per_day),
        }
    }
}

/// Which days of the week a trainee may be scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Weekdays only; weekend indices are forbidden (spec.md §4.3 #12).
    WDays,
    /// May also be scheduled on weekend indices.
    WEnd,
}

/// A trainee enrolled in one or more courses.
#[derive(Debug, Clone)]
pub struct Trainee {
    /// Owning company.
    pub company: String,
    /// Trainee identifier.
    pub id: String,
    /// Standing shift.
    pub shift: Shift,
    /// Scheduling cycle.
    pub cycle: Cycle,
    /// Course names the trainee is enrolled in.
    pub courses: Vec<String>,
    /// Per-week shift override for weeks 1..4, as used by the stage-1
    /// batching model. Absent entries default to the standing `shift`.
    pub weekly_shift: [Option<Shift>; 4],
}

impl Trainee {
    /// The effective shift for 1-based week `week` (1..=4), falling back to
    /// the standing shift when no weekly override was supplied.
    pub fn shift_for_week(&self, week: u8) -> Shift {
        debug_assert!((1..=4).contains(&week));
        self.weekly_shift[(week - 1) as usize].unwrap_or(self.shift)
    }

    /// `[start, end)` hour-of-day window for the trainee's standing shift.
    pub fn shift_window(&self, hours_per_day: u32) -> (u32, u32) {
        self.shift.window(hours_per_day)
    }
}
