//! Cohorts sharing an identical course-set/shift/cycle signature
//! (spec.md §3 "Group").

#[cfg(test)]
#[path = "../../tests/unit/domain/group_test.rs"]
mod group_test;

use super::{Cycle, Shift};

/// A maximal set of trainees sharing the same `(course-batch-set, shift,
/// cycle)` signature — the scheduling unit at cohort granularity.
#[derive(Debug, Clone)]
pub struct Group {
    /// Group identifier.
    pub id: String,
    /// Owning company, used to scope the scheduling model's venue choices
    /// to venues belonging to the same company.
    pub company: String,
    /// Course-batch identities (see `CourseBatch::identity`) this group's
    /// trainees are all enrolled in.
    pub course_batches: Vec<String>,
    /// Trainee ids in this group.
    pub trainees: Vec<String>,
    /// Shared shift, when shift-aware grouping is enabled.
    pub shift: Shift,
    /// Shared cycle.
    pub cycle: Cycle,
    /// Capacity-accounting-only chunks of `trainees`, each at most
    /// `maximum_group_size`.
    pub subgroups: Vec<Subgroup>,
}

/// A size-bounded chunk of a `Group`, used only for venue-occupancy
/// accounting (spec.md §9: "one session per `(group, course-batch)` with
/// occupancy = `|group.trainees|`" is the chosen mode, so subgroups never
/// get their own session).
#[derive(Debug, Clone)]
pub struct Subgroup {
    /// Subgroup identifier, unique within the owning group.
    pub id: String,
    /// Trainee ids in this subgroup.
    pub trainees: Vec<String>,
}

impl Group {
    /// Total occupancy this group contributes to a shared session, i.e.
    /// the full trainee count (subgroups are accounting detail only).
    pub fn occupancy(&self) -> usize {
        self.trainees.len()
    }

    /// Splits `trainees` into subgroups of at most `maximum_group_size`,
    /// in input order.
    pub fn build_subgroups(group_id: &str, trainees: &[String], maximum_group_size: usize) -> Vec<Subgroup> {
        if maximum_group_size == 0 {
            return vec![Subgroup { id: format!("{group_id}-0"), trainees: trainees.to_vec() }];
        }
        trainees
            .chunks(maximum_group_size)
            .enumerate()
            .map(|(i, chunk)| Subgroup { id: format!("{group_id}-{i}"), trainees: chunk.to_vec() })
            .collect()
    }
}
