//! Trainers and their course-batch eligibility (spec.md §3 "Trainer").

use rustc_hash::FxHashSet;

/// A trainer, identified by `id`, eligible to teach any course-batch whose
/// identity string appears in `eligible_courses`.
#[derive(Debug, Clone)]
pub struct Trainer {
    /// Trainer identifier.
    pub id: String,
    /// Course or course-batch identities (`[company]-[name]-[batch_number]`,
    /// see `CourseBatch::identity`) this trainer may teach.
    pub eligible_courses: FxHashSet<String>,
}

impl Trainer {
    /// Builds a trainer from an id and an eligibility set.
    pub fn new(id: impl Into<String>, eligible_courses: impl IntoIterator<Item = String>) -> Self {
        Self { id: id.into(), eligible_courses: eligible_courses.into_iter().collect() }
    }

    /// True if this trainer may teach `course_batch_identity`.
    pub fn is_eligible_for(&self, course_batch_identity: &str) -> bool {
        self.eligible_courses.contains(course_batch_identity)
    }
}
