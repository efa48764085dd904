//! A `Course` specialized by batch number (spec.md §3 "CourseBatch").

use super::Course;

/// A single batch of a course, as produced by stage 1 (or a synthetic
/// batch 0 when batching is disabled).
#[derive(Debug, Clone)]
pub struct CourseBatch {
    /// The underlying course.
    pub course: Course,
    /// Batch number within the course.
    pub batch_number: u32,
    /// Explicit subset of horizon hour indices at which this batch's
    /// session may start, or `None` if any horizon slot is permitted.
    /// Derived from stage 1's per-week shift assignment via
    /// `timetable_scheduling::valid_start_domain`.
    pub valid_start_domain: Option<Vec<u32>>,
}

impl CourseBatch {
    /// Builds a course-batch with no start-domain restriction.
    pub fn new(course: Course, batch_number: u32) -> Self {
        Self { course, batch_number, valid_start_domain: None }
    }

    /// The identity triple `[company]-[name]-[batch_number]` spec.md §3
    /// uses to key batches.
    pub fn identity(&self) -> String {
        format!("{}-{}-{}", self.course.company, self.course.name, self.batch_number)
    }

    /// True if `hour` is permitted by `valid_start_domain`, or always true
    /// when the domain is unrestricted.
    pub fn allows_start(&self, hour: u32) -> bool {
        match &self.valid_start_domain {
            None => true,
            Some(domain) => domain.contains(&hour),
        }
    }
}
