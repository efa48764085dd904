//! Courses and prerequisite/global-sequence validation (spec.md §3 "Course").

#[cfg(test)]
#[path = "../../tests/unit/domain/course_test.rs"]
mod course_test;

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::error::CoreError;

/// A course offered by a company.
#[derive(Debug, Clone)]
pub struct Course {
    /// Owning company.
    pub company: String,
    /// Course name, unique within a company.
    pub name: String,
    /// Optional grouping label, used by the `course_stream` config filter.
    pub stream: Option<String>,
    /// Duration in hours: ceiling of minutes/60, clamped to at most
    /// `hours_per_day`.
    pub duration_hours: u32,
    /// Names of other courses that must be completed first, within a
    /// single cohort (spec.md §4.3 #10).
    pub prerequisites: Vec<String>,
    /// Names of other courses ordered before this one across all cohorts,
    /// when `is_using_global_sequence` is enabled (spec.md §4.3 #11).
    pub global_sequence: Vec<String>,
    /// Optional validity window; sessions may only be active within it.
    pub valid_start_date: Option<NaiveDate>,
    /// Optional validity window upper bound.
    pub valid_end_date: Option<NaiveDate>,
}

impl Course {
    /// Computes the clamped, ceiling-rounded duration in hours from a raw
    /// minute figure, per spec.md §3. Falls back to `default_course_duration`
    /// when `minutes` is missing or non-positive, per spec.md §7.
    pub fn duration_hours_from_minutes(minutes: Option<i64>, hours_per_day: u32, default_course_duration: u32) -> u32 {
        let hours = match minutes {
            Some(m) if m > 0 => ((m + 59) / 60) as u32,
            _ => default_course_duration,
        };
        hours.min(hours_per_day).max(1)
    }
}

/// Rejects prerequisite/global-sequence graphs containing a cycle, per
/// spec.md §9 ("cycles are invalid input ... implementations should detect
/// and reject them up front"). Returns the cycle, in cycle order, as the
/// error payload.
pub fn validate_no_cycles(courses: &[Course]) -> Result<(), CoreError> {
    let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
    for course in courses {
        let entry = edges.entry(course.name.as_str()).or_default();
        for prereq in course.prerequisites.iter().chain(course.global_sequence.iter()) {
            entry.push(prereq.as_str());
        }
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut stack: Vec<&str> = Vec::new();

    fn visit<'a>(
        node: &'a str,
        edges: &HashMap<&'a str, Vec<&'a str>>,
        marks: &mut HashMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
    ) -> Result<(), CoreError> {
        if let Some(Mark::Done) = marks.get(node) {
            return Ok(());
        }
        if let Some(Mark::Visiting) = marks.get(node) {
            let start = stack.iter().position(|&n| n == node).unwrap_or(0);
            let mut cycle: Vec<String> = stack[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(node.to_string());
            return Err(CoreError::PrerequisiteCycle { cycle });
        }

        marks.insert(node, Mark::Visiting);
        stack.push(node);
        if let Some(deps) = edges.get(node) {
            for &dep in deps {
                visit(dep, edges, marks, stack)?;
            }
        }
        stack.pop();
        marks.insert(node, Mark::Done);
        Ok(())
    }

    let nodes: HashSet<&str> = edges.keys().copied().collect();
    for node in nodes {
        visit(node, &edges, &mut marks, &mut stack)?;
    }
    Ok(())
}
