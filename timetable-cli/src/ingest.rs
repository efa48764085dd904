//! Converts the logical input tables (`data_source.rs`) into the domain
//! model `timetable-core` defines. Per spec.md §7: malformed rows are
//! dropped and logged, never fatal; duplicates by primary key are dropped
//! keeping the first occurrence; strings are trimmed; courses below
//! `minimum_course_participant` are dropped before modeling.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use timetable_core::domain::{validate_no_cycles, Course, Cycle, Shift, Trainee, Trainer, Venue};
use timetable_core::error::CoreError;

use crate::config::Config;
use crate::data_source::{MasterDataSource, RawCourse, RawCourseSequence, RawEnrollment};

/// Everything the orchestrator needs, already filtered and defaulted.
pub struct Ingested {
    /// Every venue, capacity already widened by `buffer_capacity`.
    pub venues: Vec<Venue>,
    /// Every trainer with its eligibility set.
    pub trainers: Vec<Trainer>,
    /// Every course surviving the `course_stream` and dedup filters.
    pub courses: Vec<Course>,
    /// Every trainee surviving the `course_exist` and dedup filters.
    pub trainees: Vec<Trainee>,
}

fn trimmed(s: &str) -> String {
    s.trim().to_string()
}

/// Parses an ISO date, logging and dropping the field on failure rather
/// than failing the whole row (spec.md §7).
fn parse_date(raw: &Option<String>, context: &str) -> Option<NaiveDate> {
    let raw = raw.as_ref()?;
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::warn!(%context, %raw, %err, "could not parse date, dropping field");
            None
        }
    }
}

fn build_venues(source: &dyn MasterDataSource, buffer_capacity: u32) -> Vec<Venue> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut venues = Vec::new();
    for raw in source.venues() {
        let company = trimmed(&raw.company);
        let name = trimmed(&raw.name);
        if company.is_empty() || name.is_empty() {
            tracing::warn!(?raw, "dropping venue row with empty company or name");
            continue;
        }
        let key = (company.clone(), name.clone());
        if !seen.insert(key) {
            tracing::debug!(%company, %name, "dropping duplicate venue row, keeping first");
            continue;
        }
        let widened_capacity = raw.capacity + buffer_capacity as i64;
        match Venue::new(company, name, widened_capacity, raw.is_virtual) {
            Ok(venue) => venues.push(venue),
            Err(err @ CoreError::NonPositiveCapacity { .. }) => {
                tracing::warn!(%err, "dropping venue with non-positive capacity");
            }
            Err(err) => tracing::warn!(%err, "dropping invalid venue row"),
        }
    }
    venues
}

fn build_trainers(source: &dyn MasterDataSource) -> Vec<Trainer> {
    let mut eligibility: FxHashMap<String, Vec<String>> = FxHashMap::default();
    for row in source.trainer_eligibility() {
        let trainer_id = trimmed(&row.trainer_id);
        let identity = trimmed(&row.course_or_batch_identity);
        if trainer_id.is_empty() || identity.is_empty() {
            continue;
        }
        eligibility.entry(trainer_id).or_default().push(identity);
    }

    let mut seen = HashSet::new();
    let mut trainers = Vec::new();
    for raw in source.trainers() {
        let id = trimmed(&raw.id);
        if id.is_empty() {
            tracing::warn!("dropping trainer row with empty id");
            continue;
        }
        if !seen.insert(id.clone()) {
            tracing::debug!(%id, "dropping duplicate trainer row, keeping first");
            continue;
        }
        let eligible = eligibility.get(&id).cloned().unwrap_or_default();
        trainers.push(Trainer::new(id, eligible));
    }
    trainers
}

fn prereq_edges(sequence: &[RawCourseSequence]) -> (HashMap<String, Vec<String>>, HashMap<String, Vec<String>>) {
    let mut prerequisites: HashMap<String, Vec<String>> = HashMap::new();
    let mut global_sequence: HashMap<String, Vec<String>> = HashMap::new();
    for row in sequence {
        let course = trimmed(&row.course);
        let prereq = trimmed(&row.prerequisite);
        if course.is_empty() || prereq.is_empty() {
            continue;
        }
        prerequisites.entry(course.clone()).or_default().push(prereq.clone());
        if row.is_global_sequence {
            global_sequence.entry(course).or_default().push(prereq);
        }
    }
    (prerequisites, global_sequence)
}

fn build_courses(source: &dyn MasterDataSource, config: &Config) -> Result<Vec<Course>, CoreError> {
    let (prerequisites, global_sequence) = prereq_edges(&source.course_sequence());
    let stream_filter: Option<HashSet<String>> = config.course_stream.as_ref().map(|streams| streams.iter().map(|s| s.trim().to_string()).collect());

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut courses = Vec::new();
    for raw in source.courses() {
        let RawCourse { company, name, stream, duration_minutes, valid_start_date, valid_end_date } = raw;
        let company = trimmed(&company);
        let name = trimmed(&name);
        if company.is_empty() || name.is_empty() {
            tracing::warn!(%company, %name, "dropping course row with empty company or name");
            continue;
        }
        if !seen.insert((company.clone(), name.clone())) {
            tracing::debug!(%company, %name, "dropping duplicate course row, keeping first");
            continue;
        }

        let stream = stream.map(|s| trimmed(&s)).filter(|s| !s.is_empty());
        if let Some(allowed) = &stream_filter {
            if !stream.as_ref().map(|s| allowed.contains(s)).unwrap_or(false) {
                tracing::debug!(%company, %name, "dropping course outside course_stream whitelist");
                continue;
            }
        }

        let duration_hours = Course::duration_hours_from_minutes(duration_minutes, config.hours_per_day, config.default_course_duration);

        courses.push(Course {
            prerequisites: prerequisites.get(&name).cloned().unwrap_or_default(),
            global_sequence: global_sequence.get(&name).cloned().unwrap_or_default(),
            valid_start_date: parse_date(&valid_start_date, &name),
            valid_end_date: parse_date(&valid_end_date, &name),
            company,
            name,
            stream,
            duration_hours,
        });
    }

    validate_no_cycles(&courses)?;
    Ok(courses)
}

fn build_trainees(source: &dyn MasterDataSource, courses: &[Course]) -> Vec<Trainee> {
    let known_courses: HashSet<(String, String)> = courses.iter().map(|c| (c.company.clone(), c.name.clone())).collect();

    let mut enrollment_by_trainee: HashMap<(String, String), Vec<String>> = HashMap::new();
    let mut seen_enrollment: HashSet<(String, String, String)> = HashSet::new();
    for row in source.enrollment() {
        let RawEnrollment { company, trainee_id, course, course_exist } = row;
        if !course_exist {
            continue;
        }
        let company = trimmed(&company);
        let trainee_id = trimmed(&trainee_id);
        let course = trimmed(&course);
        if company.is_empty() || trainee_id.is_empty() || course.is_empty() {
            continue;
        }
        if !known_courses.contains(&(company.clone(), course.clone())) {
            tracing::debug!(%company, %trainee_id, %course, "dropping enrollment row referencing unknown course");
            continue;
        }
        let key = (company.clone(), trainee_id.clone(), course.clone());
        if !seen_enrollment.insert(key) {
            continue;
        }
        enrollment_by_trainee.entry((company, trainee_id)).or_default().push(course);
    }

    let mut seen = HashSet::new();
    let mut trainees = Vec::new();
    for raw in source.employees() {
        let company = trimmed(&raw.company);
        let id = trimmed(&raw.id);
        if company.is_empty() || id.is_empty() {
            tracing::warn!(%company, %id, "dropping employee row with empty company or id");
            continue;
        }
        let key = (company.clone(), id.clone());
        if !seen.insert(key.clone()) {
            tracing::debug!(%company, %id, "dropping duplicate employee row, keeping first");
            continue;
        }

        let shift = raw.shift.as_deref().map(Shift::from_label).unwrap_or(Shift::NonShift);
        let cycle = if raw.saturday_available { Cycle::WEnd } else { Cycle::WDays };
        let weekly_shift = [
            raw.week1_shift.as_deref().map(Shift::from_label),
            raw.week2_shift.as_deref().map(Shift::from_label),
            raw.week3_shift.as_deref().map(Shift::from_label),
            raw.week4_shift.as_deref().map(Shift::from_label),
        ];
        let courses = enrollment_by_trainee.get(&key).cloned().unwrap_or_default();

        trainees.push(Trainee { company, id, shift, cycle, courses, weekly_shift });
    }
    trainees
}

/// Ingests every input table `source` exposes into the filtered, defaulted
/// domain model. The only failure this can raise (beyond logging-and-
/// dropping individual rows) is a prerequisite cycle, which spec.md §9
/// says must be rejected up front.
pub fn ingest(source: &dyn MasterDataSource, config: &Config) -> Result<Ingested, CoreError> {
    let venues = build_venues(source, config.buffer_capacity);
    let trainers = build_trainers(source);
    let courses = build_courses(source, config)?;
    let trainees = build_trainees(source, &courses);

    let min_participants = config.minimum_course_participant;
    let mut enrollment_counts: HashMap<(String, String), u32> = HashMap::new();
    for trainee in &trainees {
        for course in &trainee.courses {
            *enrollment_counts.entry((trainee.company.clone(), course.clone())).or_default() += 1;
        }
    }
    let courses: Vec<Course> = courses
        .into_iter()
        .filter(|c| {
            let count = enrollment_counts.get(&(c.company.clone(), c.name.clone())).copied().unwrap_or(0);
            let keep = count >= min_participants;
            if !keep {
                tracing::info!(company = %c.company, course = %c.name, count, minimum_course_participant = min_participants, "dropping course below minimum_course_participant");
            }
            keep
        })
        .collect();

    let surviving_courses: HashSet<(String, String)> = courses.iter().map(|c| (c.company.clone(), c.name.clone())).collect();
    let trainees: Vec<Trainee> = trainees
        .into_iter()
        .map(|mut t| {
            t.courses.retain(|c| surviving_courses.contains(&(t.company.clone(), c.clone())));
            t
        })
        .collect();

    Ok(Ingested { venues, trainers, courses, trainees })
}

#[cfg(test)]
#[path = "../tests/unit/ingest_test.rs"]
mod ingest_test;
