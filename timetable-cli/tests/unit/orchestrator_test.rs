use super::*;

use crate::data_source::{InMemoryDataSource, RawCourse, RawCourseSequence, RawCourseTrainerEligibility, RawEmployee, RawEnrollment, RawTrainer, RawVenue};
use crate::output::InMemorySink;

/// Spec.md §8 scenario 1: two trainees, two courses, one prerequisite, one
/// trainer eligible for both, one venue, no shifts. Expects a feasible
/// schedule with the prerequisite honored.
fn two_trainee_prerequisite_source() -> InMemoryDataSource {
    InMemoryDataSource {
        venues: vec![RawVenue { company: "acme".into(), name: "Room A".into(), capacity: 5, is_virtual: false }],
        trainers: vec![RawTrainer { id: "t1".into() }],
        trainer_eligibility: vec![
            RawCourseTrainerEligibility { trainer_id: "t1".into(), course_or_batch_identity: "C1".into() },
            RawCourseTrainerEligibility { trainer_id: "t1".into(), course_or_batch_identity: "C2".into() },
        ],
        courses: vec![
            RawCourse { company: "acme".into(), name: "C1".into(), stream: None, duration_minutes: Some(240), valid_start_date: None, valid_end_date: None },
            RawCourse { company: "acme".into(), name: "C2".into(), stream: None, duration_minutes: Some(240), valid_start_date: None, valid_end_date: None },
        ],
        course_sequence: vec![RawCourseSequence { course: "C2".into(), prerequisite: "C1".into(), is_global_sequence: false }],
        employees: vec![
            RawEmployee { company: "acme".into(), id: "e1".into(), shift: None, saturday_available: false, week1_shift: None, week2_shift: None, week3_shift: None, week4_shift: None },
            RawEmployee { company: "acme".into(), id: "e2".into(), shift: None, saturday_available: false, week1_shift: None, week2_shift: None, week3_shift: None, week4_shift: None },
        ],
        enrollment: vec![
            RawEnrollment { company: "acme".into(), trainee_id: "e1".into(), course: "C1".into(), course_exist: true },
            RawEnrollment { company: "acme".into(), trainee_id: "e1".into(), course: "C2".into(), course_exist: true },
            RawEnrollment { company: "acme".into(), trainee_id: "e2".into(), course: "C1".into(), course_exist: true },
            RawEnrollment { company: "acme".into(), trainee_id: "e2".into(), course: "C2".into(), course_exist: true },
        ],
    }
}

fn base_config() -> Config {
    Config {
        start_date: "2026-07-27".into(), // Monday
        days: 2,
        hours_per_day: 8,
        is_splitting_batch: false,
        is_scheduling_course: true,
        max_time_in_seconds: 10,
        ..Config::default()
    }
}

#[test]
fn schedules_two_trainees_with_prerequisite_ordering() {
    let source = two_trainee_prerequisite_source();
    let config = base_config();
    let mut sink = InMemorySink::default();

    run(&source, &config, &mut sink).unwrap();

    assert!(sink.stage1.is_empty());
    assert_eq!(sink.stage2.len(), 2);

    let c1 = sink.stage2.iter().find(|r| r.course_batch == "acme-C1-0").unwrap();
    let c2 = sink.stage2.iter().find(|r| r.course_batch == "acme-C2-0").unwrap();
    assert!(c1.start_hour_of_day < c2.start_hour_of_day || c1.day_index < c2.day_index);
    assert_eq!(c1.trainer, "t1");
    assert_eq!(c2.trainer, "t1");
    assert_eq!(c1.venue, "Room A");
}

#[test]
fn fails_fast_when_neither_stage_is_selected() {
    let source = two_trainee_prerequisite_source();
    let mut config = base_config();
    config.is_splitting_batch = false;
    config.is_scheduling_course = false;

    let result = run(&source, &config, &mut InMemorySink::default());

    assert!(result.is_err());
}

#[test]
fn runs_batching_then_feeds_stage_two() {
    let source = two_trainee_prerequisite_source();
    let mut config = base_config();
    config.is_splitting_batch = true;
    config.venue_capacity = 5;
    let mut sink = InMemorySink::default();

    run(&source, &config, &mut sink).unwrap();

    assert!(!sink.stage1.is_empty());
    assert!(sink.stage1.iter().all(|r| r.company == "acme"));
}
