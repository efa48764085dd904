use super::*;

use crate::data_source::{InMemoryDataSource, RawCourse, RawCourseTrainerEligibility, RawEmployee, RawEnrollment, RawTrainer, RawVenue};

fn source_with_two_trainees() -> InMemoryDataSource {
    InMemoryDataSource {
        venues: vec![RawVenue { company: "acme".into(), name: "Room A".into(), capacity: 5, is_virtual: false }],
        trainers: vec![RawTrainer { id: "t1".into() }],
        trainer_eligibility: vec![RawCourseTrainerEligibility { trainer_id: "t1".into(), course_or_batch_identity: "Safety".into() }],
        courses: vec![RawCourse { company: "acme".into(), name: "Safety".into(), stream: None, duration_minutes: Some(240), valid_start_date: None, valid_end_date: None }],
        course_sequence: vec![],
        employees: vec![
            RawEmployee { company: "acme".into(), id: "e1".into(), shift: None, saturday_available: false, week1_shift: None, week2_shift: None, week3_shift: None, week4_shift: None },
            RawEmployee { company: "acme".into(), id: "e2".into(), shift: Some("Shift 1".into()), saturday_available: true, week1_shift: None, week2_shift: None, week3_shift: None, week4_shift: None },
        ],
        enrollment: vec![
            RawEnrollment { company: "acme".into(), trainee_id: "e1".into(), course: "Safety".into(), course_exist: true },
            RawEnrollment { company: "acme".into(), trainee_id: "e2".into(), course: "Safety".into(), course_exist: true },
        ],
    }
}

#[test]
fn ingests_venues_trainers_courses_and_trainees() {
    let source = source_with_two_trainees();
    let config = Config::default();

    let ingested = ingest(&source, &config).unwrap();

    assert_eq!(ingested.venues.len(), 1);
    assert_eq!(ingested.trainers.len(), 1);
    assert_eq!(ingested.courses.len(), 1);
    assert_eq!(ingested.trainees.len(), 2);
    assert_eq!(ingested.courses[0].duration_hours, 4);
}

#[test]
fn widens_venue_capacity_by_buffer_capacity() {
    let source = source_with_two_trainees();
    let mut config = Config::default();
    config.buffer_capacity = 3;

    let ingested = ingest(&source, &config).unwrap();

    assert_eq!(ingested.venues[0].capacity, 8);
}

#[test]
fn drops_enrollment_row_where_course_exist_is_false() {
    let mut source = source_with_two_trainees();
    source.enrollment[1].course_exist = false;
    let config = Config::default();

    let ingested = ingest(&source, &config).unwrap();

    let e2 = ingested.trainees.iter().find(|t| t.id == "e2").unwrap();
    assert!(e2.courses.is_empty());
}

#[test]
fn drops_duplicate_venue_rows_keeping_first() {
    let mut source = source_with_two_trainees();
    source.venues.push(RawVenue { company: "acme".into(), name: "Room A".into(), capacity: 99, is_virtual: false });
    let config = Config::default();

    let ingested = ingest(&source, &config).unwrap();

    assert_eq!(ingested.venues.len(), 1);
    assert_eq!(ingested.venues[0].capacity, 5);
}

#[test]
fn drops_course_below_minimum_course_participant() {
    let source = source_with_two_trainees();
    let mut config = Config::default();
    config.minimum_course_participant = 3;

    let ingested = ingest(&source, &config).unwrap();

    assert!(ingested.courses.is_empty());
    assert!(ingested.trainees.iter().all(|t| t.courses.is_empty()));
}

#[test]
fn rejects_a_prerequisite_cycle() {
    let mut source = source_with_two_trainees();
    source.courses.push(RawCourse { company: "acme".into(), name: "Advanced".into(), stream: None, duration_minutes: Some(120), valid_start_date: None, valid_end_date: None });
    source.course_sequence = vec![
        crate::data_source::RawCourseSequence { course: "Safety".into(), prerequisite: "Advanced".into(), is_global_sequence: false },
        crate::data_source::RawCourseSequence { course: "Advanced".into(), prerequisite: "Safety".into(), is_global_sequence: false },
    ];
    let config = Config::default();

    let result = ingest(&source, &config);

    assert!(result.is_err());
}

#[test]
fn derives_shift_and_cycle_from_employee_rows() {
    let source = source_with_two_trainees();
    let config = Config::default();

    let ingested = ingest(&source, &config).unwrap();

    let e1 = ingested.trainees.iter().find(|t| t.id == "e1").unwrap();
    let e2 = ingested.trainees.iter().find(|t| t.id == "e2").unwrap();
    assert_eq!(e1.shift, timetable_core::domain::Shift::NonShift);
    assert_eq!(e1.cycle, timetable_core::domain::Cycle::WDays);
    assert_eq!(e2.shift, timetable_core::domain::Shift::S1);
    assert_eq!(e2.cycle, timetable_core::domain::Cycle::WEnd);
}
