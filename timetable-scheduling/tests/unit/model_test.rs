use super::*;

use chrono::NaiveDate;
use std::collections::BTreeSet;

use timetable_core::domain::{Course, Shift};

fn calendar(days: i64) -> Calendar {
    let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(); // a Monday
    Calendar::new(start, days, &BTreeSet::new()).expect("calendar builds")
}

fn course(name: &str, duration_hours: u32, prerequisites: Vec<String>) -> Course {
    Course {
        company: "acme".into(),
        name: name.into(),
        stream: None,
        duration_hours,
        prerequisites,
        global_sequence: vec![],
        valid_start_date: None,
        valid_end_date: None,
    }
}

fn batch(c: Course) -> CourseBatch {
    CourseBatch::new(c, 0)
}

fn venue(name: &str, capacity: i64, is_virtual: bool) -> Venue {
    Venue::new("acme", name, capacity, is_virtual).expect("venue builds")
}

fn group(id: &str, course_batches: Vec<String>, trainees: Vec<String>) -> Group {
    Group {
        id: id.into(),
        company: "acme".into(),
        course_batches,
        trainees,
        shift: Shift::NonShift,
        cycle: Cycle::WDays,
        subgroups: vec![],
    }
}

#[test]
fn two_courses_with_a_prerequisite_order_c1_before_c2() {
    let cal = calendar(2);
    let c1 = batch(course("c1", 4, vec![]));
    let c2 = batch(course("c2", 4, vec!["c1".into()]));
    let venues = vec![venue("room-a", 5, false)];
    let trainers = vec![Trainer::new("t1", vec![c1.identity(), c2.identity()])];
    let groups = vec![group("g1", vec![c1.identity(), c2.identity()], vec!["e1".into(), "e2".into()])];

    let input = SchedulingInput { calendar: &cal, hours_per_day: 8, venues, trainers, course_batches: vec![c1, c2], groups };
    let config = SchedulingConfig::default();

    let model = SchedulingModel::build(&input, &config).expect("model builds");
    let outcome = model.solve(SolveConfig::default()).expect("solve runs");

    match outcome {
        SchedulingOutcome::Solved(sessions) => {
            assert_eq!(sessions.len(), 2);
            let c1_start = sessions.iter().find(|s| s.course_batch_identity.starts_with("acme-c1")).unwrap().start_hour;
            let c2_start = sessions.iter().find(|s| s.course_batch_identity.starts_with("acme-c2")).unwrap().start_hour;
            assert!(c1_start < c2_start, "c1 ({c1_start}) must start before c2 ({c2_start})");
        }
        _ => panic!("expected a feasible schedule for two compatible courses with a prerequisite"),
    }
}

#[test]
fn weekday_only_cohort_never_lands_on_a_weekend_day() {
    let cal = calendar(7); // Mon..Sat collected (Sun skipped), Saturday is weekend index 5.
    let c1 = batch(course("c1", 4, vec![]));
    let venues = vec![venue("room-a", 5, false)];
    let trainers = vec![Trainer::new("t1", vec![c1.identity()])];
    let groups = vec![group("g1", vec![c1.identity()], vec!["e1".into()])];

    let input = SchedulingInput { calendar: &cal, hours_per_day: 8, venues, trainers, course_batches: vec![c1], groups };
    let config = SchedulingConfig::default();

    let model = SchedulingModel::build(&input, &config).expect("model builds");
    let outcome = model.solve(SolveConfig::default()).expect("solve runs");

    match outcome {
        SchedulingOutcome::Solved(sessions) => {
            for s in &sessions {
                assert!(!cal.weekend_index().contains(&(s.day as usize)), "session must not land on a weekend day");
            }
        }
        _ => panic!("expected a feasible schedule"),
    }
}

#[test]
fn prefers_the_real_venue_over_a_virtual_one() {
    let cal = calendar(2);
    let c1 = batch(course("c1", 4, vec![]));
    let venues = vec![venue("room-a", 5, false), venue("virtual-room", 5, true)];
    let trainers = vec![Trainer::new("t1", vec![c1.identity()])];
    let groups = vec![group("g1", vec![c1.identity()], vec!["e1".into()])];

    let input = SchedulingInput { calendar: &cal, hours_per_day: 8, venues, trainers, course_batches: vec![c1], groups };
    let config = SchedulingConfig::default();

    let model = SchedulingModel::build(&input, &config).expect("model builds");
    let outcome = model.solve(SolveConfig::default()).expect("solve runs");

    match outcome {
        SchedulingOutcome::Solved(sessions) => {
            assert_eq!(sessions.len(), 1);
            assert_eq!(sessions[0].venue, "room-a", "the real venue should be preferred over the virtual one");
        }
        _ => panic!("expected a feasible schedule"),
    }
}

#[test]
fn a_single_session_exceeding_venue_capacity_is_infeasible() {
    // Spec.md §8 scenario 2: 6 trainees on one course, one venue of
    // capacity 5 — the lone session already overflows the venue, with no
    // other session to share blame with.
    let cal = calendar(2);
    let c1 = batch(course("c1", 4, vec![]));
    let venues = vec![venue("room-a", 5, false)];
    let trainers = vec![Trainer::new("t1", vec![c1.identity()])];
    let trainees: Vec<String> = (0..6).map(|i| format!("e{i}")).collect();
    let groups = vec![group("g1", vec![c1.identity()], trainees)];

    let input = SchedulingInput { calendar: &cal, hours_per_day: 8, venues, trainers, course_batches: vec![c1], groups };
    let config = SchedulingConfig::default();

    let model = SchedulingModel::build(&input, &config).expect("model builds");
    let outcome = model.solve(SolveConfig::default()).expect("solve runs");

    assert!(matches!(outcome, SchedulingOutcome::Infeasible), "a lone over-capacity session must not be accepted");
}

#[test]
fn two_cohorts_whose_combined_size_exceeds_venue_capacity_cannot_share_a_slot() {
    // Two distinct groups taking distinct courses, each under capacity
    // alone (3 trainees) but over it combined (6 > 5); the only venue must
    // not let both sessions run at the same time.
    let cal = calendar(1);
    let c1 = batch(course("c1", 4, vec![]));
    let c2 = batch(course("c2", 4, vec![]));
    let venues = vec![venue("room-a", 5, false)];
    let trainers = vec![Trainer::new("t1", vec![c1.identity()]), Trainer::new("t2", vec![c2.identity()])];
    let e1: Vec<String> = (0..3).map(|i| format!("a{i}")).collect();
    let e2: Vec<String> = (0..3).map(|i| format!("b{i}")).collect();
    let groups = vec![group("g1", vec![c1.identity()], e1), group("g2", vec![c2.identity()], e2)];

    let input = SchedulingInput { calendar: &cal, hours_per_day: 8, venues, trainers, course_batches: vec![c1, c2], groups };
    let config = SchedulingConfig::default();

    let model = SchedulingModel::build(&input, &config).expect("model builds");
    let outcome = model.solve(SolveConfig::default()).expect("solve runs");

    match outcome {
        SchedulingOutcome::Solved(sessions) => {
            assert_eq!(sessions.len(), 2);
            let a = &sessions[0];
            let b = &sessions[1];
            let disjoint = a.end_hour <= b.start_hour || b.end_hour <= a.start_hour;
            assert!(disjoint, "combined occupancy exceeds venue capacity, sessions must not overlap");
        }
        _ => panic!("expected a feasible schedule with the two sessions placed back to back"),
    }
}

#[test]
fn a_course_with_no_eligible_trainer_is_dropped_rather_than_failing_the_solve() {
    let cal = calendar(2);
    let c1 = batch(course("c1", 4, vec![]));
    let venues = vec![venue("room-a", 5, false)];
    let trainers: Vec<Trainer> = vec![]; // nobody eligible for c1
    let groups = vec![group("g1", vec![c1.identity()], vec!["e1".into()])];

    let input = SchedulingInput { calendar: &cal, hours_per_day: 8, venues, trainers, course_batches: vec![c1], groups };
    let config = SchedulingConfig::default();

    let model = SchedulingModel::build(&input, &config).expect("model builds even with no eligible trainer");
    let outcome = model.solve(SolveConfig::default()).expect("solve runs");

    match outcome {
        SchedulingOutcome::Solved(sessions) => assert!(sessions.is_empty()),
        _ => panic!("an empty model should come back trivially feasible"),
    }
}
