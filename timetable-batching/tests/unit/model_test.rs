use super::*;
use std::collections::HashMap;

use timetable_core::domain::Cycle;

#[test]
fn keeps_min_batches_when_capacity_covers_everyone() {
    assert_eq!(max_batches(20, 2, 30, 3), 3);
}

#[test]
fn adds_one_batch_per_trainer_when_trainers_alone_cover_capacity() {
    // 50 trainees / 2 trainers = 25/trainer, which fits under capacity 30.
    assert_eq!(max_batches(50, 2, 30, 3), 2 + 3);
}

#[test]
fn scales_with_trainers_when_even_trainer_split_exceeds_capacity() {
    // 200 trainees / 2 trainers = 100/trainer, needing ceil(100/30) = 4
    // batches per trainer.
    assert_eq!(max_batches(200, 2, 30, 3), 2 * 4 + 3);
}

fn trainee(id: &str, shift: Shift) -> Trainee {
    Trainee {
        company: "acme".into(),
        id: id.into(),
        shift,
        cycle: Cycle::WDays,
        courses: vec!["c1".into()],
        weekly_shift: [None, None, None, None],
    }
}

fn course(name: &str) -> Course {
    Course {
        company: "acme".into(),
        name: name.into(),
        stream: None,
        duration_hours: 4,
        prerequisites: vec![],
        global_sequence: vec![],
        valid_start_date: None,
        valid_end_date: None,
    }
}

#[test]
fn solves_a_single_small_course_into_one_batch() {
    let trainees = vec![trainee("e1", Shift::NonShift), trainee("e2", Shift::NonShift)];
    let mut trainer_count = HashMap::new();
    trainer_count.insert("c1".to_string(), 1);

    let input = BatchingInput { company: "acme".into(), courses: vec![(course("c1"), trainees)], trainer_count };
    let config = BatchingConfig { venue_capacity: 30, min_batches: 3, enforce_trainer_concurrency: false };

    let model = BatchingModel::build(&input, &config).expect("model builds");
    let outcome = model.solve(SolveConfig::default()).expect("solve runs");

    match outcome {
        BatchingOutcome::Solved(rows) => {
            assert_eq!(rows.len(), 2);
            let used_batches: std::collections::HashSet<u32> = rows.iter().map(|r| r.batch_no).collect();
            assert_eq!(used_batches.len(), 1, "both trainees should land in the same batch");
        }
        _ => panic!("expected a feasible batching outcome for two compatible trainees"),
    }
}

#[test]
fn forces_a_week_four_batch_when_only_the_last_week_is_shift_compatible() {
    // Weeks 1..3 clash on shift (one trainee S1, the other S2); only week 4
    // has them agreeing on S2. Exercises the makespan domain ceiling
    // (spec.md §4.2 #9): T/makespan must be able to reach the 1-based
    // value 4, not just 3.
    let trainees = vec![
        Trainee {
            weekly_shift: [Some(Shift::S1), Some(Shift::S1), Some(Shift::S1), Some(Shift::S2)],
            ..trainee("e1", Shift::S1)
        },
        Trainee {
            weekly_shift: [Some(Shift::S2), Some(Shift::S2), Some(Shift::S2), Some(Shift::S2)],
            ..trainee("e2", Shift::S2)
        },
    ];
    let mut trainer_count = HashMap::new();
    trainer_count.insert("c1".to_string(), 1);

    let input = BatchingInput { company: "acme".into(), courses: vec![(course("c1"), trainees)], trainer_count };
    // min_batches=1 with only 2 trainees forces them into the same batch.
    let config = BatchingConfig { venue_capacity: 30, min_batches: 1, enforce_trainer_concurrency: false };

    let model = BatchingModel::build(&input, &config).expect("model builds");
    let outcome = model.solve(SolveConfig::default()).expect("solve runs");

    match outcome {
        BatchingOutcome::Solved(rows) => {
            assert_eq!(rows.len(), 2);
            for row in &rows {
                assert_eq!(row.week1, 3, "week 1 clashes, so it must stay unrealized");
                assert_eq!(row.week2, 3, "week 2 clashes, so it must stay unrealized");
                assert_eq!(row.week3, 3, "week 3 clashes, so it must stay unrealized");
                assert_eq!(row.week4, 2, "week 4 is the only shift-compatible week, realized as S2");
            }
        }
        _ => panic!("expected the batch to be forced onto week 4"),
    }
}

#[test]
fn is_infeasible_when_a_single_forced_batch_clashes_on_every_week() {
    let trainees = vec![
        Trainee {
            weekly_shift: [Some(Shift::S1), Some(Shift::S1), Some(Shift::S1), Some(Shift::S1)],
            ..trainee("e1", Shift::S1)
        },
        Trainee {
            weekly_shift: [Some(Shift::S2), Some(Shift::S2), Some(Shift::S2), Some(Shift::S2)],
            ..trainee("e2", Shift::S2)
        },
    ];
    let mut trainer_count = HashMap::new();
    trainer_count.insert("c1".to_string(), 1);

    let input = BatchingInput { company: "acme".into(), courses: vec![(course("c1"), trainees)], trainer_count };
    // min_batches=1 with only 2 trainees (under capacity) means max_batches
    // is exactly 1: both trainees are forced into the same batch, and
    // since they clash on shift every week, that batch can never run.
    let config = BatchingConfig { venue_capacity: 30, min_batches: 1, enforce_trainer_concurrency: false };

    let model = BatchingModel::build(&input, &config).expect("model builds");
    let outcome = model.solve(SolveConfig::default()).expect("solve runs");

    assert!(matches!(outcome, BatchingOutcome::Infeasible));
}
