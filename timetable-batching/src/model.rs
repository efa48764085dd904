//! Stage-1 CP model (spec.md §4.2): for one company, assigns trainees to a
//! bounded number of batches per course and picks one week and one shift
//! per used batch, honoring capacity, shift-compatibility and
//! size-balancing constraints.
//!
//! Grounded on the teacher's `FeatureBuilder`-style construction (build
//! once, validate, solve) and on `examples/original_source/model/batching`
//! for the exact constraint semantics the distillation carried into
//! spec.md §4.2.

use std::collections::HashMap;

use timetable_core::cp::{BoolVar, CpModel, SolveConfig, SolveOutcome};
use timetable_core::domain::{BatchAssignmentRow, Course, Shift, Trainee};
use timetable_core::error::GenericError;

#[cfg(test)]
#[path = "../tests/unit/model_test.rs"]
mod model_test;

/// Failures raised while assembling a batching model, as opposed to
/// failures inside the CP solve itself.
#[derive(Debug, thiserror::Error)]
pub enum BatchingError {
    /// A course was given a trainer count of zero, which would make
    /// `max_batches` divide by zero.
    #[error("course '{course}' has zero trainers, cannot compute max_batches")]
    ZeroTrainers {
        /// The offending course name.
        course: String,
    },
}

/// Tuning knobs not carried by the domain model itself.
#[derive(Debug, Clone, Copy)]
pub struct BatchingConfig {
    /// Venue capacity ceiling batches are sized against (spec.md §4.2,
    /// "venue capacity max").
    pub venue_capacity: u32,
    /// Slack added on top of the `max_batches` ceiling so the solver has
    /// room to prefer splits for shift compatibility (spec.md §4.2).
    pub min_batches: u32,
    /// Trainer-concurrency constraint #10, off by default per spec.md §9.
    pub enforce_trainer_concurrency: bool,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self { venue_capacity: 30, min_batches: 3, enforce_trainer_concurrency: false }
    }
}

/// One company's batching input: every course on offer, its enrolled
/// trainees, and how many trainers are eligible to teach it.
pub struct BatchingInput {
    /// The company this batching solve is scoped to.
    pub company: String,
    /// `(course, enrolled trainees)` pairs.
    pub courses: Vec<(Course, Vec<Trainee>)>,
    /// Course name to eligible-trainer count.
    pub trainer_count: HashMap<String, u32>,
}

/// `max_batches(course)`, spec.md §4.2: the fewest batches that provably
/// suffice to honor venue capacity and trainer headcount, plus a slack of
/// `min_batches` so the solver can still trade batch count for shift fit.
pub fn max_batches(trainee_count: u32, trainers: u32, capacity: u32, min_batches: u32) -> u32 {
    if trainee_count <= capacity {
        return min_batches;
    }
    let per_trainer = div_ceil(trainee_count, trainers);
    if per_trainer <= capacity {
        return trainers + min_batches;
    }
    trainers * div_ceil(per_trainer, capacity) + min_batches
}

fn div_ceil(a: u32, b: u32) -> u32 {
    (a + b - 1) / b
}

/// The decision variables for one course, kept around so `solve` can
/// decode the chosen assignment back into `BatchAssignmentRow`s.
struct CourseVars {
    course: Course,
    trainees: Vec<Trainee>,
    x: Vec<Vec<BoolVar>>,
    batch_used: Vec<BoolVar>,
    run: Vec<Vec<BoolVar>>,
    feasible: Vec<Vec<BoolVar>>,
    z: Vec<Vec<[BoolVar; 3]>>,
}

/// The stage-1 model for one company, built once and consumed by `solve`.
pub struct BatchingModel {
    cp: CpModel,
    courses: Vec<CourseVars>,
}

// Lexicographic weights for the objective of spec.md §4.2: makespan
// dominates batch count, which dominates size spread, which dominates
// feasibility flexibility.
const BIG: i32 = 1_000_000;
const ALPHA: i32 = 1_000;
const GAMMA: i32 = 10;
const BETA: i32 = 1;

impl BatchingModel {
    /// Builds the CP model of spec.md §4.2 from `input`.
    pub fn build(input: &BatchingInput, config: &BatchingConfig) -> Result<Self, GenericError> {
        let mut cp = CpModel::default();
        // Makespan is 1-based (week index w in 0..3 contributes w+1), so
        // the domain ceiling is 4, not 3.
        let t = cp.new_int(0, 4);

        let mut courses = Vec::with_capacity(input.courses.len());
        let mut all_batch_used: Vec<BoolVar> = Vec::new();
        let mut all_spread = Vec::new();
        let mut all_feasible: Vec<BoolVar> = Vec::new();

        for (course, trainees) in &input.courses {
            if trainees.is_empty() {
                continue;
            }
            let trainers = input.trainer_count.get(&course.name).copied().unwrap_or(1);
            if trainers == 0 {
                return Err(Box::new(BatchingError::ZeroTrainers { course: course.name.clone() }));
            }
            let n = trainees.len() as u32;
            let max_b = max_batches(n, trainers, config.venue_capacity, config.min_batches) as usize;
            let capacity = config.venue_capacity as i32;

            let x: Vec<Vec<BoolVar>> = trainees.iter().map(|_| (0..max_b).map(|_| cp.new_bool()).collect()).collect();

            let mut batch_used = Vec::with_capacity(max_b);
            let mut size = Vec::with_capacity(max_b);
            let mut run: Vec<Vec<BoolVar>> = Vec::with_capacity(max_b);
            let mut feasible: Vec<Vec<BoolVar>> = Vec::with_capacity(max_b);
            let mut z: Vec<Vec<[BoolVar; 3]>> = Vec::with_capacity(max_b);

            for b in 0..max_b {
                batch_used.push(cp.new_bool());
                size.push(cp.new_int(0, capacity));

                // #2: size[c,b] = Σ_i x[c,i,b], size[c,b] <= capacity.
                let column: Vec<BoolVar> = x.iter().map(|row| row[b]).collect();
                let sum_var = cp.sum(&column);
                cp.eq_vars(size[b], sum_var);

                // #3: x[c,i,b] <= batch_used[c,b].
                for &xi in &column {
                    cp.le_vars(xi, batch_used[b]);
                }

                // #4: a used batch runs on exactly one week.
                let run_row: Vec<BoolVar> = (0..4).map(|_| cp.new_bool()).collect();
                let run_sum = cp.sum(&run_row);
                cp.eq_vars(run_sum, batch_used[b]);

                // #5: run[c,b,w] <= feasible[c,b,w].
                let feasible_row: Vec<BoolVar> = (0..4).map(|_| cp.new_bool()).collect();
                for w in 0..4 {
                    cp.le_vars(run_row[w], feasible_row[w]);
                }

                // #6: exactly one shift selected iff feasible.
                let mut z_row: Vec<[BoolVar; 3]> = Vec::with_capacity(4);
                for w in 0..4 {
                    let z_w = [cp.new_bool(), cp.new_bool(), cp.new_bool()];
                    let z_sum = cp.sum(&z_w);
                    cp.eq_vars(z_sum, feasible_row[w]);
                    z_row.push(z_w);
                }

                run.push(run_row);
                feasible.push(feasible_row);
                z.push(z_row);
            }

            // #1: every trainee of c is in exactly one batch of c.
            for row in &x {
                let sum_var = cp.sum(row);
                cp.eq(sum_var, 1);
            }

            // #7: shift compatibility, per (b, w).
            for b in 0..max_b {
                for w in 0..4u8 {
                    let week = w + 1;
                    let wi = w as usize;
                    let mut s1_vars = Vec::new();
                    let mut s2_vars = Vec::new();
                    let mut unavailable = Vec::new();
                    for (i, trainee) in trainees.iter().enumerate() {
                        match trainee.shift_for_week(week) {
                            Shift::S1 => s1_vars.push(x[i][b]),
                            Shift::S2 => s2_vars.push(x[i][b]),
                            Shift::Unavailable => unavailable.push(x[i][b]),
                            Shift::NonShift => {}
                        }
                    }

                    for &xi in &unavailable {
                        let pair = cp.sum(&[feasible[b][wi], xi]);
                        cp.le(pair, 1);
                    }

                    let s1_present = cp.post_or(&s1_vars);
                    let s2_present = cp.post_or(&s2_vars);
                    let presence = cp.sum(&[feasible[b][wi], s1_present, s2_present]);
                    cp.le(presence, 2);

                    cp.pin_and(z[b][wi][1], feasible[b][wi], s1_present);
                    cp.pin_and(z[b][wi][2], feasible[b][wi], s2_present);
                    // z[b][wi][0] is left to constraint #6's equality: with
                    // z1/z2 pinned above, Σ_s z = feasible forces z0 to
                    // equal feasible exactly when neither S1 nor S2 was
                    // selected, matching the "only NonShift" case.
                }
            }

            // #8: size balancing, gated on batch_used.
            let min_size = cp.new_int(0, capacity);
            let max_size = cp.new_int(0, capacity);
            for b in 0..max_b {
                cp.post_ge_if_active(size[b], min_size, batch_used[b], capacity);
                cp.post_le_if_active(size[b], max_size, batch_used[b], capacity);
            }
            all_spread.push(cp.sub(max_size, min_size));

            // #9: makespan. Also 1-based, so the domain ceiling is 4.
            let makespan = cp.new_int(0, 4);
            for b in 0..max_b {
                for w in 0..4i32 {
                    let scaled = cp.scale(run[b][w as usize], w + 1);
                    cp.ge_vars(makespan, scaled);
                }
            }
            cp.ge_vars(t, makespan);

            // #10: trainer concurrency, optional.
            if config.enforce_trainer_concurrency {
                for w in 0..4 {
                    let column: Vec<BoolVar> = run.iter().map(|row| row[w]).collect();
                    let sum_var = cp.sum(&column);
                    cp.le(sum_var, trainers as i32);
                }
            }

            all_batch_used.extend(batch_used.iter().copied());
            for row in &feasible {
                all_feasible.extend(row.iter().copied());
            }

            tracing::debug!(company = %input.company, course = %course.name, max_batches = max_b, "batching model: course encoded");

            courses.push(CourseVars {
                course: course.clone(),
                trainees: trainees.clone(),
                x,
                batch_used,
                run,
                feasible,
                z,
            });
        }

        let used_term = if all_batch_used.is_empty() { cp.new_fixed(0) } else { cp.sum(&all_batch_used) };
        let spread_term = if all_spread.is_empty() { cp.new_fixed(0) } else { cp.sum(&all_spread) };
        let feasible_term = if all_feasible.is_empty() { cp.new_fixed(0) } else { cp.sum(&all_feasible) };

        let t_scaled = cp.scale(t, BIG);
        let used_scaled = cp.scale(used_term, ALPHA);
        let spread_scaled = cp.scale(spread_term, GAMMA);
        let feasible_scaled = cp.scale(feasible_term, BETA);
        let positive = cp.sum(&[t_scaled, used_scaled, spread_scaled]);
        let objective = cp.sub(positive, feasible_scaled);
        cp.minimize(objective);

        Ok(Self { cp, courses })
    }

    /// Runs the solve and, on a feasible outcome, decodes the batch
    /// assignment table spec.md §4.2's "Output" section describes.
    pub fn solve(self, config: SolveConfig) -> Result<BatchingOutcome, GenericError> {
        let courses = self.courses;
        match self.cp.solve(config)? {
            SolveOutcome::Infeasible => Ok(BatchingOutcome::Infeasible),
            SolveOutcome::Unknown => Ok(BatchingOutcome::Unknown),
            SolveOutcome::Feasible(solution) => {
                let mut rows = Vec::new();
                for course_vars in &courses {
                    for (b, &used) in course_vars.batch_used.iter().enumerate() {
                        if solution.get::<i32>(used) == 0 {
                            continue;
                        }

                        let mut week_codes = [3u8; 4];
                        for w in 0..4usize {
                            if solution.get::<i32>(course_vars.run[b][w]) == 0 {
                                continue;
                            }
                            if solution.get::<i32>(course_vars.feasible[b][w]) == 0 {
                                continue;
                            }
                            for (s, &z_var) in course_vars.z[b][w].iter().enumerate() {
                                if solution.get::<i32>(z_var) == 1 {
                                    week_codes[w] = s as u8;
                                }
                            }
                        }

                        for (i, trainee) in course_vars.trainees.iter().enumerate() {
                            if solution.get::<i32>(course_vars.x[i][b]) == 0 {
                                continue;
                            }
                            rows.push(BatchAssignmentRow {
                                company: course_vars.course.company.clone(),
                                course: course_vars.course.name.clone(),
                                batch_no: b as u32,
                                trainee_id: trainee.id.clone(),
                                week1: week_codes[0],
                                week2: week_codes[1],
                                week3: week_codes[2],
                                week4: week_codes[3],
                                rotating_shift: trainee.shift.to_week_code().to_string(),
                            });
                        }
                    }
                }
                Ok(BatchingOutcome::Solved(rows))
            }
        }
    }
}

/// The three outcomes a batching solve can produce, per spec.md §5/§7.
pub enum BatchingOutcome {
    /// Stage-1 output rows ready to feed stage 2.
    Solved(Vec<BatchAssignmentRow>),
    /// The model provably has no solution for this company.
    Infeasible,
    /// The time budget ran out before a verdict could be reached.
    Unknown,
}
