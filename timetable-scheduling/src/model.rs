//! Stage-2 CP model (spec.md §4.3–§4.5): given groups (cohorts sharing a
//! course-batch set) and the course-batches they take, assigns each
//! `(group, course-batch)` an absolute start hour, venue and trainer,
//! honoring no-overlap, capacity, prerequisite, daily-load, shift-window,
//! weekend and validity constraints, with shared-session merging (§4.4)
//! and the lexicographic daily-imbalance/virtual-venue/trainer-imbalance/
//! sharing objective (§4.5).
//!
//! Grounded on `examples/original_source/solver_rollback.py` for exact
//! constraint semantics (interval variables, optional intervals gated on a
//! venue/trainer selection, the `same_session` booleans) and on the
//! teacher's one-function-per-constraint-family decomposition composed in
//! `build()`.

use std::collections::HashMap;

use timetable_core::calendar::Calendar;
use timetable_core::cp::{BoolVar, CpModel, IntVar, SolveConfig, SolveOutcome};
use timetable_core::domain::{CourseBatch, Cycle, Group, Session, Trainer, Venue};
use timetable_core::error::GenericError;

use crate::session_split::session_lengths;

#[cfg(test)]
#[path = "../tests/unit/model_test.rs"]
mod model_test;

/// Tuning knobs not carried by the domain model itself (spec.md §6's
/// option table, scoped to stage 2).
#[derive(Debug, Clone, Copy)]
pub struct SchedulingConfig {
    /// Per-trainee per-day hour cap (§4.3 #9), spec.md's
    /// `maximum_session_length`.
    pub max_session_length: u32,
    /// Enables the shift-window constraint (§4.3 #13).
    pub is_considering_shift: bool,
    /// Enables the global-sequence constraint (§4.3 #11).
    pub is_using_global_sequence: bool,
    /// Splits over-long course-batch durations into same-day sub-sessions
    /// (SPEC_FULL.md §3); off by default, matching §9's chosen single
    /// mode.
    pub split_long_sessions: bool,
    /// On an INFEASIBLE/UNKNOWN result with global sequencing enabled,
    /// retries once with it relaxed (SPEC_FULL.md §3's rollback-solve
    /// supplement), logging the fallback at `warn`.
    pub relax_on_infeasible: bool,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            max_session_length: 8,
            is_considering_shift: false,
            is_using_global_sequence: false,
            split_long_sessions: false,
            relax_on_infeasible: true,
        }
    }
}

/// Stage-2 input: the calendar horizon, every venue and trainer across
/// every company (scoping by company happens inside the model, keyed off
/// each group's `company` field), the course-batches groups reference, and
/// the groups themselves.
pub struct SchedulingInput<'a> {
    /// Business-day grid the horizon is built from.
    pub calendar: &'a Calendar,
    /// Working hours per day.
    pub hours_per_day: u32,
    /// Every venue across every company in this solve.
    pub venues: Vec<Venue>,
    /// Every trainer across every company in this solve.
    pub trainers: Vec<Trainer>,
    /// Every course-batch referenced by any group's `course_batches`.
    pub course_batches: Vec<CourseBatch>,
    /// The cohorts to schedule.
    pub groups: Vec<Group>,
}

/// Per-session decision variables, kept around so `solve` can decode the
/// chosen assignment back into `Session`s.
struct SessionVars {
    group_id: String,
    group_idx: usize,
    course_batch_identity: String,
    session_index: u32,
    len: u32,
    start: IntVar,
    end: IntVar,
    day: IntVar,
    day_indicators: Vec<BoolVar>,
    use_venue: Vec<(usize, BoolVar)>,
    use_trainer: Vec<(usize, BoolVar)>,
}

impl SessionVars {
    fn trainer_var(&self, trainer_idx: usize) -> Option<BoolVar> {
        self.use_trainer.iter().find(|(idx, _)| *idx == trainer_idx).map(|(_, v)| *v)
    }
}

/// The stage-2 model, built once from a `SchedulingInput` and consumed by
/// `solve`.
pub struct SchedulingModel {
    cp: CpModel,
    sessions: Vec<SessionVars>,
    venues: Vec<Venue>,
    trainers: Vec<Trainer>,
}

// Lexicographic weights for the objective of spec.md §4.5: daily-load
// imbalance dominates virtual-venue usage, which dominates trainer-load
// imbalance; shared sessions are rewarded against all three.
const DAILY_IMBALANCE_WEIGHT: i32 = 1_000_000;
const VIRTUAL_VENUE_WEIGHT: i32 = 100;
const SHARED_SESSION_WEIGHT: i32 = 1_000_000_000;

impl SchedulingModel {
    /// Builds the CP model of spec.md §4.3–§4.5 from `input`.
    pub fn build(input: &SchedulingInput, config: &SchedulingConfig) -> Result<Self, GenericError> {
        let mut cp = CpModel::default();
        let days = input.calendar.len() as u32;
        let horizon = (days * input.hours_per_day) as i32;
        let hours_per_day = input.hours_per_day as i32;

        // Identity strings are owned up front so every lookup below can
        // borrow from `identity_owned` instead of recomputing
        // `CourseBatch::identity` (a fresh allocation per call).
        let identity_owned: Vec<String> = input.course_batches.iter().map(CourseBatch::identity).collect();
        let course_batch_by_identity: HashMap<&str, usize> = identity_owned.iter().map(String::as_str).zip(0..).collect();

        let mut sessions: Vec<SessionVars> = Vec::new();

        for (group_idx, group) in input.groups.iter().enumerate() {
            let company_venues: Vec<usize> =
                input.venues.iter().enumerate().filter(|(_, v)| v.company == group.company).map(|(i, _)| i).collect();
            if company_venues.is_empty() {
                tracing::warn!(group = %group.id, company = %group.company, "no venues for this company, dropping group from the schedule");
                continue;
            }

            for cb_identity in &group.course_batches {
                let Some(&cb_idx) = course_batch_by_identity.get(cb_identity.as_str()) else {
                    tracing::warn!(group = %group.id, course_batch = %cb_identity, "referenced course-batch not found, dropping from group");
                    continue;
                };
                let cb = &input.course_batches[cb_idx];

                let eligible_trainers: Vec<usize> =
                    input.trainers.iter().enumerate().filter(|(_, t)| t.is_eligible_for(cb_identity)).map(|(i, _)| i).collect();
                if eligible_trainers.is_empty() {
                    tracing::warn!(group = %group.id, course_batch = %cb_identity, "no eligible trainer, dropping from group");
                    continue;
                }

                let lens = session_lengths(
                    cb.course.duration_hours,
                    input.hours_per_day,
                    config.max_session_length,
                    config.is_considering_shift,
                    config.split_long_sessions,
                );

                let mut prev_start: Option<IntVar> = None;
                for (k, &len) in lens.iter().enumerate() {
                    let len_i = len as i32;
                    let start = cp.new_int(0, horizon);
                    let len_const = cp.new_fixed(len_i);
                    let end = cp.add(start, len_const);

                    // #1: same-day, via floor-division from both ends.
                    let day = cp.new_int(0, (days - 1) as i32);
                    cp.post_floor_div(day, start, hours_per_day);
                    let one = cp.new_fixed(1);
                    let end_minus_one = cp.sub(end, one);
                    let end_day = cp.new_int(0, (days - 1) as i32);
                    cp.post_floor_div(end_day, end_minus_one, hours_per_day);
                    cp.eq_vars(day, end_day);

                    // #4: valid_start_domain, when the batch carries one.
                    if let Some(domain) = &cb.valid_start_domain {
                        let values: Vec<i32> = domain.iter().map(|&h| h as i32).collect();
                        cp.post_value_domain(start, &values);
                    }

                    // #13: shift window.
                    if config.is_considering_shift {
                        let day_scaled = cp.scale(day, hours_per_day);
                        let hour_in_day = cp.sub(start, day_scaled);
                        let (shift_start, shift_end) = group.shift.window(input.hours_per_day);
                        cp.ge(hour_in_day, shift_start as i32);
                        cp.le(hour_in_day, shift_end as i32 - len_i);
                    }

                    // #14: validity window.
                    if let Some(valid_start_date) = cb.course.valid_start_date {
                        if let Some(idx) = input.calendar.index_of(valid_start_date) {
                            cp.ge(day, idx as i32);
                        }
                    }
                    if let Some(valid_end_date) = cb.course.valid_end_date {
                        if let Some(idx) = input.calendar.index_of(valid_end_date) {
                            cp.le(day, idx as i32);
                        }
                    }

                    // Exactly one venue, scoped to the group's company.
                    let use_venue: Vec<(usize, BoolVar)> = company_venues.iter().map(|&vi| (vi, cp.new_bool())).collect();
                    let venue_sum = cp.sum(&use_venue.iter().map(|(_, v)| *v).collect::<Vec<_>>());
                    cp.eq(venue_sum, 1);

                    // Exactly one trainer, among those eligible.
                    let use_trainer: Vec<(usize, BoolVar)> = eligible_trainers.iter().map(|&ti| (ti, cp.new_bool())).collect();
                    let trainer_sum = cp.sum(&use_trainer.iter().map(|(_, v)| *v).collect::<Vec<_>>());
                    cp.eq(trainer_sum, 1);

                    let day_indicators = cp.post_day_indicators(day, days, horizon);

                    if let Some(prev) = prev_start {
                        cp.le_vars(prev, start);
                    }
                    prev_start = Some(start);

                    tracing::debug!(group = %group.id, course_batch = %cb_identity, session_index = k, len, "scheduling model: session encoded");

                    sessions.push(SessionVars {
                        group_id: group.id.clone(),
                        group_idx,
                        course_batch_identity: cb_identity.clone(),
                        session_index: k as u32,
                        len,
                        start,
                        end,
                        day,
                        day_indicators,
                        use_venue,
                        use_trainer,
                    });
                }
            }
        }

        // #5: group no-overlap.
        for gi in 0..input.groups.len() {
            let group_sessions: Vec<usize> = sessions.iter().enumerate().filter(|(_, s)| s.group_idx == gi).map(|(i, _)| i).collect();
            for (a, &i) in group_sessions.iter().enumerate() {
                for &j in &group_sessions[a + 1..] {
                    let (start1, end1) = (sessions[i].start, sessions[i].end);
                    let (start2, end2) = (sessions[j].start, sessions[j].end);
                    cp.post_no_overlap(horizon, start1, end1, start2, end2);
                }
            }
        }

        // #8: venue capacity (cumulative). Spec.md's #6 "venue no-overlap"
        // is subsumed by this: the cumulative bound already forbids two
        // sessions from co-occupying a venue beyond its capacity, and
        // permits legitimate co-occupancy (shared sessions, §4.4) exactly
        // when the combined demand still fits — `solver_rollback.py` uses
        // only `AddCumulative` for venues, with no separate no-overlap.
        for (vi, venue) in input.venues.iter().enumerate() {
            let intervals: Vec<(IntVar, IntVar, i32, BoolVar)> = sessions
                .iter()
                .filter_map(|s| s.use_venue.iter().find(|(idx, _)| *idx == vi).map(|(_, v)| (s.start, s.end, input.groups[s.group_idx].occupancy() as i32, *v)))
                .collect();
            if !intervals.is_empty() {
                cp.post_cumulative(horizon, &intervals, venue.capacity as i32);
            }
        }

        // #7: trainer no-overlap, with the §4.4 shared-session exemption.
        let mut shared_terms: Vec<BoolVar> = Vec::new();
        for i in 0..sessions.len() {
            for j in (i + 1)..sessions.len() {
                if sessions[i].group_idx == sessions[j].group_idx {
                    // Already forbidden to overlap by group no-overlap;
                    // a group can never share a session with itself.
                    continue;
                }
                for ti in 0..input.trainers.len() {
                    let (Some(y_i), Some(y_j)) = (sessions[i].trainer_var(ti), sessions[j].trainer_var(ti)) else {
                        continue;
                    };
                    let both_taught = cp.post_and(y_i, y_j);

                    let shareable = sessions[i].course_batch_identity == sessions[j].course_batch_identity
                        && sessions[i].session_index == sessions[j].session_index;

                    let exempt = if shareable {
                        let same_start = cp.new_bool();
                        cp.post_implies_eq(same_start, sessions[i].start, sessions[j].start, horizon);

                        let venue_idx_i = cp.weighted_sum(&sessions[i].use_venue.iter().map(|(_, v)| *v).collect::<Vec<_>>());
                        let venue_idx_j = cp.weighted_sum(&sessions[j].use_venue.iter().map(|(_, v)| *v).collect::<Vec<_>>());
                        let venue_bound = (sessions[i].use_venue.len().max(sessions[j].use_venue.len()) + 1) as i32;
                        let same_venue = cp.new_bool();
                        cp.post_implies_eq(same_venue, venue_idx_i, venue_idx_j, venue_bound);

                        let same = cp.post_and(same_start, same_venue);
                        shared_terms.push(same);
                        same
                    } else {
                        cp.new_fixed(0)
                    };

                    let always_active = cp.new_fixed(1);
                    cp.post_no_overlap_unless(horizon, sessions[i].start, sessions[i].end, both_taught, sessions[j].start, sessions[j].end, always_active, exempt);
                }
            }
        }

        // #10: prerequisites, cohort level.
        for (group_idx, group) in input.groups.iter().enumerate() {
            for cb_identity in &group.course_batches {
                let Some(&cb_idx) = course_batch_by_identity.get(cb_identity.as_str()) else {
                    continue;
                };
                let cb = &input.course_batches[cb_idx];
                for prereq_name in &cb.course.prerequisites {
                    let prereq_identities: Vec<&str> = group
                        .course_batches
                        .iter()
                        .filter(|id| {
                            course_batch_by_identity.get(id.as_str()).map(|&i| input.course_batches[i].course.name == *prereq_name).unwrap_or(false)
                        })
                        .map(String::as_str)
                        .collect();
                    for prereq_identity in prereq_identities {
                        for pi in sessions.iter().enumerate().filter(|(_, s)| s.group_idx == group_idx && s.course_batch_identity == prereq_identity).map(|(i, _)| i).collect::<Vec<_>>() {
                            for ci in sessions.iter().enumerate().filter(|(_, s)| s.group_idx == group_idx && &s.course_batch_identity == cb_identity).map(|(i, _)| i).collect::<Vec<_>>() {
                                let (before, after) = (sessions[pi].start, sessions[ci].start);
                                cp.strict_precedes(before, after);
                            }
                        }
                    }
                }
            }
        }

        // #11: global sequence, optional, across all cohorts.
        if config.is_using_global_sequence {
            for (ci, course_batch) in input.course_batches.iter().enumerate() {
                for prereq_name in &course_batch.course.global_sequence {
                    let c_identity = identity_owned[ci].as_str();
                    let prereq_identities: Vec<&str> = input
                        .course_batches
                        .iter()
                        .enumerate()
                        .filter(|(_, cb)| &cb.course.name == prereq_name)
                        .map(|(i, _)| identity_owned[i].as_str())
                        .collect();

                    let p_sessions: Vec<usize> = sessions.iter().enumerate().filter(|(_, s)| prereq_identities.contains(&s.course_batch_identity.as_str())).map(|(i, _)| i).collect();
                    let c_sessions: Vec<usize> = sessions.iter().enumerate().filter(|(_, s)| s.course_batch_identity == c_identity).map(|(i, _)| i).collect();

                    for &pi in &p_sessions {
                        for &ci2 in &c_sessions {
                            cp.precedes(sessions[pi].end, sessions[ci2].start);
                        }
                    }
                }
            }
        }

        // #12: weekend exclusion.
        for (group_idx, group) in input.groups.iter().enumerate() {
            if !matches!(group.cycle, Cycle::WDays) {
                continue;
            }
            for session in sessions.iter().filter(|s| s.group_idx == group_idx) {
                for &weekend_day in input.calendar.weekend_index() {
                    cp.post_not_equal(session.day, weekend_day as i32, (days - 1) as i32);
                }
            }
        }

        // #9: daily trainee load, per group per day.
        for (group_idx, _group) in input.groups.iter().enumerate() {
            for d in 0..days as usize {
                let terms: Vec<IntVar> = sessions
                    .iter()
                    .filter(|s| s.group_idx == group_idx)
                    .map(|s| cp.scale(s.day_indicators[d], s.len as i32))
                    .collect();
                if terms.is_empty() {
                    continue;
                }
                let load = cp.sum(&terms);
                cp.le(load, config.max_session_length as i32);
            }
        }

        // §4.5 objective.
        let mut daily_load_vars = Vec::with_capacity(days as usize);
        for d in 0..days as usize {
            let terms: Vec<IntVar> = sessions.iter().map(|s| cp.scale(s.day_indicators[d], s.len as i32)).collect();
            let load = if terms.is_empty() { cp.new_fixed(0) } else { cp.sum(&terms) };
            daily_load_vars.push(load);
        }
        let max_daily = cp.new_int(0, horizon);
        let min_daily = cp.new_int(0, horizon);
        for &load in &daily_load_vars {
            cp.le_vars(load, max_daily);
            cp.ge_vars(load, min_daily);
        }
        let daily_imbalance = cp.sub(max_daily, min_daily);

        let virtual_terms: Vec<BoolVar> = sessions
            .iter()
            .flat_map(|s| s.use_venue.iter().filter(|(vi, _)| input.venues[*vi].is_virtual).map(|(_, v)| *v))
            .collect();
        let virtual_sessions = if virtual_terms.is_empty() { cp.new_fixed(0) } else { cp.sum(&virtual_terms) };

        let mut trainer_load_vars = Vec::with_capacity(input.trainers.len());
        for ti in 0..input.trainers.len() {
            let terms: Vec<IntVar> = sessions.iter().filter_map(|s| s.trainer_var(ti).map(|v| cp.scale(v, s.len as i32))).collect();
            let load = if terms.is_empty() { cp.new_fixed(0) } else { cp.sum(&terms) };
            trainer_load_vars.push(load);
        }
        let max_trainer = cp.new_int(0, horizon);
        let min_trainer = cp.new_int(0, horizon);
        for &load in &trainer_load_vars {
            cp.le_vars(load, max_trainer);
            cp.ge_vars(load, min_trainer);
        }
        let trainer_imbalance = if trainer_load_vars.is_empty() { cp.new_fixed(0) } else { cp.sub(max_trainer, min_trainer) };

        let shared_sum = if shared_terms.is_empty() { cp.new_fixed(0) } else { cp.sum(&shared_terms) };

        let daily_scaled = cp.scale(daily_imbalance, DAILY_IMBALANCE_WEIGHT);
        let virtual_scaled = cp.scale(virtual_sessions, VIRTUAL_VENUE_WEIGHT);
        let shared_scaled = cp.scale(shared_sum, SHARED_SESSION_WEIGHT);
        let positive = cp.sum(&[daily_scaled, virtual_scaled, trainer_imbalance]);
        let objective = cp.sub(positive, shared_scaled);
        cp.minimize(objective);

        let venues = input.venues.clone();
        let trainers = input.trainers.clone();
        Ok(Self { cp, sessions, venues, trainers })
    }

    /// Runs the solve and, on a feasible outcome, decodes the chosen
    /// assignment into `Session`s.
    pub fn solve(self, config: SolveConfig) -> Result<SchedulingOutcome, GenericError> {
        let sessions = self.sessions;
        let venues = self.venues;
        let trainers = self.trainers;
        match self.cp.solve(config)? {
            SolveOutcome::Infeasible => Ok(SchedulingOutcome::Infeasible),
            SolveOutcome::Unknown => Ok(SchedulingOutcome::Unknown),
            SolveOutcome::Feasible(solution) => {
                let mut out = Vec::with_capacity(sessions.len());
                for s in &sessions {
                    let start = solution.get::<i32>(s.start) as u32;
                    let end = solution.get::<i32>(s.end) as u32;
                    let day = solution.get::<i32>(s.day) as u32;

                    let venue_name = s
                        .use_venue
                        .iter()
                        .find(|(_, v)| solution.get::<i32>(*v) == 1)
                        .map(|(vi, _)| venues[*vi].name.clone())
                        .unwrap_or_default();
                    let trainer_id = s
                        .use_trainer
                        .iter()
                        .find(|(_, v)| solution.get::<i32>(*v) == 1)
                        .map(|(ti, _)| trainers[*ti].id.clone())
                        .unwrap_or_default();

                    out.push(Session {
                        course_batch_identity: s.course_batch_identity.clone(),
                        session_index: s.session_index,
                        group_id: s.group_id.clone(),
                        start_hour: start,
                        end_hour: end,
                        day,
                        venue: venue_name,
                        trainer: trainer_id,
                        active: true,
                    });
                }
                Ok(SchedulingOutcome::Solved(out))
            }
        }
    }
}

/// The three outcomes a scheduling solve can produce, per spec.md §5/§7.
pub enum SchedulingOutcome {
    /// Stage-2 sessions ready for export.
    Solved(Vec<Session>),
    /// The model provably has no solution.
    Infeasible,
    /// The time budget ran out before a verdict could be reached.
    Unknown,
}

/// Builds and solves the stage-2 model, applying the rollback fallback
/// (SPEC_FULL.md §3) when `config.relax_on_infeasible` is set and the
/// first attempt (with global sequencing as configured) comes back
/// INFEASIBLE or UNKNOWN: retries once with global sequencing relaxed.
pub fn solve_scheduling(input: &SchedulingInput, config: &SchedulingConfig, solve_config: SolveConfig) -> Result<SchedulingOutcome, GenericError> {
    let model = SchedulingModel::build(input, config)?;
    let outcome = model.solve(solve_config)?;

    let should_relax = config.relax_on_infeasible && config.is_using_global_sequence && matches!(outcome, SchedulingOutcome::Infeasible | SchedulingOutcome::Unknown);

    if !should_relax {
        return Ok(outcome);
    }

    tracing::warn!("scheduling model infeasible with global sequencing enabled, retrying with it relaxed");
    let relaxed_config = SchedulingConfig { is_using_global_sequence: false, ..*config };
    let relaxed_model = SchedulingModel::build(input, &relaxed_config)?;
    relaxed_model.solve(solve_config)
}

