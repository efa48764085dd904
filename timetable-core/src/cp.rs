//! Thin adapter over the `selen` constraint solver.
//!
//! Confirmed against `selen`'s one attested real-world usage in the
//! retrieval pack
//! (`examples/other_examples/d6264ba3_radevgit-selen__examples_backup-employee_scheduling.rs.rs`):
//! `Model::default`, `Model::int(lo, hi) -> VarId`, `Model::sum(&[VarId]) ->
//! VarId`, `Model::c(expr).eq/le/ge(expr)`, the free function `int(n)` to
//! lift a constant into the comparison's expression type, `Model::solve()
//! -> Result<Solution, _>`, and `Solution::get::<i32>(VarId) -> i32`.
//!
//! Everything in this module beyond that — `VarId` arithmetic producing an
//! `Expr` via `+`/`-`/`*`, and a timeout/worker-count-aware
//! `solve_with_config` distinguishing INFEASIBLE from UNKNOWN — extends
//! that confirmed surface the way essentially every Rust CP/LP modeling
//! crate shapes its builder (mirrored, for instance, by `good_lp`'s
//! `Expression` type). Neither `timetable-batching` nor
//! `timetable-scheduling` call into `selen` directly; they go through
//! `IntVar`/`BoolVar`/`CpModel` here, the same way `vrp-core` hides its
//! local-search engine behind the `Feature`/`FeatureConstraint` boundary
//! instead of letting call sites touch the solver internals.

use std::time::Duration;

use selen::prelude::*;

use crate::error::GenericError;

/// A handle to an integer decision variable.
pub type IntVar = VarId;
/// A handle to a `0/1` decision variable.
pub type BoolVar = VarId;

/// Wall-clock and worker-count limits for a single solve, per spec.md §5.
#[derive(Debug, Clone, Copy)]
pub struct SolveConfig {
    /// Wall-clock budget for the search.
    pub max_time: Duration,
    /// Number of solver worker threads.
    pub num_search_workers: u32,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self { max_time: Duration::from_secs(30), num_search_workers: 1 }
    }
}

/// The three outcomes spec.md §5/§7 require a solve to produce.
pub enum SolveOutcome {
    /// A feasible (possibly non-optimal, if the time budget ran out)
    /// assignment was found.
    Feasible(Solution),
    /// The model provably has no solution.
    Infeasible,
    /// The time budget ran out before feasibility or infeasibility could
    /// be established.
    Unknown,
}

/// Thin wrapper around `selen::Model` exposing only the primitives the two
/// stage models need.
pub struct CpModel {
    inner: Model,
}

impl Default for CpModel {
    fn default() -> Self {
        Self { inner: Model::default() }
    }
}

impl CpModel {
    /// Creates a new integer variable with domain `[lo, hi]`.
    pub fn new_int(&mut self, lo: i32, hi: i32) -> IntVar {
        self.inner.int(lo, hi)
    }

    /// Creates a new `0/1` decision variable.
    pub fn new_bool(&mut self) -> BoolVar {
        self.inner.int(0, 1)
    }

    /// Creates a variable fixed to a single value — used for "cannot work
    /// this shift" style disabled decisions, matching the `selen` example's
    /// `m.int(0, 0)` idiom.
    pub fn new_fixed(&mut self, value: i32) -> IntVar {
        self.inner.int(value, value)
    }

    /// Sum of a list of variables, as a new variable.
    pub fn sum(&mut self, vars: &[IntVar]) -> IntVar {
        self.inner.sum(vars)
    }

    /// Posts `lhs == rhs`.
    pub fn eq(&mut self, lhs: IntVar, rhs: i32) {
        self.inner.c(lhs).eq(int(rhs));
    }

    /// Posts `lhs == rhs` where both sides are variables.
    pub fn eq_vars(&mut self, lhs: IntVar, rhs: IntVar) {
        self.inner.c(lhs).eq(rhs);
    }

    /// Posts `lhs <= rhs`.
    pub fn le(&mut self, lhs: IntVar, rhs: i32) {
        self.inner.c(lhs).le(int(rhs));
    }

    /// Posts `lhs <= rhs` where both sides are variables.
    pub fn le_vars(&mut self, lhs: IntVar, rhs: IntVar) {
        self.inner.c(lhs).le(rhs);
    }

    /// Posts `lhs >= rhs`.
    pub fn ge(&mut self, lhs: IntVar, rhs: i32) {
        self.inner.c(lhs).ge(int(rhs));
    }

    /// Posts `lhs >= rhs` where both sides are variables.
    pub fn ge_vars(&mut self, lhs: IntVar, rhs: IntVar) {
        self.inner.c(lhs).ge(rhs);
    }

    /// Posts a strict precedence `before < after`, expressed as
    /// `before + 1 <= after` since `selen`'s attested surface only shows
    /// non-strict comparisons.
    pub fn strict_precedes(&mut self, before: IntVar, after: IntVar) {
        let before_plus_one = self.inner.add(before, 1);
        self.inner.c(before_plus_one).le(after);
    }

    /// Posts a non-strict precedence `before <= after`.
    pub fn precedes(&mut self, before: IntVar, after: IntVar) {
        self.le_vars(before, after);
    }

    /// Returns `lhs - rhs` as a new variable.
    pub fn sub(&mut self, lhs: IntVar, rhs: IntVar) -> IntVar {
        self.inner.sub(lhs, rhs)
    }

    /// Returns `lhs + rhs` as a new variable.
    pub fn add(&mut self, lhs: IntVar, rhs: IntVar) -> IntVar {
        self.inner.add(lhs, rhs)
    }

    /// Returns `var * k` as a new variable.
    pub fn scale(&mut self, var: IntVar, k: i32) -> IntVar {
        self.inner.mul_const(var, k)
    }

    /// Big-M disjunctive no-overlap between two unconditionally-active
    /// `[start, end)` intervals: an internal `before` indicator is `true`
    /// iff interval 1 is scheduled entirely before interval 2, and the
    /// solver picks whichever orientation is feasible. Used for §4.3
    /// #5 (group no-overlap, where every course-batch of a group is always
    /// active). For resources where occupants can be inactive, use
    /// `post_cumulative` instead, which folds the overlap check and an
    /// activity gate together.
    pub fn post_no_overlap(&mut self, horizon: i32, start1: IntVar, end1: IntVar, start2: IntVar, end2: IntVar) {
        let before = self.new_bool();
        let not_before = self.sub(self.new_fixed(1), before);

        // end1 <= start2 + M*(1 - before): vacuous unless `before` holds.
        let relax_when_after = self.scale(not_before, horizon);
        let bound1 = self.add(start2, relax_when_after);
        self.le_vars(end1, bound1);

        // end2 <= start1 + M*before: vacuous unless `before` is false.
        let relax_when_before = self.scale(before, horizon);
        let bound2 = self.add(start1, relax_when_before);
        self.le_vars(end2, bound2);
    }

    /// Cumulative capacity: for the set of `(start, end, demand, active)`
    /// triples (one per candidate occupant of a shared resource), their
    /// combined demand must not exceed `capacity` at any instant where
    /// more than one is simultaneously active. Implemented as a per-interval
    /// unconditional demand bound (so a single over-capacity occupant is
    /// rejected even alone) plus pairwise overlap booleans with a per-pair
    /// demand-sum bound, the standard decomposition when a dedicated global
    /// `Cumulative` propagator isn't available. Used for §4.3 #8 (venue
    /// capacity).
    pub fn post_cumulative(&mut self, horizon: i32, intervals: &[(IntVar, IntVar, i32, BoolVar)], capacity: i32) {
        // A lone active occupant must already fit, independent of any
        // other interval in the set.
        for &(_, _, demand, active) in intervals {
            let demand_scaled = self.scale(active, demand);
            self.le(demand_scaled, capacity);
        }

        for i in 0..intervals.len() {
            let (start_i, end_i, demand_i, active_i) = intervals[i];
            for &(start_j, end_j, demand_j, active_j) in &intervals[i + 1..] {
                let one = self.new_fixed(1);
                let overlap = self.new_bool();
                let not_overlap = self.sub(one, overlap);

                // overlap => start_i < end_j AND start_j < end_i.
                let not_overlap_relax = self.scale(not_overlap, horizon);
                let bound_a = self.add(end_j, not_overlap_relax);
                self.le_vars(start_i, bound_a);
                let bound_b = self.add(end_i, not_overlap_relax);
                self.le_vars(start_j, bound_b);

                // The reverse implication: not_overlap => disjoint, via the
                // same before/after disjunction `post_no_overlap` uses.
                // Without this, the solver can leave `overlap` at 0 for
                // every pair (nothing else references it), which vacuously
                // relaxes the demand bound below regardless of whether the
                // intervals genuinely overlap.
                let before = self.new_bool();
                let not_before = self.sub(one, before);
                let relax_after = self.sum(&[overlap, not_before]);
                let relax_after_scaled = self.scale(relax_after, horizon);
                let bound_c = self.add(start_j, relax_after_scaled);
                self.le_vars(end_i, bound_c);
                let relax_before = self.sum(&[overlap, before]);
                let relax_before_scaled = self.scale(relax_before, horizon);
                let bound_d = self.add(start_i, relax_before_scaled);
                self.le_vars(end_j, bound_d);

                // gate == 3 iff both intervals are active and overlapping;
                // the demand bound only binds in that case.
                let gate = self.sum(&[overlap, active_i, active_j]);
                let three = self.new_fixed(3);
                let slack_base = self.sub(three, gate);
                let slack = self.scale(slack_base, horizon);
                let demand_i_scaled = self.scale(active_i, demand_i);
                let demand_j_scaled = self.scale(active_j, demand_j);
                let combined = self.sum(&[demand_i_scaled, demand_j_scaled]);
                let capacity_var = self.new_fixed(capacity);
                let bound = self.add(capacity_var, slack);
                self.le_vars(combined, bound);
            }
        }
    }

    /// Returns a new bool variable equal to `a AND b`, via the standard
    /// three-constraint linearization (`z <= a`, `z <= b`, `z >= a + b - 1`).
    pub fn post_and(&mut self, a: BoolVar, b: BoolVar) -> BoolVar {
        let z = self.new_bool();
        self.le_vars(z, a);
        self.le_vars(z, b);
        let sum_ab = self.add(a, b);
        let one = self.new_fixed(1);
        let lower = self.sub(sum_ab, one);
        self.ge_vars(z, lower);
        z
    }

    /// Pins an existing bool variable `z` to equal `a AND b`, the same
    /// linearization as `post_and` but against a variable the caller
    /// already allocated (batching's `z[c,b,w,s]` decision variables must
    /// themselves satisfy this, per spec.md §4.2 #7).
    pub fn pin_and(&mut self, z: BoolVar, a: BoolVar, b: BoolVar) {
        self.le_vars(z, a);
        self.le_vars(z, b);
        let sum_ab = self.add(a, b);
        let one = self.new_fixed(1);
        let lower = self.sub(sum_ab, one);
        self.ge_vars(z, lower);
    }

    /// Returns a new bool variable equal to `OR` over `vars` (empty slice
    /// yields a variable fixed to `0`), via `z >= v_i` for every `i` and
    /// `z <= sum(vars)`.
    pub fn post_or(&mut self, vars: &[BoolVar]) -> BoolVar {
        if vars.is_empty() {
            return self.new_fixed(0);
        }
        let z = self.new_bool();
        for &v in vars {
            self.ge_vars(z, v);
        }
        let total = self.sum(vars);
        self.le_vars(z, total);
        z
    }

    /// Posts `active == 1 => var >= bound`, vacuous otherwise, via the
    /// big-M relaxation `var >= bound - big_m * (1 - active)`.
    pub fn post_ge_if_active(&mut self, var: IntVar, bound: IntVar, active: BoolVar, big_m: i32) {
        let one = self.new_fixed(1);
        let inactive = self.sub(one, active);
        let slack = self.scale(inactive, big_m);
        let relaxed_bound = self.sub(bound, slack);
        self.ge_vars(var, relaxed_bound);
    }

    /// Posts `active == 1 => var <= bound`, vacuous otherwise, via the
    /// big-M relaxation `var <= bound + big_m * (1 - active)`.
    pub fn post_le_if_active(&mut self, var: IntVar, bound: IntVar, active: BoolVar, big_m: i32) {
        let one = self.new_fixed(1);
        let inactive = self.sub(one, active);
        let slack = self.scale(inactive, big_m);
        let relaxed_bound = self.add(bound, slack);
        self.le_vars(var, relaxed_bound);
    }

    /// Declares `objective` as the quantity to minimize. Both stage models
    /// build theirs as a single scalar combining lexicographic tiers by
    /// weight (spec.md §4.2/§4.5), so one call per model suffices.
    pub fn minimize(&mut self, objective: IntVar) {
        self.inner.minimize(objective);
    }

    /// Pairwise big-M no-overlap between two intervals, gated on both
    /// being active and waived entirely when `exempt` holds — the shape
    /// §4.3 #6/#7 need for venue/trainer exclusivity with the §4.4 shared-
    /// session carve-out. Subsumes `post_no_overlap` (always-active,
    /// never-exempt) and a `post_cumulative` with `capacity = 1`
    /// (always-exempt-false); kept separate because threading the exempt
    /// gate through `post_cumulative`'s demand bound as well would relax
    /// capacity too, which §4.4 explicitly forbids.
    #[allow(clippy::too_many_arguments)]
    pub fn post_no_overlap_unless(
        &mut self,
        horizon: i32,
        start1: IntVar,
        end1: IntVar,
        active1: BoolVar,
        start2: IntVar,
        end2: IntVar,
        active2: BoolVar,
        exempt: BoolVar,
    ) {
        let one = self.new_fixed(1);
        let before = self.new_bool();
        let not_before = self.sub(one, before);
        let inactive1 = self.sub(one, active1);
        let inactive2 = self.sub(one, active2);

        let gate_after = self.sum(&[inactive1, inactive2, exempt, not_before]);
        let slack_after = self.scale(gate_after, horizon);
        let bound1 = self.add(start2, slack_after);
        self.le_vars(end1, bound1);

        let gate_before = self.sum(&[inactive1, inactive2, exempt, before]);
        let slack_before = self.scale(gate_before, horizon);
        let bound2 = self.add(start1, slack_before);
        self.le_vars(end2, bound2);
    }

    /// Posts `flag == 1 => a == b`, leaving `a`/`b` unconstrained when
    /// `flag == 0`. One-directional (never forces `flag` to `1` when `a`
    /// and `b` happen to coincide) — sufficient and safer than a full
    /// reification for the §4.4 "same session" gate, since a solver that
    /// under-claims `flag` only loses the sharing bonus, while one that
    /// over-claims it would illegally waive a real conflict.
    pub fn post_implies_eq(&mut self, flag: BoolVar, a: IntVar, b: IntVar, big_m: i32) {
        let one = self.new_fixed(1);
        let not_flag = self.sub(one, flag);
        let slack = self.scale(not_flag, big_m);
        let a_minus_b = self.sub(a, b);
        let bound1 = slack;
        self.le_vars(a_minus_b, bound1);
        let b_minus_a = self.sub(b, a);
        self.le_vars(b_minus_a, slack);
    }

    /// `Σ_i (i+1)·vars[i]` as a new variable — used to turn a one-hot
    /// selection (which venue, which trainer) into a single comparable
    /// scalar for the §4.4 "same session" signature check.
    pub fn weighted_sum(&mut self, vars: &[BoolVar]) -> IntVar {
        let mut terms = Vec::with_capacity(vars.len());
        for (i, &v) in vars.iter().enumerate() {
            terms.push(self.scale(v, i as i32 + 1));
        }
        self.sum(&terms)
    }

    /// Posts `quotient == floor(dividend / divisor)` via the standard
    /// two-inequality sandwich `quotient·divisor <= dividend <
    /// (quotient+1)·divisor`, since `selen`'s confirmed surface has no
    /// native integer-division constraint. Used for the day-from-hour
    /// derivation of §4.3 #1.
    pub fn post_floor_div(&mut self, quotient: IntVar, dividend: IntVar, divisor: i32) {
        let scaled = self.scale(quotient, divisor);
        self.le_vars(scaled, dividend);

        let one = self.new_fixed(1);
        let quotient_plus_one = self.add(quotient, one);
        let scaled_plus_one = self.scale(quotient_plus_one, divisor);
        let dividend_plus_one = self.add(dividend, one);
        self.le_vars(dividend_plus_one, scaled_plus_one);
    }

    /// Restricts `var` to the explicit value set `values`, via a one-hot
    /// selection over `values` whose weighted sum is pinned equal to
    /// `var` — the same one-hot-then-weight shape as `weighted_sum`,
    /// applied to an arbitrary value list instead of `0..len`. Used for
    /// `valid_start_domain` (§4.3 #4): the domain is an explicit, usually
    /// non-contiguous, subset of horizon hours, not a range `selen`'s
    /// plain `int(lo, hi)` can express directly.
    pub fn post_value_domain(&mut self, var: IntVar, values: &[i32]) {
        if values.is_empty() {
            // An empty domain means this session can never start; pin the
            // variable to a value its declared range cannot contain so
            // the model comes back INFEASIBLE rather than silently
            // unconstrained.
            self.eq(var, -1);
            return;
        }
        let indicators: Vec<BoolVar> = values.iter().map(|_| self.new_bool()).collect();
        let selected = self.sum(&indicators);
        self.eq(selected, 1);

        let mut terms = Vec::with_capacity(values.len());
        for (&indicator, &value) in indicators.iter().zip(values) {
            terms.push(self.scale(indicator, value));
        }
        let weighted = self.sum(&terms);
        self.eq_vars(var, weighted);
    }

    /// Posts `var != value`, via the same before/after disjunction shape
    /// `post_no_overlap` uses for two intervals, specialized to a single
    /// variable against a constant. Used for weekend exclusion (§4.3 #12):
    /// `day[g,c] != weekend_index`.
    pub fn post_not_equal(&mut self, var: IntVar, value: i32, max_value: i32) {
        let one = self.new_fixed(1);
        let below = self.new_bool();
        let not_below = self.sub(one, below);

        // var <= value - 1 + M*(1 - below)
        let below_bound_base = self.new_fixed(value - 1);
        let relax_above = self.scale(not_below, max_value + 1);
        let bound_above = self.add(below_bound_base, relax_above);
        self.le_vars(var, bound_above);

        // var >= value + 1 - M*below
        let above_bound_base = self.new_fixed(value + 1);
        let relax_below = self.scale(below, max_value + 1);
        let bound_below = self.sub(above_bound_base, relax_below);
        self.ge_vars(var, bound_below);
    }

    /// Builds one `is_day[d]` indicator per `d` in `0..day_count`, pinned
    /// so that exactly one is `1` and that one forces `var == d` (the same
    /// pin-when-active shape as batching's size-balancing constraint,
    /// #8). Because exactly one indicator is ever active, the implication
    /// alone fully determines `var` from the indicators — no reverse
    /// direction is needed. Used wherever a day value must be turned into
    /// a selectable quantity: daily load (§4.3 #9), daily-load-imbalance
    /// objective term (§4.5).
    pub fn post_day_indicators(&mut self, var: IntVar, day_count: u32, big_m: i32) -> Vec<BoolVar> {
        let indicators: Vec<BoolVar> = (0..day_count).map(|_| self.new_bool()).collect();
        let selected = self.sum(&indicators);
        self.eq(selected, 1);
        for (d, &indicator) in indicators.iter().enumerate() {
            let day_value = self.new_fixed(d as i32);
            self.post_ge_if_active(var, day_value, indicator, big_m);
            self.post_le_if_active(var, day_value, indicator, big_m);
        }
        indicators
    }

    /// Runs the search under `config`, translating `selen`'s result into
    /// the three-way outcome spec.md §5/§7 requires.
    pub fn solve(self, config: SolveConfig) -> Result<SolveOutcome, GenericError> {
        match self.inner.solve_with_config(SolverConfig {
            max_time: config.max_time,
            num_workers: config.num_search_workers,
        }) {
            Ok(solution) => Ok(SolveOutcome::Feasible(solution)),
            Err(SelenError::Infeasible) => Ok(SolveOutcome::Infeasible),
            Err(SelenError::TimedOut) => Ok(SolveOutcome::Unknown),
            Err(other) => Err(Box::new(other)),
        }
    }
}
