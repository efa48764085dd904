//! Recognized options (spec.md §6), loaded with `figment` (toml + env),
//! matching `Xevion-Banner`'s configuration layer. A missing required
//! option fails fast at parse time rather than panicking mid-solve
//! (spec.md §7).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use timetable_batching::BatchingConfig;
use timetable_scheduling::SchedulingConfig;

/// The full set of options spec.md §6 lists, plus the ambient defaults a
/// production caller would set once and forget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filename stem for exports; this repo's own `ResultSink`
    /// implementations ignore it, but it is carried through for callers
    /// that plug in their own.
    pub report_name: String,
    /// ISO start date of the planning horizon.
    pub start_date: String,
    /// Number of business days to collect (Sundays and holidays excluded).
    pub days: i64,
    /// Working hours per schedulable day.
    pub hours_per_day: u32,
    /// ISO dates excluded from the calendar grid regardless of weekday.
    pub holidays: Vec<String>,

    /// Per-trainee per-day hour cap (spec.md §4.3 #9).
    pub maximum_session_length: u32,
    /// Added to every venue's raw capacity before modeling.
    pub buffer_capacity: u32,
    /// Hours used when a course's duration is missing or non-positive.
    pub default_course_duration: u32,
    /// Courses with fewer enrolled trainees than this are dropped before
    /// modeling (spec.md §6).
    pub minimum_course_participant: u32,
    /// Subgroup split size for venue-occupancy accounting.
    pub maximum_group_size: usize,

    /// Enables the shift-window constraint (spec.md §4.3 #13).
    pub is_considering_shift: bool,
    /// Enables the global-sequence constraint (spec.md §4.3 #11).
    pub is_using_global_sequence: bool,
    /// Runs stage 1 (batching) per company.
    pub is_splitting_batch: bool,
    /// Runs stage 2 (scheduling) once, across all companies.
    pub is_scheduling_course: bool,
    /// Opt-in trainer-concurrency constraint (spec.md §4.2 #10, §9: off by
    /// default in source).
    pub enforce_trainer_concurrency: bool,
    /// Opt-in session splitting for over-long durations (SPEC_FULL.md §3).
    pub split_long_sessions: bool,
    /// Retries the scheduling solve once with global sequencing relaxed on
    /// INFEASIBLE/UNKNOWN (SPEC_FULL.md §3).
    pub relax_on_infeasible: bool,

    /// Optional course-stream whitelist; courses outside it are dropped
    /// before modeling.
    pub course_stream: Option<Vec<String>>,
    /// Optional company whitelist; stage 1 loops over this instead of every
    /// distinct company observed in the input rows.
    pub companies: Option<Vec<String>>,

    /// Venue capacity ceiling batches are sized against (spec.md §4.2).
    pub venue_capacity: u32,
    /// Slack batches beyond `max_batches`'s provable minimum (spec.md
    /// §4.2).
    pub min_batches: u32,

    /// Wall-clock budget, in seconds, for each CP solve.
    pub max_time_in_seconds: u64,
    /// Solver worker-thread count.
    pub num_search_workers: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_name: "timetable".to_string(),
            start_date: "1970-01-01".to_string(),
            days: 28,
            hours_per_day: 8,
            holidays: Vec::new(),
            maximum_session_length: 8,
            buffer_capacity: 0,
            default_course_duration: 4,
            minimum_course_participant: 1,
            maximum_group_size: 30,
            is_considering_shift: false,
            is_using_global_sequence: false,
            is_splitting_batch: true,
            is_scheduling_course: true,
            enforce_trainer_concurrency: false,
            split_long_sessions: false,
            relax_on_infeasible: true,
            course_stream: None,
            companies: None,
            venue_capacity: 30,
            min_batches: 3,
            max_time_in_seconds: 30,
            num_search_workers: 1,
        }
    }
}

impl Config {
    /// Loads a `Config` from `path` (if it exists) overlaid with `TIMETABLE_`-
    /// prefixed environment variables, falling back to `Config::default`
    /// for anything neither source sets.
    pub fn load(path: Option<&str>) -> Result<Self, crate::error::CliError> {
        use figment::providers::{Env, Format, Toml};
        use figment::Figment;

        let mut figment = Figment::from(figment::providers::Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("TIMETABLE_"));
        Ok(figment.extract()?)
    }

    /// The `selen` search budget derived from this config, shared by both
    /// stages (spec.md §5).
    pub fn solve_config(&self) -> timetable_core::cp::SolveConfig {
        timetable_core::cp::SolveConfig {
            max_time: Duration::from_secs(self.max_time_in_seconds),
            num_search_workers: self.num_search_workers,
        }
    }

    /// Stage-1 tuning knobs derived from this config.
    pub fn batching_config(&self) -> BatchingConfig {
        BatchingConfig {
            venue_capacity: self.venue_capacity,
            min_batches: self.min_batches,
            enforce_trainer_concurrency: self.enforce_trainer_concurrency,
        }
    }

    /// Stage-2 tuning knobs derived from this config.
    pub fn scheduling_config(&self) -> SchedulingConfig {
        SchedulingConfig {
            max_session_length: self.maximum_session_length,
            is_considering_shift: self.is_considering_shift,
            is_using_global_sequence: self.is_using_global_sequence,
            split_long_sessions: self.split_long_sessions,
            relax_on_infeasible: self.relax_on_infeasible,
        }
    }
}
