//! Stage-2 CP model: assigns each `(group, course-batch)` a start hour,
//! day, venue and trainer (spec.md §4.3–§4.5).

pub mod model;
pub mod session_split;
pub mod valid_start_domain;

pub use model::{solve_scheduling, SchedulingConfig, SchedulingInput, SchedulingModel, SchedulingOutcome};
pub use valid_start_domain::valid_start_domain_for_batch;
