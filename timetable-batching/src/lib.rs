//! Stage-1 CP model: partitions a company's trainees into batches and
//! picks a week and a shift for each (spec.md §4.2).

pub mod model;

pub use model::{max_batches, BatchingConfig, BatchingError, BatchingInput, BatchingModel, BatchingOutcome};
