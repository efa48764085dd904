//! Error types shared across the workspace.

use std::error::Error;

/// A catch-all error for CP-model construction failures whose cause is
/// intrinsically heterogeneous (a malformed builder call, an empty
/// variable domain). Mirrors the teacher's
/// `Result<Feature, GenericError>` idiom.
pub type GenericError = Box<dyn Error + Send + Sync>;

/// Structured failures raised while validating or assembling the domain
/// model, as opposed to failures inside CP-model construction.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A venue's capacity was not a positive integer.
    #[error("venue '{name}' has non-positive capacity {capacity}")]
    NonPositiveCapacity {
        /// Offending venue name.
        name: String,
        /// The invalid capacity value.
        capacity: i64,
    },

    /// Two venues were registered under the same name for a company.
    #[error("duplicate venue name '{name}' for company '{company}'")]
    DuplicateVenueName {
        /// Company the venues belong to.
        company: String,
        /// The duplicated venue name.
        name: String,
    },

    /// Prerequisite (or global-sequence) edges form a cycle, which spec.md
    /// §9 calls out as undefined behaviour that must be rejected up front.
    #[error("prerequisite cycle detected among courses: {}", cycle.join(" -> "))]
    PrerequisiteCycle {
        /// The course names forming the cycle, in cycle order.
        cycle: Vec<String>,
    },

    /// A calendar was asked to produce zero or a negative number of days.
    #[error("calendar horizon must contain at least one day, got {days}")]
    EmptyHorizon {
        /// The invalid day count that was requested.
        days: i64,
    },
}
