//! Configuration and orchestration failures (spec.md §7's "configuration
//! conflict" and "no batches feasible" failure kinds, scoped to the CLI
//! boundary; per-row ingestion failures are logged and suppressed instead,
//! never surfaced as `CliError`).

/// Failures raised while loading configuration or orchestrating a solve,
/// as opposed to failures inside either CP model.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// `figment` could not extract a `Config` from the merged sources.
    #[error("failed to load configuration: {0}")]
    Config(#[from] figment::Error),

    /// `companies` was given but resolved to an empty whitelist, or no
    /// company had any courses after filtering — nothing to do.
    #[error("no companies to process")]
    NoCompanies,

    /// Neither `is_splitting_batch` nor `is_scheduling_course` was set.
    #[error("configuration selects neither stage (is_splitting_batch, is_scheduling_course both false)")]
    NoStageSelected,

    /// `start_date` was not a valid ISO date.
    #[error("invalid start_date '{raw}': {source}")]
    InvalidStartDate {
        /// The offending raw value.
        raw: String,
        /// The underlying parse error.
        source: chrono::ParseError,
    },
}
