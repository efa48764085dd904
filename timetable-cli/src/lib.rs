//! Configuration, data-source/result-sink traits, orchestrator, and the
//! time-display formatting spec.md §6 fixes. The binary entry point
//! (`main.rs`) is a thin `clap` wrapper around `orchestrator::run`.

pub mod config;
pub mod data_source;
pub mod error;
pub mod ingest;
pub mod orchestrator;
pub mod output;

pub use config::Config;
pub use error::CliError;
