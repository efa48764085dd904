//! `clap` CLI entry point. Grounded on `jizizr-cqupt-ics-rs-cli` and
//! `Xevion-Banner` (both parse args with `clap` derive and initialize
//! `tracing-subscriber` in `main`), adapted to this solver's synchronous,
//! single-shot invocation (no async runtime needed: the CP solve is the
//! only long-running operation, and `selen` itself owns any worker
//! threads, per spec.md §5).

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timetable_cli::config::Config;
use timetable_cli::data_source::InMemoryDataSource;
use timetable_cli::orchestrator;
use timetable_cli::output::InMemorySink;

/// Computes a conflict-free multi-week training timetable from master
/// employee, course, trainer and venue records.
#[derive(Parser)]
#[command(name = "timetable")]
#[command(about = "Two-stage batching and scheduling solver for training timetables")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file (spec.md §6's option table).
    #[arg(short, long)]
    config: Option<String>,

    /// Path to a JSON bundle of the master input tables (spec.md §6's
    /// logical tables; see `timetable_cli::data_source::InMemoryDataSource`
    /// for the shape). Ingestion format beyond this bundle is a non-goal:
    /// a production caller supplies its own `MasterDataSource`.
    #[arg(short, long)]
    input: String,

    /// Path to write the stage-1 and stage-2 output rows as JSON.
    #[arg(short, long)]
    output: Option<String>,

    /// Enables debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| format!("timetable_cli={log_level},timetable_batching={log_level},timetable_scheduling={log_level}").into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    let input_json = std::fs::read_to_string(&cli.input).with_context(|| format!("failed to read input bundle '{}'", cli.input))?;
    let source: InMemoryDataSource = serde_json::from_str(&input_json).context("failed to parse input bundle")?;

    let mut sink = InMemorySink::default();
    orchestrator::run(&source, &config, &mut sink)?;

    tracing::info!(stage1_rows = sink.stage1.len(), stage2_rows = sink.stage2.len(), "solve complete");

    if let Some(output_path) = cli.output {
        let json = serde_json::json!({ "stage1": sink.stage1, "stage2": sink.stage2 });
        std::fs::write(&output_path, serde_json::to_string_pretty(&json)?).with_context(|| format!("failed to write output to '{}'", output_path))?;
    }

    Ok(())
}
