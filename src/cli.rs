//! CLI argument parsing for the enrichment workflow.
//!
//! The CLI stays thin: it resolves a config plus overrides and hands off to the
//! workflow module.
use crate::dataset::RecordLimit;
use crate::enrich::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "place-enrich",
    version,
    about = "Enrich a pet-friendly restaurant dataset with place details and photos",
    after_help = "Commands:\n  init                 Write a default enrich.json\n  run                  Search, fetch details, download photos, write the output table\n  status               Summarize the output table against the image artifacts\n\nExamples:\n  place-enrich init\n  place-enrich run --source KC_MTPCLT_RSTRNT_DATA_2023.csv --limit 5\n  place-enrich run --out-dir /tmp/places --pacing-ms 0\n  place-enrich status --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    Run(RunArgs),
    Status(StatusArgs),
}

/// Init command inputs for writing a default config.
#[derive(Parser, Debug)]
#[command(about = "Write a default enrichment config")]
pub struct InitArgs {
    /// Config path to create
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

/// Run command inputs; flags override the config file.
#[derive(Parser, Debug)]
#[command(about = "Enrich eligible records and write the output table")]
pub struct RunArgs {
    /// Config path (defaults to ./enrich.json when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Source CSV table
    #[arg(long, value_name = "CSV")]
    pub source: Option<PathBuf>,

    /// Directory receiving images/, jsons/, and the output table
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Number of eligible records to process (-1 for all)
    #[arg(long, value_name = "N", default_value = "-1", allow_hyphen_values = true)]
    pub limit: RecordLimit,

    /// Delay after each record, in milliseconds
    #[arg(long, value_name = "MS")]
    pub pacing_ms: Option<u64>,

    /// Emit debug-level logs
    #[arg(long)]
    pub verbose: bool,
}

/// Status command inputs for summarizing a finished run.
#[derive(Parser, Debug)]
#[command(about = "Summarize the output table and image artifacts")]
pub struct StatusArgs {
    /// Config path (defaults to ./enrich.json when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding a previous run's output
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

impl RootArgs {
    pub fn verbose(&self) -> bool {
        matches!(&self.command, Command::Run(args) if args.verbose)
    }
}
