//! Command-line entry point: loads input files, runs the pipeline once and
//! prints the response record as JSON.

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use rfp_engine::application::{evaluate_files, ApplicationError, InputFiles};
use rfp_engine::infrastructure::{init_tracing, load_settings};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rfp-engine",
    about = "Select, match and price the best procurement solicitation",
    version
)]
struct Cli {
    /// JSON array of candidate solicitations
    #[arg(long)]
    solicitations: PathBuf,
    /// JSON array of catalog products
    #[arg(long)]
    catalog: PathBuf,
    /// JSON array of testing costs
    #[arg(long)]
    testing_costs: Option<PathBuf>,
    /// Settings file (TOML, JSON or YAML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
    /// Log level or filter directive, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs)?;

    let mut config = load_settings(cli.config.as_deref()).map_err(ApplicationError::from)?;
    if let Some(date) = cli.as_of {
        config = config.with_evaluation_date(date);
    }

    let mut files = InputFiles::new(&cli.solicitations, &cli.catalog);
    if let Some(path) = &cli.testing_costs {
        files = files.with_testing_costs(path);
    }
    let record = evaluate_files(&files, &config).context("evaluation failed")?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &record)?;
    writeln!(stdout)?;
    Ok(())
}
