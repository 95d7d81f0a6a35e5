//! Report command - rebuild the comparison report from saved results.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use cruisecmp_core::{ComparisonBuilder, PairSelection, RunResult};

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Saved results.json from a previous scan
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compare two companies (repeatable)
    #[arg(long, num_args = 2, value_names = ["LEFT", "RIGHT"], action = clap::ArgAction::Append)]
    compare: Vec<String>,

    /// Report heading (overrides config)
    #[arg(long)]
    title: Option<String>,
}

pub async fn run(args: ReportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Results file not found: {}", args.input.display());
    }
    let run = RunResult::from_file(&args.input)?;

    let mut builder = ComparisonBuilder::from_config(&config.report);
    if let Some(title) = args.title {
        builder = builder.with_title(title);
    }
    let pairs = super::compare_pairs(&args.compare);
    if !pairs.is_empty() {
        builder = builder.with_pairs(PairSelection::Companies(pairs));
    }

    let report = builder.build_report(&run);

    match &args.output {
        Some(path) => {
            fs::write(path, &report)?;
            println!(
                "{} Report written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => print!("{}", report),
    }

    Ok(())
}
