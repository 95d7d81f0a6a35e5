//! Scan command - fetch every target, extract records and write the report.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use cruisecmp_core::{ComparisonBuilder, PairSelection, RecordStore, SourceInput, TripExtractor};

use crate::fetch::{PageFetcher, read_page_file};
use crate::output::write_scan_outputs;
use crate::targets::{PageOrigin, Target, TargetsFile};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Targets file listing company pages
    #[arg(short, long)]
    targets: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Also write summary.csv
    #[arg(long)]
    summary: bool,

    /// Compare two companies (repeatable)
    #[arg(long, num_args = 2, value_names = ["LEFT", "RIGHT"], action = clap::ArgAction::Append)]
    compare: Vec<String>,

    /// Pages fetched at the same time (overrides config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let targets_file = TargetsFile::from_file(&args.targets)?;
    let base_dir = args.targets.parent().unwrap_or_else(|| Path::new("."));
    let targets = targets_file.resolve(base_dir, &config.targets);

    if targets.is_empty() {
        anyhow::bail!("No usable sources in {}", args.targets.display());
    }

    println!(
        "{} Scanning {} sources",
        style("ℹ").blue(),
        targets.len()
    );

    let catalog = config.catalog()?;
    let extractor = TripExtractor::from_config(catalog, &config.extraction);
    let store = RecordStore::new(extractor).with_preview_chars(config.extraction.preview_chars);
    let fetcher = PageFetcher::new(&config.fetch)?;

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(targets.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("=>-"),
        );
        pb
    };

    let concurrency = args.jobs.unwrap_or(config.fetch.concurrency).max(1);
    debug!("Fetching with concurrency {}", concurrency);

    // `buffered` keeps results in target order.
    let inputs: Vec<SourceInput> = stream::iter(targets)
        .map(|target| load_target(&fetcher, &progress, target))
        .buffered(concurrency)
        .collect()
        .await;

    progress.finish_and_clear();

    let run = store.run_once(inputs);

    let mut builder = ComparisonBuilder::from_config(&config.report);
    let pairs = super::compare_pairs(&args.compare);
    if !pairs.is_empty() {
        builder = builder.with_pairs(PairSelection::Companies(pairs));
    }
    let report = builder.build_report(&run);

    let written = write_scan_outputs(&args.output_dir, &run, &report, args.summary)?;
    info!("Results written to {}", written.results.display());

    let failed = run.failed_count();
    println!();
    println!(
        "{} Scanned {} sources in {:?}",
        style("✓").green(),
        run.entries.len(),
        start.elapsed()
    );
    println!(
        "   {} extracted, {} failed",
        style(run.entries.len() - failed).green(),
        style(failed).red()
    );
    println!("   Results: {}", written.results.display());
    println!("   Report:  {}", written.report.display());
    if let Some(summary) = &written.summary {
        println!("   Summary: {}", summary.display());
    }

    if failed > 0 {
        println!();
        println!("{}", style("Failed sources:").red());
        for entry in &run.entries {
            if let Some(error) = entry.error() {
                println!("  - {} ({}): {}", entry.company(), entry.url(), error);
            }
        }
    }

    Ok(())
}

async fn load_target(fetcher: &PageFetcher, progress: &ProgressBar, target: Target) -> SourceInput {
    progress.set_message(target.company.clone());

    let fetched = match &target.origin {
        PageOrigin::File(path) => read_page_file(path),
        PageOrigin::Http => fetcher.fetch(&target.locator).await,
    };
    let fetched_at = Utc::now();

    progress.inc(1);

    SourceInput {
        company: target.company,
        locator: target.locator,
        fetched,
        fetched_at,
    }
}
