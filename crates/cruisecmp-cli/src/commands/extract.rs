//! Extract command - run the extractor over a single saved page.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use cruisecmp_core::{CatalogDef, PatternCatalog, RecordExtractor, TripExtractor};

use crate::fetch::read_page_file;
use crate::output::format_record_text;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Saved page (plain text, or HTML by .html/.htm extension)
    #[arg(required = true)]
    input: PathBuf,

    /// Company the page belongs to
    #[arg(long)]
    company: String,

    /// Page title used as the route (HTML pages use <title> by default)
    #[arg(long)]
    title: Option<String>,

    /// Pattern catalog file (overrides config)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let catalog = match &args.catalog {
        Some(path) => PatternCatalog::from_definition(&CatalogDef::from_file(path)?)?,
        None => config.catalog()?,
    };
    let extractor = TripExtractor::from_config(catalog, &config.extraction);
    debug!("Catalog has {} fields", extractor.catalog().len());

    let page = read_page_file(&args.input).map_err(|e| anyhow::anyhow!(e))?;
    let title = args.title.or(page.title);

    let record = extractor.extract_page(&page.text, title.as_deref(), &args.company);

    let content = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&record)?,
        OutputFormat::Text => format_record_text(&record),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &content)?;
            println!(
                "{} Record written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", content),
    }

    Ok(())
}
