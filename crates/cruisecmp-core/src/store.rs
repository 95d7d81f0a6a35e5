//! Run accumulation: one entry per source, in input order.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::extract::values::truncate_chars;
use crate::extract::{RecordExtractor, TripExtractor};
use crate::models::config::ExtractionConfig;
use crate::models::run::{FetchFailure, RunEntry, RunResult, SourceRecord};

/// Page content delivered by a fetcher.
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    /// Plain page text.
    pub text: String,
    /// Page title, used as the route.
    pub title: Option<String>,
}

/// Input for one source: either fetched content or the fetch error.
#[derive(Debug, Clone)]
pub struct SourceInput {
    pub company: String,
    /// Source locator, opaque to the core.
    pub locator: String,
    pub fetched: std::result::Result<FetchedPage, String>,
    /// When the fetch completed; becomes the entry's `scraped_at`.
    pub fetched_at: DateTime<Utc>,
}

impl SourceInput {
    pub fn page(
        company: impl Into<String>,
        locator: impl Into<String>,
        text: impl Into<String>,
        title: Option<String>,
    ) -> Self {
        Self {
            company: company.into(),
            locator: locator.into(),
            fetched: Ok(FetchedPage {
                text: text.into(),
                title,
            }),
            fetched_at: Utc::now(),
        }
    }

    pub fn failed(
        company: impl Into<String>,
        locator: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            company: company.into(),
            locator: locator.into(),
            fetched: Err(error.into()),
            fetched_at: Utc::now(),
        }
    }

    pub fn with_fetched_at(mut self, at: DateTime<Utc>) -> Self {
        self.fetched_at = at;
        self
    }
}

/// Accumulates extracted records and fetch failures for a run.
pub struct RecordStore<E = TripExtractor> {
    extractor: E,
    /// Characters of page text kept per entry.
    preview_chars: usize,
}

impl<E: RecordExtractor> RecordStore<E> {
    pub fn new(extractor: E) -> Self {
        Self {
            extractor,
            preview_chars: ExtractionConfig::default().preview_chars,
        }
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    /// Process all sources and return the run.
    pub fn run_once<I>(&self, sources: I) -> RunResult
    where
        I: IntoIterator<Item = SourceInput>,
    {
        let entries: Vec<RunEntry> = sources.into_iter().map(|s| self.entry_for(s)).collect();
        let run = RunResult::new(entries);

        info!(
            "Run finished: {} entries, {} failed",
            run.entries.len(),
            run.failed_count()
        );

        run
    }

    fn entry_for(&self, source: SourceInput) -> RunEntry {
        let scraped_at = source.fetched_at;

        match source.fetched {
            Ok(page) => {
                let extracted =
                    self.extractor
                        .extract_page(&page.text, page.title.as_deref(), &source.company);
                RunEntry::Extracted(SourceRecord {
                    url: source.locator,
                    scraped_at,
                    extracted,
                    raw_text_preview: truncate_chars(&page.text, self.preview_chars),
                })
            }
            Err(error) => {
                warn!("Fetch failed for {} ({}): {}", source.company, source.locator, error);
                RunEntry::Failed(FetchFailure {
                    company: source.company,
                    url: source.locator,
                    scraped_at,
                    error,
                })
            }
        }
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(TripExtractor::default())
    }
}
