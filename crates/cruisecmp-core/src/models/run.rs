//! Per-run accumulation of extracted records and fetch failures.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::record::ExtractedRecord;

/// Outcome of one run over all configured sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// One entry per input source, in input order.
    #[serde(rename = "companies")]
    pub entries: Vec<RunEntry>,

    /// When the run finished.
    pub generated_at: DateTime<Utc>,
}

impl RunResult {
    pub fn new(entries: Vec<RunEntry>) -> Self {
        Self {
            entries,
            generated_at: Utc::now(),
        }
    }

    /// Records of entries that were fetched and extracted, in run order.
    pub fn successful(&self) -> impl Iterator<Item = &ExtractedRecord> {
        self.entries.iter().filter_map(RunEntry::record)
    }

    /// Number of entries that failed to fetch.
    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.error().is_some()).count()
    }

    /// Load a saved run from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the run as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// A single source's entry in a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunEntry {
    /// Page was fetched and fields were extracted.
    Extracted(SourceRecord),
    /// Page could not be fetched.
    Failed(FetchFailure),
}

impl RunEntry {
    pub fn company(&self) -> &str {
        match self {
            RunEntry::Extracted(s) => &s.extracted.company,
            RunEntry::Failed(f) => &f.company,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            RunEntry::Extracted(s) => &s.url,
            RunEntry::Failed(f) => &f.url,
        }
    }

    pub fn scraped_at(&self) -> DateTime<Utc> {
        match self {
            RunEntry::Extracted(s) => s.scraped_at,
            RunEntry::Failed(f) => f.scraped_at,
        }
    }

    pub fn record(&self) -> Option<&ExtractedRecord> {
        match self {
            RunEntry::Extracted(s) => Some(&s.extracted),
            RunEntry::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RunEntry::Extracted(_) => None,
            RunEntry::Failed(f) => Some(&f.error),
        }
    }
}

/// Extracted record tagged with where and when it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Source locator the page was fetched from.
    pub url: String,

    /// Fetch time.
    pub scraped_at: DateTime<Utc>,

    /// Extracted fields.
    pub extracted: ExtractedRecord,

    /// Leading part of the page text, kept for manual review.
    #[serde(default)]
    pub raw_text_preview: String,
}

/// A source whose page never reached the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchFailure {
    pub company: String,
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    /// Error message exactly as reported by the fetcher.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(company: &str) -> RunEntry {
        RunEntry::Failed(FetchFailure {
            company: company.to_string(),
            url: "https://example.com".to_string(),
            scraped_at: Utc::now(),
            error: "timeout".to_string(),
        })
    }

    fn extracted(company: &str) -> RunEntry {
        RunEntry::Extracted(SourceRecord {
            url: "https://example.com/cruises".to_string(),
            scraped_at: Utc::now(),
            extracted: ExtractedRecord::new(company),
            raw_text_preview: String::new(),
        })
    }

    #[test]
    fn test_entry_accessors() {
        let failed = failure("Massaot");
        assert_eq!(failed.company(), "Massaot");
        assert_eq!(failed.error(), Some("timeout"));
        assert!(failed.record().is_none());

        let ok = extracted("Mano Maritime");
        assert_eq!(ok.company(), "Mano Maritime");
        assert!(ok.error().is_none());
        assert!(ok.record().is_some());
    }

    #[test]
    fn test_successful_preserves_order() {
        let run = RunResult::new(vec![extracted("A"), failure("B"), extracted("C")]);
        let companies: Vec<_> = run.successful().map(|r| r.company.as_str()).collect();
        assert_eq!(companies, vec!["A", "C"]);
        assert_eq!(run.failed_count(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        let run = RunResult::new(vec![extracted("A"), failure("B")]);
        run.save(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["companies"][0]["status"], "extracted");
        assert_eq!(json["companies"][1]["status"], "failed");
        assert_eq!(json["companies"][1]["error"], "timeout");

        let loaded = RunResult::from_file(&path).unwrap();
        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.entries[1].error(), Some("timeout"));
    }
}
