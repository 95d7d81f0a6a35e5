//! Configuration structures for the scan pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{CruiseError, Result};
use crate::extract::{CatalogDef, PatternCatalog};

/// Main configuration for a cruise scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Page fetching configuration.
    pub fetch: FetchConfig,

    /// Report configuration.
    pub report: ReportConfig,

    /// Source selection.
    pub targets: TargetsConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of audit snippets kept per record.
    pub max_snippets: usize,

    /// Maximum route/title length in characters.
    pub route_max_chars: usize,

    /// Characters of page text kept in the run output.
    pub preview_chars: usize,

    /// Custom pattern catalog (JSON). Built-in catalog when unset.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_snippets: 16,
            route_max_chars: 200,
            preview_chars: 8000,
            catalog_path: None,
        }
    }
}

/// Page fetching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Accept-Language header; listing sites localize their prices.
    pub accept_language: String,

    /// Number of pages fetched at the same time.
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 25,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "he-IL".to_string(),
            concurrency: 4,
        }
    }
}

/// Report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Top-level report heading.
    pub title: String,

    /// Company pairs to compare. Empty compares the first two successful entries.
    pub compare: Vec<(String, String)>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "השוואת שייט מאורגן – מנו ספנות vs קרוזתור".to_string(),
            compare: Vec::new(),
        }
    }
}

/// Source selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Companies to keep from the targets file. Empty keeps all.
    pub companies: Vec<String>,
}

impl TargetsConfig {
    pub fn accepts(&self, company: &str) -> bool {
        self.companies.is_empty() || self.companies.iter().any(|c| c == company)
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| CruiseError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build the pattern catalog this configuration points at.
    pub fn catalog(&self) -> Result<PatternCatalog> {
        match &self.extraction.catalog_path {
            Some(path) => {
                let def = CatalogDef::from_file(path)?;
                Ok(PatternCatalog::from_definition(&def)?)
            }
            None => Ok(PatternCatalog::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"extraction": {"max_snippets": 4}}"#).unwrap();
        assert_eq!(config.extraction.max_snippets, 4);
        assert_eq!(config.extraction.route_max_chars, 200);
        assert_eq!(config.fetch.timeout_secs, 25);
        assert!(config.report.compare.is_empty());
    }

    #[test]
    fn test_compare_pairs_are_json_arrays() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"report": {"compare": [["Massaot", "Mano Maritime"]]}}"#)
                .unwrap();
        assert_eq!(
            config.report.compare,
            vec![("Massaot".to_string(), "Mano Maritime".to_string())]
        );
    }

    #[test]
    fn test_targets_filter() {
        let all = TargetsConfig::default();
        assert!(all.accepts("anyone"));

        let some = TargetsConfig {
            companies: vec!["Massaot".to_string()],
        };
        assert!(some.accepts("Massaot"));
        assert!(!some.accepts("Mano Maritime"));
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ScanConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CruiseError::Config(_)));
    }
}
