//! Targets file: which company pages a scan visits.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use cruisecmp_core::models::config::TargetsConfig;

/// Parsed targets file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetsFile {
    #[serde(default)]
    pub sources: Vec<SourceDef>,
}

/// One configured source.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDef {
    pub company: String,

    /// Company home page.
    #[serde(default)]
    pub url: Option<String>,

    /// Trip listing page; preferred over `url`.
    #[serde(default)]
    pub cruises_list_url: Option<String>,

    /// Saved page used instead of fetching the locator.
    #[serde(default)]
    pub text_file: Option<PathBuf>,
}

impl SourceDef {
    /// The listing URL when given, otherwise the home page.
    pub fn locator(&self) -> Option<&str> {
        self.cruises_list_url
            .as_deref()
            .or(self.url.as_deref())
            .filter(|l| !l.trim().is_empty())
    }
}

/// Where a target's page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOrigin {
    Http,
    File(PathBuf),
}

/// A source ready to be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub company: String,
    pub locator: String,
    pub origin: PageOrigin,
}

impl TargetsFile {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read targets file {}: {}", path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid targets file {}: {}", path.display(), e))
    }

    /// Resolve sources into targets, in file order.
    ///
    /// Sources without a locator are skipped, as are companies the filter
    /// rejects. Relative `text_file` paths are taken from `base_dir`.
    pub fn resolve(&self, base_dir: &Path, filter: &TargetsConfig) -> Vec<Target> {
        let mut targets = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            if !filter.accepts(&source.company) {
                debug!("Skipping {}: not in targets.companies", source.company);
                continue;
            }
            let Some(locator) = source.locator() else {
                warn!("Skipping {}: no url or cruises_list_url", source.company);
                continue;
            };

            let origin = match &source.text_file {
                Some(file) if file.is_absolute() => PageOrigin::File(file.clone()),
                Some(file) => PageOrigin::File(base_dir.join(file)),
                None => PageOrigin::Http,
            };

            targets.push(Target {
                company: source.company.clone(),
                locator: locator.to_string(),
                origin,
            });
        }

        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> TargetsFile {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_locator_prefers_listing_page() {
        let targets = parse(
            r#"{"sources":[
                {"company":"Mano Maritime","url":"https://mano.example","cruises_list_url":"https://mano.example/cruises"},
                {"company":"Massaot","url":"https://massaot.example"},
                {"company":"No Link"}
            ]}"#,
        );

        let resolved = targets.resolve(Path::new("/data"), &TargetsConfig::default());
        assert_eq!(
            resolved,
            vec![
                Target {
                    company: "Mano Maritime".to_string(),
                    locator: "https://mano.example/cruises".to_string(),
                    origin: PageOrigin::Http,
                },
                Target {
                    company: "Massaot".to_string(),
                    locator: "https://massaot.example".to_string(),
                    origin: PageOrigin::Http,
                },
            ]
        );
    }

    #[test]
    fn test_company_filter_and_text_file() {
        let targets = parse(
            r#"{"sources":[
                {"company":"A","url":"https://a.example","text_file":"pages/a.txt"},
                {"company":"B","url":"https://b.example"}
            ]}"#,
        );
        let filter = TargetsConfig {
            companies: vec!["A".to_string()],
        };

        let resolved = targets.resolve(Path::new("/data"), &filter);
        assert_eq!(resolved.len(), 1);
        assert_eq!(
            resolved[0].origin,
            PageOrigin::File(PathBuf::from("/data/pages/a.txt"))
        );
    }

    #[test]
    fn test_empty_targets() {
        let targets = parse("{}");
        assert!(targets.resolve(Path::new("."), &TargetsConfig::default()).is_empty());
    }
}
