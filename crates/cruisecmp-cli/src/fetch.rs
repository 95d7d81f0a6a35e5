//! Page retrieval: HTTP fetch or local text/HTML file, reduced to plain text.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use scraper::{Html, Node, Selector};
use tracing::debug;

use cruisecmp_core::FetchedPage;
use cruisecmp_core::models::config::FetchConfig;

/// Elements whose text never reaches the extractor.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// HTTP page fetcher configured from [`FetchConfig`].
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)?,
        );

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        Ok(Self { client })
    }

    /// Fetch a page. The error is the message stored in the run.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status} for {url}"));
        }

        let body = response.text().await.map_err(|e| e.to_string())?;
        debug!("Fetched {} ({} bytes)", url, body.len());

        Ok(html_to_page(&body))
    }
}

/// Read a saved page from disk. `.html`/`.htm` files are parsed as HTML.
pub fn read_page_file(path: &Path) -> Result<FetchedPage, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    let is_html = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_lowercase().as_str(), "html" | "htm"));

    if is_html {
        Ok(html_to_page(&content))
    } else {
        Ok(FetchedPage {
            text: content,
            title: None,
        })
    }
}

/// Reduce an HTML document to its visible text and `<title>`.
pub fn html_to_page(html: &str) -> FetchedPage {
    let doc = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| {
            doc.select(&sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
        })
        .filter(|t| !t.is_empty());

    let mut parts = Vec::new();
    for node in doc.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let skipped = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
        });
        if skipped {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    FetchedPage {
        text: parts.join(" "),
        title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_page_skips_scripts() {
        let html = r#"<html><head><title> שייט לנורבגיה </title>
            <style>.price { color: red }</style></head>
            <body><h1>טיול מובטח</h1><script>var x = "early bird";</script>
            <p>מחיר לזוג <b>4,500</b> ₪</p></body></html>"#;

        let page = html_to_page(html);
        assert_eq!(page.title.as_deref(), Some("שייט לנורבגיה"));
        assert_eq!(page.text, "שייט לנורבגיה טיול מובטח מחיר לזוג 4,500 ₪");
    }

    #[test]
    fn test_html_without_title() {
        let page = html_to_page("<p>Kosher food</p>");
        assert!(page.title.is_none());
        assert_eq!(page.text, "Kosher food");
    }

    #[test]
    fn test_read_page_file() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("page.txt");
        std::fs::write(&txt, "line one\nline two").unwrap();
        let page = read_page_file(&txt).unwrap();
        assert_eq!(page.text, "line one\nline two");

        let html = dir.path().join("page.HTML");
        std::fs::write(&html, "<title>Danube</title><p>tips included</p>").unwrap();
        let page = read_page_file(&html).unwrap();
        assert_eq!(page.title.as_deref(), Some("Danube"));

        let err = read_page_file(&dir.path().join("missing.txt")).unwrap_err();
        assert!(err.contains("missing.txt"));
    }
}
