//! Markdown comparison report across the records of a run.

use tracing::debug;

use crate::models::config::ReportConfig;
use crate::models::record::{ExtractedRecord, Inclusion};
use crate::models::run::{RunEntry, RunResult};

/// Shown for any value the page did not yield.
pub const PLACEHOLDER: &str = "—";

const YES: &str = "כן";
const NO_OR_UNKNOWN: &str = "לא/לא נמצא";

const SUMMARY_HEADING: &str = "## סיכום לפי חברה";
const DIFFERENCES_HEADING: &str = "## הבדלים עיקריים";

/// Emitted when a pair has no differing field.
pub const NO_DIFFERENCES: &str =
    "- אין הבדלים ברורים מהנתונים שנאספו (ייתכן שדרוש חילוץ מעמיק יותר).";

/// Emitted when fewer than two records are available for a pair.
pub const INSUFFICIENT_DATA: &str = "- אין מספיק נתונים להשוואה (שגיאות גריפה או חילוץ).";

/// Which records the key-differences section compares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PairSelection {
    /// The first two successful entries, whatever their companies.
    #[default]
    FirstTwo,
    /// Named company pairs; each side uses that company's first successful entry.
    Companies(Vec<(String, String)>),
}

impl PairSelection {
    /// Explicit pairs when any are given, otherwise the first two entries.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        if pairs.is_empty() {
            PairSelection::FirstTwo
        } else {
            PairSelection::Companies(pairs)
        }
    }
}

/// Builds the comparison report for a run.
#[derive(Debug, Clone)]
pub struct ComparisonBuilder {
    title: String,
    pairs: PairSelection,
}

impl ComparisonBuilder {
    pub fn new() -> Self {
        Self::from_config(&ReportConfig::default())
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            pairs: PairSelection::from_pairs(config.compare.clone()),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_pairs(mut self, pairs: PairSelection) -> Self {
        self.pairs = pairs;
        self
    }

    /// Render the full report: per-entry sections, then key differences.
    pub fn build_report(&self, run: &RunResult) -> String {
        let mut lines = vec![
            format!("# {}", self.title),
            String::new(),
            SUMMARY_HEADING.to_string(),
            String::new(),
        ];

        for entry in &run.entries {
            render_entry(&mut lines, entry);
            lines.push(String::new());
        }

        lines.push(DIFFERENCES_HEADING.to_string());
        lines.push(String::new());

        match &self.pairs {
            PairSelection::FirstTwo => {
                let mut successful = run.successful();
                match (successful.next(), successful.next()) {
                    (Some(a), Some(b)) => lines.extend(self.differences_or_none(a, b)),
                    _ => lines.push(INSUFFICIENT_DATA.to_string()),
                }
            }
            PairSelection::Companies(pairs) if pairs.is_empty() => {
                lines.push(INSUFFICIENT_DATA.to_string());
            }
            PairSelection::Companies(pairs) => {
                for (i, (left, right)) in pairs.iter().enumerate() {
                    if i > 0 {
                        lines.push(String::new());
                    }
                    lines.push(format!("### {left} vs {right}"));
                    match (find_company(run, left), find_company(run, right)) {
                        (Some(a), Some(b)) => lines.extend(self.differences_or_none(a, b)),
                        _ => lines.push(INSUFFICIENT_DATA.to_string()),
                    }
                }
            }
        }

        lines.push(String::new());
        lines.join("\n")
    }

    /// Difference lines between two records, empty when nothing differs.
    pub fn key_differences(&self, a: &ExtractedRecord, b: &ExtractedRecord) -> Vec<String> {
        let mut diff = Vec::new();

        if differs(&a.price_double, &b.price_double) {
            diff.push(format!(
                "- **מחיר זוגי:** {} {} vs {} {}",
                a.company,
                or_placeholder(a.price_double.as_deref()),
                b.company,
                or_placeholder(b.price_double.as_deref())
            ));
        }

        // Balcony prices are reported without values.
        if differs(&a.price_balcony, &b.price_balcony) {
            diff.push("- **מחיר מרפסת:** שונה בין החברות.".to_string());
        }

        if a.guaranteed_departure != b.guaranteed_departure {
            diff.push("- **טיול מובטח:** מופיע רק אצל אחת החברות.".to_string());
        }

        for inclusion in Inclusion::ALL {
            if a.inclusions.get(inclusion) != b.inclusions.get(inclusion) {
                diff.push(format!("- **{}:** שונה בין החברות.", inclusion.key()));
            }
        }

        debug!(
            "{} vs {}: {} differences",
            a.company,
            b.company,
            diff.len()
        );

        diff
    }

    fn differences_or_none(&self, a: &ExtractedRecord, b: &ExtractedRecord) -> Vec<String> {
        let diff = self.key_differences(a, b);
        if diff.is_empty() {
            vec![NO_DIFFERENCES.to_string()]
        } else {
            diff
        }
    }
}

impl Default for ComparisonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn render_entry(lines: &mut Vec<String>, entry: &RunEntry) {
    lines.push(format!("### {}", entry.company()));

    let Some(ex) = entry.record() else {
        lines.push(format!("- **שגיאה:** {}", entry.error().unwrap_or_default()));
        return;
    };

    lines.push(format!("- **קישור:** {}", entry.url()));
    lines.push(format!("- **מסלול/כותרת:** {}", or_placeholder(ex.route.as_deref())));
    lines.push(format!(
        "- **משך (ימים):** {}",
        ex.duration_days
            .map(|d| d.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    ));
    lines.push(format!("- **מחיר זוגי:** {}", or_placeholder(ex.price_double.as_deref())));
    lines.push(format!("- **מחיר מרפסת:** {}", or_placeholder(ex.price_balcony.as_deref())));
    lines.push(format!("- **טיול מובטח:** {}", yes_no(ex.guaranteed_departure)));

    let discounts = ex.discounts.join(", ");
    lines.push(format!("- **הנחות:** {}", or_placeholder(Some(discounts.as_str()))));

    lines.push("- **כלול:**".to_string());
    for inclusion in Inclusion::ALL {
        lines.push(format!(
            "  - {}: {}",
            inclusion_label(inclusion),
            yes_no(ex.inclusions.get(inclusion))
        ));
    }
}

fn find_company<'a>(run: &'a RunResult, company: &str) -> Option<&'a ExtractedRecord> {
    run.successful().find(|r| r.company == company)
}

/// Either side is set and the normalized strings are not equal.
fn differs(a: &Option<String>, b: &Option<String>) -> bool {
    (a.is_some() || b.is_some()) && a != b
}

fn or_placeholder(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(PLACEHOLDER)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { YES } else { NO_OR_UNKNOWN }
}

fn inclusion_label(inclusion: Inclusion) -> &'static str {
    match inclusion {
        Inclusion::Tips => "טיפים",
        Inclusion::ShoreExcursions => "סיורי חוף",
        Inclusion::IsraeliGuide => "מדריך ישראלי",
        Inclusion::KosherFood => "אוכל כשר",
    }
}
