//! Output files and human-readable record rendering.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use tracing::debug;

use cruisecmp_core::{ExtractedRecord, Inclusion, RunEntry, RunResult};

pub const RESULTS_FILE: &str = "results.json";
pub const REPORT_FILE: &str = "cruise_comparison.md";
pub const SUMMARY_FILE: &str = "summary.csv";

/// Paths written for one scan.
#[derive(Debug, Default)]
pub struct WrittenFiles {
    pub results: PathBuf,
    pub report: PathBuf,
    pub summary: Option<PathBuf>,
}

/// Write the run, its report, and optionally the CSV summary into `dir`.
pub fn write_scan_outputs(
    dir: &Path,
    run: &RunResult,
    report: &str,
    summary: bool,
) -> anyhow::Result<WrittenFiles> {
    fs::create_dir_all(dir)?;

    let results = dir.join(RESULTS_FILE);
    run.save(&results)?;
    debug!("Wrote {}", results.display());

    let report_path = dir.join(REPORT_FILE);
    fs::write(&report_path, report)?;
    debug!("Wrote {}", report_path.display());

    let summary = if summary {
        let path = dir.join(SUMMARY_FILE);
        write_summary(&path, run)?;
        Some(path)
    } else {
        None
    };

    Ok(WrittenFiles {
        results,
        report: report_path,
        summary,
    })
}

/// One CSV row per run entry.
pub fn write_summary(path: &Path, run: &RunResult) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec![
        "company",
        "status",
        "url",
        "scraped_at",
        "route",
        "duration_days",
        "price_double",
        "price_balcony",
        "guaranteed_departure",
        "discounts",
    ];
    header.extend(Inclusion::ALL.iter().map(|i| i.key()));
    header.push("error");
    wtr.write_record(&header)?;

    for entry in &run.entries {
        let scraped_at = entry
            .scraped_at()
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut row = vec![
            entry.company().to_string(),
            String::new(),
            entry.url().to_string(),
            scraped_at,
        ];

        match entry {
            RunEntry::Extracted(source) => {
                let record = &source.extracted;
                row[1] = "ok".to_string();
                row.extend([
                    record.route.clone().unwrap_or_default(),
                    record
                        .duration_days
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    record.price_double.clone().unwrap_or_default(),
                    record.price_balcony.clone().unwrap_or_default(),
                    record.guaranteed_departure.to_string(),
                    record.discounts.join("; "),
                ]);
                row.extend(
                    Inclusion::ALL
                        .iter()
                        .map(|i| record.inclusions.get(*i).to_string()),
                );
                row.push(String::new());
            }
            RunEntry::Failed(failure) => {
                row[1] = "error".to_string();
                row.extend(std::iter::repeat_n(String::new(), 6 + Inclusion::ALL.len()));
                row.push(failure.error.clone());
            }
        }

        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Plain text rendering of a single record.
pub fn format_record_text(record: &ExtractedRecord) -> String {
    let mut output = String::new();
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_string();

    output.push_str(&format!("Company: {}\n", record.company));
    output.push_str(&format!("Route: {}\n", or_dash(record.route.as_deref())));
    output.push_str(&format!(
        "Duration (days): {}\n",
        record
            .duration_days
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!(
        "Price (double): {}\n",
        or_dash(record.price_double.as_deref())
    ));
    output.push_str(&format!(
        "Price (balcony): {}\n",
        or_dash(record.price_balcony.as_deref())
    ));
    output.push_str(&format!(
        "Guaranteed departure: {}\n",
        if record.guaranteed_departure { "yes" } else { "no" }
    ));
    if record.discounts.is_empty() {
        output.push_str("Discounts: -\n");
    } else {
        output.push_str(&format!("Discounts: {}\n", record.discounts.join(", ")));
    }

    output.push_str("Included:\n");
    for inclusion in Inclusion::ALL {
        output.push_str(&format!(
            "  {}: {}\n",
            inclusion.key(),
            if record.inclusions.get(inclusion) { "yes" } else { "no" }
        ));
    }

    if !record.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &record.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use cruisecmp_core::{FetchFailure, SourceRecord};
    use chrono::Utc;

    fn sample_run() -> RunResult {
        let mut record = ExtractedRecord::new("Mano Maritime");
        record.price_double = Some("4500".to_string());
        record.discounts = vec!["early bird".to_string(), "last minute".to_string()];
        record.inclusions.kosher_food = true;

        RunResult::new(vec![
            RunEntry::Extracted(SourceRecord {
                url: "https://mano.example".to_string(),
                scraped_at: Utc::now(),
                extracted: record,
                raw_text_preview: String::new(),
            }),
            RunEntry::Failed(FetchFailure {
                company: "Massaot".to_string(),
                url: "https://massaot.example".to_string(),
                scraped_at: Utc::now(),
                error: "timeout".to_string(),
            }),
        ])
    }

    #[test]
    fn test_summary_rows_align_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SUMMARY_FILE);
        write_summary(&path, &sample_run()).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let header_len = rdr.headers().unwrap().len();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == header_len));
        assert_eq!(&rows[0][1], "ok");
        assert_eq!(&rows[0][6], "4500");
        assert_eq!(&rows[0][9], "early bird; last minute");
        assert_eq!(&rows[1][1], "error");
        assert_eq!(&rows[1][header_len - 1], "timeout");
    }

    #[test]
    fn test_write_scan_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let written = write_scan_outputs(&out, &sample_run(), "# report\n", false).unwrap();

        assert!(written.results.exists());
        assert_eq!(fs::read_to_string(&written.report).unwrap(), "# report\n");
        assert!(written.summary.is_none());

        let loaded = RunResult::from_file(&written.results).unwrap();
        assert_eq!(loaded.entries.len(), 2);
    }

    #[test]
    fn test_format_record_text() {
        let mut record = ExtractedRecord::new("Cruise Tour");
        record.guaranteed_departure = true;
        record.warnings.push("price_double: 'x' is not a plain decimal".to_string());

        let text = format_record_text(&record);
        assert!(text.starts_with("Company: Cruise Tour\n"));
        assert!(text.contains("Guaranteed departure: yes\n"));
        assert!(text.contains("  kosher_food: no\n"));
        assert!(text.contains("Warnings:\n  - price_double"));
    }
}
