//! Catalog-driven trip extractor.

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::record::ExtractedRecord;

use super::catalog::{Field, PatternCatalog, RuleMatch};
use super::values::{is_plain_decimal, normalize_price, normalize_text, parse_duration, truncate_chars};
use super::RecordExtractor;

/// Applies a [`PatternCatalog`] to page text.
#[derive(Debug, Clone)]
pub struct TripExtractor {
    catalog: PatternCatalog,
    /// Audit snippets kept per record.
    max_snippets: usize,
    /// Route/title length limit in characters.
    route_max_chars: usize,
}

impl TripExtractor {
    /// Create an extractor over the given catalog with default limits.
    pub fn new(catalog: PatternCatalog) -> Self {
        let defaults = ExtractionConfig::default();
        Self {
            catalog,
            max_snippets: defaults.max_snippets,
            route_max_chars: defaults.route_max_chars,
        }
    }

    /// Create an extractor with limits taken from configuration.
    pub fn from_config(catalog: PatternCatalog, config: &ExtractionConfig) -> Self {
        Self::new(catalog)
            .with_max_snippets(config.max_snippets)
            .with_route_max_chars(config.route_max_chars)
    }

    pub fn with_max_snippets(mut self, max: usize) -> Self {
        self.max_snippets = max;
        self
    }

    pub fn with_route_max_chars(mut self, max: usize) -> Self {
        self.route_max_chars = max;
        self
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    fn apply_match(&self, record: &mut ExtractedRecord, field: &Field, m: RuleMatch<'_>) {
        match field {
            Field::GuaranteedDeparture => {
                record.guaranteed_departure = true;
                self.push_snippet(record, field, m.rule);
            }
            Field::Discount(label) => {
                record.discounts.push(label.clone());
                self.push_snippet(record, field, m.rule);
            }
            Field::Inclusion(inclusion) => {
                record.inclusions.set(*inclusion);
                self.push_snippet(record, field, m.rule);
            }
            Field::DurationDays => {
                let Some(raw) = m.capture else {
                    record.warnings.push(format!("{field}: rule {} captured nothing", m.rule));
                    return;
                };
                record.duration_days = parse_duration(raw);
                if record.duration_days.is_none() {
                    record
                        .warnings
                        .push(format!("{field}: '{raw}' is not a day count"));
                }
            }
            Field::PriceDouble | Field::PriceBalcony => {
                let Some(raw) = m.capture else {
                    record.warnings.push(format!("{field}: rule {} captured nothing", m.rule));
                    return;
                };
                let price = normalize_price(raw);
                if price.is_empty() {
                    record.warnings.push(format!("{field}: rule {} captured no amount", m.rule));
                    return;
                }
                if !is_plain_decimal(&price) {
                    record
                        .warnings
                        .push(format!("{field}: '{price}' is not a plain decimal"));
                }
                if *field == Field::PriceDouble {
                    record.price_double = Some(price);
                } else {
                    record.price_balcony = Some(price);
                }
            }
        }
    }

    fn push_snippet(&self, record: &mut ExtractedRecord, field: &Field, rule: &str) {
        if record.raw_snippets.len() < self.max_snippets {
            record.raw_snippets.push(format!("{field}: {rule}"));
        }
    }
}

impl Default for TripExtractor {
    fn default() -> Self {
        Self::new(PatternCatalog::default())
    }
}

impl RecordExtractor for TripExtractor {
    fn extract_page(&self, text: &str, title: Option<&str>, company: &str) -> ExtractedRecord {
        let text = normalize_text(text);
        let mut record = ExtractedRecord::new(company);

        record.route = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| truncate_chars(t, self.route_max_chars));

        for entry in self.catalog.fields() {
            if let Some(m) = entry.first_match(&text) {
                debug!("{}: {} matched {}", company, entry.field, m.rule);
                self.apply_match(&mut record, &entry.field, m);
            }
        }

        debug!(
            "Extracted record for {}: {} snippets, {} discounts, {} warnings",
            company,
            record.raw_snippets.len(),
            record.discounts.len(),
            record.warnings.len()
        );

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{Inclusion, Inclusions};
    use crate::report::ComparisonBuilder;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> ExtractedRecord {
        TripExtractor::default().extract(text, "Mano Maritime")
    }

    #[test]
    fn test_guaranteed_departure_only() {
        let record = extract("טיול מובטח");

        let mut expected = ExtractedRecord::new("Mano Maritime");
        expected.guaranteed_departure = true;
        expected.raw_snippets = vec![r"guaranteed_departure: טיול\s*מובטח".to_string()];

        assert_eq!(record, expected);
    }

    #[test]
    fn test_discounts_in_catalog_order() {
        let record = extract("Book now: last minute cabins! Early bird pricing ends soon");
        assert_eq!(record.discounts, vec!["early bird", "last minute"]);
    }

    #[test]
    fn test_price_double_strips_separators() {
        let record = extract("מחיר לזוג 4,500 ₪");
        assert_eq!(record.price_double.as_deref(), Some("4500"));
        assert!(record.price_balcony.is_none());
        assert!(record.warnings.is_empty());
    }

    #[test]
    fn test_prices_and_duration() {
        let text = "שייט ל-12 ימים\nחדר זוגי החל מ- 2,990 $\nמרפסת: 3,490 $";
        let record = extract(text);

        assert_eq!(record.duration_days, Some(12));
        assert_eq!(record.price_double.as_deref(), Some("2990"));
        assert_eq!(record.price_balcony.as_deref(), Some("3490"));
    }

    #[test]
    fn test_nights_fallback() {
        let record = extract("Mediterranean cruise, 7 nights");
        assert_eq!(record.duration_days, Some(7));
    }

    #[test]
    fn test_no_duration_phrase() {
        let record = extract("קרוז ליוון ולאיטליה");
        assert!(record.duration_days.is_none());
    }

    #[test]
    fn test_matches_across_line_breaks() {
        let record = extract("guaranteed\r\ndeparture and Hebrew\nguide on board");
        assert!(record.guaranteed_departure);
        assert!(record.inclusions.israeli_guide);
    }

    #[test]
    fn test_inclusions() {
        let record = extract("טיפים כלולים, סיורי חוף, מדריך דובר עברית ואוכל כשר");
        assert_eq!(
            record.inclusions,
            Inclusions {
                tips: true,
                shore_excursions: true,
                israeli_guide: true,
                kosher_food: true,
            }
        );
        for inclusion in Inclusion::ALL {
            assert!(record.inclusions.get(inclusion));
        }
    }

    #[test]
    fn test_extract_is_idempotent() {
        let text = "Early bird! 10 days, double room 1,200 € tips included";
        let extractor = TripExtractor::default();
        assert_eq!(
            extractor.extract(text, "Massaot"),
            extractor.extract(text, "Massaot")
        );
    }

    #[test]
    fn test_route_from_title() {
        let extractor = TripExtractor::default().with_route_max_chars(10);
        let record = extractor.extract_page("", Some("  קרוז לפיורדים הנורבגיים  "), "Cruise Tour");
        assert_eq!(record.route.as_deref(), Some("קרוז לפיור"));

        let record = extractor.extract_page("", Some("   "), "Cruise Tour");
        assert!(record.route.is_none());
    }

    #[test]
    fn test_snippets_are_bounded() {
        let extractor = TripExtractor::default().with_max_snippets(2);
        let record = extractor.extract(
            "guaranteed departure, early bird, last minute, tips included",
            "Massaot",
        );
        assert_eq!(record.raw_snippets.len(), 2);
        assert!(record.inclusions.tips);
    }

    #[test]
    fn test_malformed_values_degrade() {
        let catalog = PatternCatalog::new()
            .with_field(Field::DurationDays, [r"(\d+)\s*days"])
            .unwrap()
            .with_field(Field::PriceDouble, [r"price\s*(\S+)"])
            .unwrap();
        let extractor = TripExtractor::new(catalog);

        let record = extractor.extract("99999999999999999999 days, price 1.200.50", "X");
        assert!(record.duration_days.is_none());
        assert_eq!(record.price_double.as_deref(), Some("1.200.50"));
        assert_eq!(record.warnings.len(), 2);
    }

    #[test]
    fn test_empty_price_capture_stays_null() {
        let catalog = PatternCatalog::new()
            .with_field(Field::PriceDouble, [r"price\s*([\d,]*)"])
            .unwrap();
        let extractor = TripExtractor::new(catalog);

        let a = extractor.extract("price on request", "A");
        assert!(a.price_double.is_none());
        assert_eq!(a.warnings.len(), 1);

        let b = extractor.extract("nothing here", "B");
        assert!(ComparisonBuilder::new().key_differences(&a, &b).is_empty());
    }

    #[test]
    fn test_synthetic_catalog() {
        let catalog = PatternCatalog::new()
            .with_field(Field::Discount("family".to_string()), [r"kids\s*sail\s*free"])
            .unwrap();
        let record = TripExtractor::new(catalog).extract("Kids sail FREE in August", "X");

        assert_eq!(record.discounts, vec!["family"]);
        assert!(!record.guaranteed_departure);
        assert_eq!(record.raw_snippets, vec![r"discount (family): kids\s*sail\s*free"]);
    }
}
