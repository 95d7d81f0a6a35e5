//! Field extraction from listing page text.

pub mod catalog;
mod extractor;
pub mod patterns;
pub mod values;

pub use catalog::{CatalogDef, Field, FieldDef, FieldPatterns, PatternCatalog, Rule, RuleMatch};
pub use extractor::TripExtractor;

use crate::models::record::ExtractedRecord;

/// Trait for turning page text into a record.
///
/// Implementations never fail: a field the text does not mention keeps its
/// default value.
pub trait RecordExtractor {
    /// Extract a record from page text and an optional page title.
    fn extract_page(&self, text: &str, title: Option<&str>, company: &str) -> ExtractedRecord;

    /// Extract a record from page text alone.
    fn extract(&self, text: &str, company: &str) -> ExtractedRecord {
        self.extract_page(text, None, company)
    }
}
