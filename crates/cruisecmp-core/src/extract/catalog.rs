//! Pattern catalog: semantic fields mapped to ordered recognition rules.

use std::fmt;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::models::record::Inclusion;

/// A semantic attribute the extractor can fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Departure is guaranteed regardless of bookings.
    GuaranteedDeparture,
    /// A discount kind, reported under its label.
    Discount(String),
    /// One of the inclusion flags.
    Inclusion(Inclusion),
    /// Trip length; rules capture the number of days.
    DurationDays,
    /// Double-occupancy price; rules capture the amount.
    PriceDouble,
    /// Balcony cabin price; rules capture the amount.
    PriceBalcony,
}

impl Field {
    /// Resolve a field from its catalog name.
    pub fn parse(name: &str, label: Option<&str>) -> Result<Self, CatalogError> {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "guaranteed_departure" => Ok(Field::GuaranteedDeparture),
            "discount" => {
                let label = label
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .ok_or(CatalogError::MissingLabel)?;
                Ok(Field::Discount(label.to_string()))
            }
            // Discount labels are also accepted as field names.
            "early_bird" | "last_minute" => Ok(Field::Discount(name.replace('_', " "))),
            "duration_days" => Ok(Field::DurationDays),
            "price_double" => Ok(Field::PriceDouble),
            "price_balcony" => Ok(Field::PriceBalcony),
            other => Inclusion::from_key(other)
                .map(Field::Inclusion)
                .ok_or_else(|| CatalogError::UnknownField(other.to_string())),
        }
    }

    /// Catalog name of the field.
    pub fn name(&self) -> &str {
        match self {
            Field::GuaranteedDeparture => "guaranteed_departure",
            Field::Discount(_) => "discount",
            Field::Inclusion(inclusion) => inclusion.key(),
            Field::DurationDays => "duration_days",
            Field::PriceDouble => "price_double",
            Field::PriceBalcony => "price_balcony",
        }
    }

    /// Whether rules for this field must capture a value.
    pub fn captures(&self) -> bool {
        matches!(
            self,
            Field::DurationDays | Field::PriceDouble | Field::PriceBalcony
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Discount(label) => write!(f, "discount ({label})"),
            other => f.write_str(other.name()),
        }
    }
}

/// A single case-insensitive recognition rule.
#[derive(Debug, Clone)]
pub struct Rule {
    source: String,
    regex: Regex,
}

/// A successful application of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    /// Rule text as declared in the catalog.
    pub rule: &'a str,
    /// First capture group, when the rule has one and it participated.
    pub capture: Option<&'a str>,
}

impl Rule {
    /// Compile a rule for `field`.
    pub fn new(field: &Field, pattern: &str) -> Result<Self, CatalogError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| CatalogError::InvalidPattern {
                field: field.to_string(),
                pattern: pattern.to_string(),
                source,
            })?;

        // captures_len counts the implicit whole-match group.
        if field.captures() && regex.captures_len() < 2 {
            return Err(CatalogError::MissingCaptureGroup {
                field: field.to_string(),
                pattern: pattern.to_string(),
            });
        }

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Apply the rule to already-normalized text.
    pub fn apply<'a>(&'a self, text: &'a str) -> Option<RuleMatch<'a>> {
        let caps = self.regex.captures(text)?;
        Some(RuleMatch {
            rule: &self.source,
            capture: caps.get(1).map(|m| m.as_str()),
        })
    }
}

/// A field together with its rules in priority order.
#[derive(Debug, Clone)]
pub struct FieldPatterns {
    pub field: Field,
    pub rules: Vec<Rule>,
}

impl FieldPatterns {
    /// First rule that matches, in declared order.
    pub fn first_match<'a>(&'a self, text: &'a str) -> Option<RuleMatch<'a>> {
        self.rules.iter().find_map(|rule| rule.apply(text))
    }
}

/// Immutable table of fields and their recognition rules.
///
/// Fields are evaluated independently and in declaration order; within a
/// field the first matching rule wins.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    fields: Vec<FieldPatterns>,
}

impl PatternCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field with its rules, builder style.
    pub fn with_field<I, S>(mut self, field: Field, patterns: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.push(field, patterns)?;
        Ok(self)
    }

    /// Add a field with its rules.
    pub fn push<I, S>(&mut self, field: Field, patterns: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.fields.iter().any(|f| f.field == field) {
            return Err(CatalogError::DuplicateField(field.to_string()));
        }

        let rules = patterns
            .into_iter()
            .map(|p| Rule::new(&field, p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if rules.is_empty() {
            return Err(CatalogError::Empty(field.to_string()));
        }

        self.fields.push(FieldPatterns { field, rules });
        Ok(())
    }

    /// Build a catalog from its serializable definition.
    pub fn from_definition(def: &CatalogDef) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for entry in &def.fields {
            let field = Field::parse(&entry.field, entry.label.as_deref())?;
            catalog.push(field, &entry.patterns)?;
        }
        Ok(catalog)
    }

    pub fn fields(&self) -> &[FieldPatterns] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for PatternCatalog {
    /// The built-in Hebrew/English catalog.
    fn default() -> Self {
        super::patterns::DEFAULT_CATALOG.clone()
    }
}

/// Serializable catalog definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDef {
    pub fields: Vec<FieldDef>,
}

/// One field entry of a catalog definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, e.g. `price_double` or `discount`.
    pub field: String,

    /// Label for discount entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Rules in priority order.
    pub patterns: Vec<String>,
}

impl CatalogDef {
    /// Load a definition from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_parse() {
        assert_eq!(
            Field::parse("guaranteed_departure", None).unwrap(),
            Field::GuaranteedDeparture
        );
        assert_eq!(
            Field::parse("discount", Some("early bird")).unwrap(),
            Field::Discount("early bird".to_string())
        );
        assert_eq!(
            Field::parse("last_minute", None).unwrap(),
            Field::Discount("last minute".to_string())
        );
        assert_eq!(
            Field::parse("kosher", None).unwrap(),
            Field::Inclusion(Inclusion::KosherFood)
        );
        assert!(matches!(
            Field::parse("discount", None),
            Err(CatalogError::MissingLabel)
        ));
        assert!(matches!(
            Field::parse("cabin_size", None),
            Err(CatalogError::UnknownField(_))
        ));
    }

    #[test]
    fn test_rule_is_case_insensitive() {
        let rule = Rule::new(&Field::GuaranteedDeparture, r"guaranteed\s*departure").unwrap();
        let m = rule.apply("GUARANTEED Departure on all dates").unwrap();
        assert_eq!(m.rule, r"guaranteed\s*departure");
        assert_eq!(m.capture, None);
    }

    #[test]
    fn test_capturing_rule_requires_group() {
        let err = Rule::new(&Field::PriceDouble, r"double\s*room").unwrap_err();
        assert!(matches!(err, CatalogError::MissingCaptureGroup { .. }));

        let rule = Rule::new(&Field::DurationDays, r"(\d+)\s*days").unwrap();
        assert_eq!(rule.apply("a 12 days trip").unwrap().capture, Some("12"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Rule::new(&Field::Inclusion(Inclusion::Tips), r"tips(").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPattern { .. }));
    }

    #[test]
    fn test_first_rule_wins() {
        let catalog = PatternCatalog::new()
            .with_field(Field::DurationDays, [r"(\d+)\s*days", r"(\d+)\s*nights"])
            .unwrap();
        let entry = &catalog.fields()[0];

        // Later rule appears first in the text but the earlier rule still wins.
        let m = entry.first_match("7 nights / 8 days").unwrap();
        assert_eq!(m.capture, Some("8"));
        assert_eq!(m.rule, r"(\d+)\s*days");

        let m = entry.first_match("7 nights").unwrap();
        assert_eq!(m.capture, Some("7"));
    }

    #[test]
    fn test_duplicate_and_empty_fields_rejected() {
        let catalog = PatternCatalog::new()
            .with_field(Field::PriceDouble, [r"(\d+)"])
            .unwrap();
        assert!(matches!(
            catalog.with_field(Field::PriceDouble, [r"x(\d+)"]),
            Err(CatalogError::DuplicateField(_))
        ));

        let empty: [&str; 0] = [];
        assert!(matches!(
            PatternCatalog::new().with_field(Field::GuaranteedDeparture, empty),
            Err(CatalogError::Empty(_))
        ));
    }

    #[test]
    fn test_from_definition_json() {
        let def: CatalogDef = serde_json::from_str(
            r#"{"fields": [
                {"field": "discount", "label": "family", "patterns": ["kids\\s*free"]},
                {"field": "price_double", "patterns": ["from\\s*(\\d+)"]}
            ]}"#,
        )
        .unwrap();

        let catalog = PatternCatalog::from_definition(&def).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.fields()[0].field, Field::Discount("family".to_string()));
        assert_eq!(catalog.fields()[1].field, Field::PriceDouble);
    }
}
