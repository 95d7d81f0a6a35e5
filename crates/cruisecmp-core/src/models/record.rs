//! Structured trip attributes extracted from a single listing page.

use serde::{Deserialize, Serialize};

/// Trip attributes extracted from one source page.
///
/// Every field is always present; a field the page does not mention keeps its
/// default (`None`, `false` or empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Company identifier as configured for the source.
    pub company: String,

    /// Route or page title.
    pub route: Option<String>,

    /// Trip length in days (nights are accepted as a fallback).
    pub duration_days: Option<u32>,

    /// Price per person in a double cabin, thousands separators removed.
    pub price_double: Option<String>,

    /// Price for a balcony cabin, thousands separators removed.
    pub price_balcony: Option<String>,

    /// Whether the page advertises a guaranteed departure.
    #[serde(default)]
    pub guaranteed_departure: bool,

    /// Discount labels in catalog order.
    #[serde(default)]
    pub discounts: Vec<String>,

    /// What the price includes.
    #[serde(default)]
    pub inclusions: Inclusions,

    /// Audit trail of which rule fired for which presence field.
    #[serde(default)]
    pub raw_snippets: Vec<String>,

    /// Values that were captured but look malformed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ExtractedRecord {
    /// Create a record with every field at its default.
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            route: None,
            duration_days: None,
            price_double: None,
            price_balcony: None,
            guaranteed_departure: false,
            discounts: Vec::new(),
            inclusions: Inclusions::default(),
            raw_snippets: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Inclusion flags tracked for every trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inclusions {
    pub tips: bool,
    pub shore_excursions: bool,
    pub israeli_guide: bool,
    pub kosher_food: bool,
}

impl Inclusions {
    pub fn get(&self, inclusion: Inclusion) -> bool {
        match inclusion {
            Inclusion::Tips => self.tips,
            Inclusion::ShoreExcursions => self.shore_excursions,
            Inclusion::IsraeliGuide => self.israeli_guide,
            Inclusion::KosherFood => self.kosher_food,
        }
    }

    pub fn set(&mut self, inclusion: Inclusion) {
        match inclusion {
            Inclusion::Tips => self.tips = true,
            Inclusion::ShoreExcursions => self.shore_excursions = true,
            Inclusion::IsraeliGuide => self.israeli_guide = true,
            Inclusion::KosherFood => self.kosher_food = true,
        }
    }
}

/// One of the four inclusion flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inclusion {
    /// Gratuities are part of the price.
    Tips,
    /// Organized shore excursions.
    ShoreExcursions,
    /// Hebrew-speaking guide on board.
    IsraeliGuide,
    /// Kosher food.
    KosherFood,
}

impl Inclusion {
    /// All flags in report order.
    pub const ALL: [Inclusion; 4] = [
        Inclusion::Tips,
        Inclusion::ShoreExcursions,
        Inclusion::IsraeliGuide,
        Inclusion::KosherFood,
    ];

    /// Stable key used in JSON, catalogs and report lines.
    pub fn key(self) -> &'static str {
        match self {
            Inclusion::Tips => "tips",
            Inclusion::ShoreExcursions => "shore_excursions",
            Inclusion::IsraeliGuide => "israeli_guide",
            Inclusion::KosherFood => "kosher_food",
        }
    }

    /// Parse a key, accepting the short `kosher` alias.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "tips" => Some(Inclusion::Tips),
            "shore_excursions" => Some(Inclusion::ShoreExcursions),
            "israeli_guide" | "hebrew_guide" => Some(Inclusion::IsraeliGuide),
            "kosher_food" | "kosher" => Some(Inclusion::KosherFood),
            _ => None,
        }
    }
}
