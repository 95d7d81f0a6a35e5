//! Built-in Hebrew/English patterns for cruise listing pages.

use lazy_static::lazy_static;

use super::catalog::{CatalogDef, FieldDef, PatternCatalog};

/// Field name, discount label and rules, in evaluation order.
const BUILTIN: &[(&str, Option<&str>, &[&str])] = &[
    (
        "guaranteed_departure",
        None,
        &[
            r"טיול\s*מובטח",
            r"מובטח\s*יציאה",
            r"guaranteed\s*departure",
            r"departure\s*guaranteed",
        ],
    ),
    (
        "discount",
        Some("early bird"),
        &[
            r"הנחת\s*הרשמה\s*מוקדמת",
            r"early\s*bird",
            r"הרשמה\s*מוקדמת",
            r"הנחה\s*להזמנה\s*מוקדמת",
        ],
    ),
    (
        "discount",
        Some("last minute"),
        &[r"רגע\s*אחרון", r"last\s*minute", r"דחוף"],
    ),
    (
        "tips",
        None,
        &[r"טיפים\s*כלולים", r"tips\s*included", r"מענק\s*טיפים"],
    ),
    (
        "shore_excursions",
        None,
        &[r"סיורי\s*חוף", r"shore\s*excursions", r"סיורים\s*בנמל"],
    ),
    (
        "israeli_guide",
        None,
        &[
            r"מדריך\s*דובר\s*עברית",
            r"מדריך\s*ישראלי",
            r"Hebrew\s*guide",
            r"מדריך\s*מיומן\s*דובר\s*עברית",
        ],
    ),
    (
        "kosher_food",
        None,
        &[r"כשר", r"kosher", r"אוכל\s*כשר", r"שומרי\s*כשרות"],
    ),
    // Prices: amount next to a currency sign, or labelled per couple.
    (
        "price_double",
        None,
        &[
            r"חדר\s*זוגי[^\d]*(\d[\d,.]*)\s*[₪\$€]",
            r"double\s*room[^\d]*(\d[\d,.]*)\s*[₪\$€]",
            r"מחיר\s*לזוג[^\d]*(\d[\d,.]*)",
            r"(\d[\d,.]*)\s*[₪\$€]\s*לאדם\s*בחדר\s*זוגי",
        ],
    ),
    (
        "price_balcony",
        None,
        &[
            r"מרפסת[^\d]*(\d[\d,.]*)\s*[₪\$€]",
            r"balcony[^\d]*(\d[\d,.]*)\s*[₪\$€]",
            r"(\d[\d,.]*)\s*[₪\$€]\s*מרפסת",
        ],
    ),
    // Nights are a fallback when the page never states days. ASCII digits only.
    (
        "duration_days",
        None,
        &[
            r"([0-9]+)\s*ימים",
            r"([0-9]+)\s*days",
            r"([0-9]+)\s*לילות",
            r"([0-9]+)\s*nights",
        ],
    ),
];

lazy_static! {
    pub static ref DEFAULT_CATALOG: PatternCatalog =
        PatternCatalog::from_definition(&CatalogDef::builtin())
            .expect("built-in pattern catalog is valid");
}

impl CatalogDef {
    /// Definition of the built-in catalog, e.g. as a starting point for a custom one.
    pub fn builtin() -> Self {
        Self {
            fields: BUILTIN
                .iter()
                .map(|(field, label, patterns)| FieldDef {
                    field: (*field).to_string(),
                    label: label.map(str::to_string),
                    patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
                })
                .collect(),
        }
    }
}
