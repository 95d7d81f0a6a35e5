//! Normalization of captured values and page text.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Collapse line breaks so rules match across reflowed text.
pub fn normalize_text(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

/// Strip thousands separators from a captured price (e.g. "4,500" -> "4500").
///
/// The currency sign is never part of the capture.
pub fn normalize_price(raw: &str) -> String {
    raw.replace(',', "").trim().to_string()
}

/// Whether a normalized price reads as a plain decimal number.
pub fn is_plain_decimal(price: &str) -> bool {
    Decimal::from_str(price).is_ok()
}

/// Parse a captured day count.
pub fn parse_duration(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

/// Truncate to at most `max` characters without splitting a character.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
