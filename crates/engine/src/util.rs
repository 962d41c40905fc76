//! Internal helpers for parsing and matching imported data.
//!
//! These utilities are **not** part of the public API.

use chrono::NaiveDate;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Parse a `YYYY-MM-DD` date and return a labeled error on failure.
pub(crate) fn parse_date(value: &str, label: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| EngineError::InvalidDate(format!("{label}: '{}' ({err})", value.trim())))
}

/// Matching key for a participant name: accents stripped, case folded,
/// whitespace collapsed. `None` for blank input.
pub(crate) fn name_key(input: &str) -> Option<String> {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in input.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_whitespace() {
            if !out.is_empty() && !prev_space {
                out.push(' ');
                prev_space = true;
            }
            continue;
        }
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
        prev_space = false;
    }
    let normalized = out.trim_end();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_key_ignores_case_accents_and_spacing() {
        assert_eq!(name_key("  Amélie  Dupont "), Some("amelie dupont".to_string()));
        assert_eq!(name_key("SHO"), name_key("sho"));
        assert_eq!(name_key("   "), None);
    }

    #[test]
    fn parse_date_labels_failures() {
        assert!(parse_date("2025-10-16", "arrival").is_ok());
        let err = parse_date("16/10/2025", "arrival").unwrap_err();
        assert!(matches!(err, EngineError::InvalidDate(msg) if msg.starts_with("arrival: '16/10/2025'")));
    }
}
