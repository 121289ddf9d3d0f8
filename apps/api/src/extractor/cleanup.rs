//! Cleanup and validation applied once, after the strategy chain.
//!
//! A value that fails its bound is discarded, never truncated. The one
//! exception is the description cap, which bounds prompt size downstream.

use crate::extractor::config::LengthRange;
use crate::extractor::page::{char_len, collapse_whitespace, truncate_chars};

fn keep_only(raw: &str, allowed: impl Fn(char) -> bool) -> String {
    let collapsed = collapse_whitespace(raw);
    let stripped: String = collapsed.chars().filter(|&c| allowed(c)).collect();
    collapse_whitespace(&stripped)
}

fn bounded(value: String, bounds: LengthRange) -> String {
    if value.is_empty() || bounds.contains(char_len(&value)) {
        value
    } else {
        String::new()
    }
}

/// Letters, digits, spaces and hyphens only; then `bounds`.
pub fn clean_title(raw: &str, bounds: LengthRange) -> String {
    let cleaned = keep_only(raw, |c| c.is_ascii_alphanumeric() || c == ' ' || c == '-');
    bounded(cleaned, bounds)
}

/// As for titles, plus `.` and `,`.
pub fn clean_company(raw: &str, bounds: LengthRange) -> String {
    let cleaned = keep_only(raw, |c| {
        c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '.' | ',')
    });
    bounded(cleaned, bounds)
}

/// Collapses whitespace and caps at `cap` chars. Text shorter than
/// `min_len` is not description-like and is dropped.
pub fn clean_description(raw: &str, min_len: usize, cap: usize) -> String {
    let collapsed = collapse_whitespace(raw);
    if char_len(&collapsed) < min_len {
        return String::new();
    }
    let capped = truncate_chars(&collapsed, cap).trim_end().to_string();
    if char_len(&capped) < min_len {
        return String::new();
    }
    capped
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE: LengthRange = LengthRange::new(5, 100);
    const COMPANY: LengthRange = LengthRange::new(2, 50);

    #[test]
    fn test_title_strips_punctuation_and_collapses() {
        assert_eq!(
            clean_title("  Senior   Backend Engineer (Remote) ★ ", TITLE),
            "Senior Backend Engineer Remote"
        );
        assert_eq!(clean_title("Data & ML - Lead", TITLE), "Data ML - Lead");
    }

    #[test]
    fn test_title_outside_bounds_is_discarded_not_truncated() {
        assert_eq!(clean_title("QA", TITLE), "");
        assert_eq!(clean_title(&"Engineer ".repeat(20), TITLE), "");
    }

    #[test]
    fn test_title_non_ascii_letters_are_stripped() {
        assert_eq!(clean_title("Ingénieur Logiciel", TITLE), "Ingnieur Logiciel");
    }

    #[test]
    fn test_company_keeps_dots_and_commas() {
        assert_eq!(clean_company(" Acme, Inc. ™", COMPANY), "Acme, Inc.");
        assert_eq!(clean_company("X", COMPANY), "");
        assert_eq!(clean_company(&"A".repeat(51), COMPANY), "");
        assert_eq!(clean_company(&"A".repeat(50), COMPANY).len(), 50);
    }

    #[test]
    fn test_description_floor_and_cap() {
        assert_eq!(clean_description(&"word ".repeat(10), 100, 2000), "");
        let long = "experience ".repeat(300);
        let cleaned = clean_description(&long, 100, 2000);
        assert!(char_len(&cleaned) <= 2000);
        assert!(char_len(&cleaned) >= 100);
        assert!(!cleaned.ends_with(' '));
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert_eq!(clean_title("", TITLE), "");
        assert_eq!(clean_company("   ", COMPANY), "");
        assert_eq!(clean_description("", 100, 2000), "");
    }
}
