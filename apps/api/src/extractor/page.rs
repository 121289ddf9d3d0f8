//! Page snapshots and the text/geometry helpers the strategies share.

use chrono::{DateTime, Utc};
use scraper::ElementRef;
use serde::Deserialize;

/// Attribute the capture script writes with an element's bounding box.
pub const BBOX_ATTR: &str = "data-bbox";

/// A rendered page as captured by the browser side.
#[derive(Debug, Clone, Deserialize)]
pub struct PageContext {
    pub url: String,
    pub html: String,
    #[serde(default = "Utc::now")]
    pub captured_at: DateTime<Utc>,
}

#[cfg(test)]
impl PageContext {
    pub fn new(url: impl Into<String>, html: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            captured_at,
        }
    }
}

/// Bounding box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    /// Parses `"left,top,width,height"`. Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<f64> = raw
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            &[left, top, width, height]
                if [left, top, width, height].iter().all(|v| v.is_finite()) =>
            {
                Some(Self {
                    left,
                    top,
                    width,
                    height,
                })
            }
            _ => None,
        }
    }

    pub fn of(el: &ElementRef<'_>) -> Option<Self> {
        el.value().attr(BBOX_ATTR).and_then(Self::parse)
    }
}

/// Collapses whitespace runs to one space and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `textContent` of an element, whitespace-collapsed.
pub fn element_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// First `max` chars of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Case-insensitive match of `term` in `text` on word boundaries, so
/// "Inc" does not fire on "Incredible" and "lead" does not fire on "leading".
pub fn contains_term(text: &str, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return false;
    }
    let text = text.to_lowercase();
    text.match_indices(&term).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + term.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_geometry_parse() {
        let g = Geometry::parse("640, 120,480,32").unwrap();
        assert_eq!(g.left, 640.0);
        assert_eq!(g.width, 480.0);
        assert!(Geometry::parse("640,120,480").is_none());
        assert!(Geometry::parse("a,b,c,d").is_none());
        assert!(Geometry::parse("").is_none());
    }

    #[test]
    fn test_element_text_collapses_whitespace() {
        let doc = Html::parse_fragment("<h1>\n  Senior   <span>Backend</span>\n Engineer </h1>");
        let sel = Selector::parse("h1").unwrap();
        let h1 = doc.select(&sel).next().unwrap();
        assert_eq!(element_text(&h1), "Senior Backend Engineer");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("Zürich office", 3), "Zür");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_contains_term_word_boundaries() {
        assert!(contains_term("Team Lead", "lead"));
        assert!(contains_term("Acme Robotics Inc.", "Inc"));
        assert!(!contains_term("Incredible Foods", "Inc"));
        assert!(!contains_term("leading the market", "lead"));
        assert!(contains_term("Data Scientist", "data scientist"));
        assert!(!contains_term("anything", "  "));
    }
}
