//! The five extraction strategies, in precedence order.
//!
//! Each strategy only looks for fields that are still empty, and within a
//! strategy the first matching candidate wins. Nothing here scores or ranks
//! candidates against each other.

use std::fmt;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::extractor::config::{ExtractorConfig, Placement};
use crate::extractor::page::{char_len, contains_term, element_text, Geometry};
use crate::extractor::SelectorSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Company,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Title => "title",
            Field::Company => "company",
            Field::Description => "description",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    StructuredSelector,
    HeuristicVisibility,
    IdentifierScoped,
    KeywordDensity,
    LastResort,
}

impl Strategy {
    pub const CHAIN: [Strategy; 5] = [
        Strategy::StructuredSelector,
        Strategy::HeuristicVisibility,
        Strategy::IdentifierScoped,
        Strategy::KeywordDensity,
        Strategy::LastResort,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::StructuredSelector => "structured_selector",
            Strategy::HeuristicVisibility => "heuristic_visibility",
            Strategy::IdentifierScoped => "identifier_scoped",
            Strategy::KeywordDensity => "keyword_density",
            Strategy::LastResort => "last_resort",
        }
    }

    pub fn apply(self, ctx: &Ctx<'_>, found: &mut Candidates) {
        match self {
            Strategy::StructuredSelector => structured_selector(ctx, found),
            Strategy::HeuristicVisibility => heuristic_visibility(ctx, found),
            Strategy::IdentifierScoped => identifier_scoped(ctx, found),
            Strategy::KeywordDensity => keyword_density(ctx, found),
            Strategy::LastResort => last_resort(ctx, found),
        }
    }
}

/// Read-only view of one extraction call.
pub struct Ctx<'a> {
    pub doc: &'a Html,
    pub selectors: &'a SelectorSet,
    pub config: &'a ExtractorConfig,
    pub job_id: &'a str,
}

/// Raw (pre-cleanup) values resolved so far.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Candidates {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
}

impl Candidates {
    pub fn is_complete(&self) -> bool {
        self.title.is_some() && self.company.is_some() && self.description.is_some()
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Company => &mut self.company,
            Field::Description => &mut self.description,
        }
    }

    fn wants(&self, field: Field) -> bool {
        match field {
            Field::Title => self.title.is_none(),
            Field::Company => self.company.is_none(),
            Field::Description => self.description.is_none(),
        }
    }

    /// Fills `field` if it is still empty. Earlier strategies always win.
    fn offer(&mut self, field: Field, strategy: Strategy, value: Option<String>) {
        let slot = self.slot(field);
        if slot.is_some() {
            return;
        }
        match value {
            Some(text) => {
                debug!(strategy = strategy.name(), %field, chars = char_len(&text), "candidate accepted");
                *slot = Some(text);
            }
            None => debug!(strategy = strategy.name(), %field, "no candidate"),
        }
    }
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .map(|el| element_text(&el))
        .find(|text| !text.is_empty())
}

fn first_text_in_order(scope: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|sel| first_text(scope, sel))
}

fn first_present<'a>(doc: &'a Html, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|sel| doc.select(sel).next())
}

fn placed(el: &ElementRef<'_>, rule: &Placement) -> bool {
    Geometry::of(el).is_some_and(|g| {
        g.left > rule.min_left && g.width > rule.min_width && g.height > rule.min_height
    })
}

// ── 1. structured selectors ────────────────────────────────────────────────

fn structured_selector(ctx: &Ctx<'_>, found: &mut Candidates) {
    let scope = first_present(ctx.doc, &ctx.selectors.main_content)
        .unwrap_or_else(|| ctx.doc.root_element());
    let strategy = Strategy::StructuredSelector;

    if found.wants(Field::Title) {
        let title = first_text_in_order(scope, &ctx.selectors.title);
        found.offer(Field::Title, strategy, title);
    }
    if found.wants(Field::Company) {
        let company = first_text_in_order(scope, &ctx.selectors.company);
        found.offer(Field::Company, strategy, company);
    }
    if found.wants(Field::Description) {
        let min = ctx.config.description_min_length;
        let description = ctx.selectors.description.iter().find_map(|sel| {
            scope
                .select(sel)
                .map(|el| element_text(&el))
                .find(|text| char_len(text) >= min)
        });
        found.offer(Field::Description, strategy, description);
    }
}

// ── 2. heuristic visibility ────────────────────────────────────────────────

fn heuristic_visibility(ctx: &Ctx<'_>, found: &mut Candidates) {
    let strategy = Strategy::HeuristicVisibility;
    let cfg = ctx.config;

    if found.wants(Field::Title) {
        let title = ctx
            .doc
            .select(&ctx.selectors.visible_title)
            .filter(|el| placed(el, &cfg.title_placement))
            .map(|el| element_text(&el))
            .find(|text| {
                cfg.visible_title_length.contains(char_len(text))
                    && cfg.role_vocabulary.iter().any(|term| contains_term(text, term))
            });
        found.offer(Field::Title, strategy, title);
    }

    if found.wants(Field::Company) {
        let company = ctx
            .doc
            .select(&ctx.selectors.visible_company)
            .filter(|el| placed(el, &cfg.company_placement))
            .map(|el| element_text(&el))
            .find(|text| {
                cfg.visible_company_length.contains(char_len(text))
                    && cfg
                        .company_vocabulary
                        .iter()
                        .chain(cfg.known_companies.iter())
                        .any(|term| contains_term(text, term))
            });
        found.offer(Field::Company, strategy, company);
    }
}

// ── 3. identifier scoped ───────────────────────────────────────────────────

fn identifier_scoped(ctx: &Ctx<'_>, found: &mut Candidates) {
    let strategy = Strategy::IdentifierScoped;
    if ctx.job_id.is_empty() {
        debug!(strategy = strategy.name(), "no posting identifier in URL");
        return;
    }
    if !found.wants(Field::Title) && !found.wants(Field::Company) {
        return;
    }

    let attrs = &ctx.config.job_id_attributes;
    let tagged: Vec<ElementRef<'_>> = ctx
        .doc
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| {
            attrs
                .iter()
                .any(|attr| el.value().attr(attr) == Some(ctx.job_id))
        })
        .collect();
    debug!(strategy = strategy.name(), job_id = ctx.job_id, subtrees = tagged.len(), "scoped search");

    if found.wants(Field::Title) {
        let title = tagged
            .iter()
            .find_map(|el| first_text(*el, &ctx.selectors.card_title));
        found.offer(Field::Title, strategy, title);
    }
    if found.wants(Field::Company) {
        let company = tagged
            .iter()
            .find_map(|el| first_text(*el, &ctx.selectors.card_company));
        found.offer(Field::Company, strategy, company);
    }
}

// ── 4. keyword density ─────────────────────────────────────────────────────

/// Number of distinct vocabulary keywords appearing in `text`.
pub fn keyword_hits(text: &str, keywords: &[String]) -> usize {
    let lower = text.to_lowercase();
    let mut seen: Vec<String> = Vec::new();
    for kw in keywords {
        let kw = kw.trim().to_lowercase();
        if !kw.is_empty() && !seen.contains(&kw) && lower.contains(&kw) {
            seen.push(kw);
        }
    }
    seen.len()
}

fn keyword_density(ctx: &Ctx<'_>, found: &mut Candidates) {
    if !found.wants(Field::Description) {
        return;
    }
    let cfg = ctx.config;
    let window = cfg.description_window;
    let description = ctx
        .doc
        .select(&ctx.selectors.description_blocks)
        .map(|el| element_text(&el))
        .find(|text| {
            let len = char_len(text);
            len >= window.min
                && len < window.max
                && keyword_hits(text, &cfg.description_keywords) >= cfg.description_min_keywords
        });
    found.offer(Field::Description, Strategy::KeywordDensity, description);
}

// ── 5. last resort ─────────────────────────────────────────────────────────

fn last_resort(ctx: &Ctx<'_>, found: &mut Candidates) {
    let strategy = Strategy::LastResort;
    let cfg = ctx.config;

    if found.wants(Field::Title) && !cfg.known_titles.is_empty() {
        let page_title = ctx
            .doc
            .select(&ctx.selectors.page_title)
            .next()
            .map(|el| element_text(&el))
            .unwrap_or_default();
        let title = cfg
            .known_titles
            .iter()
            .find(|known| contains_term(&page_title, known))
            .map(|known| known.trim().to_string());
        found.offer(Field::Title, strategy, title);
    }

    if found.wants(Field::Company) && !cfg.known_companies.is_empty() {
        let scope = first_present(ctx.doc, &ctx.selectors.last_resort_scope)
            .or_else(|| ctx.doc.select(&ctx.selectors.body).next())
            .unwrap_or_else(|| ctx.doc.root_element());
        let main_text = element_text(&scope);
        let company = cfg
            .known_companies
            .iter()
            .find(|known| contains_term(&main_text, known))
            .map(|known| known.trim().to_string());
        found.offer(Field::Company, strategy, company);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keyword_hits_counts_distinct_terms() {
        let kws = keywords(&["experience", "team", "role", "Team"]);
        assert_eq!(keyword_hits("Team experience, team TEAM", &kws), 2);
        assert_eq!(keyword_hits("nothing here", &kws), 0);
    }

    #[test]
    fn test_earlier_offer_wins() {
        let mut found = Candidates::default();
        found.offer(Field::Title, Strategy::StructuredSelector, Some("First".into()));
        found.offer(Field::Title, Strategy::LastResort, Some("Second".into()));
        assert_eq!(found.title.as_deref(), Some("First"));
        assert!(!found.is_complete());
    }

    #[test]
    fn test_missing_offer_leaves_slot_open() {
        let mut found = Candidates::default();
        found.offer(Field::Company, Strategy::HeuristicVisibility, None);
        assert!(found.wants(Field::Company));
    }
}
