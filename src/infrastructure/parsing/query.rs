//! Typed structural queries over the parsed HTML tree
//!
//! `scraper` selectors cover tag, attribute and descendant/child relations,
//! but not "element having a child matching X". [`StructuralPattern`] pairs a
//! compiled selector with that optional child predicate so talk blocks can be
//! located the same way the program page nests them.

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use std::fmt;

/// Opaque structural-match descriptor: tag and attribute predicates plus
/// descendant/child relations, optionally narrowed to elements that have a
/// direct child matching a second selector.
#[derive(Debug, Clone)]
pub struct StructuralPattern {
    source: String,
    selector: Selector,
    required_child: Option<(String, Selector)>,
}

impl StructuralPattern {
    /// Compile a pattern from a CSS selector string
    pub fn parse(selector: &str) -> Result<Self> {
        Ok(Self {
            source: selector.to_string(),
            selector: compile(selector)?,
            required_child: None,
        })
    }

    /// Narrow the pattern to elements with a direct child matching `child`
    pub fn having_child(mut self, child: &str) -> Result<Self> {
        self.required_child = Some((child.to_string(), compile(child)?));
        Ok(self)
    }

    /// Whether a candidate already matched by the selector satisfies the
    /// child predicate
    fn accepts(&self, element: &ElementRef<'_>) -> bool {
        match &self.required_child {
            Some((_, child)) => element
                .children()
                .filter_map(ElementRef::wrap)
                .any(|candidate| child.matches(&candidate)),
            None => true,
        }
    }
}

impl fmt::Display for StructuralPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.required_child {
            Some((child, _)) => write!(f, "{} [having child {}]", self.source, child),
            None => f.write_str(&self.source),
        }
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid CSS selector '{}': {}", selector, e))
}

/// Structural query interface over a document or any element within it.
///
/// Results are in document order and borrow from the tree; queries on an
/// element only consider its descendants. Implemented for `&Html` and
/// `ElementRef`, both cheap copies of a tree handle.
pub trait HtmlQuery<'a> {
    fn find_all(self, pattern: &StructuralPattern) -> Vec<ElementRef<'a>>;

    fn find_first(self, pattern: &StructuralPattern) -> Option<ElementRef<'a>>;
}

impl<'a> HtmlQuery<'a> for &'a Html {
    fn find_all(self, pattern: &StructuralPattern) -> Vec<ElementRef<'a>> {
        self.select(&pattern.selector)
            .filter(|element| pattern.accepts(element))
            .collect()
    }

    fn find_first(self, pattern: &StructuralPattern) -> Option<ElementRef<'a>> {
        self.select(&pattern.selector)
            .find(|element| pattern.accepts(element))
    }
}

impl<'a> HtmlQuery<'a> for ElementRef<'a> {
    fn find_all(self, pattern: &StructuralPattern) -> Vec<ElementRef<'a>> {
        self.select(&pattern.selector)
            .filter(|element| pattern.accepts(element))
            .collect()
    }

    fn find_first(self, pattern: &StructuralPattern) -> Option<ElementRef<'a>> {
        self.select(&pattern.selector)
            .find(|element| pattern.accepts(element))
    }
}

/// Concatenated text of an element with surrounding whitespace removed.
///
/// Entity references were already decoded by the HTML parser.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
