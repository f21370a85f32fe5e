//! HTML parsing infrastructure for the conference program page
//!
//! Trait-based extraction of conference talks over a `scraper` document tree,
//! with typed structural queries and a structured error taxonomy.

pub mod config;
pub mod context;
pub mod error;
pub mod query;
pub mod talk_parser;

// Re-export public types
pub use config::{ExtractionMode, ParsingConfig, TalkSelectors};
pub use context::ExtractionContext;
pub use error::{ExtractionError, ExtractionErrorKind, ExtractionResult};
pub use query::{HtmlQuery, StructuralPattern};
pub use talk_parser::{BlockFailure, ExtractionSummary, TalkExtraction, TalkExtractor};

use anyhow::Result;
use scraper::Html;

/// Generic HTML parser trait for type-safe parsing
pub trait HtmlParser {
    type Output;
    type Config;

    /// Parse HTML content with given configuration
    fn parse(&self, html: &str, config: &Self::Config) -> Result<Self::Output>;
}

/// Parser trait working on an already-built document tree
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ExtractionResult<Self::Output>;
}

/// Parses raw page text; selectors come from the extractor, the reference
/// date and strictness from `config`.
impl HtmlParser for TalkExtractor {
    type Output = TalkExtraction;
    type Config = ParsingConfig;

    fn parse(&self, html: &str, config: &Self::Config) -> Result<Self::Output> {
        let document = Html::parse_document(html);
        let context = ExtractionContext::from(config);
        Ok(self.parse_with_context(&document, &context)?)
    }
}
