//! Extraction context for talk parsing
//!
//! Carries the values that are external to the markup itself.

use chrono::NaiveDate;

use super::config::{ExtractionMode, ParsingConfig};

/// Context information for extracting talks from one program page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionContext {
    /// Reference date anchoring the page's hour:minute times
    pub event_date: NaiveDate,

    /// Treat a page without any talk block as an error
    pub require_at_least_one_match: bool,

    pub mode: ExtractionMode,
}

impl ExtractionContext {
    /// Create new context for the given event date with strict, tolerant-of-empty defaults
    pub const fn new(event_date: NaiveDate) -> Self {
        Self {
            event_date,
            require_at_least_one_match: false,
            mode: ExtractionMode::Strict,
        }
    }

    /// Fail when the page has no talk block at all
    pub const fn with_require_at_least_one_match(mut self, required: bool) -> Self {
        self.require_at_least_one_match = required;
        self
    }

    pub const fn with_mode(mut self, mode: ExtractionMode) -> Self {
        self.mode = mode;
        self
    }
}

impl From<&ParsingConfig> for ExtractionContext {
    fn from(config: &ParsingConfig) -> Self {
        Self::new(config.event_date)
            .with_require_at_least_one_match(config.require_at_least_one_match)
            .with_mode(config.mode)
    }
}
