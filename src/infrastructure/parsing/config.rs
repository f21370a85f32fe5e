//! Parsing configuration for talk extraction
//!
//! Centralized configuration for the program page's structural selectors and
//! extraction behavior.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::infrastructure::config::defaults;

/// How the extractor reacts to a malformed talk block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// The first malformed block aborts extraction
    #[default]
    Strict,
    /// Malformed blocks are reported alongside the talks that did parse
    Lenient,
}

/// Main parsing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Calendar date of the event; the page only lists hour:minute
    pub event_date: NaiveDate,

    /// Fail-fast or collect-errors behavior
    pub mode: ExtractionMode,

    /// Treat a page without any talk block as an error
    pub require_at_least_one_match: bool,

    /// Structural selectors of the program page
    pub selectors: TalkSelectors,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            event_date: defaults::event_date(),
            mode: ExtractionMode::default(),
            require_at_least_one_match: defaults::REQUIRE_AT_LEAST_ONE_MATCH,
            selectors: TalkSelectors::default(),
        }
    }
}

/// CSS selectors for the conference program page.
///
/// The defaults mirror the site's markup; attribute equality
/// (`[class='…']`) matches the whole attribute value, not a single class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TalkSelectors {
    /// Candidate containers for a talk block
    pub talk_block: String,

    /// Direct child that marks a candidate as a talk block
    pub talk_block_marker: String,

    /// Begin/end time markers, in document order
    pub time_marker: String,

    pub title: String,

    pub speaker: String,

    pub description: String,
}

impl Default for TalkSelectors {
    fn default() -> Self {
        Self {
            talk_block: "div[id='program'] div[class='fusion-row'] > div[class='fusion-one-half fusion-layout-column fusion-spacing-no'] div".to_string(),
            talk_block_marker: "div[class='fusion-date-and-formats']".to_string(),
            time_marker: "span[class='fusion-month-year']".to_string(),
            title: "h4 > a".to_string(),
            speaker: "p > a".to_string(),
            description: "div[class='fusion-post-content-container'] > p".to_string(),
        }
    }
}
