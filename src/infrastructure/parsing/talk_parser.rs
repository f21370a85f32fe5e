//! Talk extraction from the conference program page
//!
//! Locates the repeating talk blocks of the program and reads begin/end time,
//! title, speaker and description out of each one. Blocks are processed in
//! document order; the reference date comes from the extraction context since
//! the page itself only carries hour:minute.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use scraper::{ElementRef, Html};
use serde::Serialize;
use tracing::{debug, warn};

use super::config::{ExtractionMode, TalkSelectors};
use super::query::{element_text, HtmlQuery, StructuralPattern};
use super::{ContextualParser, ExtractionContext, ExtractionError, ExtractionResult};
use crate::domain::conference_talk::ConferenceTalk;

/// A talk block that could not be turned into a talk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFailure {
    /// Position of the block within the matched set
    pub index: usize,
    pub error: ExtractionError,
}

/// Result of extracting a whole page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalkExtraction {
    /// Talks in document order
    pub talks: Vec<ConferenceTalk>,

    /// Skipped blocks; always empty in strict mode
    pub failures: Vec<BlockFailure>,
}

impl TalkExtraction {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Summary counters for logging and reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub blocks: usize,
    pub talks: usize,
    pub failures: usize,
}

impl From<&TalkExtraction> for ExtractionSummary {
    fn from(extraction: &TalkExtraction) -> Self {
        Self {
            blocks: extraction.talks.len() + extraction.failures.len(),
            talks: extraction.talks.len(),
            failures: extraction.failures.len(),
        }
    }
}

/// Parser for extracting conference talks from the program page
#[derive(Debug, Clone)]
pub struct TalkExtractor {
    talk_block: StructuralPattern,
    time_marker: StructuralPattern,
    title: StructuralPattern,
    speaker: StructuralPattern,
    description: StructuralPattern,
}

impl TalkExtractor {
    /// Create a new talk extractor with the program page's default selectors
    pub fn new() -> Result<Self> {
        Self::with_config(&TalkSelectors::default())
    }

    /// Create extractor with custom selector configuration
    pub fn with_config(selectors: &TalkSelectors) -> Result<Self> {
        Ok(Self {
            talk_block: StructuralPattern::parse(&selectors.talk_block)?
                .having_child(&selectors.talk_block_marker)?,
            time_marker: StructuralPattern::parse(&selectors.time_marker)?,
            title: StructuralPattern::parse(&selectors.title)?,
            speaker: StructuralPattern::parse(&selectors.speaker)?,
            description: StructuralPattern::parse(&selectors.description)?,
        })
    }

    /// Extract all talks, failing on the first malformed block.
    ///
    /// A page without talk blocks yields an empty list unless the context
    /// requires at least one match.
    pub fn extract_talks(
        &self,
        html: &Html,
        context: &ExtractionContext,
    ) -> ExtractionResult<Vec<ConferenceTalk>> {
        let blocks = self.locate_blocks(html, context)?;

        let talks = blocks
            .iter()
            .enumerate()
            .map(|(index, block)| self.extract_block(block, index, context.event_date))
            .collect::<ExtractionResult<Vec<_>>>()?;

        debug!("Extracted {} talks from program page", talks.len());
        Ok(talks)
    }

    /// Extract all talks, collecting malformed blocks instead of aborting.
    ///
    /// Only a page-level problem (no blocks while at least one is required)
    /// is returned as an error.
    pub fn extract_talks_lenient(
        &self,
        html: &Html,
        context: &ExtractionContext,
    ) -> ExtractionResult<TalkExtraction> {
        let blocks = self.locate_blocks(html, context)?;
        let mut extraction = TalkExtraction::default();

        for (index, block) in blocks.iter().enumerate() {
            match self.extract_block(block, index, context.event_date) {
                Ok(talk) => extraction.talks.push(talk),
                Err(error) if error.is_recoverable() => {
                    warn!("Skipping talk block {}: {}", index, error);
                    extraction.failures.push(BlockFailure { index, error });
                }
                Err(error) => return Err(error),
            }
        }

        let summary = ExtractionSummary::from(&extraction);
        debug!(
            "Extracted {} of {} talk blocks ({} failed)",
            summary.talks, summary.blocks, summary.failures
        );
        Ok(extraction)
    }

    fn locate_blocks<'a>(
        &self,
        html: &'a Html,
        context: &ExtractionContext,
    ) -> ExtractionResult<Vec<ElementRef<'a>>> {
        let blocks = html.find_all(&self.talk_block);

        if blocks.is_empty() {
            if context.require_at_least_one_match {
                return Err(ExtractionError::NoTalkBlocks {
                    selector: self.talk_block.to_string(),
                });
            }
            warn!("No talk blocks found on program page; the markup may have changed");
        } else {
            debug!("Found {} talk blocks", blocks.len());
        }

        Ok(blocks)
    }

    /// Extract a single talk from its block
    fn extract_block(
        &self,
        block: &ElementRef<'_>,
        index: usize,
        event_date: NaiveDate,
    ) -> ExtractionResult<ConferenceTalk> {
        let (begin, end) = self.extract_times(block, index, event_date)?;

        let title = Self::extract_text(block, &self.title)
            .ok_or(ExtractionError::MissingTitle { block_index: index })?;
        let speaker = Self::extract_text(block, &self.speaker)
            .ok_or(ExtractionError::MissingSpeaker { block_index: index })?;
        let description = Self::extract_text(block, &self.description)
            .ok_or(ExtractionError::MissingDescription { block_index: index })?;

        debug!("Talk block {}: '{}' by {}", index, title, speaker);
        Ok(ConferenceTalk::new(begin, end, title, description, speaker))
    }

    /// Begin and end time from the first two time markers
    fn extract_times(
        &self,
        block: &ElementRef<'_>,
        index: usize,
        event_date: NaiveDate,
    ) -> ExtractionResult<(NaiveDateTime, NaiveDateTime)> {
        let markers = block.find_all(&self.time_marker);
        let [begin, end, ..] = markers.as_slice() else {
            return Err(ExtractionError::MissingTimeInfo {
                block_index: index,
                found: markers.len(),
            });
        };

        let begin = parse_clock_time(&element_text(begin), index)?;
        let end = parse_clock_time(&element_text(end), index)?;

        Ok((event_date.and_time(begin), event_date.and_time(end)))
    }

    /// Text of the first element matching `pattern`, if present and non-empty
    fn extract_text(block: &ElementRef<'_>, pattern: &StructuralPattern) -> Option<String> {
        block
            .find_first(pattern)
            .map(|element| element_text(&element))
            .filter(|text| !text.is_empty())
    }
}

impl ContextualParser for TalkExtractor {
    type Output = TalkExtraction;
    type Context = ExtractionContext;

    /// Extract talks honoring the context's extraction mode
    fn parse_with_context(
        &self,
        html: &Html,
        context: &Self::Context,
    ) -> ExtractionResult<Self::Output> {
        match context.mode {
            ExtractionMode::Strict => self.extract_talks(html, context).map(|talks| TalkExtraction {
                talks,
                failures: Vec::new(),
            }),
            ExtractionMode::Lenient => self.extract_talks_lenient(html, context),
        }
    }
}

/// Parse an `hour:minute` time marker.
///
/// Anything after a second `:` is ignored; seconds are always zero.
pub fn parse_clock_time(text: &str, block_index: usize) -> ExtractionResult<NaiveTime> {
    let mut parts = text.split(':');
    let (Some(hour), Some(minute)) = (parts.next(), parts.next()) else {
        return Err(ExtractionError::invalid_time_value(
            block_index,
            text,
            "expected hour:minute",
        ));
    };

    let hour: u32 = hour.trim().parse().map_err(|e| {
        ExtractionError::invalid_time_value(block_index, text, format!("invalid hour: {e}"))
    })?;
    let minute: u32 = minute.trim().parse().map_err(|e| {
        ExtractionError::invalid_time_value(block_index, text, format!("invalid minute: {e}"))
    })?;

    if hour > 23 {
        return Err(ExtractionError::invalid_time_value(
            block_index,
            text,
            "hour out of range 0-23",
        ));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        ExtractionError::invalid_time_value(block_index, text, "minute out of range 0-59")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::ExtractionErrorKind;

    fn event_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 4, 18).unwrap()
    }

    fn context() -> ExtractionContext {
        ExtractionContext::new(event_date())
    }

    fn talk_block(times: &[&str], title: &str, speaker: &str, description: &str) -> String {
        let markers: String = times
            .iter()
            .map(|t| format!(r#"<span class="fusion-month-year">{t}</span>"#))
            .collect();
        format!(
            r#"<div class="talk">
                <div class="fusion-date-and-formats">{markers}</div>
                <h4><a href="/talk">{title}</a></h4>
                <p>by <a href="/speaker">{speaker}</a></p>
                <div class="fusion-post-content-container"><p>{description}</p></div>
            </div>"#
        )
    }

    fn program_page(blocks: &[String]) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div id="program"><div class="fusion-row">
                <div class="fusion-one-half fusion-layout-column fusion-spacing-no">{}</div>
            </div></div></body></html>"#,
            blocks.concat()
        ))
    }

    #[test]
    fn test_extracts_single_talk() {
        let html = program_page(&[talk_block(
            &["9:00", "9:15"],
            "Opening &amp; Welcome",
            " Jane Doe ",
            "Kickoff talk.",
        )]);

        let talks = TalkExtractor::new().unwrap().extract_talks(&html, &context()).unwrap();

        assert_eq!(talks.len(), 1);
        let talk = &talks[0];
        assert_eq!(talk.title(), "Opening & Welcome");
        assert_eq!(talk.speaker(), "Jane Doe");
        assert_eq!(talk.description(), "Kickoff talk.");
        assert_eq!(talk.begin(), event_date().and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(talk.end(), event_date().and_hms_opt(9, 15, 0).unwrap());
    }

    #[test]
    fn test_empty_page_is_not_an_error() {
        let html = Html::parse_document("<html><body><p>Coming soon</p></body></html>");
        let talks = TalkExtractor::new().unwrap().extract_talks(&html, &context()).unwrap();
        assert!(talks.is_empty());
    }

    #[test]
    fn test_empty_page_fails_when_match_required() {
        let html = program_page(&[]);
        let context = context().with_require_at_least_one_match(true);

        let error = TalkExtractor::new().unwrap().extract_talks(&html, &context).unwrap_err();
        assert_eq!(error.kind(), ExtractionErrorKind::NoTalkBlocks);
    }

    #[test]
    fn test_single_time_marker_is_missing_time_info() {
        let html = program_page(&[talk_block(&["9:00"], "T", "S", "D")]);

        let error = TalkExtractor::new().unwrap().extract_talks(&html, &context()).unwrap_err();
        assert_eq!(error, ExtractionError::MissingTimeInfo { block_index: 0, found: 1 });
    }

    #[test]
    fn test_out_of_range_minute_is_invalid_time_value() {
        let html = program_page(&[talk_block(&["9:99", "10:00"], "T", "S", "D")]);

        let error = TalkExtractor::new().unwrap().extract_talks(&html, &context()).unwrap_err();
        assert_eq!(error.kind(), ExtractionErrorKind::InvalidTimeValue);
        assert_eq!(error.block_index(), Some(0));
    }

    #[test]
    fn test_error_carries_failing_block_index() {
        let html = program_page(&[
            talk_block(&["9:00", "9:30"], "First", "A", "One"),
            talk_block(&["9:30", "10:00"], "", "B", "Two"),
        ]);

        let error = TalkExtractor::new().unwrap().extract_talks(&html, &context()).unwrap_err();
        assert_eq!(error, ExtractionError::MissingTitle { block_index: 1 });
    }

    #[test]
    fn test_lenient_mode_collects_failures() {
        let html = program_page(&[
            talk_block(&["9:00", "9:30"], "First", "A", "One"),
            talk_block(&["9:30"], "Second", "B", "Two"),
            talk_block(&["10:00", "10:30"], "Third", "C", "Three"),
        ]);
        let context = context().with_mode(ExtractionMode::Lenient);

        let extraction = TalkExtractor::new().unwrap().parse_with_context(&html, &context).unwrap();

        let titles: Vec<&str> = extraction.talks.iter().map(ConferenceTalk::title).collect();
        assert_eq!(titles, vec!["First", "Third"]);
        assert_eq!(extraction.failures.len(), 1);
        assert_eq!(extraction.failures[0].index, 1);
        assert!(!extraction.is_complete());
        assert_eq!(
            ExtractionSummary::from(&extraction),
            ExtractionSummary { blocks: 3, talks: 2, failures: 1 }
        );
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(parse_clock_time("9:30", 0).unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(parse_clock_time(" 10 : 45 ", 0).unwrap(), NaiveTime::from_hms_opt(10, 45, 0).unwrap());
        assert_eq!(parse_clock_time("23:59:12", 0).unwrap(), NaiveTime::from_hms_opt(23, 59, 0).unwrap());
    }

    #[test]
    fn test_parse_clock_time_rejects_malformed_values() {
        for text in ["930", "", "24:00", "9:60", "nine:30", "9:-1", ":"] {
            let error = parse_clock_time(text, 4).unwrap_err();
            assert_eq!(error.kind(), ExtractionErrorKind::InvalidTimeValue, "{text}");
            assert_eq!(error.block_index(), Some(4));
        }
    }
}
