//! Talk extraction error types
//!
//! Every variant that originates from a single talk block carries the
//! block's position within the matched set, so a failure can be traced back
//! to the offending markup.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Cannot parse time information from talk block {block_index}: expected at least 2 time markers, found {found}")]
    MissingTimeInfo { block_index: usize, found: usize },

    #[error("Invalid time value '{value}' in talk block {block_index}: {reason}")]
    InvalidTimeValue {
        block_index: usize,
        value: String,
        reason: String,
    },

    #[error("Cannot parse title of talk block {block_index}")]
    MissingTitle { block_index: usize },

    #[error("Cannot parse speaker name of talk block {block_index}")]
    MissingSpeaker { block_index: usize },

    #[error("Cannot parse description of talk block {block_index}")]
    MissingDescription { block_index: usize },

    #[error("No talk blocks found on the program page (selector: {selector})")]
    NoTalkBlocks { selector: String },
}

/// Flat classification of [`ExtractionError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExtractionErrorKind {
    MissingTimeInfo,
    InvalidTimeValue,
    MissingTitle,
    MissingSpeaker,
    MissingDescription,
    NoTalkBlocks,
}

impl fmt::Display for ExtractionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MissingTimeInfo => "MissingTimeInfo",
            Self::InvalidTimeValue => "InvalidTimeValue",
            Self::MissingTitle => "MissingTitle",
            Self::MissingSpeaker => "MissingSpeaker",
            Self::MissingDescription => "MissingDescription",
            Self::NoTalkBlocks => "NoTalkBlocks",
        };
        f.write_str(name)
    }
}

impl ExtractionError {
    /// Create an invalid time value error
    pub fn invalid_time_value(block_index: usize, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTimeValue {
            block_index,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub const fn kind(&self) -> ExtractionErrorKind {
        match self {
            Self::MissingTimeInfo { .. } => ExtractionErrorKind::MissingTimeInfo,
            Self::InvalidTimeValue { .. } => ExtractionErrorKind::InvalidTimeValue,
            Self::MissingTitle { .. } => ExtractionErrorKind::MissingTitle,
            Self::MissingSpeaker { .. } => ExtractionErrorKind::MissingSpeaker,
            Self::MissingDescription { .. } => ExtractionErrorKind::MissingDescription,
            Self::NoTalkBlocks { .. } => ExtractionErrorKind::NoTalkBlocks,
        }
    }

    /// Position of the failing block within the matched set, if the error
    /// belongs to a single block
    pub const fn block_index(&self) -> Option<usize> {
        match self {
            Self::MissingTimeInfo { block_index, .. }
            | Self::InvalidTimeValue { block_index, .. }
            | Self::MissingTitle { block_index }
            | Self::MissingSpeaker { block_index }
            | Self::MissingDescription { block_index } => Some(*block_index),
            Self::NoTalkBlocks { .. } => None,
        }
    }

    /// Whether extraction of the remaining blocks can continue after this error.
    ///
    /// Block-level errors are skippable in lenient mode; a page without any
    /// talk block is not.
    pub const fn is_recoverable(&self) -> bool {
        self.block_index().is_some()
    }
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;
