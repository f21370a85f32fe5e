//! Conference talk value type
//!
//! One scheduled talk as read from the conference program page.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A talk on the conference program.
///
/// Instances are produced by the talk extractor only; all text fields are
/// decoded, trimmed and non-empty, and both timestamps share the event's
/// reference date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConferenceTalk {
    begin: NaiveDateTime,
    end: NaiveDateTime,
    title: String,
    description: String,
    speaker: String,
}

impl ConferenceTalk {
    pub(crate) const fn new(
        begin: NaiveDateTime,
        end: NaiveDateTime,
        title: String,
        description: String,
        speaker: String,
    ) -> Self {
        Self {
            begin,
            end,
            title,
            description,
            speaker,
        }
    }

    /// Begin time of the talk
    pub const fn begin(&self) -> NaiveDateTime {
        self.begin
    }

    /// End time of the talk
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Title of the talk
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Description of the talk
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Speaker's name
    pub fn speaker(&self) -> &str {
        &self.speaker
    }
}

impl fmt::Display for ConferenceTalk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {} ({})",
            self.begin.format("%H:%M"),
            self.end.format("%H:%M"),
            self.title,
            self.speaker
        )
    }
}
