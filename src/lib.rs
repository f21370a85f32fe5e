//! SDDC Program Reader - conference talk extraction
//!
//! Reads the conference program webpage and extracts the scheduled talks
//! (time range, title, description, speaker) from its HTML markup.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export the extraction API for easier access
pub use domain::ConferenceTalk;
pub use infrastructure::parsing::{
    ExtractionContext, ExtractionError, ExtractionErrorKind, ExtractionMode, ExtractionResult,
    TalkExtraction, TalkExtractor,
};
