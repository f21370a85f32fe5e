//! Extraction error module re-export
//!
//! This module re-exports the talk extraction error types.

pub use crate::infrastructure::parsing_error::{ExtractionError, ExtractionErrorKind, ExtractionResult};
