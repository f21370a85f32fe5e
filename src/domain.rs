//! Domain module - conference program entities
//!
//! The value types produced by talk extraction.

pub mod conference_talk;

pub use conference_talk::ConferenceTalk;
