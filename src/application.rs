//! Application layer module
//!
//! Services that orchestrate fetching and extraction.

pub mod program_reader;

pub use program_reader::ProgramReader;
