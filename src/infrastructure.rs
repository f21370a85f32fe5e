//! Infrastructure layer for parsing, configuration and external integrations
//!
//! This module provides HTML talk extraction, configuration loading, logging
//! and the HTTP client used to download the program page.

pub mod config; // Configuration constants and loading
pub mod logging; // Logging infrastructure
pub mod parsing; // Talk extraction over the parsed document
pub mod parsing_error; // Extraction error types
pub mod simple_http_client;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager};
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{ParsingConfig, TalkExtractor};
pub use simple_http_client::HttpClient;
