//! Conference program reader
//!
//! Downloads the program page and turns it into conference talks. The talk
//! extraction itself lives in the parsing infrastructure; this service only
//! wires download, decoding and extraction together.

use anyhow::{Context, Result};
use scraper::Html;
use std::borrow::Cow;
use tracing::{info, warn};
use url::Url;

use crate::domain::conference_talk::ConferenceTalk;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::parsing::{
    BlockFailure, ContextualParser, ExtractionContext, ExtractionResult, ExtractionSummary,
    TalkExtraction, TalkExtractor,
};
use crate::infrastructure::simple_http_client::{HttpClient, HttpClientConfig};

/// A reader that can read the conference program from the webpage
#[derive(Debug, Clone)]
pub struct ProgramReader {
    url: Url,
    http_client: HttpClient,
    extractor: TalkExtractor,
    context: ExtractionContext,
    /// Result of the last successful parse
    extraction: TalkExtraction,
}

impl ProgramReader {
    /// Create a reader for `url` with default fetch and parsing settings
    pub fn new(url: &str) -> Result<Self> {
        let mut config = AppConfig::default();
        config.reader.program_url = url.to_string();
        Self::from_config(&config)
    }

    /// Create a reader from the application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let url = Url::parse(&config.reader.program_url)
            .with_context(|| format!("Invalid program URL: {}", config.reader.program_url))?;

        let http_client = HttpClient::with_config(HttpClientConfig::from_reader_config(&config.reader))
            .context("Failed to create HTTP client")?;

        let extractor = TalkExtractor::with_config(&config.parsing.selectors)
            .context("Failed to create talk extractor")?;

        Ok(Self {
            url,
            http_client,
            extractor,
            context: ExtractionContext::from(&config.parsing),
            extraction: TalkExtraction::default(),
        })
    }

    pub const fn url(&self) -> &Url {
        &self.url
    }

    pub const fn context(&self) -> &ExtractionContext {
        &self.context
    }

    /// Talks of the last parse, in document order
    pub fn conference_talks(&self) -> &[ConferenceTalk] {
        &self.extraction.talks
    }

    /// Blocks skipped by the last parse; only filled in lenient mode
    pub fn failures(&self) -> &[BlockFailure] {
        &self.extraction.failures
    }

    pub fn summary(&self) -> ExtractionSummary {
        ExtractionSummary::from(&self.extraction)
    }

    /// Download and parse the program page, keeping the talks for
    /// [`conference_talks`](Self::conference_talks).
    ///
    /// On failure the previously parsed talks are left untouched.
    pub async fn parse(&mut self) -> Result<&[ConferenceTalk]> {
        self.extraction = self.read().await?;
        Ok(&self.extraction.talks)
    }

    /// Parse already downloaded page bytes, keeping the talks
    pub fn parse_bytes(&mut self, content: &[u8]) -> ExtractionResult<&[ConferenceTalk]> {
        self.extraction = self.extract_bytes(content)?;
        Ok(&self.extraction.talks)
    }

    /// Download the program page and extract its talks without storing them
    pub async fn read(&self) -> Result<TalkExtraction> {
        let content = self
            .http_client
            .fetch_bytes(self.url.as_str())
            .await
            .context("Failed to download the conference program")?;

        let extraction = self
            .extract_bytes(&content)
            .with_context(|| format!("Failed to parse the conference program from {}", self.url))?;

        info!("Read {} talks from {}", extraction.talks.len(), self.url);
        Ok(extraction)
    }

    /// Decode raw page bytes as UTF-8 and extract the talks
    pub fn extract_bytes(&self, content: &[u8]) -> ExtractionResult<TalkExtraction> {
        let text = String::from_utf8_lossy(content);
        if matches!(text, Cow::Owned(_)) {
            warn!("Program page is not valid UTF-8; invalid sequences were replaced");
        }

        let document = Html::parse_document(&text);
        self.extractor.parse_with_context(&document, &self.context)
    }
}
