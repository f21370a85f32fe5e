//! HTTP client for downloading the program page
//!
//! Thin wrapper around `reqwest` with timeout, user agent and redirect
//! handling taken from [`ReaderConfig`]. Requests are not retried.

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, info};

use crate::infrastructure::config::ReaderConfig;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    /// Create HttpClientConfig from ReaderConfig
    pub fn from_reader_config(reader_config: &ReaderConfig) -> Self {
        Self {
            timeout_seconds: reader_config.timeout_seconds,
            user_agent: reader_config.user_agent.clone(),
            follow_redirects: reader_config.follow_redirects,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_reader_config(&ReaderConfig::default())
    }
}

/// HTTP client fetching raw page bytes
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    /// Download the body of `url`; non-success statuses are errors
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {} (timeout {}s)", url, self.config.timeout_seconds);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP {} from {}", status, url));
        }

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        info!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_reader_config() {
        let reader = ReaderConfig {
            timeout_seconds: 5,
            user_agent: "test-agent".to_string(),
            ..ReaderConfig::default()
        };

        let config = HttpClientConfig::from_reader_config(&reader);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.user_agent, "test-agent");
        assert!(config.follow_redirects);
    }

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }
}
