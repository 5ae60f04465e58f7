//! Content source client
//!
//! Fetches the raw markdown feed and answers the HEAD reachability probe.

use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;

use crate::clients::HTTP_CLIENT;
use crate::errors::BotError;
use crate::pipeline::ContentSource;

pub struct SourceClient {
    url: String,
}

impl SourceClient {
    pub fn new(url: String) -> Self {
        Self { url }
    }

    /// HEAD request against the feed; returns the advertised content length
    /// when the source exposes one. Never downloads the body.
    pub async fn head(&self) -> Result<Option<u64>, BotError> {
        let response = HTTP_CLIENT
            .head(&self.url)
            .send()
            .await
            .map_err(|e| BotError::Probe(format!("Source HEAD request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(BotError::Probe(format!("HTTP {}", response.status())));
        }

        Ok(response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok()))
    }
}

#[async_trait]
impl ContentSource for SourceClient {
    async fn fetch(&self) -> Result<String, BotError> {
        let response = HTTP_CLIENT
            .get(&self.url)
            .send()
            .await
            .map_err(|e| BotError::Fetch(format!("Source request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(BotError::Fetch(format!("HTTP {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|e| BotError::Fetch(format!("Failed to read source body: {}", e)))
    }
}
