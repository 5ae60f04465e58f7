//! Summarizer API client
//!
//! Encapsulates the chat-completion call that condenses the raw feed into a
//! channel-ready digest, plus the model-listing endpoint the reachability
//! probe uses.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use crate::clients::HTTP_CLIENT;
use crate::core::models::AnalysisResult;
use crate::errors::BotError;
use crate::pipeline::Summarizer;

pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 4000;

/// Fixed instruction the digest is produced under. Which trends make the
/// cut, and why, is delegated entirely to the model; the soft length budget
/// here is instruction-only and the formatter still enforces the hard one.
const DIGEST_INSTRUCTION: &str = "You are an analyst and UX writer for a Telegram channel about AI trends. \
Your task is to produce ONE short message (3500 characters maximum) in English.

MESSAGE FORMAT:

🔥 AI Trends | [date as DD.MM.YYYY]

📊 TODAY'S HIGHLIGHTS:
• [Key theme 1, one line]
• [Key theme 2, one line]
• [Key theme 3, one line]

🏆 TOP 5 TRENDS:

1. [Emoji] [Short headline]
   → [One sentence: why it matters and what impact it has]

2. [Emoji] [Short headline]
   → [One sentence: why it matters and what impact it has]

[And so on for the top 5]

RULES:
- Pick the 5 MOST important trends by score, comments and likely impact
- Headlines 50 characters maximum
- Insights must explain WHY it matters, not WHAT happened
- Keep technical terms as they are (LLM, GPU, MoE, etc.)
- Write in a lively voice, no officialese
- Do NOT include links to source posts
- Do NOT quote exact scores or comment counts";

/// LLM API client for generating digests
pub struct LlmClient {
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self {
            base_url: OPENROUTER_API_BASE.to_string(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// Point the client at a different API host. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, content: &str) -> Result<String, BotError> {
        let request_body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": DIGEST_INSTRUCTION },
                { "role": "user", "content": content },
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let response = HTTP_CLIENT
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://github.com/trendbot")
            .header("X-Title", "Trend Digest Bot")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| BotError::Analysis(format!("Summarizer request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BotError::Analysis(format!(
                "Summarizer API error: {} - {}",
                status, error_text
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            BotError::Analysis(format!("Failed to parse summarizer response: {}", e))
        })?;

        response_json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BotError::Analysis("No content in summarizer response".to_string()))
    }

    /// `GET /models` — reachability probe; returns the advertised model
    /// count.
    pub async fn list_models(&self) -> Result<usize, BotError> {
        let response = HTTP_CLIENT
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| BotError::Probe(format!("Model listing request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(BotError::Probe(format!("HTTP {}", response.status())));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BotError::Probe(format!("Failed to parse model listing: {}", e)))?;

        body.get("data")
            .and_then(Value::as_array)
            .map(Vec::len)
            .ok_or_else(|| BotError::Probe("Invalid model listing response".to_string()))
    }
}

#[async_trait]
impl Summarizer for LlmClient {
    async fn summarize(&self, content: &str) -> Result<AnalysisResult, BotError> {
        info!(
            "Requesting digest from model {} ({} chars of input)",
            self.model,
            content.chars().count()
        );

        let text = self.complete(content).await?;
        Ok(AnalysisResult { text })
    }
}
