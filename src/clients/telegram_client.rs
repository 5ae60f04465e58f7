//! Telegram Bot API client
//!
//! Encapsulates message delivery and the read-only endpoints the health
//! probes rely on. All methods go through the Bot API's JSON envelope
//! (`ok` / `result` / `description`).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::clients::HTTP_CLIENT;
use crate::errors::{BotError, SendError};
use crate::pipeline::dispatch::MessageSink;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    result: Option<Value>,
    description: Option<String>,
}

pub struct TelegramClient {
    base_url: String,
    token: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            base_url: TELEGRAM_API_BASE.to_string(),
            token,
            chat_id,
        }
    }

    /// Point the client at a different API host. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call(&self, method: &str, payload: &Value) -> Result<Value, SendError> {
        let response = HTTP_CLIENT
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await
            .map_err(|e| SendError(format!("Telegram request failed: {}", e)))?;

        // The Bot API reports failures in the body alongside a non-2xx
        // status, so parse the envelope before checking anything else.
        let status = response.status();
        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| SendError(format!("Failed to parse Telegram response: {}", e)))?;

        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(SendError(format!("Telegram API error: {}", description)));
        }

        envelope
            .result
            .ok_or_else(|| SendError("No result in Telegram response".to_string()))
    }

    pub async fn send_message(&self, text: &str) -> Result<i64, SendError> {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        let result = self.call("sendMessage", &payload).await?;
        result
            .get("message_id")
            .and_then(Value::as_i64)
            .ok_or_else(|| SendError("No message_id in sendMessage response".to_string()))
    }

    /// Bot identity via `getMe`, used by the connectivity probe.
    pub async fn get_me(&self) -> Result<Value, BotError> {
        self.call("getMe", &json!({}))
            .await
            .map_err(|e| BotError::Probe(e.to_string()))
    }

    /// Channel metadata via `getChat`, used by the channel-access probe.
    pub async fn get_chat(&self) -> Result<Value, BotError> {
        self.call("getChat", &json!({ "chat_id": self.chat_id }))
            .await
            .map_err(|e| BotError::Probe(e.to_string()))
    }
}

#[async_trait]
impl MessageSink for TelegramClient {
    async fn send(&self, text: &str) -> Result<i64, SendError> {
        self.send_message(text).await
    }
}
