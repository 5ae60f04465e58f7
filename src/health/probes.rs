//! Concrete probes over the bot's external dependencies.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::env;
use std::sync::Arc;

use super::{Probe, ProbeResult};
use crate::clients::{LlmClient, SourceClient, TelegramClient};
use crate::core::config::REQUIRED_ENV_VARS;
use crate::errors::BotError;

fn probe_message(error: BotError) -> String {
    match error {
        BotError::Probe(msg) => msg,
        other => other.to_string(),
    }
}

/// Bot identity via `getMe`.
pub struct BotIdentityProbe {
    client: Arc<TelegramClient>,
}

impl BotIdentityProbe {
    pub fn new(client: Arc<TelegramClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for BotIdentityProbe {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn run(&self) -> ProbeResult {
        match self.client.get_me().await {
            Ok(result) => {
                let username = result
                    .get("username")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                ProbeResult::ok_with_detail(format!("Connected as @{}", username), result)
            }
            Err(e) => ProbeResult::error(probe_message(e)),
        }
    }
}

/// Channel accessibility via `getChat`.
pub struct ChannelAccessProbe {
    client: Arc<TelegramClient>,
}

impl ChannelAccessProbe {
    pub fn new(client: Arc<TelegramClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for ChannelAccessProbe {
    fn name(&self) -> &str {
        "channel"
    }

    async fn run(&self) -> ProbeResult {
        match self.client.get_chat().await {
            Ok(result) => {
                let title = result
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                let chat_type = result.get("type").and_then(Value::as_str);
                ProbeResult::ok_with_detail(
                    format!("Access to \"{}\"", title),
                    json!({ "title": title, "type": chat_type }),
                )
            }
            Err(e) => ProbeResult::error(probe_message(e)),
        }
    }
}

/// Summarizer-service reachability via the model listing.
pub struct SummarizerProbe {
    client: Arc<LlmClient>,
}

impl SummarizerProbe {
    pub fn new(client: Arc<LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for SummarizerProbe {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn run(&self) -> ProbeResult {
        match self.client.list_models().await {
            Ok(count) => ProbeResult::ok_with_detail(
                format!("Connected, {} models available", count),
                json!({ "model_count": count }),
            ),
            Err(e) => ProbeResult::error(probe_message(e)),
        }
    }
}

/// Feed reachability via a HEAD request.
pub struct SourceProbe {
    client: Arc<SourceClient>,
}

impl SourceProbe {
    pub fn new(client: Arc<SourceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for SourceProbe {
    fn name(&self) -> &str {
        "source"
    }

    async fn run(&self) -> ProbeResult {
        match self.client.head().await {
            Ok(Some(length)) => ProbeResult::ok_with_detail(
                format!("Source accessible, {}KB", length / 1024),
                json!({ "content_length": length }),
            ),
            Ok(None) => ProbeResult::ok("Source accessible"),
            Err(e) => ProbeResult::error(probe_message(e)),
        }
    }
}

/// Local configuration completeness. Checked without touching the network.
pub struct EnvProbe {
    required: Vec<String>,
}

impl EnvProbe {
    pub fn new() -> Self {
        Self {
            required: REQUIRED_ENV_VARS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_vars(required: Vec<String>) -> Self {
        Self { required }
    }
}

impl Default for EnvProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Probe for EnvProbe {
    fn name(&self) -> &str {
        "environment"
    }

    async fn run(&self) -> ProbeResult {
        let mut detail = serde_json::Map::new();
        let mut missing: Vec<&str> = Vec::new();

        for name in &self.required {
            let present = env::var(name).is_ok();
            detail.insert(name.clone(), Value::Bool(present));
            if !present {
                missing.push(name.as_str());
            }
        }

        if missing.is_empty() {
            ProbeResult::ok_with_detail("All required variables present", Value::Object(detail))
        } else {
            ProbeResult {
                status: super::ProbeStatus::Error,
                message: format!("Missing: {}", missing.join(", ")),
                detail: Some(Value::Object(detail)),
            }
        }
    }
}
