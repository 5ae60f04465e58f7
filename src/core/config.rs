use std::env;

use crate::errors::BotError;

/// Environment variables that must be present for the bot to operate.
/// The environment probe reports on exactly this set.
pub const REQUIRED_ENV_VARS: &[&str] = &[
    "TELEGRAM_BOT_TOKEN",
    "TELEGRAM_CHANNEL_ID",
    "OPENROUTER_API_KEY",
    "GITHUB_RAW_URL",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub telegram_channel_id: String,
    pub openrouter_api_key: String,
    pub source_url: String,
    pub model: Option<String>,
    pub digest_state_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, BotError> {
        Ok(Self {
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN")
                .map_err(|e| BotError::Config(format!("TELEGRAM_BOT_TOKEN: {}", e)))?,
            telegram_channel_id: env::var("TELEGRAM_CHANNEL_ID")
                .map_err(|e| BotError::Config(format!("TELEGRAM_CHANNEL_ID: {}", e)))?,
            openrouter_api_key: env::var("OPENROUTER_API_KEY")
                .map_err(|e| BotError::Config(format!("OPENROUTER_API_KEY: {}", e)))?,
            source_url: env::var("GITHUB_RAW_URL")
                .map_err(|e| BotError::Config(format!("GITHUB_RAW_URL: {}", e)))?,
            model: env::var("OPENROUTER_MODEL").ok(),
            digest_state_path: env::var("DIGEST_STATE_PATH").ok(),
        })
    }
}
