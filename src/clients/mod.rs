//! Client modules for external API interactions

pub mod llm_client;
pub mod source_client;
pub mod telegram_client;

pub use llm_client::LlmClient;
pub use source_client::SourceClient;
pub use telegram_client::TelegramClient;

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client")
});
