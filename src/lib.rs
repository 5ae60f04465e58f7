/// Trendbot - a Telegram bot that turns a remote markdown trends feed into a
/// channel digest.
///
/// Each run fetches the feed, fingerprints it against the last delivered
/// revision, asks an LLM service to condense it into a bounded digest,
/// splits the digest to the channel's message-size limit and delivers the
/// chunks in order. The new fingerprint is committed only after the whole
/// delivery succeeds, so a failed run retries the same content on the next
/// trigger. A health subsystem probes every external dependency
/// concurrently and reduces the outcomes to one report.
///
/// # Architecture
///
/// The system uses:
/// - reqwest for all external HTTP calls (feed, summarizer, Telegram)
/// - sha2 fingerprints for change detection, behind an injected digest store
/// - futures join semantics for the concurrent health probes
/// - Tokio for the async runtime
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use trendbot::clients::{LlmClient, SourceClient, TelegramClient};
/// use trendbot::core::config::AppConfig;
/// use trendbot::digest::FileDigestStore;
/// use trendbot::pipeline::dispatch::Dispatcher;
/// use trendbot::pipeline::Pipeline;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Set up structured logging
///     trendbot::setup_logging();
///
///     let config = AppConfig::from_env()?;
///
///     let telegram = Arc::new(TelegramClient::new(
///         config.telegram_bot_token.clone(),
///         config.telegram_channel_id.clone(),
///     ));
///
///     let pipeline = Pipeline::new(
///         Arc::new(SourceClient::new(config.source_url.clone())),
///         Arc::new(LlmClient::new(
///             config.openrouter_api_key.clone(),
///             config.model.clone(),
///         )),
///         Dispatcher::new(telegram),
///         Arc::new(FileDigestStore::new("trendbot_digest")),
///     );
///
///     // A scheduled trigger passes force = false; a manual trigger may
///     // pass true to bypass the change check.
///     let record = pipeline.run(false).await?;
///     println!("{:?}", record.outcome);
///
///     Ok(())
/// }
/// ```
// Module declarations
pub mod clients;
pub mod core;
pub mod digest;
pub mod errors;
pub mod formatting;
pub mod health;
pub mod pipeline;

pub use errors::{BotError, SendError};

/// Configure structured logging with JSON format.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable
/// for log aggregation. It should be called once at process start.
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    tracing_subscriber::registry().with(fmt_layer).init();
}
