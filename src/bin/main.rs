use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use trendbot::clients::{LlmClient, SourceClient, TelegramClient};
use trendbot::core::config::AppConfig;
use trendbot::digest::FileDigestStore;
use trendbot::health::probes::{
    BotIdentityProbe, ChannelAccessProbe, EnvProbe, SourceProbe, SummarizerProbe,
};
use trendbot::health::{HealthAggregator, Probe};
use trendbot::pipeline::dispatch::Dispatcher;
use trendbot::pipeline::Pipeline;

const DEFAULT_DIGEST_PATH: &str = "trendbot_digest";

#[tokio::main]
async fn main() -> Result<()> {
    trendbot::setup_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("run");

    match command {
        "run" => {
            let force = args.iter().any(|a| a == "--force");
            run_pipeline(force).await
        }
        "health" => run_health().await,
        other => anyhow::bail!("Unknown command: {} (expected `run [--force]` or `health`)", other),
    }
}

async fn run_pipeline(force: bool) -> Result<()> {
    let config = AppConfig::from_env()?;

    let telegram = Arc::new(TelegramClient::new(
        config.telegram_bot_token.clone(),
        config.telegram_channel_id.clone(),
    ));
    let store_path = config
        .digest_state_path
        .clone()
        .unwrap_or_else(|| DEFAULT_DIGEST_PATH.to_string());

    let pipeline = Pipeline::new(
        Arc::new(SourceClient::new(config.source_url.clone())),
        Arc::new(LlmClient::new(
            config.openrouter_api_key.clone(),
            config.model.clone(),
        )),
        Dispatcher::new(telegram),
        Arc::new(FileDigestStore::new(store_path)),
    );

    let record = pipeline.run(force).await?;
    info!("Run {} finished: {:?}", record.run_id, record.outcome);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn run_health() -> Result<()> {
    // The health surface reports on missing configuration instead of
    // failing on it, so clients are built from whatever is present.
    let config = AppConfig::from_env();

    let mut probes: Vec<Box<dyn Probe>> = vec![Box::new(EnvProbe::new())];

    if let Ok(config) = &config {
        let telegram = Arc::new(TelegramClient::new(
            config.telegram_bot_token.clone(),
            config.telegram_channel_id.clone(),
        ));
        probes.push(Box::new(BotIdentityProbe::new(Arc::clone(&telegram))));
        probes.push(Box::new(ChannelAccessProbe::new(telegram)));
        probes.push(Box::new(SummarizerProbe::new(Arc::new(LlmClient::new(
            config.openrouter_api_key.clone(),
            config.model.clone(),
        )))));
        probes.push(Box::new(SourceProbe::new(Arc::new(SourceClient::new(
            config.source_url.clone(),
        )))));
    }

    let report = HealthAggregator::new(probes).check_all().await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
