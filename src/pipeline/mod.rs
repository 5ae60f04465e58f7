//! Pipeline orchestration: fetch → change check → analyze → format →
//! dispatch → digest commit.

pub mod dispatch;

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::core::models::{AnalysisResult, RunOutcome, RunRecord, Stage, StageTiming};
use crate::digest::{has_changed, ContentSnapshot, DigestStore};
use crate::errors::BotError;
use crate::formatting::{format_single, split_into_chunks, Chunk, CHUNK_BUDGET, MESSAGE_LIMIT};
use self::dispatch::Dispatcher;

/// Raw text for the configured feed identifier.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self) -> Result<String, BotError>;
}

/// Text condensation behind a fixed instruction contract. Which trends
/// matter is decided entirely on the other side of this seam.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, content: &str) -> Result<AnalysisResult, BotError>;
}

/// Stage-transition hook for structured step logging.
pub trait RunObserver: Send + Sync {
    fn on_stage(&self, run_id: &str, stage: Stage, detail: &str);
}

/// Default observer: one tracing line per stage transition.
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn on_stage(&self, run_id: &str, stage: Stage, detail: &str) {
        info!(run_id, stage = stage.as_str(), "{}", detail);
    }
}

/// How the digest text is fitted to the channel limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// One message, truncated at the hard ceiling when needed.
    Single,
    /// Ordered chunks, split at the chunk budget.
    Chunked,
}

pub struct Pipeline {
    source: Arc<dyn ContentSource>,
    summarizer: Arc<dyn Summarizer>,
    dispatcher: Dispatcher,
    store: Arc<dyn DigestStore>,
    mode: DeliveryMode,
    observer: Arc<dyn RunObserver>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn ContentSource>,
        summarizer: Arc<dyn Summarizer>,
        dispatcher: Dispatcher,
        store: Arc<dyn DigestStore>,
    ) -> Self {
        Self {
            source,
            summarizer,
            dispatcher,
            store,
            mode: DeliveryMode::Chunked,
            observer: Arc::new(LogObserver),
        }
    }

    pub fn with_mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Execute one end-to-end run. Stages are strictly sequential and a
    /// stage failure terminates the run with the causing error; the new
    /// digest is committed only after every chunk is delivered, so a failed
    /// run re-evaluates the same content as changed on the next trigger.
    ///
    /// `force` skips the change check (the manual-trigger path) and always
    /// proceeds to analysis.
    ///
    /// Callers must serialize runs: the digest slot expects one writer at a
    /// time and concurrent overlapping runs are undefined.
    pub async fn run(&self, force: bool) -> Result<RunRecord, BotError> {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let mut stages: Vec<StageTiming> = Vec::new();

        self.observer
            .on_stage(&run_id, Stage::Fetch, "Fetching content source");
        let stage_start = Instant::now();
        let text = self.source.fetch().await?;
        let snapshot = ContentSnapshot::new(text);
        stages.push(StageTiming::since(Stage::Fetch, stage_start));
        self.observer.on_stage(
            &run_id,
            Stage::Fetch,
            &format!("Fetched {} chars", snapshot.text.chars().count()),
        );

        if force {
            self.observer.on_stage(
                &run_id,
                Stage::CheckChanged,
                "Force run, skipping change check",
            );
        } else {
            let stage_start = Instant::now();
            let last = self.store.get().await?;
            let changed = has_changed(&snapshot, last.as_deref());
            stages.push(StageTiming::since(Stage::CheckChanged, stage_start));
            if !changed {
                self.observer
                    .on_stage(&run_id, Stage::CheckChanged, "No changes detected");
                return Ok(RunRecord {
                    run_id,
                    started_at,
                    stages,
                    outcome: RunOutcome::NoChange,
                });
            }
            self.observer
                .on_stage(&run_id, Stage::CheckChanged, "Content changed");
        }

        self.observer
            .on_stage(&run_id, Stage::Analyze, "Requesting digest");
        let stage_start = Instant::now();
        let analysis = self.summarizer.summarize(&snapshot.text).await?;
        stages.push(StageTiming::since(Stage::Analyze, stage_start));
        self.observer.on_stage(
            &run_id,
            Stage::Analyze,
            &format!(
                "Analysis completed ({} chars in, {} chars out)",
                snapshot.text.chars().count(),
                analysis.text.chars().count()
            ),
        );

        let stage_start = Instant::now();
        let chunks = self.format_chunks(&analysis);
        stages.push(StageTiming::since(Stage::Format, stage_start));
        self.observer.on_stage(
            &run_id,
            Stage::Format,
            &format!("Formatted into {} chunk(s)", chunks.len()),
        );

        self.observer
            .on_stage(&run_id, Stage::Dispatch, "Sending to channel");
        let stage_start = Instant::now();
        let report = self.dispatcher.deliver(&chunks).await?;
        stages.push(StageTiming::since(Stage::Dispatch, stage_start));
        self.observer.on_stage(
            &run_id,
            Stage::Dispatch,
            &format!("Delivered {} chunk(s)", report.delivered),
        );

        let stage_start = Instant::now();
        self.store.set(&snapshot.digest).await?;
        stages.push(StageTiming::since(Stage::CommitDigest, stage_start));
        self.observer
            .on_stage(&run_id, Stage::CommitDigest, "Committed new digest");

        Ok(RunRecord {
            run_id,
            started_at,
            stages,
            outcome: RunOutcome::Delivered {
                chunks: report.delivered,
                message_id: report.last_message_id,
            },
        })
    }

    fn format_chunks(&self, analysis: &AnalysisResult) -> Vec<Chunk> {
        match self.mode {
            DeliveryMode::Single => {
                let text = format_single(&analysis.text, MESSAGE_LIMIT);
                vec![Chunk {
                    text,
                    index: 1,
                    total: 1,
                }]
            }
            DeliveryMode::Chunked => split_into_chunks(analysis.text.trim(), CHUNK_BUDGET),
        }
    }
}
