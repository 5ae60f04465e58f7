use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use trendbot::core::models::{AnalysisResult, RunOutcome, Stage};
use trendbot::digest::{digest, DigestStore, InMemoryDigestStore};
use trendbot::errors::{BotError, SendError};
use trendbot::pipeline::dispatch::{Dispatcher, MessageSink};
use trendbot::pipeline::{ContentSource, DeliveryMode, Pipeline, RunObserver, Summarizer};

/// End-to-end pipeline tests over in-memory fakes: idempotent skip,
/// commit ordering, force mode and the observer hook.

struct FixedSource {
    text: String,
}

#[async_trait]
impl ContentSource for FixedSource {
    async fn fetch(&self) -> Result<String, BotError> {
        Ok(self.text.clone())
    }
}

struct CountingSummarizer {
    calls: AtomicUsize,
}

impl CountingSummarizer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Summarizer for CountingSummarizer {
    async fn summarize(&self, content: &str) -> Result<AnalysisResult, BotError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AnalysisResult {
            text: format!("digest of {} chars", content.chars().count()),
        })
    }
}

struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _content: &str) -> Result<AnalysisResult, BotError> {
        Err(BotError::Analysis("model unavailable".to_string()))
    }
}

struct RecordingSink {
    sent: Mutex<Vec<String>>,
    fail_at: Option<usize>,
}

impl RecordingSink {
    fn new(fail_at: Option<usize>) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_at,
        })
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send(&self, text: &str) -> Result<i64, SendError> {
        let attempt = self.sent.lock().unwrap().len() + 1;
        if self.fail_at == Some(attempt) {
            return Err(SendError("send refused".to_string()));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(attempt as i64)
    }
}

struct RecordingObserver {
    stages: Mutex<Vec<Stage>>,
}

impl RecordingObserver {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            stages: Mutex::new(Vec::new()),
        })
    }
}

impl RunObserver for RecordingObserver {
    fn on_stage(&self, _run_id: &str, stage: Stage, _detail: &str) {
        self.stages.lock().unwrap().push(stage);
    }
}

fn pipeline(
    content: &str,
    summarizer: Arc<dyn Summarizer>,
    sink: Arc<RecordingSink>,
    store: Arc<InMemoryDigestStore>,
) -> Pipeline {
    Pipeline::new(
        Arc::new(FixedSource {
            text: content.to_string(),
        }),
        summarizer,
        Dispatcher::new(sink).with_pacing(Duration::ZERO),
        store,
    )
}

#[tokio::test]
async fn test_first_run_delivers_and_commits() {
    let content = "hello world";
    let summarizer = CountingSummarizer::new();
    let sink = RecordingSink::new(None);
    let store = Arc::new(InMemoryDigestStore::new());

    let record = pipeline(content, summarizer.clone(), sink.clone(), store.clone())
        .run(false)
        .await
        .expect("first run should succeed");

    match record.outcome {
        RunOutcome::Delivered { chunks, message_id } => {
            assert_eq!(chunks, 1);
            assert_eq!(message_id, Some(1));
        }
        other => panic!("Expected a delivery, got {:?}", other),
    }
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        store.get().await.unwrap(),
        Some(digest(content)),
        "The new digest is committed after a successful delivery"
    );
}

#[tokio::test]
async fn test_unchanged_content_short_circuits() {
    // Scenario: the same input run twice after a successful first run.
    let content = "hello world";
    let summarizer = CountingSummarizer::new();
    let sink = RecordingSink::new(None);
    let store = Arc::new(InMemoryDigestStore::with_digest(digest(content)));

    let record = pipeline(content, summarizer.clone(), sink.clone(), store)
        .run(false)
        .await
        .expect("a no-change run is not a failure");

    assert!(matches!(record.outcome, RunOutcome::NoChange));
    assert_eq!(
        summarizer.calls.load(Ordering::SeqCst),
        0,
        "The summarizer must not be invoked when nothing changed"
    );
    assert!(
        sink.sent.lock().unwrap().is_empty(),
        "Nothing may be dispatched when nothing changed"
    );
}

#[tokio::test]
async fn test_force_run_bypasses_the_change_check() {
    let content = "hello world";
    let summarizer = CountingSummarizer::new();
    let sink = RecordingSink::new(None);
    let store = Arc::new(InMemoryDigestStore::with_digest(digest(content)));

    let record = pipeline(content, summarizer.clone(), sink.clone(), store)
        .run(true)
        .await
        .expect("a forced run should proceed");

    assert!(matches!(record.outcome, RunOutcome::Delivered { .. }));
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_dispatch_failure_leaves_digest_uncommitted() {
    let content = "fresh content";
    let summarizer = CountingSummarizer::new();
    let sink = RecordingSink::new(Some(1));
    let store = Arc::new(InMemoryDigestStore::new());

    let err = pipeline(content, summarizer, sink, store.clone())
        .run(false)
        .await
        .expect_err("the run must fail when dispatch fails");

    assert!(matches!(err, BotError::Dispatch { .. }));
    assert_eq!(
        store.get().await.unwrap(),
        None,
        "A failed run leaves the persisted digest untouched so the next trigger retries"
    );
}

#[tokio::test]
async fn test_analysis_failure_terminates_the_run() {
    let summarizer = Arc::new(FailingSummarizer);
    let sink = RecordingSink::new(None);
    let store = Arc::new(InMemoryDigestStore::new());

    let err = pipeline("some content", summarizer, sink.clone(), store.clone())
        .run(false)
        .await
        .expect_err("an analysis fault must terminate the run");

    assert!(matches!(err, BotError::Analysis(_)));
    assert!(
        sink.sent.lock().unwrap().is_empty(),
        "Nothing may be dispatched after a failed analysis"
    );
    assert_eq!(store.get().await.unwrap(), None);
}

#[tokio::test]
async fn test_long_digest_is_chunked_and_fully_delivered() {
    struct LongSummarizer;

    #[async_trait]
    impl Summarizer for LongSummarizer {
        async fn summarize(&self, _content: &str) -> Result<AnalysisResult, BotError> {
            Ok(AnalysisResult {
                text: format!("{}\n", "w".repeat(79)).repeat(120),
            })
        }
    }

    let sink = RecordingSink::new(None);
    let store = Arc::new(InMemoryDigestStore::new());

    let record = pipeline("feed", Arc::new(LongSummarizer), sink.clone(), store)
        .run(false)
        .await
        .unwrap();

    match record.outcome {
        RunOutcome::Delivered { chunks, .. } => {
            assert!(chunks >= 3, "9600 chars must not fit in 2 chunks");
            assert_eq!(sink.sent.lock().unwrap().len(), chunks);
        }
        other => panic!("Expected a delivery, got {:?}", other),
    }
}

#[tokio::test]
async fn test_single_mode_truncates_instead_of_chunking() {
    struct LongSummarizer;

    #[async_trait]
    impl Summarizer for LongSummarizer {
        async fn summarize(&self, _content: &str) -> Result<AnalysisResult, BotError> {
            Ok(AnalysisResult {
                text: "v".repeat(5000),
            })
        }
    }

    let sink = RecordingSink::new(None);
    let store = Arc::new(InMemoryDigestStore::new());

    let record = pipeline("feed", Arc::new(LongSummarizer), sink.clone(), store)
        .with_mode(DeliveryMode::Single)
        .run(false)
        .await
        .unwrap();

    assert!(matches!(
        record.outcome,
        RunOutcome::Delivered { chunks: 1, .. }
    ));

    let sent = sink.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].chars().count() <= trendbot::formatting::MESSAGE_LIMIT);
    assert!(sent[0].ends_with(trendbot::formatting::TRUNCATION_MARKER));
}

#[tokio::test]
async fn test_observer_sees_the_stage_sequence() {
    let summarizer = CountingSummarizer::new();
    let sink = RecordingSink::new(None);
    let store = Arc::new(InMemoryDigestStore::new());
    let observer = RecordingObserver::new();

    pipeline("content", summarizer, sink, store)
        .with_observer(observer.clone())
        .run(false)
        .await
        .unwrap();

    let stages = observer.stages.lock().unwrap();
    let expected = [
        Stage::Fetch,
        Stage::CheckChanged,
        Stage::Analyze,
        Stage::Format,
        Stage::Dispatch,
        Stage::CommitDigest,
    ];
    for stage in expected {
        assert!(
            stages.contains(&stage),
            "Observer should see stage {:?}, saw {:?}",
            stage,
            *stages
        );
    }

    let dispatch_pos = stages.iter().position(|s| *s == Stage::Dispatch).unwrap();
    let commit_pos = stages
        .iter()
        .position(|s| *s == Stage::CommitDigest)
        .unwrap();
    assert!(
        dispatch_pos < commit_pos,
        "The digest commit must come after dispatch"
    );
}

#[tokio::test]
async fn test_stage_timings_cover_every_executed_stage() {
    let summarizer = CountingSummarizer::new();
    let sink = RecordingSink::new(None);
    let store = Arc::new(InMemoryDigestStore::new());

    let record = pipeline("content", summarizer, sink, store)
        .run(false)
        .await
        .unwrap();

    let recorded: Vec<Stage> = record.stages.iter().map(|t| t.stage).collect();
    assert_eq!(
        recorded,
        vec![
            Stage::Fetch,
            Stage::CheckChanged,
            Stage::Analyze,
            Stage::Format,
            Stage::Dispatch,
            Stage::CommitDigest,
        ]
    );
}
