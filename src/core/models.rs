use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;

/// Output of the summarizer capability. The pipeline imposes no structure
/// beyond the text itself; all formatting rules downstream are string-level.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub text: String,
}

/// Result of a fully successful dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub last_message_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Fetch,
    CheckChanged,
    Analyze,
    Format,
    Dispatch,
    CommitDigest,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::CheckChanged => "check_changed",
            Stage::Analyze => "analyze",
            Stage::Format => "format",
            Stage::Dispatch => "dispatch",
            Stage::CommitDigest => "commit_digest",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub stage: Stage,
    pub elapsed_ms: u64,
}

impl StageTiming {
    pub fn since(stage: Stage, start: Instant) -> Self {
        Self {
            stage,
            elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum RunOutcome {
    /// The feed matched the last committed digest; nothing was sent.
    NoChange,
    Delivered {
        chunks: usize,
        message_id: Option<i64>,
    },
}

/// Per-run observability record. Never consulted for control decisions.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub stages: Vec<StageTiming>,
    pub outcome: RunOutcome,
}
