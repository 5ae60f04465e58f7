//! Connectivity probes and the aggregated health report.

pub mod probes;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Ok,
    Error,
}

/// Outcome of one probe. Failures become data here, never errors.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ProbeResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Ok,
            message: message.into(),
            detail: None,
        }
    }

    pub fn ok_with_detail(message: impl Into<String>, detail: Value) -> Self {
        Self {
            status: ProbeStatus::Ok,
            message: message.into(),
            detail: Some(detail),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Error,
            message: message.into(),
            detail: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ProbeStatus::Ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Ok,
    Degraded,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub timestamp: DateTime<Utc>,
    pub probes: BTreeMap<String, ProbeResult>,
    pub overall: OverallStatus,
    pub response_time_ms: u64,
}

/// One independent connectivity or configuration check against a single
/// external dependency. Implementations convert their own failures into an
/// error [`ProbeResult`] at the probe boundary.
#[async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> &str;
    async fn run(&self) -> ProbeResult;
}

pub struct HealthAggregator {
    probes: Vec<Box<dyn Probe>>,
}

impl HealthAggregator {
    pub fn new(probes: Vec<Box<dyn Probe>>) -> Self {
        Self { probes }
    }

    /// Run every probe concurrently and wait for all of them to settle.
    /// One probe's failure never hides another's result, and the aggregate
    /// call itself always produces a complete report. `overall` is ok iff
    /// every probe is ok.
    pub async fn check_all(&self) -> HealthReport {
        let start = Instant::now();
        let timestamp = Utc::now();

        let outcomes = join_all(self.probes.iter().map(|p| p.run())).await;

        let mut probes = BTreeMap::new();
        for (probe, result) in self.probes.iter().zip(outcomes) {
            probes.insert(probe.name().to_string(), result);
        }

        let overall = if probes.values().all(ProbeResult::is_ok) {
            OverallStatus::Ok
        } else {
            OverallStatus::Degraded
        };

        let response_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Health check completed in {}ms: {:?}",
            response_time_ms, overall
        );

        HealthReport {
            timestamp,
            probes,
            overall,
            response_time_ms,
        }
    }
}
