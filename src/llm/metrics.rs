use super::failure::AttemptFailure;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Point-in-time copy of the client's cumulative counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub request_count: u64,
    /// Seconds, summed over every attempt.
    pub total_response_time: f64,
}

#[derive(Debug, Default)]
struct Totals {
    request_count: u64,
    total_response_time: Duration,
}

/// Request counters shared by every call made through one client.
#[derive(Debug, Default)]
pub struct Metrics {
    totals: Mutex<Totals>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one attempt and adds its duration as a single step.
    pub fn record(&self, elapsed: Duration) {
        let mut totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        totals.request_count += 1;
        totals.total_response_time += elapsed;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        MetricsSnapshot {
            request_count: totals.request_count,
            total_response_time: totals.total_response_time.as_secs_f64(),
        }
    }
}

/// What happened on one attempt, as reported to a [`MetricsSink`].
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    pub call_id: Uuid,
    pub attempt: u32,
    pub max_attempts: u32,
    pub model: String,
    pub structured: bool,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    #[serde(serialize_with = "serialize_failure")]
    pub failure: Option<AttemptFailure>,
    pub recorded_at: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

fn serialize_secs<S: serde::Serializer>(
    elapsed: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

fn serialize_failure<S: serde::Serializer>(
    failure: &Option<AttemptFailure>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match failure {
        Some(failure) => serializer.serialize_some(&failure.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Optional observer notified after every attempt.
pub trait MetricsSink: Send + Sync {
    fn record_attempt(&self, record: &AttemptRecord);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub llm_models: BTreeSet<String>,
    pub llm_requests: u64,
    pub llm_response_time: f64,
    pub attempts: Vec<AttemptSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptSummary {
    pub call_id: Uuid,
    pub attempt: u32,
    pub model: String,
    pub structured: bool,
    pub elapsed_secs: f64,
    pub failure: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Collects attempt records into a JSON run report.
#[derive(Debug, Default)]
pub struct JsonReportSink {
    records: Mutex<Vec<AttemptRecord>>,
}

impl JsonReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> RunReport {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);

        let mut report = RunReport::default();
        for record in records.iter() {
            report.llm_models.insert(record.model.clone());
            report.llm_requests += 1;
            report.llm_response_time += record.elapsed.as_secs_f64();
            report.attempts.push(AttemptSummary {
                call_id: record.call_id,
                attempt: record.attempt,
                model: record.model.clone(),
                structured: record.structured,
                elapsed_secs: record.elapsed.as_secs_f64(),
                failure: record.failure.as_ref().map(ToString::to_string),
                recorded_at: record.recorded_at,
            });
        }
        report
    }

    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.report())?;
        tokio::fs::write(path, json).await?;
        debug!("Wrote run report to {}", path.display());
        Ok(())
    }
}

impl MetricsSink for JsonReportSink {
    fn record_attempt(&self, record: &AttemptRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}
