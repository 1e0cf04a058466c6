use async_trait::async_trait;
use llm_inference_client::llm::{AttemptFailure, AttemptRecord, ChatPayload, MetricsSink, Transport};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Transport that replays a fixed script of outcomes.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    pub outcomes: Arc<Mutex<VecDeque<Result<String, AttemptFailure>>>>,
    pub requests: Arc<Mutex<Vec<ChatPayload>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcomes(self, outcomes: Vec<Result<&str, AttemptFailure>>) -> Self {
        *self.outcomes.lock().unwrap() = outcomes
            .into_iter()
            .map(|outcome| outcome.map(str::to_string))
            .collect();
        self
    }

    pub fn get_requests(&self) -> Vec<ChatPayload> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, payload: &ChatPayload) -> Result<String, AttemptFailure> {
        self.requests.lock().unwrap().push(payload.clone());

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AttemptFailure::transport("No more scripted outcomes")))
    }
}

/// Sink that keeps every attempt record for inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<AttemptRecord>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<AttemptRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl MetricsSink for RecordingSink {
    fn record_attempt(&self, record: &AttemptRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}
