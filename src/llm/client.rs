use super::failure::{AttemptFailure, check_content};
use super::metrics::{AttemptRecord, Metrics, MetricsSink, MetricsSnapshot};
use super::transport::{HttpTransport, Transport};
use super::types::{ChatPayload, Conversation, OutputSchema, TaskKind};
use crate::{Error, Result, config::ClientConfig};
use chrono::Utc;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

/// Chat client for a local inference server with bounded retries.
///
/// Every attempt, successful or not, is counted in the client's metrics.
/// Individual attempt failures stay inside the client; callers see either
/// content or a terminal [`Error::RetriesExhausted`] /
/// [`Error::SchemaValidationExhausted`].
pub struct InferenceClient {
    config: ClientConfig,
    transport: Box<dyn Transport>,
    metrics: Metrics,
    sink: Option<Arc<dyn MetricsSink>>,
}

impl InferenceClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.base_url.clone(), config.timeout())?;
        Self::with_transport(config, Box::new(transport))
    }

    pub fn with_transport(config: ClientConfig, transport: Box<dyn Transport>) -> Result<Self> {
        config.validate()?;

        debug!(
            "Creating inference client for {} (code: {}, non-code: {}, retries: {})",
            config.base_url, config.code_model, config.non_code_model, config.max_retries
        );

        Ok(Self {
            config,
            transport,
            metrics: Metrics::new(),
            sink: None,
        })
    }

    pub fn with_metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn bug_hunting_model(&self) -> &str {
        self.config.bug_hunting_model()
    }

    pub fn select_model<'a>(&'a self, model: Option<&'a str>, task: TaskKind) -> &'a str {
        match (model, task) {
            (Some(model), _) => model,
            (None, TaskKind::Code) => &self.config.code_model,
            (None, TaskKind::NonCode) => &self.config.non_code_model,
        }
    }

    /// Sends a free-form request and returns the raw content.
    ///
    /// If every attempt came back empty the result is an empty string.
    pub async fn call_unstructured(
        &self,
        conversation: &Conversation,
        model: Option<&str>,
        task: TaskKind,
    ) -> Result<String> {
        let payload = ChatPayload::new(
            self.select_model(model, task),
            conversation,
            None,
            self.config.num_ctx,
        );
        self.execute(&payload).await
    }

    /// Sends a schema-constrained request and returns content that parses as JSON.
    ///
    /// The content is returned undecoded; conformance to `schema` is not checked.
    pub async fn call_structured(
        &self,
        conversation: &Conversation,
        schema: &OutputSchema,
        model: Option<&str>,
        task: TaskKind,
    ) -> Result<String> {
        let payload = ChatPayload::new(
            self.select_model(model, task),
            conversation,
            Some(schema),
            self.config.num_ctx,
        );
        self.execute(&payload).await
    }

    pub fn get_metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn execute(&self, payload: &ChatPayload) -> Result<String> {
        let call_id = Uuid::new_v4();
        let span = info_span!(
            "llm_call",
            %call_id,
            model = %payload.model,
            structured = payload.is_structured()
        );

        self.retry_loop(call_id, payload).instrument(span).await
    }

    async fn retry_loop(&self, call_id: Uuid, payload: &ChatPayload) -> Result<String> {
        let max_attempts = self.config.max_retries;
        let structured = payload.is_structured();
        let mut last_failure = AttemptFailure::EmptyResponse;

        for attempt in 1..=max_attempts {
            let started = Instant::now();
            let sent = self.transport.send(payload).await;
            let elapsed = started.elapsed();
            self.metrics.record(elapsed);

            let outcome = sent.and_then(|content| {
                check_content(&content, structured)?;
                Ok(content)
            });

            if let Some(sink) = &self.sink {
                sink.record_attempt(&AttemptRecord {
                    call_id,
                    attempt,
                    max_attempts,
                    model: payload.model.clone(),
                    structured,
                    elapsed,
                    failure: outcome.as_ref().err().cloned(),
                    recorded_at: Utc::now(),
                });
            }

            let failure = match outcome {
                Ok(content) => {
                    debug!(
                        "Received {} chars on attempt {}/{}",
                        content.len(),
                        attempt,
                        max_attempts
                    );
                    return Ok(content);
                }
                Err(failure) => failure,
            };

            if let AttemptFailure::TruncatedResponse { .. } = failure {
                warn!("Response appears to be truncated ({})", failure);
            }

            if attempt < max_attempts {
                debug!(
                    "Attempt {}/{} failed: {}, retrying in {:?}",
                    attempt,
                    max_attempts,
                    failure,
                    self.config.retry_delay()
                );
                tokio::time::sleep(self.config.retry_delay()).await;
            }

            last_failure = failure;
        }

        self.exhausted(max_attempts, structured, last_failure)
    }

    fn exhausted(
        &self,
        attempts: u32,
        structured: bool,
        last_failure: AttemptFailure,
    ) -> Result<String> {
        match last_failure {
            AttemptFailure::EmptyResponse if !structured => {
                warn!("No content after {} attempts, returning empty response", attempts);
                Ok(String::new())
            }
            AttemptFailure::MalformedStructuredOutput { .. } => {
                warn!("Failed to get valid JSON after {} attempts", attempts);
                Err(Error::SchemaValidationExhausted {
                    attempts,
                    last_failure,
                })
            }
            _ => {
                warn!("Giving up after {} attempts: {}", attempts, last_failure);
                Err(Error::RetriesExhausted {
                    attempts,
                    last_failure,
                })
            }
        }
    }
}
