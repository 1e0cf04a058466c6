use super::failure::AttemptFailure;
use super::types::{ChatPayload, extract_content};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// One round trip to the inference server.
///
/// Implementations return the response content (possibly empty) or the
/// failure that prevented reading it. Retrying is the caller's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, payload: &ChatPayload) -> std::result::Result<String, AttemptFailure>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    fn classify(&self, error: reqwest::Error) -> AttemptFailure {
        if error.is_timeout() {
            AttemptFailure::Timeout {
                after_secs: self.timeout.as_secs(),
            }
        } else if let Some(status) = error.status() {
            AttemptFailure::http_status(status.as_u16(), error.to_string())
        } else {
            AttemptFailure::transport(error.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: &ChatPayload) -> std::result::Result<String, AttemptFailure> {
        debug!(
            "Posting chat request for model {} with {} messages",
            payload.model,
            payload.messages.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let response = response.error_for_status().map_err(|e| self.classify(e))?;

        let body = response.text().await.map_err(|e| self.classify(e))?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok(extract_content(&value)),
            Err(e) => {
                warn!("Response body is not JSON, treating as empty: {}", e);
                Ok(String::new())
            }
        }
    }
}
