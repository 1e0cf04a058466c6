use super::types::TRUNCATION_MARKER;
use thiserror::Error;

/// Why a single attempt produced no usable content. Always retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error("transport failure{}: {reason}", status_suffix(.status))]
    TransportFailure { status: Option<u16>, reason: String },

    #[error("request timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    #[error("empty response")]
    EmptyResponse,

    #[error("response truncated ({length} chars)")]
    TruncatedResponse { length: usize },

    #[error("malformed structured output: {reason}")]
    MalformedStructuredOutput { reason: String },
}

impl AttemptFailure {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::TransportFailure {
            status: None,
            reason: reason.into(),
        }
    }

    pub fn http_status(status: u16, reason: impl Into<String>) -> Self {
        Self::TransportFailure {
            status: Some(status),
            reason: reason.into(),
        }
    }

    /// True for failures raised before any content was read.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::TransportFailure { .. } | Self::Timeout { .. })
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Classifies content that arrived with a successful status.
///
/// Empty and truncated content is rejected for every call; structured calls
/// additionally require the content to parse as JSON.
pub fn check_content(content: &str, structured: bool) -> Result<(), AttemptFailure> {
    if content.is_empty() {
        return Err(AttemptFailure::EmptyResponse);
    }

    if content.ends_with(TRUNCATION_MARKER) {
        return Err(AttemptFailure::TruncatedResponse {
            length: content.chars().count(),
        });
    }

    if structured {
        serde_json::from_str::<serde_json::Value>(content).map_err(|e| {
            AttemptFailure::MalformedStructuredOutput {
                reason: e.to_string(),
            }
        })?;
    }

    Ok(())
}
