use crate::llm::AttemptFailure;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed after {attempts} attempts: {last_failure}")]
    RetriesExhausted {
        attempts: u32,
        last_failure: AttemptFailure,
    },

    #[error("Failed to get valid JSON after {attempts} attempts: {last_failure}")]
    SchemaValidationExhausted {
        attempts: u32,
        last_failure: AttemptFailure,
    },
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The failure observed on the final attempt of an exhausted call.
    pub fn last_failure(&self) -> Option<&AttemptFailure> {
        match self {
            Self::RetriesExhausted { last_failure, .. }
            | Self::SchemaValidationExhausted { last_failure, .. } => Some(last_failure),
            _ => None,
        }
    }

    /// Number of attempts consumed before giving up.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::RetriesExhausted { attempts, .. }
            | Self::SchemaValidationExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts().is_some()
    }
}
