use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: ClientConfig,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub report_path: Option<String>,
}

/// Connection and retry settings for one inference client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub code_model: String,
    pub non_code_model: String,
    #[serde(default)]
    pub bug_hunting_model: Option<String>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_num_ctx")]
    pub num_ctx: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        code_model: impl Into<String>,
        non_code_model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            code_model: code_model.into(),
            non_code_model: non_code_model.into(),
            bug_hunting_model: None,
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            timeout_secs: default_timeout_secs(),
            num_ctx: default_num_ctx(),
        }
    }

    pub fn with_bug_hunting_model(mut self, model: impl Into<String>) -> Self {
        self.bug_hunting_model = Some(model.into());
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay_secs(mut self, secs: f64) -> Self {
        self.retry_delay_secs = secs;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_num_ctx(mut self, num_ctx: u32) -> Self {
        self.num_ctx = num_ctx;
        self
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Falls back to the non-code model when no bug-hunting model is set.
    pub fn bug_hunting_model(&self) -> &str {
        self.bug_hunting_model
            .as_deref()
            .unwrap_or(&self.non_code_model)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::config("base_url must not be empty"));
        }
        if self.code_model.trim().is_empty() {
            return Err(Error::config("code_model must not be empty"));
        }
        if self.non_code_model.trim().is_empty() {
            return Err(Error::config("non_code_model must not be empty"));
        }
        if matches!(&self.bug_hunting_model, Some(model) if model.trim().is_empty()) {
            return Err(Error::config("bug_hunting_model must not be empty when set"));
        }
        if self.max_retries == 0 {
            return Err(Error::config("max_retries must be at least 1"));
        }
        // Also bounds the delay so `retry_delay()` cannot overflow `Duration`.
        if Duration::try_from_secs_f64(self.retry_delay_secs).is_err() {
            return Err(Error::config(format!(
                "retry_delay_secs must be a non-negative number of seconds, got {}",
                self.retry_delay_secs
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> f64 {
    5.0
}

fn default_timeout_secs() -> u64 {
    90
}

fn default_num_ctx() -> u32 {
    32000
}

fn default_log_level() -> String {
    "info".to_string()
}
