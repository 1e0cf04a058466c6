mod types;

pub use types::*;

use crate::Result;
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    load_from(&config_path).await
}

pub async fn load_from(config_path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    let mut config: Config = serde_yaml::from_str(&config_str)?;

    if let Ok(base_url) = env::var("LLM_BASE_URL") {
        debug!("Overriding base_url from LLM_BASE_URL: {}", base_url);
        config.llm.base_url = base_url;
    }

    config.llm.validate()?;

    Ok(config)
}
