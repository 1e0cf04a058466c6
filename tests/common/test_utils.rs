use llm_inference_client::{
    Result,
    config::ClientConfig,
    llm::{Conversation, OutputSchema},
};
use serde_json::json;
use tempfile::TempDir;
use tokio::fs;

/// Create a client configuration with zero retry delay
pub fn create_test_config(base_url: &str) -> ClientConfig {
    ClientConfig::new(base_url, "qwen2.5-coder:32b", "qwen3:30b")
        .with_retry_delay_secs(0.0)
        .with_timeout_secs(5)
}

pub fn create_test_conversation() -> Conversation {
    Conversation::from_prompt(
        "You are an expert Java test engineer.",
        "Generate test scenarios for Calculator.add(int, int).",
    )
}

pub fn create_scenarios_schema() -> OutputSchema {
    OutputSchema::new(json!({
        "type": "object",
        "properties": {
            "scenarios": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["scenarios"]
    }))
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}
