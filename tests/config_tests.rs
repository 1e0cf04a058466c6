use llm_inference_client::{Error, config};
use pretty_assertions::assert_eq;
use std::time::Duration;

mod common;
use common::test_utils::{create_temp_dir, create_test_config_file};

#[tokio::test]
async fn test_load_full_config() {
    let dir = create_temp_dir();
    let path = create_test_config_file(
        &dir,
        r#"
llm:
  base_url: "http://localhost:11435/api/chat"
  code_model: "qwen2.5-coder:32b"
  non_code_model: "qwen3:30b"
  bug_hunting_model: "deepseek-r1:14b"
  max_retries: 5
  retry_delay_secs: 0.5
  timeout_secs: 120
logs:
  level: "debug"
report_path: "run_report.json"
"#,
    )
    .await
    .unwrap();

    let config = config::load_from(&path).await.unwrap();

    assert_eq!(config.llm.max_retries, 5);
    assert_eq!(config.llm.retry_delay(), Duration::from_millis(500));
    assert_eq!(config.llm.timeout(), Duration::from_secs(120));
    assert_eq!(config.llm.bug_hunting_model(), "deepseek-r1:14b");
    assert_eq!(config.logs.level, "debug");
    assert_eq!(config.report_path.as_deref(), Some("run_report.json"));
}

#[tokio::test]
async fn test_load_minimal_config_uses_defaults() {
    let dir = create_temp_dir();
    let path = create_test_config_file(
        &dir,
        r#"
llm:
  base_url: "http://localhost:11434/api/chat"
  code_model: "codellama"
  non_code_model: "llama3"
"#,
    )
    .await
    .unwrap();

    let config = tokio_test::assert_ok!(config::load_from(&path).await);

    assert_eq!(config.llm.max_retries, 3);
    assert_eq!(config.llm.retry_delay(), Duration::from_secs(5));
    assert_eq!(config.llm.timeout(), Duration::from_secs(90));
    assert_eq!(config.llm.num_ctx, 32000);
    assert_eq!(config.logs.level, "info");
    assert!(config.report_path.is_none());
}

#[tokio::test]
async fn test_load_rejects_invalid_values() {
    let dir = create_temp_dir();
    let path = create_test_config_file(
        &dir,
        r#"
llm:
  base_url: "http://localhost:11434/api/chat"
  code_model: "codellama"
  non_code_model: "llama3"
  max_retries: 0
"#,
    )
    .await
    .unwrap();

    let result = config::load_from(&path).await;
    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn test_load_missing_required_field() {
    let dir = create_temp_dir();
    let path = create_test_config_file(
        &dir,
        r#"
llm:
  base_url: "http://localhost:11434/api/chat"
  code_model: "codellama"
"#,
    )
    .await
    .unwrap();

    let result = config::load_from(&path).await;
    assert!(matches!(result, Err(Error::Yaml(_))));
}

#[tokio::test]
async fn test_load_missing_file() {
    let result = config::load_from("/nonexistent/config.yaml").await;
    assert!(matches!(result, Err(Error::Io(_))));
}
