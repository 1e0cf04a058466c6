use anyhow::{Context, Result};
use llm_inference_client::{
    config,
    llm::{Conversation, InferenceClient, JsonReportSink, OutputSchema, TaskKind},
};
use std::sync::Arc;
use tracing::info;

const USAGE: &str = "Usage: llmctl <conversation.json> [--schema <schema.json>] [--code] [--model <name>] [--bug-hunting]";

#[derive(Debug, Default)]
struct Args {
    conversation_path: String,
    schema_path: Option<String>,
    model: Option<String>,
    code_task: bool,
    bug_hunting: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut conversation_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--schema" => parsed.schema_path = Some(args.next().context("--schema needs a path")?),
            "--model" => parsed.model = Some(args.next().context("--model needs a name")?),
            "--code" => parsed.code_task = true,
            "--bug-hunting" => parsed.bug_hunting = true,
            flag if flag.starts_with("--") => anyhow::bail!("Unknown flag: {}\n{}", flag, USAGE),
            path => conversation_path = Some(path.to_string()),
        }
    }

    parsed.conversation_path = conversation_path.context(USAGE)?;
    Ok(parsed)
}

/// Rejects level strings the JSON subscriber could not filter on.
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Unknown log level '{}' (expected one of: error, warn, info, debug, trace)",
                level
            )
        })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logs.level.clone());

    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&log_level))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let conversation: Conversation = serde_json::from_str(
        &tokio::fs::read_to_string(&args.conversation_path)
            .await
            .with_context(|| format!("Failed to read {}", args.conversation_path))?,
    )
    .context("Conversation must be a JSON array of {role, content} messages")?;

    let schema = match &args.schema_path {
        Some(path) => Some(
            OutputSchema::from_json_str(&tokio::fs::read_to_string(path).await?)
                .with_context(|| format!("Invalid schema document: {}", path))?,
        ),
        None => None,
    };

    let report = Arc::new(JsonReportSink::new());
    let client = InferenceClient::new(config.llm.clone())?.with_metrics_sink(report.clone());

    let model = match (&args.model, args.bug_hunting) {
        (Some(model), _) => Some(model.as_str()),
        (None, true) => Some(client.bug_hunting_model()),
        (None, false) => None,
    };
    let task = TaskKind::from_code_flag(args.code_task);

    info!(
        "Sending {} messages to {} using model {}",
        conversation.len(),
        config.llm.base_url,
        client.select_model(model, task)
    );

    let result = match &schema {
        Some(schema) => client.call_structured(&conversation, schema, model, task).await,
        None => client.call_unstructured(&conversation, model, task).await,
    };

    let metrics = client.get_metrics();
    info!(
        request_count = metrics.request_count,
        total_response_time = metrics.total_response_time,
        "LLM metrics"
    );

    if let Some(path) = &config.report_path {
        report.write_to(path).await?;
    }

    println!("{}", result?);

    Ok(())
}
