//! `mt-quality` binary entry point.
//!
//! Usage: `mt-quality <input.json>`
//!
//! Reads an evaluation input, runs the judgment pipeline and prints the
//! final state and report as JSON on stdout. All logs go to stderr.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::sync::Arc;

use mt_quality::config::{Config, LogFormat};
use mt_quality::error::{AppError, ConfigError};
use mt_quality::judge::LlmJudge;
use mt_quality::llm::OpenAiClient;
use mt_quality::metrics::MetricsCollector;
use mt_quality::model::EvaluationInput;
use mt_quality::pipeline::Evaluator;
use mt_quality::scoring::QualityReport;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(level: &str, format: LogFormat) {
    let filter = level.parse().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
            .init(),
    }
}

async fn run(config: &Config, path: &str) -> Result<serde_json::Value, AppError> {
    let input = EvaluationInput::from_path(path)?;
    let metrics = Arc::new(MetricsCollector::new());

    let client = OpenAiClient::new(config.api_key.expose(), config.client_config())?;
    let judge = Arc::new(LlmJudge::new(client));
    let evaluator = Evaluator::new(
        judge,
        config.executor_config().with_metrics(Arc::clone(&metrics)),
    )?;

    let state = evaluator.evaluate(input).await?;
    let report = QualityReport::from_state(&state);

    let summary = metrics.summary();
    tracing::info!(
        invocations = summary.total_invocations,
        success_rate = summary.overall_success_rate,
        "Judgment task metrics"
    );

    Ok(serde_json::json!({ "state": state, "report": report }))
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_logging("info", LogFormat::Text);
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    init_logging(&config.log_level, config.log_format);

    let Some(path) = std::env::args().nth(1) else {
        let e = ConfigError::MissingRequired {
            var: "input path (usage: mt-quality <input.json>)".into(),
        };
        tracing::error!("{e}");
        std::process::exit(1);
    };

    tracing::info!(model = %config.model, input = %path, "mt-quality starting");

    match run(&config, &path).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                tracing::error!("Failed to serialize result: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}
