//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading (a `.env` file is read first if present)
//! - Configuration validation
//! - Default value handling
//! - Secure API key storage via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use mt_quality::config::{Config, SecretString};
//!
//! // Use Config::from_env() in production
//! let config = Config::new(SecretString::new("sk-proj-example"));
//! assert_eq!(config.model, "gpt-4.1-mini");
//!
//! let debug = format!("{config:?}");
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("sk-proj-example"));
//! ```

mod secret;
mod validation;

pub use secret::SecretString;
pub use validation::{validate_config, MAX_CONCURRENCY, MAX_RETRIES, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};

use std::str::FromStr;
use std::time::Duration;

use crate::engine::ExecutorConfig;
use crate::error::ConfigError;
use crate::llm::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT_MS};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Newline-delimited JSON.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                var: "LOG_FORMAT".into(),
                reason: format!("expected text or json, got {other}"),
            }),
        }
    }
}

/// Application configuration.
///
/// Use [`Config::from_env`] to load it from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API key (protected from logging via [`SecretString`]).
    pub api_key: SecretString,
    /// Chat-completions API base URL.
    pub base_url: String,
    /// Judgment model.
    pub model: String,
    /// Log filter (error, warn, info, debug, trace, or a directive list).
    pub log_level: String,
    /// Log line format.
    pub log_format: LogFormat,
    /// HTTP request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Maximum retry attempts per completion request.
    pub max_retries: u32,
    /// Maximum concurrently running judgment tasks; unbounded when unset.
    pub max_concurrency: Option<usize>,
    /// Optional per-task timeout in milliseconds.
    pub task_timeout_ms: Option<u64>,
}

impl Config {
    /// Configuration with defaults for everything but the API key.
    #[must_use]
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            log_level: DEFAULT_LOG_LEVEL.into(),
            log_format: LogFormat::Text,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            max_concurrency: None,
            task_timeout_ms: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OPENAI_API_KEY`
    ///
    /// Optional (with defaults):
    /// - `OPENAI_BASE_URL` (default: `https://api.openai.com/v1`)
    /// - `MT_MODEL` (default: `gpt-4.1-mini`)
    /// - `LOG_LEVEL` (default: `info`)
    /// - `LOG_FORMAT` (`text` or `json`, default: `text`)
    /// - `REQUEST_TIMEOUT_MS` (default: `60000`)
    /// - `MAX_RETRIES` (default: `3`)
    /// - `MAX_CONCURRENCY` (default: unbounded)
    /// - `TASK_TIMEOUT_MS` (default: unset)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `OPENAI_API_KEY` is missing, a numeric
    /// variable does not parse, or a value fails [`validate_config`].
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ConfigError::MissingRequired {
            var: "OPENAI_API_KEY".into(),
        })?;

        let config = Self {
            api_key: SecretString::new(api_key),
            base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            model: env_or("MT_MODEL", DEFAULT_MODEL),
            log_level: env_or("LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_format: std::env::var("LOG_FORMAT")
                .map_or(Ok(LogFormat::Text), |v| v.parse())?,
            request_timeout_ms: parse_env("REQUEST_TIMEOUT_MS")?.unwrap_or(DEFAULT_TIMEOUT_MS),
            max_retries: parse_env("MAX_RETRIES")?.unwrap_or(DEFAULT_MAX_RETRIES),
            max_concurrency: parse_env("MAX_CONCURRENCY")?,
            task_timeout_ms: parse_env("TASK_TIMEOUT_MS")?,
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Settings for the completion client.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_base_url(self.base_url.trim_end_matches('/'))
            .with_model(&self.model)
            .with_timeout_ms(self.request_timeout_ms)
            .with_max_retries(self.max_retries)
    }

    /// Settings for the task executor.
    #[must_use]
    pub fn executor_config(&self) -> ExecutorConfig {
        let mut config = ExecutorConfig::default();
        if let Some(n) = self.max_concurrency {
            config = config.with_max_concurrency(n);
        }
        match self.task_timeout_ms {
            Some(ms) => config.with_task_timeout(Duration::from_millis(ms)),
            None => config,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

/// Parse an optional numeric environment variable.
fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    std::env::var(name).map_or(Ok(None), |val| {
        val.trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: name.into(),
                reason: "must be a non-negative integer".into(),
            })
    })
}
