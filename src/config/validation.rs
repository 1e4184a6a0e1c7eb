//! Range checks for configuration values.

use super::Config;
use crate::error::ConfigError;

/// Minimum allowed timeout in milliseconds (1 second).
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed request timeout in milliseconds (5 minutes).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Maximum allowed retry count.
pub const MAX_RETRIES: u32 = 10;

/// Maximum allowed number of concurrent judgment tasks.
pub const MAX_CONCURRENCY: usize = 64;

fn invalid(var: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.into(),
        reason,
    }
}

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `OPENAI_API_KEY` must not be blank
/// - `REQUEST_TIMEOUT_MS` must be between 1000 and 300000
/// - `MAX_RETRIES` must be between 0 and 10
/// - `MAX_CONCURRENCY`, when set, must be between 1 and 64
/// - `TASK_TIMEOUT_MS`, when set, must be at least 1000
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api_key.is_blank() {
        return Err(invalid("OPENAI_API_KEY", "must not be empty".into()));
    }

    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&config.request_timeout_ms) {
        return Err(invalid(
            "REQUEST_TIMEOUT_MS",
            format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        ));
    }

    if config.max_retries > MAX_RETRIES {
        return Err(invalid(
            "MAX_RETRIES",
            format!("must be between 0 and {MAX_RETRIES}"),
        ));
    }

    if config
        .max_concurrency
        .is_some_and(|n| !(1..=MAX_CONCURRENCY).contains(&n))
    {
        return Err(invalid(
            "MAX_CONCURRENCY",
            format!("must be between 1 and {MAX_CONCURRENCY}"),
        ));
    }

    if config.task_timeout_ms.is_some_and(|t| t < MIN_TIMEOUT_MS) {
        return Err(invalid(
            "TASK_TIMEOUT_MS",
            format!("must be at least {MIN_TIMEOUT_MS} ms"),
        ));
    }

    Ok(())
}
