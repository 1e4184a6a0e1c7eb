//! Error types for the translation quality pipeline.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`LlmError`]: Completion API transport errors
//! - [`JudgeError`]: Judgment-task collaborator failures
//! - [`PipelineError`]: Task graph construction and execution errors
//! - [`ConfigError`]: Configuration errors
//!
//! All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

/// Top-level application error.
///
/// Wraps all subsystem errors for unified handling in the binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Completion API error.
    #[error("LLM API error: {0}")]
    Llm(#[from] LlmError),

    /// Judgment collaborator error.
    #[error("Judgment error: {0}")]
    Judge(#[from] JudgeError),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Completion API errors.
///
/// These errors represent failures when talking to the chat-completions API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Authentication failed due to an invalid API key.
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Request was rate limited.
    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_seconds: u64,
    },

    /// The server reported a transient failure.
    #[error("Server error {status}: {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body or description.
        message: String,
    },

    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Invalid request parameters.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what's invalid.
        message: String,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// Unexpected response from the API.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Description of what was unexpected.
        message: String,
    },
}

impl LlmError {
    /// Returns true if this error is retryable.
    ///
    /// Rate limiting, server errors, timeouts and network errors are
    /// retryable. Authentication and invalid request errors are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::ServerError { .. }
                | Self::Timeout { .. }
                | Self::Network { .. }
        )
    }
}

/// Judgment-task collaborator failures.
///
/// Any of these aborts the whole evaluation run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JudgeError {
    /// The judgment service could not be reached or refused the call.
    #[error("Judgment service unavailable: {message}")]
    ApiUnavailable {
        /// Description of why the service is unavailable.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parsing failed: {message}")]
    JsonParseFailed {
        /// Description of the parsing error.
        message: String,
    },

    /// A required field or input slot is missing.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// A field holds a value outside its schema.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// The collaborator answered with a different result shape than requested.
    #[error("Unexpected result shape: expected {expected}, got {found}")]
    UnexpectedShape {
        /// The requested shape.
        expected: String,
        /// The shape actually returned.
        found: String,
    },
}

/// Task graph construction and execution errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Two tasks share a name.
    #[error("Duplicate task name: {task}")]
    DuplicateTask {
        /// The duplicated task name.
        task: String,
    },

    /// Two tasks declare the same output slot.
    #[error("Slot {slot} is produced by both {first} and {second}")]
    DuplicateProducer {
        /// The contested slot.
        slot: String,
        /// The first task declaring it.
        first: String,
        /// The second task declaring it.
        second: String,
    },

    /// A task reads a slot that no task produces.
    #[error("Task {task} reads slot {slot} which no task produces")]
    MissingProducer {
        /// The reading task.
        task: String,
        /// The orphaned slot.
        slot: String,
    },

    /// The dependency graph contains a cycle.
    #[error("Circular dependency: {cycle}")]
    CircularDependency {
        /// The cycle path, e.g. `a -> b -> a`.
        cycle: String,
    },

    /// A task returned an update for a slot it did not declare.
    #[error("Task {task} wrote undeclared slot {slot} in round {round}")]
    UndeclaredWrite {
        /// The offending task.
        task: String,
        /// The undeclared slot.
        slot: String,
        /// The round in which it happened.
        round: u32,
    },

    /// A task failed.
    #[error("Task {task} failed in round {round}: {source}")]
    TaskFailed {
        /// The failing task.
        task: String,
        /// The round in which it failed.
        round: u32,
        /// The collaborator failure.
        #[source]
        source: JudgeError,
    },

    /// A task exceeded the configured per-task timeout.
    #[error("Task {task} timed out after {timeout_ms}ms in round {round}")]
    TaskTimedOut {
        /// The task that timed out.
        task: String,
        /// The round in which it timed out.
        round: u32,
        /// The configured timeout.
        timeout_ms: u64,
    },
}

impl PipelineError {
    /// Name of the task this error is attributed to, if any.
    #[must_use]
    pub fn task(&self) -> Option<&str> {
        match self {
            Self::UndeclaredWrite { task, .. }
            | Self::TaskFailed { task, .. }
            | Self::TaskTimedOut { task, .. }
            | Self::MissingProducer { task, .. }
            | Self::DuplicateTask { task } => Some(task),
            Self::DuplicateProducer { .. } | Self::CircularDependency { .. } => None,
        }
    }

    /// Round in which this error happened, for run-time errors.
    #[must_use]
    pub const fn round(&self) -> Option<u32> {
        match self {
            Self::UndeclaredWrite { round, .. }
            | Self::TaskFailed { round, .. }
            | Self::TaskTimedOut { round, .. } => Some(*round),
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// The evaluation input file could not be read or parsed.
    #[error("Cannot load input {path}: {message}")]
    InputUnreadable {
        /// Path of the input file.
        path: String,
        /// Underlying I/O or parse error.
        message: String,
    },
}
