//! Trait definitions for mockable dependencies.
//!
//! This module defines traits for:
//! - [`LlmClientTrait`]: chat-completion client abstraction
//! - [`Judge`]: the judgment-task collaborator the pipeline calls
//!
//! It also re-exports shared types from the `types` submodule.
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.

mod types;

pub use types::{CompletionConfig, CompletionResponse, Message, Usage};

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::JudgeError;
use crate::judge::{Judgment, JudgmentRequest};

/// Chat-completion client trait for mocking.
///
/// This trait abstracts the completion API client to allow for
/// dependency injection and testing with mock implementations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClientTrait: Send + Sync {
    /// Send a completion request to the API.
    ///
    /// # Arguments
    ///
    /// * `messages` - The conversation messages
    /// * `config` - Completion configuration options
    ///
    /// # Errors
    ///
    /// Returns [`JudgeError::ApiUnavailable`] if the API call fails.
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, JudgeError>;
}

/// The judgment-task collaborator.
///
/// One call produces one structured result. The pipeline treats the
/// implementation as opaque: it never retries, and any error aborts the run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Judge: Send + Sync {
    /// Produce the judgment a request asks for.
    ///
    /// # Errors
    ///
    /// Returns [`JudgeError`] if the judgment cannot be produced or does not
    /// match its schema.
    async fn judge(&self, request: JudgmentRequest) -> Result<Judgment, JudgeError>;
}

#[async_trait]
impl<T: Judge + ?Sized> Judge for Arc<T> {
    async fn judge(&self, request: JudgmentRequest) -> Result<Judgment, JudgeError> {
        (**self).judge(request).await
    }
}

#[async_trait]
impl<T: LlmClientTrait + ?Sized> LlmClientTrait for Arc<T> {
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, JudgeError> {
        (**self).complete(messages, config).await
    }
}
