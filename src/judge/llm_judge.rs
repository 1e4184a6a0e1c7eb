//! LLM-backed implementation of the judgment collaborator.

use async_trait::async_trait;

use super::parsing::parse_judgment;
use super::request::{Judgment, JudgmentRequest};
use crate::error::JudgeError;
use crate::prompts::{system_prompt, user_message};
use crate::traits::{CompletionConfig, Judge, LlmClientTrait, Message};

/// Default cap on reply tokens per judgment.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Judges translations by prompting a chat-completion model.
///
/// Every call uses temperature 0 and JSON output mode; the reply is parsed
/// and validated against the schema of the requested judgment.
#[derive(Debug)]
pub struct LlmJudge<C: LlmClientTrait> {
    client: C,
    max_tokens: u32,
}

impl<C: LlmClientTrait> LlmJudge<C> {
    /// Create a judge over a completion client.
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self {
            client,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the reply token cap.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn completion_config(&self, request: &JudgmentRequest) -> CompletionConfig {
        CompletionConfig::new()
            .with_system_prompt(system_prompt(request))
            .with_temperature(0.0)
            .with_max_tokens(self.max_tokens)
            .with_json_output()
    }
}

#[async_trait]
impl<C: LlmClientTrait> Judge for LlmJudge<C> {
    async fn judge(&self, request: JudgmentRequest) -> Result<Judgment, JudgeError> {
        let label = request.label();
        let config = self.completion_config(&request);
        let messages = vec![Message::user(user_message(&request))];

        let response = self.client.complete(messages, config).await?;
        tracing::debug!(
            judgment = %label,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Judgment reply received"
        );

        parse_judgment(request.kind(), &response.content).inspect_err(|e| {
            tracing::warn!(judgment = %label, error = %e, "Judgment reply rejected");
        })
    }
}
