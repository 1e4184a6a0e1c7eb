//! Chat-completions API client with retry logic.
//!
//! This module provides:
//! - HTTP client for the chat-completions endpoint
//! - Retry logic with exponential backoff
//! - Request validation
//! - Response parsing

#![allow(clippy::missing_errors_doc)]

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use super::config::{ClientConfig, DEFAULT_MAX_TOKENS};
use super::types::{ChatMessage, ChatRequest, ChatResponse};
use crate::error::{JudgeError, LlmError};
use crate::traits::{CompletionConfig, CompletionResponse, LlmClientTrait, Message, Usage};

/// Maximum number of messages per request.
pub const MAX_MESSAGES: usize = 50;
/// Maximum content length per message (50KB).
pub const MAX_CONTENT_LENGTH: usize = 50_000;

/// Chat-completions API client.
#[derive(Debug)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    config: ClientConfig,
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl OpenAiClient {
    /// Create a new client.
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> Result<Self, LlmError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create a client with default configuration.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(api_key, ClientConfig::default())
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a chat request with retry logic.
    pub async fn chat(&self, request: ChatRequest) -> Result<CompletionResponse, LlmError> {
        Self::validate_request(&request)?;
        self.execute_with_retry(&request).await
    }

    /// Validate request size limits.
    fn validate_request(request: &ChatRequest) -> Result<(), LlmError> {
        if request.messages.len() > MAX_MESSAGES {
            return Err(LlmError::InvalidRequest {
                message: format!(
                    "Too many messages: {} > {MAX_MESSAGES}",
                    request.messages.len()
                ),
            });
        }

        for msg in &request.messages {
            let content_len = msg.content.len();
            if content_len > MAX_CONTENT_LENGTH {
                return Err(LlmError::InvalidRequest {
                    message: format!("Message too large: {content_len} > {MAX_CONTENT_LENGTH}"),
                });
            }
        }

        Ok(())
    }

    /// Execute request with retry logic.
    async fn execute_with_retry(
        &self,
        request: &ChatRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let mut last_error = None;
        let mut delay = self.config.retry_delay_ms;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(attempt, delay_ms = delay, "Retrying chat completion request");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay = delay.saturating_mul(2);
            }

            match self.execute_once(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if !e.is_retryable() {
                        return Err(e);
                    }
                    tracing::warn!(error = %e, attempt, "Retryable error occurred");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Network {
            message: "Unknown error after retries".to_string(),
        }))
    }

    /// Execute a single request attempt.
    async fn execute_once(&self, request: &ChatRequest) -> Result<CompletionResponse, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let start = Instant::now();

        tracing::debug!(
            url = %url,
            model = %request.model,
            max_tokens = ?request.max_tokens,
            timeout_ms = self.config.timeout_ms,
            "Starting chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::error!(
                        url = %url,
                        elapsed_ms = elapsed_ms(start),
                        timeout_ms = self.config.timeout_ms,
                        "Chat completion request timed out"
                    );
                    LlmError::Timeout {
                        timeout_ms: self.config.timeout_ms,
                    }
                } else {
                    tracing::error!(
                        url = %url,
                        elapsed_ms = elapsed_ms(start),
                        error = %e,
                        "Chat completion request failed"
                    );
                    LlmError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        tracing::debug!(
            url = %url,
            status = %status,
            elapsed_ms = elapsed_ms(start),
            "Chat completion response received"
        );

        match status.as_u16() {
            401 => return Err(LlmError::AuthenticationFailed),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);
                return Err(LlmError::RateLimited {
                    retry_after_seconds: retry_after,
                });
            }
            code @ (500 | 502 | 503 | 504) => {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::ServerError {
                    status: code,
                    message: body,
                });
            }
            _ if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::UnexpectedResponse {
                    message: format!("Status {status}: {body}"),
                });
            }
            _ => {}
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UnexpectedResponse {
                message: format!("Failed to parse response: {e}"),
            })?;

        Self::parse_response(body)
    }

    fn parse_response(body: ChatResponse) -> Result<CompletionResponse, LlmError> {
        let content = body
            .first_content()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmError::UnexpectedResponse {
                message: "No content in response".to_string(),
            })?;

        Ok(CompletionResponse::new(
            content,
            Usage::new(body.usage.prompt_tokens, body.usage.completion_tokens),
        ))
    }

    /// Convert trait-level messages and options into an API request.
    fn build_request(&self, messages: Vec<Message>, config: &CompletionConfig) -> ChatRequest {
        let mut api_messages = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = config.system_prompt.as_ref() {
            api_messages.push(ChatMessage::system(system));
        }
        api_messages.extend(
            messages
                .into_iter()
                .map(|m| ChatMessage::new(m.role, m.content)),
        );

        let mut request = ChatRequest::new(&self.config.model, api_messages)
            .with_max_tokens(config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS));
        if let Some(temp) = config.temperature {
            request = request.with_temperature(f64::from(temp));
        }
        if config.json_output {
            request = request.with_json_object();
        }
        request
    }
}

#[async_trait]
impl LlmClientTrait for OpenAiClient {
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, JudgeError> {
        let request = self.build_request(messages, &config);
        self.chat(request)
            .await
            .map_err(|e| JudgeError::ApiUnavailable {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::float_cmp,
    clippy::unused_async
)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_client(server: &MockServer) -> OpenAiClient {
        let config = ClientConfig::default()
            .with_base_url(server.uri())
            .with_max_retries(0)
            .with_timeout_ms(5_000);
        OpenAiClient::new("test-api-key", config).unwrap()
    }

    fn success_body(text: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-4.1-mini",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
        })
    }

    fn simple_request() -> ChatRequest {
        ChatRequest::new("gpt-4.1-mini", vec![ChatMessage::user("Hi")])
    }

    #[test]
    fn test_client_new() {
        let client = OpenAiClient::with_api_key("test-key").unwrap();
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
        assert_eq!(client.config().model, "gpt-4.1-mini");
    }

    #[tokio::test]
    async fn test_validate_request_too_many_messages() {
        let server = MockServer::start().await;
        let client = create_mock_client(&server).await;
        let messages = (0..=MAX_MESSAGES)
            .map(|i| ChatMessage::user(format!("Message {i}")))
            .collect();

        let err = client
            .chat(ChatRequest::new("m", messages))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::InvalidRequest { .. }));
        assert!(err.to_string().contains("Too many messages"));
    }

    #[tokio::test]
    async fn test_validate_request_message_too_large() {
        let server = MockServer::start().await;
        let client = create_mock_client(&server).await;
        let request = ChatRequest::new(
            "m",
            vec![ChatMessage::user("x".repeat(MAX_CONTENT_LENGTH + 1))],
        );

        let err = client.chat(request).await.unwrap_err();
        assert!(err.to_string().contains("Message too large"));
    }

    #[tokio::test]
    async fn test_chat_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Hello!")))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let response = client.chat(simple_request()).await.unwrap();
        assert_eq!(response.content, "Hello!");
        assert_eq!(response.usage.input_tokens, 10);
        assert_eq!(response.usage.output_tokens, 20);
    }

    #[tokio::test]
    async fn test_chat_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let err = client.chat(simple_request()).await.unwrap_err();
        assert_eq!(err, LlmError::AuthenticationFailed);
    }

    #[tokio::test]
    async fn test_chat_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let err = client.chat(simple_request()).await.unwrap_err();
        assert_eq!(
            err,
            LlmError::RateLimited {
                retry_after_seconds: 7
            }
        );
    }

    #[tokio::test]
    async fn test_chat_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let err = client.chat(simple_request()).await.unwrap_err();
        assert_eq!(
            err,
            LlmError::ServerError {
                status: 503,
                message: "overloaded".into()
            }
        );
    }

    #[tokio::test]
    async fn test_chat_bad_request_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad model"))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig::default()
            .with_base_url(server.uri())
            .with_max_retries(3)
            .with_retry_delay_ms(1);
        let client = OpenAiClient::new("k", config).unwrap();
        let err = client.chat(simple_request()).await.unwrap_err();
        assert!(matches!(err, LlmError::UnexpectedResponse { message } if message.contains("bad model")));
    }

    #[tokio::test]
    async fn test_chat_retries_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok")))
            .mount(&server)
            .await;

        let config = ClientConfig::default()
            .with_base_url(server.uri())
            .with_max_retries(2)
            .with_retry_delay_ms(1);
        let client = OpenAiClient::new("k", config).unwrap();
        let response = client.chat(simple_request()).await.unwrap();
        assert_eq!(response.content, "ok");
    }

    #[tokio::test]
    async fn test_chat_retries_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .expect(2)
            .mount(&server)
            .await;

        let config = ClientConfig::default()
            .with_base_url(server.uri())
            .with_max_retries(1)
            .with_retry_delay_ms(1);
        let client = OpenAiClient::new("k", config).unwrap();
        let err = client.chat(simple_request()).await.unwrap_err();
        assert!(matches!(err, LlmError::ServerError { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_chat_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let err = client.chat(simple_request()).await.unwrap_err();
        assert!(err.to_string().contains("No content"));
    }

    #[tokio::test]
    async fn test_chat_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let err = client.chat(simple_request()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse response"));
    }

    #[tokio::test]
    async fn test_trait_complete_builds_json_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "gpt-4.1-mini",
                "temperature": 0.0,
                "max_tokens": 300,
                "response_format": {"type": "json_object"},
                "messages": [
                    {"role": "system", "content": "be strict"},
                    {"role": "user", "content": "judge this"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("{}")))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let config = CompletionConfig::new()
            .with_system_prompt("be strict")
            .with_temperature(0.0)
            .with_max_tokens(300)
            .with_json_output();
        let response = LlmClientTrait::complete(&client, vec![Message::user("judge this")], config)
            .await
            .unwrap();
        assert_eq!(response.content, "{}");
        assert_eq!(response.usage.total(), 30);
    }

    #[tokio::test]
    async fn test_trait_complete_maps_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let err = LlmClientTrait::complete(&client, vec![Message::user("x")], CompletionConfig::new())
            .await
            .unwrap_err();
        assert!(matches!(err, JudgeError::ApiUnavailable { message } if message.contains("Authentication failed")));
    }
}
