//! Chat-completions API client.
//!
//! This module provides:
//! - HTTP client with retry and exponential backoff
//! - Request/response wire types
//! - Client configuration

mod client;
mod config;
mod types;

pub use client::{OpenAiClient, MAX_CONTENT_LENGTH, MAX_MESSAGES};
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS,
};
pub use types::{ApiUsage, ChatMessage, ChatRequest, ChatResponse, Choice, ChoiceMessage, ResponseFormat};
