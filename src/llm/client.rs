//! Async LLM client for command classification
//!
//! Model-agnostic HTTP client for chat-completion APIs. Supports both
//! Anthropic and OpenAI-compatible endpoints. The client is constructed once
//! and shared; it is never mutated after construction.

use crate::core::error::{GateError, Result, TransportError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything needed for one completion round trip
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Something that can turn a system prompt and a user message into text
///
/// The interpreter only talks to this trait, so tests can substitute a
/// scripted transport for the HTTP client.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<String, TransportError>;
}

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// HTTP transport for the completion service
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    api_format: ApiFormat,
}

impl LlmClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        let api_format = Self::detect_api_format(&api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url,
            api_format,
        }
    }

    /// Same as [`LlmClient::new`] with a request timeout
    pub fn with_timeout(api_key: String, api_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GateError::Config(format!("HTTP client: {}", e)))?;
        let api_format = Self::detect_api_format(&api_url);
        Ok(Self {
            client,
            api_key,
            api_url,
            api_format,
        })
    }

    pub fn api_format(&self) -> &ApiFormat {
        &self.api_format
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }

    async fn complete_anthropic(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<String, TransportError> {
        let body = AnthropicRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: &request.system,
            messages: vec![Message {
                role: "user",
                content: &request.user,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(classify_send_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &error_text));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Unclassified(e.to_string()))?;

        anthropic_text(completion)
    }

    async fn complete_openai(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<String, TransportError> {
        let body = OpenAIRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![
                Message {
                    role: "system",
                    content: &request.system,
                },
                Message {
                    role: "user",
                    content: &request.user,
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(classify_send_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &error_text));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Unclassified(e.to_string()))?;

        openai_text(completion)
    }
}

/// First text block; non-text blocks such as `tool_use` are skipped
fn anthropic_text(completion: AnthropicResponse) -> std::result::Result<String, TransportError> {
    completion
        .content
        .into_iter()
        .find_map(|c| c.text)
        .ok_or_else(|| TransportError::Unclassified("Empty response".into()))
}

/// A null message content is an empty answer, not a transport failure
fn openai_text(completion: OpenAIResponse) -> std::result::Result<String, TransportError> {
    completion
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.unwrap_or_default())
        .ok_or_else(|| TransportError::Unclassified("Empty response".into()))
}

#[async_trait]
impl CompletionTransport for LlmClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<String, TransportError> {
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(request).await,
            ApiFormat::OpenAI => self.complete_openai(request).await,
        }
    }
}

/// Classify a non-success HTTP response
///
/// The status code wins; after that the provider's structured error code.
/// Substring matching is only used when the body carries no structured
/// error at all (proxies, gateways).
pub fn classify_failure(status: StatusCode, body: &str) -> TransportError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => return TransportError::QuotaExceeded,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return TransportError::InvalidCredential
        }
        _ => {}
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => classify_error_body(status, envelope.error),
        Err(_) => match classify_text(body) {
            TransportError::Unclassified(_) => {
                TransportError::Unclassified(format!("HTTP {}: {}", status, body.trim()))
            }
            known => known,
        },
    }
}

fn classify_error_body(status: StatusCode, error: ErrorBody) -> TransportError {
    let codes = [error.code.as_deref(), error.kind.as_deref()];
    for code in codes.into_iter().flatten() {
        match code {
            "insufficient_quota" | "rate_limit_exceeded" | "rate_limit_error" => {
                return TransportError::QuotaExceeded
            }
            "invalid_api_key" | "invalid_authentication" | "authentication_error"
            | "permission_error" => return TransportError::InvalidCredential,
            _ => {}
        }
    }
    let message = error
        .message
        .or(error.code)
        .or(error.kind)
        .unwrap_or_default();
    TransportError::Unclassified(format!("HTTP {}: {}", status, message))
}

/// Failures that never produced an HTTP response
///
/// reqwest's error kinds decide first. Text heuristics only see the message
/// with the URL stripped, so a host or port never reads as a quota error.
fn classify_send_error(err: reqwest::Error) -> TransportError {
    if let Some(status) = err.status() {
        return classify_failure(status, "");
    }
    if err.is_timeout() {
        return TransportError::Unclassified("request timed out".into());
    }
    let transport_level = err.is_connect() || err.is_request() || err.is_body() || err.is_decode();
    let message = err.without_url().to_string();
    if transport_level {
        TransportError::Unclassified(message)
    } else {
        classify_text(&message)
    }
}

/// Last-resort classification from free text
pub fn classify_text(message: &str) -> TransportError {
    let lower = message.to_lowercase();
    if lower.contains("insufficient_quota") || lower.contains("quota") || lower.contains("429") {
        TransportError::QuotaExceeded
    } else if lower.contains("invalid_api_key")
        || lower.contains("invalid api key")
        || lower.contains("incorrect api key")
    {
        TransportError::InvalidCredential
    } else {
        TransportError::Unclassified(message.to_string())
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// Shared
#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

// Error bodies: OpenAI uses error.code / error.type, Anthropic error.type
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}
