// ABOUTME: OpenAI-compatible chat-completions client over reqwest
// ABOUTME: JSON mode, explicit timeouts, and bounded retry with backoff
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

//! # `OpenAI`-Compatible Provider
//!
//! Non-streaming chat completions against any `/chat/completions` endpoint
//! that speaks the `OpenAI` wire format. Transient failures (connect errors,
//! timeouts, 429, 5xx) are retried with exponential backoff up to the
//! configured attempt budget; everything else fails immediately.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};

/// Connect timeout applied independently of the request timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// `OpenAI`-compatible chat-completions client
#[derive(Debug)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
    retry_backoff: Duration,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct WireResponse {
    model: Option<String>,
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct WireError {
    error: WireErrorDetails,
}

#[derive(Deserialize)]
struct WireErrorDetails {
    message: String,
}

impl OpenAiProvider {
    /// Build a provider from LLM configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the API key is absent or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &LlmConfig) -> AppResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::config("OPENAI_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key,
            model: config.model.clone(),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    async fn send_once(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let model = request.model.as_deref().unwrap_or(&self.model);
        let body = WireRequest {
            model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let code = if e.is_connect() || e.is_timeout() {
                    ErrorCode::ExternalServiceError
                } else {
                    ErrorCode::InternalError
                };
                AppError::new(code, format!("LLM request failed: {e}")).with_source(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::map_error_status(status, &text));
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service("llm", format!("malformed response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::external_service("llm", "response contained no content"))?;

        Ok(ChatResponse {
            content,
            model: parsed.model.unwrap_or_else(|| model.to_owned()),
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }

    /// Map a non-2xx provider status to the error taxonomy
    fn map_error_status(status: reqwest::StatusCode, body: &str) -> AppError {
        let detail = serde_json::from_str::<WireError>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body.chars().take(200).collect()
                }
            });

        match status.as_u16() {
            401 | 403 => AppError::config(format!("LLM API key rejected: {detail}")),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("LLM rate limit exceeded: {detail}"),
            ),
            _ => AppError::external_service("llm", format!("status {status}: {detail}")),
        }
    }

    const fn is_retryable(error: &AppError) -> bool {
        matches!(
            error.code,
            ErrorCode::ExternalServiceError | ErrorCode::ExternalRateLimited
        )
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let mut attempt = 0;
        loop {
            match self.send_once(request).await {
                Ok(response) => {
                    tracing::debug!(
                        model = %response.model,
                        tokens = response.usage.map_or(0, |u| u.total_tokens),
                        "LLM completion succeeded"
                    );
                    return Ok(response);
                }
                Err(error) if attempt < self.max_retries && Self::is_retryable(&error) => {
                    let backoff = self.retry_backoff * 2u32.pow(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        "LLM call failed, retrying: {error}"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
