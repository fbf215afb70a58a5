// ABOUTME: Natural-language-to-structured-record extraction via one LLM call
// ABOUTME: Builds the JSON-mode prompt and strictly validates the payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

//! # Extraction Engine
//!
//! Converts a free-text chat message plus bounded prior turns into a
//! [`StructuredChatPayload`]. The reference time is computed once per request
//! by the caller and embedded in the prompt so every entry in one message
//! resolves "now" to the same instant.
//!
//! Any payload that fails schema or range validation is a processing failure
//! surfaced as an upstream error, never silently dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider, MessageRole};
use crate::models::{ChatTurn, StructuredChatPayload};

/// Extraction engine over an injected LLM provider
pub struct ExtractionEngine {
    llm: Arc<dyn LlmProvider>,
    history_limit: usize,
}

impl ExtractionEngine {
    /// Create an engine with the given history window
    #[must_use]
    pub fn new(llm: Arc<dyn LlmProvider>, history_limit: usize) -> Self {
        Self { llm, history_limit }
    }

    /// Extract structured entries from a message and its conversation context
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown history role, or an upstream
    /// error when the LLM call fails or returns a payload violating the
    /// schema or field ranges.
    pub async fn extract(
        &self,
        message: &str,
        history: &[ChatTurn],
        now: DateTime<Utc>,
    ) -> AppResult<StructuredChatPayload> {
        let mut messages = vec![ChatMessage::system(Self::system_prompt(now))];

        let window_start = history.len().saturating_sub(self.history_limit);
        for turn in &history[window_start..] {
            let role = match turn.role.as_str() {
                "user" => MessageRole::User,
                "assistant" => MessageRole::Assistant,
                other => {
                    return Err(AppError::invalid_input(format!(
                        "history role must be user or assistant, got {other}"
                    )))
                }
            };
            messages.push(ChatMessage {
                role,
                content: turn.content.clone(),
            });
        }
        messages.push(ChatMessage::user(message));

        let request = ChatRequest::new(messages).with_json_mode();
        let response = self.llm.complete(&request).await?;

        tracing::debug!(
            provider = self.llm.name(),
            bytes = response.content.len(),
            "extraction response received"
        );

        let payload: StructuredChatPayload =
            serde_json::from_str(&response.content).map_err(|e| {
                AppError::external_service("llm", format!("extraction payload is not valid: {e}"))
            })?;

        if let Err(e) = payload.validate() {
            return Err(AppError::external_service(
                "llm",
                format!("extraction payload failed range validation: {}", e.message),
            ));
        }

        Ok(payload)
    }

    fn system_prompt(now: DateTime<Utc>) -> String {
        format!(
            "You are an elite fitness tracking assistant. Today's date is {}. \
             Extract structured metrics from a user's message. Use ISO 8601 timestamps. \
             Assume missing timestamps mean '{}'. Do not invent impossible values. \
             Recognize requests for workout or diet plans. If you cannot find concrete \
             numbers, set clarification_needed true and explain why. \
             Respond with a JSON object with fields: entries (array of objects tagged by \
             type: weight, body_fat, workout, or meal), plan_request (optional object \
             with plan_type, focus, duration_weeks), clarification_needed (boolean), \
             clarification_message (optional string), acknowledgements (array of strings).",
            now.format("%Y-%m-%d"),
            now.to_rfc3339(),
        )
    }
}
