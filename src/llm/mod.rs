// ABOUTME: Provider-agnostic LLM abstraction used by extraction and plans
// ABOUTME: Defines chat message types and the async LlmProvider trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

//! # LLM Provider Abstraction
//!
//! A small chat-completion interface. The production implementation is the
//! `OpenAI`-compatible client in [`openai`]; tests substitute a scripted
//! provider. Only non-streaming completions are modeled since nothing in this
//! server consumes a token stream.

pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

/// Role of a message in a chat conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions
    System,
    /// End-user message
    User,
    /// Prior model output
    Assistant,
}

/// One message in a chat-completion conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker role
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// A chat-completion request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Conversation messages, system first
    pub messages: Vec<ChatMessage>,
    /// Model override; `None` uses the provider default
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,
    /// Request a JSON object response
    pub json_mode: bool,
}

impl ChatRequest {
    /// Build a request with provider defaults for everything but messages
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
            json_mode: false,
        }
    }

    /// Request a JSON object response
    #[must_use]
    pub const fn with_json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens generated
    pub completion_tokens: u32,
    /// Sum of both
    pub total_tokens: u32,
}

/// A completed chat response
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Generated text
    pub content: String,
    /// Model that produced the response
    pub model: String,
    /// Token usage, when reported
    pub usage: Option<TokenUsage>,
}

/// Chat-completion provider interface
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model used when a request does not specify one
    fn default_model(&self) -> &str;

    /// Execute one chat completion
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the provider call fails or returns an
    /// unusable response.
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse>;
}
