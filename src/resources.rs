// ABOUTME: Shared per-process dependency container for request handlers
// ABOUTME: Holds the database, auth manager, optional LLM provider, and config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

//! # Server Resources
//!
//! One `Arc<ServerResources>` is built at startup and cloned into every route
//! group as axum state. The LLM provider is optional: the server runs without
//! a credential, and the chat/plan endpoints surface a configuration error
//! instead of attempting the call.

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::llm::LlmProvider;

/// Process-scoped dependencies shared across all request handlers
pub struct ServerResources {
    /// Persistence layer
    pub database: Arc<Database>,
    /// Token issuance and validation
    pub auth: Arc<AuthManager>,
    /// LLM provider; absent when no API key is configured
    pub llm: Option<Arc<dyn LlmProvider>>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble the container from constructed dependencies
    #[must_use]
    pub fn new(
        database: Database,
        auth: AuthManager,
        llm: Option<Arc<dyn LlmProvider>>,
        config: ServerConfig,
    ) -> Self {
        Self {
            database: Arc::new(database),
            auth: Arc::new(auth),
            llm,
            config: Arc::new(config),
        }
    }

    /// The LLM provider, or a configuration error when none is configured
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no API key was supplied at startup.
    pub fn llm(&self) -> AppResult<Arc<dyn LlmProvider>> {
        self.llm.clone().ok_or_else(|| {
            AppError::config(
                "OpenAI API key not configured. Please add OPENAI_API_KEY to your environment variables.",
            )
        })
    }
}
