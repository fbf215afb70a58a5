// ABOUTME: Environment-driven server configuration with sensible defaults
// ABOUTME: Covers HTTP, database, auth secret, LLM client, and tuning knobs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

//! # Server Configuration
//!
//! Environment-only configuration. Every knob has a `FITLOG_`-prefixed
//! variable; unset variables fall back to defaults and malformed numerics are
//! a hard startup error rather than a silent fallback.
//!
//! The LLM API key is deliberately *not* required at startup: the server runs
//! without it and the chat/plan endpoints fail fast with a configuration
//! error, matching the behavior of the hosted original.

use std::env;

use crate::errors::{AppError, AppResult, ErrorCode};

/// Environment variable for the HTTP listen port
const HTTP_PORT_ENV: &str = "FITLOG_HTTP_PORT";

/// Environment variable for the database connection URL
const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable for the JWT signing secret
const JWT_SECRET_ENV: &str = "FITLOG_JWT_SECRET";

/// Environment variable for the LLM API key
const LLM_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable for the LLM base URL
const LLM_BASE_URL_ENV: &str = "FITLOG_LLM_BASE_URL";

/// Environment variable for the LLM model identifier
const LLM_MODEL_ENV: &str = "FITLOG_LLM_MODEL";

/// Environment variable for the per-request LLM timeout in seconds
const LLM_TIMEOUT_ENV: &str = "FITLOG_LLM_TIMEOUT_SECS";

/// Environment variable for LLM retry attempts after the first failure
const LLM_MAX_RETRIES_ENV: &str = "FITLOG_LLM_MAX_RETRIES";

/// Environment variable for the initial LLM retry backoff in milliseconds
const LLM_RETRY_BACKOFF_ENV: &str = "FITLOG_LLM_RETRY_BACKOFF_MS";

/// Environment variable for the chat history window passed to extraction
const CHAT_HISTORY_LIMIT_ENV: &str = "FITLOG_CHAT_HISTORY_LIMIT";

/// Environment variable for the dashboard series point cap
const DASHBOARD_POINT_CAP_ENV: &str = "FITLOG_DASHBOARD_POINT_CAP";

/// LLM client configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the `OpenAI`-compatible endpoint
    pub base_url: String,
    /// API key; `None` disables chat/plan endpoints with a config error
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    pub model: String,
    /// Total per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retry attempts after the first failure (0 disables retries)
    pub max_retries: u32,
    /// Initial backoff between retries in milliseconds (doubles per attempt)
    pub retry_backoff_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_owned(),
            api_key: None,
            model: "gpt-4o-mini".to_owned(),
            timeout_secs: 60,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

/// Chat orchestration tuning
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Maximum number of prior turns forwarded to the extraction prompt
    pub history_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { history_limit: 10 }
    }
}

/// Dashboard aggregation tuning
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Maximum points per chart series before stride downsampling kicks in
    pub point_cap: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { point_cap: 80 }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database connection URL (`sqlite:` scheme)
    pub database_url: String,
    /// Secret used to sign and verify bearer tokens
    pub jwt_secret: String,
    /// LLM client settings
    pub llm: LlmConfig,
    /// Chat orchestration settings
    pub chat: ChatConfig,
    /// Dashboard aggregation settings
    pub dashboard: DashboardConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `FITLOG_JWT_SECRET` is unset or any
    /// numeric variable is present but malformed.
    pub fn from_env() -> AppResult<Self> {
        let jwt_secret = env::var(JWT_SECRET_ENV).map_err(|_| {
            AppError::config(format!("{JWT_SECRET_ENV} environment variable not set"))
        })?;

        let config = Self {
            http_port: parse_env(HTTP_PORT_ENV, 8081)?,
            database_url: env_or(DATABASE_URL_ENV, "sqlite:fitlog.db"),
            jwt_secret,
            llm: LlmConfig {
                base_url: env_or(LLM_BASE_URL_ENV, "https://api.openai.com/v1"),
                api_key: env::var(LLM_API_KEY_ENV).ok().filter(|k| !k.is_empty()),
                model: env_or(LLM_MODEL_ENV, "gpt-4o-mini"),
                timeout_secs: parse_env(LLM_TIMEOUT_ENV, 60)?,
                max_retries: parse_env(LLM_MAX_RETRIES_ENV, 2)?,
                retry_backoff_ms: parse_env(LLM_RETRY_BACKOFF_ENV, 500)?,
            },
            chat: ChatConfig {
                history_limit: parse_env(CHAT_HISTORY_LIMIT_ENV, 10)?,
            },
            dashboard: DashboardConfig {
                point_cap: parse_env(DASHBOARD_POINT_CAP_ENV, 80)?,
            },
        };

        if config.llm.api_key.is_none() {
            tracing::warn!(
                "{LLM_API_KEY_ENV} not set; chat and plan endpoints will report a configuration error"
            );
        }

        Ok(config)
    }

    /// Configuration suitable for tests: in-memory database, fixed secret
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            http_port: 0,
            database_url: "sqlite::memory:".to_owned(),
            jwt_secret: "test-signing-secret".to_owned(),
            llm: LlmConfig::default(),
            chat: ChatConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

/// Read an environment variable with a default fallback
fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}

/// Parse a numeric environment variable, erroring on malformed values
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            AppError::new(
                ErrorCode::ConfigInvalid,
                format!("{name} has invalid value: {raw}"),
            )
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_requires_jwt_secret() {
        env::remove_var(JWT_SECRET_ENV);
        let result = ServerConfig::from_env();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        env::set_var(JWT_SECRET_ENV, "secret");
        env::remove_var(HTTP_PORT_ENV);
        env::remove_var(LLM_MODEL_ENV);
        env::remove_var(CHAT_HISTORY_LIMIT_ENV);

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, 8081);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.chat.history_limit, 10);
        assert_eq!(config.dashboard.point_cap, 80);

        env::remove_var(JWT_SECRET_ENV);
    }

    #[test]
    #[serial]
    fn test_malformed_numeric_is_rejected() {
        env::set_var(JWT_SECRET_ENV, "secret");
        env::set_var(HTTP_PORT_ENV, "not-a-port");

        let result = ServerConfig::from_env();
        assert!(result.is_err());

        env::remove_var(HTTP_PORT_ENV);
        env::remove_var(JWT_SECRET_ENV);
    }
}
