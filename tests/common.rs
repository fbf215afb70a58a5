// ABOUTME: Shared test utilities for integration tests
// ABOUTME: In-memory resources, scripted LLM provider, and request helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(
    dead_code,
    missing_docs,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

//! Shared test utilities for `fitlog_server`
//!
//! Builds fully wired in-memory server resources and provides a scripted LLM
//! provider plus request helpers for exercising routers with `oneshot`.

use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex, Once};

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use fitlog_server::auth::AuthManager;
use fitlog_server::config::ServerConfig;
use fitlog_server::database::Database;
use fitlog_server::errors::{AppError, AppResult};
use fitlog_server::llm::{ChatRequest, ChatResponse, LlmProvider};
use fitlog_server::resources::ServerResources;
use fitlog_server::routes;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// LLM provider returning scripted responses in order
pub struct TestLlmProvider {
    responses: Mutex<VecDeque<String>>,
}

impl TestLlmProvider {
    pub fn new(responses: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
        })
    }

    pub fn scripted(responses: &[&str]) -> Arc<Self> {
        Self::new(responses.iter().map(ToString::to_string).collect())
    }
}

#[async_trait]
impl LlmProvider for TestLlmProvider {
    fn name(&self) -> &str {
        "test"
    }

    fn default_model(&self) -> &str {
        "test-model"
    }

    async fn complete(&self, _request: &ChatRequest) -> AppResult<ChatResponse> {
        let content = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::external_service("llm", "no scripted response left"))?;
        Ok(ChatResponse {
            content,
            model: "test-model".to_owned(),
            usage: None,
        })
    }
}

/// Build fully wired in-memory resources with an optional LLM provider
pub async fn test_resources(llm: Option<Arc<dyn LlmProvider>>) -> Result<Arc<ServerResources>> {
    init_test_logging();
    let config = ServerConfig::for_testing();
    let database = Database::new(&config.database_url).await?;
    database.migrate().await?;
    let auth = AuthManager::new(&config.jwt_secret);
    Ok(Arc::new(ServerResources::new(database, auth, llm, config)))
}

/// Build the full API router over the given resources
pub fn test_router(resources: &Arc<ServerResources>) -> Router {
    routes::router(resources)
}

/// Create a user id and a valid bearer token for it
pub fn test_user(resources: &Arc<ServerResources>) -> Result<(Uuid, String)> {
    let user_id = Uuid::new_v4();
    let token = resources.auth.generate_token(user_id)?;
    Ok((user_id, token))
}

/// Send one request to the router and return status plus parsed JSON body
pub async fn request_json(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

/// A structured extraction payload with no entries and no plan
pub fn empty_extraction() -> String {
    r#"{"entries":[],"clarification_needed":false,"acknowledgements":[]}"#.to_owned()
}

/// A valid three-day structured plan, as the model would return it
pub fn scripted_plan(plan_type: &str) -> String {
    format!(
        r#"{{
            "plan_type": "{plan_type}",
            "title": "Starter Block",
            "focus": "consistency",
            "summary": "Three focused days to build the habit.",
            "schedule": [
                {{"day": "Day 1", "headline": "Full body", "details": "Squat, push, pull."}},
                {{"day": "Day 2", "headline": "Conditioning", "details": "30 minutes easy cardio."}},
                {{"day": "Day 3", "headline": "Full body", "details": "Hinge, press, carry."}}
            ],
            "key_points": ["Show up every scheduled day"],
            "tips": ["Lay out your gear the night before"]
        }}"#
    )
}
