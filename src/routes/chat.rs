// ABOUTME: Conversational logging endpoint orchestrating extraction, writes,
// ABOUTME: optional plan generation, and reply assembly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

//! # Chat Orchestrator
//!
//! One request walks: authenticate, validate the body, extract structured
//! entries, then either short-circuit on a clarification or fan out the entry
//! inserts concurrently. The write policy is all-or-nothing: the first failed
//! insert aborts the request. Plan generation, when requested, runs after the
//! entry writes and its record is persisted before the reply is assembled.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use futures_util::future::{try_join_all, BoxFuture};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::extraction::ExtractionEngine;
use crate::models::{ChatTurn, ExtractedEntry, PlanRecord, StoredCounts};
use crate::plans::PlanGenerator;
use crate::resources::ServerResources;

/// Reply used when the model asks for clarification without supplying text
const DEFAULT_CLARIFICATION: &str =
    "I couldn’t confidently log that. Could you share the specific numbers or details?";

/// Reply used when a message produced no entries, no plan, and no acknowledgements
const EMPTY_REPLY: &str = "All set! Let me know when you have new stats or need a plan.";

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    /// Latest user message
    pub message: String,
    /// Prior conversation turns, oldest first
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Chat response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponseBody {
    /// Assistant reply text
    pub message: String,
    /// Per-type counts of records stored by this request
    pub stored: StoredCounts,
    /// True when the reply is a clarification question
    pub clarification: bool,
    /// Persisted plan, when one was generated
    pub plan: Option<PlanRecord>,
}

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create the chat route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/chat", post(Self::chat))
            .with_state(resources)
    }

    async fn chat(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<ChatRequestBody>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        Self::validate_body(&body)?;
        let llm = resources.llm()?;

        // One reference time per request so every entry resolves "now"
        // to the same instant
        let now = Utc::now();

        let engine = ExtractionEngine::new(llm.clone(), resources.config.chat.history_limit);
        let payload = engine.extract(&body.message, &body.history, now).await?;

        if payload.clarification_needed {
            let message = payload
                .clarification_message
                .unwrap_or_else(|| DEFAULT_CLARIFICATION.to_owned());
            return Ok(Json(ChatResponseBody {
                message,
                stored: StoredCounts::default(),
                clarification: true,
                plan: None,
            })
            .into_response());
        }

        let counts = Self::persist_entries(&resources, auth.user_id, payload.entries).await?;

        let mut plan_record = None;
        let mut plan_response = None;
        if let Some(plan_request) = &payload.plan_request {
            let generator = PlanGenerator::new(llm);
            let outcome = generator.generate(plan_request, None, None, now).await?;
            let record = resources
                .database
                .plans()
                .create(auth.user_id, &outcome.to_new_plan(now)?)
                .await?;
            plan_record = Some(record);
            plan_response = Some(outcome.response);
        }

        info!(
            user_id = %auth.user_id,
            weights = counts.weights,
            body_fat = counts.body_fat,
            workouts = counts.workouts,
            meals = counts.meals,
            plan = plan_record.is_some(),
            "chat message processed"
        );

        let message = assemble_reply(&payload.acknowledgements, counts, plan_response.as_deref());
        Ok(Json(ChatResponseBody {
            message,
            stored: counts,
            clarification: false,
            plan: plan_record,
        })
        .into_response())
    }

    fn validate_body(body: &ChatRequestBody) -> AppResult<()> {
        if body.message.trim().is_empty() {
            return Err(AppError::invalid_input("message is required"));
        }
        for turn in &body.history {
            if turn.role != "user" && turn.role != "assistant" {
                return Err(AppError::invalid_input(format!(
                    "history role must be user or assistant, got {}",
                    turn.role
                )));
            }
        }
        Ok(())
    }

    /// Fan out the entry inserts and join; the first failure aborts
    async fn persist_entries(
        resources: &Arc<ServerResources>,
        user_id: uuid::Uuid,
        entries: Vec<ExtractedEntry>,
    ) -> AppResult<StoredCounts> {
        let mut tasks: Vec<BoxFuture<'_, AppResult<StoredCounts>>> = Vec::new();
        for entry in entries {
            let database = resources.database.clone();
            tasks.push(Box::pin(async move {
                let mut stored = StoredCounts::default();
                match entry {
                    ExtractedEntry::Weight(w) => {
                        database.weights().create(user_id, &w).await?;
                        stored.weights += 1;
                    }
                    ExtractedEntry::BodyFat(b) => {
                        database.body_fat().create(user_id, &b).await?;
                        stored.body_fat += 1;
                    }
                    ExtractedEntry::Workout(w) => {
                        database.workouts().create(user_id, &w).await?;
                        stored.workouts += 1;
                    }
                    ExtractedEntry::Meal(m) => {
                        database.meals().create(user_id, &m).await?;
                        stored.meals += 1;
                    }
                }
                Ok(stored)
            }));
        }

        let mut counts = StoredCounts::default();
        for stored in try_join_all(tasks).await? {
            counts.weights += stored.weights;
            counts.body_fat += stored.body_fat;
            counts.workouts += stored.workouts;
            counts.meals += stored.meals;
        }
        Ok(counts)
    }
}

/// Build the assistant reply from acknowledgements, counts, and the plan text
fn assemble_reply(
    acknowledgements: &[String],
    counts: StoredCounts,
    plan_response: Option<&str>,
) -> String {
    let mut message = String::new();

    if !acknowledgements.is_empty() {
        message.push_str(&acknowledgements.join(" \n"));
    }

    let mut saved = Vec::new();
    if counts.weights > 0 {
        saved.push(format!("Logged {} weight entry", counts.weights));
    }
    if counts.body_fat > 0 {
        saved.push(format!("Updated {} body fat reading", counts.body_fat));
    }
    if counts.workouts > 0 {
        saved.push(format!("Captured {} workout", counts.workouts));
    }
    if counts.meals > 0 {
        saved.push(format!("Recorded {} meal", counts.meals));
    }
    if !saved.is_empty() {
        if !message.is_empty() {
            message.push_str("\n\n");
        }
        message.push_str(&saved.join(", "));
        message.push('.');
    }

    if let Some(plan) = plan_response {
        if !message.is_empty() {
            message.push_str("\n\n");
        }
        message.push_str(plan);
    }

    if message.is_empty() {
        message.push_str(EMPTY_REPLY);
    }
    message
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_orders_acknowledgements_counts_plan() {
        let counts = StoredCounts {
            weights: 2,
            body_fat: 0,
            workouts: 0,
            meals: 1,
        };
        let reply = assemble_reply(
            &["Nice session!".to_owned()],
            counts,
            Some("Here is your plan."),
        );
        assert_eq!(
            reply,
            "Nice session!\n\nLogged 2 weight entry, Recorded 1 meal.\n\nHere is your plan."
        );
    }

    #[test]
    fn test_reply_skips_zero_counts() {
        let counts = StoredCounts {
            weights: 0,
            body_fat: 1,
            workouts: 0,
            meals: 0,
        };
        let reply = assemble_reply(&[], counts, None);
        assert_eq!(reply, "Updated 1 body fat reading.");
    }

    #[test]
    fn test_reply_falls_back_when_empty() {
        let reply = assemble_reply(&[], StoredCounts::default(), None);
        assert_eq!(reply, EMPTY_REPLY);
    }

    #[test]
    fn test_body_validation() {
        let empty = ChatRequestBody {
            message: "  ".to_owned(),
            history: vec![],
        };
        assert!(ChatRoutes::validate_body(&empty).is_err());

        let bad_role = ChatRequestBody {
            message: "logged 180 lbs".to_owned(),
            history: vec![ChatTurn {
                role: "system".to_owned(),
                content: "hi".to_owned(),
            }],
        };
        assert!(ChatRoutes::validate_body(&bad_role).is_err());
    }
}
