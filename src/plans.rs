// ABOUTME: Two-step plan generation: structured plan object, then a
// ABOUTME: conversational rendering, with cardinality enforcement between them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

//! # Plan Generator
//!
//! Two strictly sequential LLM calls: the first produces a structured
//! [`GeneratedPlan`] in JSON mode and is re-validated in code (schedule of at
//! least three days, at least one key point and one tip); the second renders
//! it conversationally. A structured-call failure aborts the whole step; a
//! rendering failure keeps the plan and substitutes a degraded summary line.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::database::NewPlan;
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::models::{GeneratedPlan, PlanRequest};

/// Word budget communicated to the rendering call
const RENDERING_WORD_LIMIT: u32 = 180;

/// Result of one plan-generation run
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Validated structured plan
    pub plan: GeneratedPlan,
    /// Conversational rendering, or the degraded line when rendering failed
    pub response: String,
    /// True when the rendering call failed and the response is degraded
    pub degraded: bool,
}

impl PlanOutcome {
    /// Convert to a storage payload with the given generation time
    ///
    /// # Errors
    ///
    /// Returns an internal error if the plan cannot be serialized.
    pub fn to_new_plan(&self, generated_at: DateTime<Utc>) -> AppResult<NewPlan> {
        let content = serde_json::to_value(&self.plan)
            .map_err(|e| AppError::internal(format!("Failed to serialize plan: {e}")))?;
        Ok(NewPlan {
            plan_type: self.plan.plan_type,
            title: self.plan.title.clone(),
            focus: self.plan.focus.clone(),
            summary: Some(self.plan.summary.clone()),
            content,
            generated_at: Some(generated_at),
        })
    }
}

/// Plan generator over an injected LLM provider
pub struct PlanGenerator {
    llm: Arc<dyn LlmProvider>,
}

impl PlanGenerator {
    /// Create a generator
    #[must_use]
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Generate a plan and its conversational rendering
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the structured call fails or the plan
    /// violates the minimum-cardinality constraints. Rendering failures do
    /// not error; they degrade the response instead.
    pub async fn generate(
        &self,
        request: &PlanRequest,
        display_name: Option<&str>,
        context: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<PlanOutcome> {
        let plan = self
            .generate_structured(request, display_name, context, now)
            .await?;
        plan.validate()?;

        match self.render(&plan).await {
            Ok(response) => Ok(PlanOutcome {
                plan,
                response,
                degraded: false,
            }),
            Err(error) => {
                tracing::warn!("plan rendering failed, returning degraded summary: {error}");
                let response = Self::degraded_response(&plan);
                Ok(PlanOutcome {
                    plan,
                    response,
                    degraded: true,
                })
            }
        }
    }

    async fn generate_structured(
        &self,
        request: &PlanRequest,
        display_name: Option<&str>,
        context: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<GeneratedPlan> {
        let system = format!(
            "You are an AI fitness coach creating concise, motivating plans that are safe \
             for a healthy adult. Keep intensity descriptors moderate unless the user \
             explicitly trains advanced. Today's date is {}. \
             Respond with a JSON object with fields: plan_type (\"workout\" or \"diet\"), \
             title, focus, summary, schedule (array of objects with day, headline, \
             details; at least three entries), key_points (array of strings), tips \
             (array of strings).",
            now.format("%Y-%m-%d"),
        );

        let focus_clause = request
            .focus
            .as_deref()
            .map(|f| format!(" focused on {f}"))
            .unwrap_or_default();
        let mut user = format!(
            "Create a {} plan{} lasting {} weeks for {}. Deliver a structured response \
             with schedule entries per day.",
            request.plan_type.as_str(),
            focus_clause,
            request.duration_weeks.unwrap_or(1),
            display_name.unwrap_or("the user"),
        );
        if let Some(context) = context {
            user.push_str("\n\nRecent history:\n");
            user.push_str(context);
        }

        let chat = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)])
            .with_json_mode();
        let response = self.llm.complete(&chat).await?;

        let plan: GeneratedPlan = serde_json::from_str(&response.content).map_err(|e| {
            AppError::external_service("llm", format!("structured plan is not valid: {e}"))
        })?;

        if plan.plan_type != request.plan_type {
            return Err(AppError::external_service(
                "llm",
                format!(
                    "requested a {} plan but received {}",
                    request.plan_type.as_str(),
                    plan.plan_type.as_str()
                ),
            ));
        }

        Ok(plan)
    }

    async fn render(&self, plan: &GeneratedPlan) -> AppResult<String> {
        let system = format!(
            "Summarize the provided fitness plan conversationally in under \
             {RENDERING_WORD_LIMIT} words. Include a short headline, and invite the user \
             to confirm or ask for changes."
        );
        let content = serde_json::to_string(plan)
            .map_err(|e| AppError::internal(format!("Failed to serialize plan: {e}")))?;

        let chat = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(content)]);
        let response = self.llm.complete(&chat).await?;
        Ok(response.content)
    }

    fn degraded_response(plan: &GeneratedPlan) -> String {
        format!(
            "Your {} plan \"{}\" is ready and saved. I couldn't produce the usual summary, \
             so check the plan itself for the full schedule.",
            plan.plan_type.as_str(),
            plan.title,
        )
    }
}
