// ABOUTME: Plan endpoints: listing, direct creation, and LLM generation
// ABOUTME: Generation pulls recent store history as prompt context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

use std::fmt::Write as _;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::NewPlan;
use crate::errors::AppError;
use crate::models::{
    BodyFatRecord, MealRecord, PlanRecord, PlanRequest, PlanType, WeightRecord, WorkoutRecord,
};
use crate::plans::PlanGenerator;
use crate::resources::ServerResources;
use crate::routes::DataResponse;

/// Readings of each body metric pulled as generation context
const CONTEXT_READINGS: i64 = 5;

/// Workouts and meals pulled as generation context
const CONTEXT_ENTRIES: i64 = 10;

/// Plan list query: one id, or a row cap
#[derive(Debug, Default, Deserialize)]
pub struct PlanListQuery {
    /// Fetch a single plan by id
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Row cap for the list form
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Generation request body
#[derive(Debug, Deserialize)]
pub struct GeneratePlanBody {
    /// Workout or diet
    #[serde(rename = "planType")]
    pub plan_type: PlanType,
    /// Optional focus text
    #[serde(default)]
    pub focus: Option<String>,
    /// Optional duration in weeks
    #[serde(default)]
    pub duration_weeks: Option<u32>,
}

/// Generation response body
#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratePlanResponse {
    /// Persisted plan record
    pub plan: PlanRecord,
    /// Conversational rendering of the plan
    pub content: String,
}

/// Plan routes handler
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create the plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/plans", get(Self::list).post(Self::create))
            .route("/api/plans/generate", post(Self::generate))
            .with_state(resources)
    }

    async fn list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<PlanListQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;

        if let Some(id) = query.id {
            let plan = resources
                .database
                .plans()
                .get(auth.user_id, id)
                .await?
                .ok_or_else(|| AppError::not_found("Plan"))?;
            return Ok(Json(DataResponse { data: vec![plan] }).into_response());
        }

        if let Some(limit) = query.limit {
            if limit <= 0 {
                return Err(AppError::out_of_range("limit must be positive"));
            }
        }
        let data = resources
            .database
            .plans()
            .list(auth.user_id, query.limit)
            .await?;
        Ok(Json(DataResponse { data }).into_response())
    }

    async fn create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(plan): Json<NewPlan>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        let record = resources.database.plans().create(auth.user_id, &plan).await?;
        Ok((StatusCode::CREATED, Json(record)).into_response())
    }

    async fn generate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<GeneratePlanBody>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        let request = PlanRequest {
            plan_type: body.plan_type,
            focus: body.focus,
            duration_weeks: body.duration_weeks,
        };
        request.validate()?;
        let llm = resources.llm()?;
        let now = Utc::now();

        let database = &resources.database;
        let weights = database
            .weights()
            .list(auth.user_id, None, None, Some(CONTEXT_READINGS))
            .await?;
        let body_fat = database
            .body_fat()
            .list(auth.user_id, None, None, Some(CONTEXT_READINGS))
            .await?;
        let workouts = database
            .workouts()
            .list(auth.user_id, None, None, Some(CONTEXT_ENTRIES))
            .await?;
        let meals = database
            .meals()
            .list(auth.user_id, None, None, Some(CONTEXT_ENTRIES))
            .await?;
        let context = summarize_history(&weights, &body_fat, &workouts, &meals);

        let generator = PlanGenerator::new(llm);
        let outcome = generator
            .generate(&request, None, context.as_deref(), now)
            .await?;

        let record = database
            .plans()
            .create(auth.user_id, &outcome.to_new_plan(now)?)
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(GeneratePlanResponse {
                plan: record,
                content: outcome.response,
            }),
        )
            .into_response())
    }
}

/// Render recent records as compact prompt context, `None` when empty
fn summarize_history(
    weights: &[WeightRecord],
    body_fat: &[BodyFatRecord],
    workouts: &[WorkoutRecord],
    meals: &[MealRecord],
) -> Option<String> {
    let mut out = String::new();

    for w in weights {
        let _ = writeln!(
            out,
            "Weight: {} {} on {}",
            w.weight,
            w.unit.as_str(),
            w.recorded_at.format("%Y-%m-%d")
        );
    }
    for b in body_fat {
        let _ = writeln!(
            out,
            "Body fat: {}% on {}",
            b.percentage,
            b.recorded_at.format("%Y-%m-%d")
        );
    }
    for w in workouts {
        let _ = writeln!(
            out,
            "Workout: {} on {}",
            w.activity,
            w.performed_at.format("%Y-%m-%d")
        );
    }
    for m in meals {
        let _ = writeln!(
            out,
            "Meal: {}{} on {}",
            m.description,
            m.calories
                .map(|c| format!(" ({c} kcal)"))
                .unwrap_or_default(),
            m.eaten_at.format("%Y-%m-%d")
        );
    }

    (!out.is_empty()).then_some(out)
}
