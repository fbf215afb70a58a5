// ABOUTME: Direct CRUD endpoints for weights, body fat, workouts, and meals
// ABOUTME: Ranged list queries and single-entry inserts bypassing extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{NewBodyFat, NewMeal, NewWeight, NewWorkout};
use crate::resources::ServerResources;
use crate::routes::DataResponse;

/// Time-range list query shared by the four collections
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Inclusive range start
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// Inclusive range end
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// Row cap
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListQuery {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(limit) = self.limit {
            if limit <= 0 {
                return Err(AppError::out_of_range("limit must be positive"));
            }
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(AppError::invalid_input("start must not be after end"));
            }
        }
        Ok(())
    }
}

/// Record collection routes handler
pub struct EntryRoutes;

impl EntryRoutes {
    /// Create the four collection routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/weights",
                get(Self::list_weights).post(Self::create_weight),
            )
            .route(
                "/api/body-fat",
                get(Self::list_body_fat).post(Self::create_body_fat),
            )
            .route(
                "/api/workouts",
                get(Self::list_workouts).post(Self::create_workout),
            )
            .route("/api/meals", get(Self::list_meals).post(Self::create_meal))
            .with_state(resources)
    }

    async fn list_weights(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        query.validate()?;
        let data = resources
            .database
            .weights()
            .list(auth.user_id, query.start, query.end, query.limit)
            .await?;
        Ok(Json(DataResponse { data }).into_response())
    }

    async fn create_weight(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(entry): Json<NewWeight>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        let record = resources.database.weights().create(auth.user_id, &entry).await?;
        Ok((StatusCode::CREATED, Json(record)).into_response())
    }

    async fn list_body_fat(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        query.validate()?;
        let data = resources
            .database
            .body_fat()
            .list(auth.user_id, query.start, query.end, query.limit)
            .await?;
        Ok(Json(DataResponse { data }).into_response())
    }

    async fn create_body_fat(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(entry): Json<NewBodyFat>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        let record = resources
            .database
            .body_fat()
            .create(auth.user_id, &entry)
            .await?;
        Ok((StatusCode::CREATED, Json(record)).into_response())
    }

    async fn list_workouts(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        query.validate()?;
        let data = resources
            .database
            .workouts()
            .list(auth.user_id, query.start, query.end, query.limit)
            .await?;
        Ok(Json(DataResponse { data }).into_response())
    }

    async fn create_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(entry): Json<NewWorkout>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        let record = resources
            .database
            .workouts()
            .create(auth.user_id, &entry)
            .await?;
        Ok((StatusCode::CREATED, Json(record)).into_response())
    }

    async fn list_meals(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        query.validate()?;
        let data = resources
            .database
            .meals()
            .list(auth.user_id, query.start, query.end, query.limit)
            .await?;
        Ok(Json(DataResponse { data }).into_response())
    }

    async fn create_meal(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(entry): Json<NewMeal>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        let record = resources.database.meals().create(auth.user_id, &entry).await?;
        Ok((StatusCode::CREATED, Json(record)).into_response())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_rejects_inverted_range() {
        let query = ListQuery {
            start: Some(Utc::now()),
            end: Some(Utc::now() - chrono::Duration::days(1)),
            limit: None,
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_list_query_rejects_non_positive_limit() {
        let query = ListQuery {
            start: None,
            end: None,
            limit: Some(0),
        };
        assert!(query.validate().is_err());
    }
}
