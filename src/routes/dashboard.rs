// ABOUTME: Dashboard summary endpoint over a fixed set of time windows
// ABOUTME: Fetches ranged slices and applies the pure aggregation functions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::dashboard::{
    average_daily_calories, daily_volume_series, downsample, weight_change, workouts_per_week,
    VolumePoint, WeightChange,
};
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Windows the dashboard can be asked for, in days
const ALLOWED_WINDOWS: [u32; 4] = [7, 30, 90, 365];

/// Window used when the query omits `days`
const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Dashboard query parameters
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// Window length in days; one of 7, 30, 90, 365
    #[serde(default)]
    pub days: Option<u32>,
}

/// Derived statistics for one window
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Window length in days
    pub days: u32,
    /// Net weight change, absent with fewer than two readings
    pub weight_change: Option<WeightChange>,
    /// Average calories per day with calorie data
    pub average_daily_calories: Option<f64>,
    /// Workout cadence across the window
    pub workouts_per_week: f64,
    /// Downsampled daily training-volume series, ascending by day
    pub volume_series: Vec<VolumePoint>,
}

/// Dashboard routes handler
pub struct DashboardRoutes;

impl DashboardRoutes {
    /// Create the dashboard route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/dashboard/summary", get(Self::summary))
            .with_state(resources)
    }

    async fn summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<SummaryQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;

        let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
        if !ALLOWED_WINDOWS.contains(&days) {
            return Err(AppError::invalid_input(format!(
                "days must be one of 7, 30, 90, or 365, got {days}"
            )));
        }

        let end = Utc::now();
        let start = end - Duration::days(i64::from(days));

        let database = &resources.database;
        let weights = database
            .weights()
            .list(auth.user_id, Some(start), Some(end), None)
            .await?;
        let workouts = database
            .workouts()
            .list(auth.user_id, Some(start), Some(end), None)
            .await?;
        let meals = database
            .meals()
            .list(auth.user_id, Some(start), Some(end), None)
            .await?;

        let series = daily_volume_series(&workouts);
        let summary = DashboardSummary {
            days,
            weight_change: weight_change(&weights),
            average_daily_calories: average_daily_calories(&meals),
            workouts_per_week: workouts_per_week(workouts.len(), days),
            volume_series: downsample(&series, resources.config.dashboard.point_cap),
        };

        Ok(Json(summary).into_response())
    }
}
