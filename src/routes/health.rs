// ABOUTME: Liveness endpoint with a database ping
// ABOUTME: Unauthenticated so load balancers can probe it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Health probe response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: &'static str,
    /// Database reachability
    pub database: &'static str,
}

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/health", get(Self::health))
            .with_state(resources)
    }

    async fn health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        resources.database.ping().await?;
        Ok(Json(HealthResponse {
            status: "ok",
            database: "ok",
        })
        .into_response())
    }
}
