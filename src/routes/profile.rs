// ABOUTME: Profile settings endpoints
// ABOUTME: Lazily-created fetch and validated upsert
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::database::ProfileUpdate;
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create the profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/profile", get(Self::fetch).put(Self::update))
            .with_state(resources)
    }

    async fn fetch(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        let settings = resources
            .database
            .profiles()
            .get_or_create(auth.user_id)
            .await?;
        Ok(Json(settings).into_response())
    }

    async fn update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(update): Json<ProfileUpdate>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers)?;
        let settings = resources
            .database
            .profiles()
            .upsert(auth.user_id, &update)
            .await?;
        Ok(Json(settings).into_response())
    }
}
