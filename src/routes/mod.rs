// ABOUTME: HTTP route groups for the fitlog API
// ABOUTME: Each group exposes routes(Arc<ServerResources>) returning a Router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

//! # HTTP Routes
//!
//! One route struct per domain; every handler authenticates from the bearer
//! header before touching the store or the LLM (the health probe excepted).

/// Conversational logging endpoint
pub mod chat;
/// Derived dashboard statistics
pub mod dashboard;
/// Direct CRUD for the four record collections
pub mod entries;
/// Liveness probe
pub mod health;
/// Plan listing, creation, and generation
pub mod plans;
/// Profile settings
pub mod profile;

pub use chat::ChatRoutes;
pub use dashboard::DashboardRoutes;
pub use entries::EntryRoutes;
pub use health::HealthRoutes;
pub use plans::PlanRoutes;
pub use profile::ProfileRoutes;

use std::sync::Arc;

use axum::Router;
use serde::{Deserialize, Serialize};

use crate::resources::ServerResources;

/// Assemble the complete API router
#[must_use]
pub fn router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(ChatRoutes::routes(resources.clone()))
        .merge(EntryRoutes::routes(resources.clone()))
        .merge(PlanRoutes::routes(resources.clone()))
        .merge(ProfileRoutes::routes(resources.clone()))
        .merge(DashboardRoutes::routes(resources.clone()))
}

/// Standard list-response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    /// Result rows, newest first
    pub data: Vec<T>,
}
