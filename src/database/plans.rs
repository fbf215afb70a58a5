// ABOUTME: Database operations for generated workout and diet plans
// ABOUTME: Insert, list, and fetch-by-id with per-user isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::database::{row_timestamp, row_uuid, DEFAULT_LIST_LIMIT};
use crate::errors::{AppError, AppResult};
use crate::models::{PlanRecord, PlanType};

/// Payload for storing a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlan {
    /// Workout or diet
    pub plan_type: PlanType,
    /// Short plan title
    pub title: String,
    /// Focus the plan targets, if any
    #[serde(default)]
    pub focus: Option<String>,
    /// Conversational summary, if rendering succeeded
    #[serde(default)]
    pub summary: Option<String>,
    /// Full structured plan as JSON
    pub content: serde_json::Value,
    /// When the plan was generated; defaults to now
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

impl NewPlan {
    /// # Errors
    ///
    /// Returns a validation error when the title is empty.
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }
        Ok(())
    }
}

/// Generated plan database operations
pub struct PlanManager {
    pool: SqlitePool,
}

impl PlanManager {
    /// Create a new plan manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a plan
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails validation, the content cannot
    /// be serialized, or the insert fails.
    pub async fn create(&self, user_id: Uuid, plan: &NewPlan) -> AppResult<PlanRecord> {
        plan.validate()?;

        let id = Uuid::new_v4();
        let now = Utc::now();
        let generated_at = plan.generated_at.unwrap_or(now);
        let content = serde_json::to_string(&plan.content)
            .map_err(|e| AppError::internal(format!("Failed to serialize plan content: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO plan_records
                (id, user_id, plan_type, title, focus, summary, content, generated_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(plan.plan_type.as_str())
        .bind(&plan.title)
        .bind(plan.focus.as_deref())
        .bind(plan.summary.as_deref())
        .bind(&content)
        .bind(generated_at.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert plan: {e}")))?;

        Ok(PlanRecord {
            id,
            user_id,
            plan_type: plan.plan_type,
            title: plan.title.clone(),
            focus: plan.focus.clone(),
            summary: plan.summary.clone(),
            content: plan.content.clone(),
            generated_at,
            created_at: now,
            updated_at: now,
        })
    }

    /// List plans, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, user_id: Uuid, limit: Option<i64>) -> AppResult<Vec<PlanRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, plan_type, title, focus, summary, content, generated_at, created_at, updated_at
            FROM plan_records
            WHERE user_id = $1
            ORDER BY generated_at DESC
            LIMIT $2
            ",
        )
        .bind(user_id.to_string())
        .bind(limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list plans: {e}")))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// Fetch one plan by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<PlanRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, plan_type, title, focus, summary, content, generated_at, created_at, updated_at
            FROM plan_records
            WHERE user_id = $1 AND id = $2
            ",
        )
        .bind(user_id.to_string())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch plan: {e}")))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    fn row_to_record(row: &SqliteRow) -> AppResult<PlanRecord> {
        let content_raw: String = row
            .try_get("content")
            .map_err(|e| AppError::database(format!("Failed to read content: {e}")))?;
        let content = serde_json::from_str(&content_raw)
            .map_err(|e| AppError::database(format!("Stored plan content is not JSON: {e}")))?;

        Ok(PlanRecord {
            id: row_uuid(row, "id")?,
            user_id: row_uuid(row, "user_id")?,
            plan_type: row
                .try_get::<String, _>("plan_type")
                .map_err(|e| AppError::database(format!("Failed to read plan_type: {e}")))?
                .parse()?,
            title: row
                .try_get("title")
                .map_err(|e| AppError::database(format!("Failed to read title: {e}")))?,
            focus: row
                .try_get("focus")
                .map_err(|e| AppError::database(format!("Failed to read focus: {e}")))?,
            summary: row
                .try_get("summary")
                .map_err(|e| AppError::database(format!("Failed to read summary: {e}")))?,
            content,
            generated_at: row_timestamp(row, "generated_at")?,
            created_at: row_timestamp(row, "created_at")?,
            updated_at: row_timestamp(row, "updated_at")?,
        })
    }
}
