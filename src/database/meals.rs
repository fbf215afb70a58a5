// ABOUTME: Database operations for meal entries
// ABOUTME: Insert and ranged listing with per-user isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::database::{row_timestamp, row_uuid, DEFAULT_LIST_LIMIT};
use crate::errors::{AppError, AppResult};
use crate::models::{MealRecord, NewMeal};

/// Meal entry database operations
pub struct MealManager {
    pool: SqlitePool,
}

impl MealManager {
    /// Create a new meal manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a meal entry
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails validation or the insert fails.
    pub async fn create(&self, user_id: Uuid, entry: &NewMeal) -> AppResult<MealRecord> {
        entry.validate()?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO meal_records
                (id, user_id, description, calories, protein_g, carbs_g, fats_g, eaten_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(&entry.description)
        .bind(entry.calories)
        .bind(entry.protein_g)
        .bind(entry.carbs_g)
        .bind(entry.fats_g)
        .bind(entry.eaten_at.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert meal: {e}")))?;

        Ok(MealRecord {
            id,
            user_id,
            description: entry.description.clone(),
            calories: entry.calories,
            protein_g: entry.protein_g,
            carbs_g: entry.carbs_g,
            fats_g: entry.fats_g,
            eaten_at: entry.eaten_at,
            created_at: now,
            updated_at: now,
        })
    }

    /// List meals in a time range, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        limit: Option<i64>,
    ) -> AppResult<Vec<MealRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, description, calories, protein_g, carbs_g, fats_g, eaten_at, created_at, updated_at
            FROM meal_records
            WHERE user_id = $1
              AND ($2 IS NULL OR eaten_at >= $2)
              AND ($3 IS NULL OR eaten_at <= $3)
            ORDER BY eaten_at DESC
            LIMIT $4
            ",
        )
        .bind(user_id.to_string())
        .bind(start.map(|t| t.to_rfc3339()))
        .bind(end.map(|t| t.to_rfc3339()))
        .bind(limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list meals: {e}")))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    fn row_to_record(row: &SqliteRow) -> AppResult<MealRecord> {
        Ok(MealRecord {
            id: row_uuid(row, "id")?,
            user_id: row_uuid(row, "user_id")?,
            description: row
                .try_get("description")
                .map_err(|e| AppError::database(format!("Failed to read description: {e}")))?,
            calories: row
                .try_get("calories")
                .map_err(|e| AppError::database(format!("Failed to read calories: {e}")))?,
            protein_g: row
                .try_get("protein_g")
                .map_err(|e| AppError::database(format!("Failed to read protein_g: {e}")))?,
            carbs_g: row
                .try_get("carbs_g")
                .map_err(|e| AppError::database(format!("Failed to read carbs_g: {e}")))?,
            fats_g: row
                .try_get("fats_g")
                .map_err(|e| AppError::database(format!("Failed to read fats_g: {e}")))?,
            eaten_at: row_timestamp(row, "eaten_at")?,
            created_at: row_timestamp(row, "created_at")?,
            updated_at: row_timestamp(row, "updated_at")?,
        })
    }
}
