// ABOUTME: Database operations for weight readings
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
use crate::models::{NewWeight, WeightRecord};

/// Weight reading database operations
pub struct WeightManager {
    pool: SqlitePool,
}

impl WeightManager {
    /// Create a new weight manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a weight reading
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails validation or the insert fails.
    pub async fn create(&self, user_id: Uuid, entry: &NewWeight) -> AppResult<WeightRecord> {
        entry.validate()?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO weight_records (id, user_id, weight, unit, recorded_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(entry.weight)
        .bind(entry.unit.as_str())
        .bind(entry.recorded_at.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert weight reading: {e}")))?;

        Ok(WeightRecord {
            id,
            user_id,
            weight: entry.weight,
            unit: entry.unit,
            recorded_at: entry.recorded_at,
            created_at: now,
            updated_at: now,
        })
    }

    /// List readings in a time range, newest first
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
    ) -> AppResult<Vec<WeightRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, weight, unit, recorded_at, created_at, updated_at
            FROM weight_records
            WHERE user_id = $1
              AND ($2 IS NULL OR recorded_at >= $2)
              AND ($3 IS NULL OR recorded_at <= $3)
            ORDER BY recorded_at DESC
            LIMIT $4
            ",
        )
        .bind(user_id.to_string())
        .bind(start.map(|t| t.to_rfc3339()))
        .bind(end.map(|t| t.to_rfc3339()))
        .bind(limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list weight readings: {e}")))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    fn row_to_record(row: &SqliteRow) -> AppResult<WeightRecord> {
        Ok(WeightRecord {
            id: row_uuid(row, "id")?,
            user_id: row_uuid(row, "user_id")?,
            weight: row
                .try_get("weight")
                .map_err(|e| AppError::database(format!("Failed to read weight: {e}")))?,
            unit: row
                .try_get::<String, _>("unit")
                .map_err(|e| AppError::database(format!("Failed to read unit: {e}")))?
                .parse()?,
            recorded_at: row_timestamp(row, "recorded_at")?,
            created_at: row_timestamp(row, "created_at")?,
            updated_at: row_timestamp(row, "updated_at")?,
        })
    }
}
