// ABOUTME: Database operations for body-fat percentage readings
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
use crate::models::{BodyFatRecord, NewBodyFat};

/// Body-fat reading database operations
pub struct BodyFatManager {
    pool: SqlitePool,
}

impl BodyFatManager {
    /// Create a new body-fat manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a body-fat reading
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails validation or the insert fails.
    pub async fn create(&self, user_id: Uuid, entry: &NewBodyFat) -> AppResult<BodyFatRecord> {
        entry.validate()?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO body_fat_records (id, user_id, percentage, recorded_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(entry.percentage)
        .bind(entry.recorded_at.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert body fat reading: {e}")))?;

        Ok(BodyFatRecord {
            id,
            user_id,
            percentage: entry.percentage,
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
    ) -> AppResult<Vec<BodyFatRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, percentage, recorded_at, created_at, updated_at
            FROM body_fat_records
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
        .map_err(|e| AppError::database(format!("Failed to list body fat readings: {e}")))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    fn row_to_record(row: &SqliteRow) -> AppResult<BodyFatRecord> {
        Ok(BodyFatRecord {
            id: row_uuid(row, "id")?,
            user_id: row_uuid(row, "user_id")?,
            percentage: row
                .try_get("percentage")
                .map_err(|e| AppError::database(format!("Failed to read percentage: {e}")))?,
            recorded_at: row_timestamp(row, "recorded_at")?,
            created_at: row_timestamp(row, "created_at")?,
            updated_at: row_timestamp(row, "updated_at")?,
        })
    }
}
