// ABOUTME: Database operations for workout entries
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
use crate::models::{NewWorkout, WorkoutRecord};

/// Workout entry database operations
pub struct WorkoutManager {
    pool: SqlitePool,
}

impl WorkoutManager {
    /// Create a new workout manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a workout entry
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails validation or the insert fails.
    pub async fn create(&self, user_id: Uuid, entry: &NewWorkout) -> AppResult<WorkoutRecord> {
        entry.validate()?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO workout_records
                (id, user_id, activity, sets, reps, load, distance, duration_minutes, intensity, performed_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(&entry.activity)
        .bind(entry.sets)
        .bind(entry.reps)
        .bind(entry.load)
        .bind(entry.distance)
        .bind(entry.duration_minutes)
        .bind(entry.intensity.as_deref())
        .bind(entry.performed_at.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert workout: {e}")))?;

        Ok(WorkoutRecord {
            id,
            user_id,
            activity: entry.activity.clone(),
            sets: entry.sets,
            reps: entry.reps,
            load: entry.load,
            distance: entry.distance,
            duration_minutes: entry.duration_minutes,
            intensity: entry.intensity.clone(),
            performed_at: entry.performed_at,
            created_at: now,
            updated_at: now,
        })
    }

    /// List workouts in a time range, newest first
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
    ) -> AppResult<Vec<WorkoutRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, activity, sets, reps, load, distance, duration_minutes, intensity, performed_at, created_at, updated_at
            FROM workout_records
            WHERE user_id = $1
              AND ($2 IS NULL OR performed_at >= $2)
              AND ($3 IS NULL OR performed_at <= $3)
            ORDER BY performed_at DESC
            LIMIT $4
            ",
        )
        .bind(user_id.to_string())
        .bind(start.map(|t| t.to_rfc3339()))
        .bind(end.map(|t| t.to_rfc3339()))
        .bind(limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list workouts: {e}")))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    fn row_to_record(row: &SqliteRow) -> AppResult<WorkoutRecord> {
        Ok(WorkoutRecord {
            id: row_uuid(row, "id")?,
            user_id: row_uuid(row, "user_id")?,
            activity: row
                .try_get("activity")
                .map_err(|e| AppError::database(format!("Failed to read activity: {e}")))?,
            sets: row
                .try_get("sets")
                .map_err(|e| AppError::database(format!("Failed to read sets: {e}")))?,
            reps: row
                .try_get("reps")
                .map_err(|e| AppError::database(format!("Failed to read reps: {e}")))?,
            load: row
                .try_get("load")
                .map_err(|e| AppError::database(format!("Failed to read load: {e}")))?,
            distance: row
                .try_get("distance")
                .map_err(|e| AppError::database(format!("Failed to read distance: {e}")))?,
            duration_minutes: row
                .try_get("duration_minutes")
                .map_err(|e| AppError::database(format!("Failed to read duration_minutes: {e}")))?,
            intensity: row
                .try_get("intensity")
                .map_err(|e| AppError::database(format!("Failed to read intensity: {e}")))?,
            performed_at: row_timestamp(row, "performed_at")?,
            created_at: row_timestamp(row, "created_at")?,
            updated_at: row_timestamp(row, "updated_at")?,
        })
    }
}
