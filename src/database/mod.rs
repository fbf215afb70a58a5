// ABOUTME: Core database management with SQLite schema setup and migrations
// ABOUTME: Exposes per-domain managers for fitness records, plans, and profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

//! # Persistence Layer
//!
//! A [`Database`] wraps the `SQLite` pool and hands out per-domain managers.
//! Every query is keyed by `user_id`; identity and audit timestamps are
//! assigned here, never by callers. Timestamps are stored as RFC 3339 TEXT
//! so range filters compare lexicographically.

/// Body-fat reading storage
pub mod body_fat;
/// Meal entry storage
pub mod meals;
/// Generated plan storage
pub mod plans;
/// Profile settings storage
pub mod profiles;
/// Weight reading storage
pub mod weights;
/// Workout entry storage
pub mod workouts;

pub use body_fat::BodyFatManager;
pub use meals::MealManager;
pub use plans::{NewPlan, PlanManager};
pub use profiles::{ProfileManager, ProfileUpdate};
pub use weights::WeightManager;
pub use workouts::WorkoutManager;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Default row cap applied when a list query carries no explicit limit
pub(crate) const DEFAULT_LIST_LIMIT: i64 = 500;

/// Database connection manager
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database, creating the file when absent
    ///
    /// # Errors
    ///
    /// Returns a database error when the URL is malformed or the connection
    /// fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::database(format!("Invalid database URL: {e}")))?
            .create_if_missing(true);

        // In-memory databases are per-connection; a larger pool would hand
        // out empty databases.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        Ok(Self { pool })
    }

    /// Create the schema if it does not exist
    ///
    /// # Errors
    ///
    /// Returns a database error if any DDL statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS weight_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                weight REAL NOT NULL,
                unit TEXT NOT NULL DEFAULT 'lbs',
                recorded_at TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE INDEX IF NOT EXISTS idx_weight_user_time
                ON weight_records (user_id, recorded_at)
            ",
            r"
            CREATE TABLE IF NOT EXISTS body_fat_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                percentage REAL NOT NULL,
                recorded_at TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE INDEX IF NOT EXISTS idx_body_fat_user_time
                ON body_fat_records (user_id, recorded_at)
            ",
            r"
            CREATE TABLE IF NOT EXISTS workout_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                activity TEXT NOT NULL,
                sets INTEGER,
                reps INTEGER,
                load REAL,
                distance REAL,
                duration_minutes REAL,
                intensity TEXT,
                performed_at TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE INDEX IF NOT EXISTS idx_workout_user_time
                ON workout_records (user_id, performed_at)
            ",
            r"
            CREATE TABLE IF NOT EXISTS meal_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                description TEXT NOT NULL,
                calories REAL,
                protein_g REAL,
                carbs_g REAL,
                fats_g REAL,
                eaten_at TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE INDEX IF NOT EXISTS idx_meal_user_time
                ON meal_records (user_id, eaten_at)
            ",
            r"
            CREATE TABLE IF NOT EXISTS plan_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                plan_type TEXT NOT NULL,
                title TEXT NOT NULL,
                focus TEXT,
                summary TEXT,
                content TEXT NOT NULL,
                generated_at TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE INDEX IF NOT EXISTS idx_plan_user_time
                ON plan_records (user_id, generated_at)
            ",
            r"
            CREATE TABLE IF NOT EXISTS profile_settings (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL UNIQUE,
                target_weight REAL,
                weight_unit TEXT NOT NULL DEFAULT 'lbs',
                dietary_preference TEXT,
                theme_preference TEXT NOT NULL DEFAULT 'system',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }

        tracing::info!("database schema ready");
        Ok(())
    }

    /// Liveness probe used by the health endpoint
    ///
    /// # Errors
    ///
    /// Returns a database error when the ping query fails.
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query(r"SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// The underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Weight reading operations
    #[must_use]
    pub fn weights(&self) -> WeightManager {
        WeightManager::new(self.pool.clone())
    }

    /// Body-fat reading operations
    #[must_use]
    pub fn body_fat(&self) -> BodyFatManager {
        BodyFatManager::new(self.pool.clone())
    }

    /// Workout entry operations
    #[must_use]
    pub fn workouts(&self) -> WorkoutManager {
        WorkoutManager::new(self.pool.clone())
    }

    /// Meal entry operations
    #[must_use]
    pub fn meals(&self) -> MealManager {
        MealManager::new(self.pool.clone())
    }

    /// Generated plan operations
    #[must_use]
    pub fn plans(&self) -> PlanManager {
        PlanManager::new(self.pool.clone())
    }

    /// Profile settings operations
    #[must_use]
    pub fn profiles(&self) -> ProfileManager {
        ProfileManager::new(self.pool.clone())
    }
}

// ============================================================================
// Row mapping helpers
// ============================================================================

/// Read a UUID stored as TEXT
pub(crate) fn row_uuid(row: &SqliteRow, column: &str) -> AppResult<Uuid> {
    let raw: String = row
        .try_get(column)
        .map_err(|e| AppError::database(format!("Failed to read {column}: {e}")))?;
    Uuid::parse_str(&raw)
        .map_err(|e| AppError::database(format!("Column {column} is not a valid UUID: {e}")))
}

/// Read an RFC 3339 timestamp stored as TEXT
pub(crate) fn row_timestamp(row: &SqliteRow, column: &str) -> AppResult<DateTime<Utc>> {
    let raw: String = row
        .try_get(column)
        .map_err(|e| AppError::database(format!("Failed to read {column}: {e}")))?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Column {column} is not a valid timestamp: {e}")))
}
