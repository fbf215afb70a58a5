// ABOUTME: Database operations for per-user profile settings
// ABOUTME: Lazily creates defaults on first read, validated upsert on write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::database::{row_timestamp, row_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{
    ProfileSettings, ThemePreference, WeightUnit, DIETARY_PREFERENCE_MAX_LEN,
};

/// Maximum accepted target weight in either unit
const TARGET_WEIGHT_MAX: f64 = 1000.0;

/// Profile upsert payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// Goal weight; `None` clears it
    #[serde(default)]
    pub target_weight: Option<f64>,
    /// Preferred weight unit; `None` keeps the current value
    #[serde(default)]
    pub weight_unit: Option<WeightUnit>,
    /// Free-text dietary preference; `None` clears it
    #[serde(default)]
    pub dietary_preference: Option<String>,
    /// UI theme preference; `None` keeps the current value
    #[serde(default)]
    pub theme_preference: Option<ThemePreference>,
}

impl ProfileUpdate {
    /// # Errors
    ///
    /// Returns a range error for a non-positive or oversized target weight,
    /// or a validation error for an over-length dietary preference.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(weight) = self.target_weight {
            if weight <= 0.0 || weight > TARGET_WEIGHT_MAX {
                return Err(AppError::out_of_range(format!(
                    "target_weight must be between 0 and {TARGET_WEIGHT_MAX}"
                )));
            }
        }
        if let Some(pref) = &self.dietary_preference {
            if pref.chars().count() > DIETARY_PREFERENCE_MAX_LEN {
                return Err(AppError::invalid_input(format!(
                    "dietary_preference must be at most {DIETARY_PREFERENCE_MAX_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}

/// Profile settings database operations
pub struct ProfileManager {
    pool: SqlitePool,
}

impl ProfileManager {
    /// Create a new profile manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch the user's settings, creating defaults on first read
    ///
    /// # Errors
    ///
    /// Returns an error if the query or the lazy insert fails.
    pub async fn get_or_create(&self, user_id: Uuid) -> AppResult<ProfileSettings> {
        if let Some(existing) = self.fetch(user_id).await? {
            return Ok(existing);
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let defaults = ProfileSettings {
            id,
            user_id,
            target_weight: None,
            weight_unit: WeightUnit::default(),
            dietary_preference: None,
            theme_preference: ThemePreference::default(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO profile_settings
                (id, user_id, target_weight, weight_unit, dietary_preference, theme_preference, created_at, updated_at)
            VALUES ($1, $2, NULL, $3, NULL, $4, $5, $5)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(defaults.weight_unit.as_str())
        .bind(defaults.theme_preference.as_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create profile: {e}")))?;

        // A concurrent first read may have won the insert
        match self.fetch(user_id).await? {
            Some(settings) => Ok(settings),
            None => Ok(defaults),
        }
    }

    /// Apply a validated update, creating the row if absent
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the write fails.
    pub async fn upsert(&self, user_id: Uuid, update: &ProfileUpdate) -> AppResult<ProfileSettings> {
        update.validate()?;

        let current = self.get_or_create(user_id).await?;
        let now = Utc::now();
        let weight_unit = update.weight_unit.unwrap_or(current.weight_unit);
        let theme_preference = update.theme_preference.unwrap_or(current.theme_preference);

        sqlx::query(
            r"
            UPDATE profile_settings
            SET target_weight = $2,
                weight_unit = $3,
                dietary_preference = $4,
                theme_preference = $5,
                updated_at = $6
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .bind(update.target_weight)
        .bind(weight_unit.as_str())
        .bind(update.dietary_preference.as_deref())
        .bind(theme_preference.as_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update profile: {e}")))?;

        Ok(ProfileSettings {
            target_weight: update.target_weight,
            weight_unit,
            dietary_preference: update.dietary_preference.clone(),
            theme_preference,
            updated_at: now,
            ..current
        })
    }

    async fn fetch(&self, user_id: Uuid) -> AppResult<Option<ProfileSettings>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, target_weight, weight_unit, dietary_preference, theme_preference, created_at, updated_at
            FROM profile_settings
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch profile: {e}")))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    fn row_to_record(row: &SqliteRow) -> AppResult<ProfileSettings> {
        Ok(ProfileSettings {
            id: row_uuid(row, "id")?,
            user_id: row_uuid(row, "user_id")?,
            target_weight: row
                .try_get("target_weight")
                .map_err(|e| AppError::database(format!("Failed to read target_weight: {e}")))?,
            weight_unit: row
                .try_get::<String, _>("weight_unit")
                .map_err(|e| AppError::database(format!("Failed to read weight_unit: {e}")))?
                .parse()?,
            dietary_preference: row.try_get("dietary_preference").map_err(|e| {
                AppError::database(format!("Failed to read dietary_preference: {e}"))
            })?,
            theme_preference: row
                .try_get::<String, _>("theme_preference")
                .map_err(|e| AppError::database(format!("Failed to read theme_preference: {e}")))?
                .parse()?,
            created_at: row_timestamp(row, "created_at")?,
            updated_at: row_timestamp(row, "updated_at")?,
        })
    }
}
