// ABOUTME: Domain data models for fitness records, chat payloads, and plans
// ABOUTME: Includes serde wire shapes and range validation for numeric fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

//! # Data Models
//!
//! Typed records for the five persisted collections plus the wire shapes the
//! extraction and plan pipelines exchange with the LLM. Stored records carry
//! store-assigned identity and audit timestamps; the `New*` payloads are what
//! extraction and the direct insert endpoints accept.
//!
//! Validation lives next to the types: every numeric field rejects zero and
//! negative values, and percentage fields reject values over 100.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

// ============================================================================
// Enumerations
// ============================================================================

/// Weight measurement unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Pounds
    #[default]
    Lbs,
    /// Kilograms
    Kg,
}

impl WeightUnit {
    /// Stable string form used in storage and prompts
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lbs => "lbs",
            Self::Kg => "kg",
        }
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lbs" => Ok(Self::Lbs),
            "kg" => Ok(Self::Kg),
            other => Err(AppError::invalid_input(format!(
                "Unknown weight unit: {other}"
            ))),
        }
    }
}

/// Kind of generated plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    /// Multi-day training schedule
    Workout,
    /// Multi-day nutrition schedule
    Diet,
}

impl PlanType {
    /// Stable string form used in storage and prompts
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Workout => "workout",
            Self::Diet => "diet",
        }
    }
}

impl std::str::FromStr for PlanType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workout" => Ok(Self::Workout),
            "diet" => Ok(Self::Diet),
            other => Err(AppError::invalid_input(format!(
                "Unknown plan type: {other}"
            ))),
        }
    }
}

/// UI theme preference stored with the profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
    /// Follow the system setting
    #[default]
    System,
}

impl ThemePreference {
    /// Stable string form used in storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl std::str::FromStr for ThemePreference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(AppError::invalid_input(format!(
                "Unknown theme preference: {other}"
            ))),
        }
    }
}

// ============================================================================
// Stored records
// ============================================================================

/// A persisted weight reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Measured weight, always positive
    pub weight: f64,
    /// Unit the value was recorded in
    pub unit: WeightUnit,
    /// When the measurement was taken
    pub recorded_at: DateTime<Utc>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// A persisted body-fat percentage reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyFatRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Body-fat percentage, in (0, 100]
    pub percentage: f64,
    /// When the measurement was taken
    pub recorded_at: DateTime<Utc>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// A persisted workout entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Activity description ("bench press", "5k run", ...)
    pub activity: String,
    /// Number of sets, if applicable
    pub sets: Option<i64>,
    /// Reps per set, if applicable
    pub reps: Option<i64>,
    /// Load in the user's weight unit, if applicable
    pub load: Option<f64>,
    /// Distance covered, if applicable
    pub distance: Option<f64>,
    /// Duration in minutes, if applicable
    pub duration_minutes: Option<f64>,
    /// Free-text intensity note ("easy", "RPE 8", ...)
    pub intensity: Option<String>,
    /// When the workout happened
    pub performed_at: DateTime<Utc>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// A persisted meal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// What was eaten
    pub description: String,
    /// Total calories, if known
    pub calories: Option<f64>,
    /// Protein grams, if known
    pub protein_g: Option<f64>,
    /// Carbohydrate grams, if known
    pub carbs_g: Option<f64>,
    /// Fat grams, if known
    pub fats_g: Option<f64>,
    /// When the meal was eaten
    pub eaten_at: DateTime<Utc>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// A persisted generated plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Workout or diet
    pub plan_type: PlanType,
    /// Short plan title
    pub title: String,
    /// Focus the plan was generated for, if any
    pub focus: Option<String>,
    /// Conversational summary shown in chat, if rendering succeeded
    pub summary: Option<String>,
    /// Full structured plan as JSON
    pub content: serde_json::Value,
    /// When the plan was generated
    pub generated_at: DateTime<Utc>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Per-user profile settings, lazily created with defaults on first read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSettings {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user; exactly one settings row per user
    pub user_id: Uuid,
    /// Goal weight in the user's unit, if set
    pub target_weight: Option<f64>,
    /// Preferred weight unit
    pub weight_unit: WeightUnit,
    /// Free-text dietary preference, at most 120 characters
    pub dietary_preference: Option<String>,
    /// UI theme preference
    pub theme_preference: ThemePreference,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Insert payloads
// ============================================================================

/// Maximum length accepted for the dietary preference text
pub const DIETARY_PREFERENCE_MAX_LEN: usize = 120;

/// New weight reading, from extraction or a direct insert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWeight {
    /// Measured weight
    pub weight: f64,
    /// Unit the value was recorded in
    #[serde(default)]
    pub unit: WeightUnit,
    /// When the measurement was taken
    pub recorded_at: DateTime<Utc>,
}

impl NewWeight {
    /// # Errors
    ///
    /// Returns a range error if the weight is not positive.
    pub fn validate(&self) -> AppResult<()> {
        if self.weight <= 0.0 {
            return Err(AppError::out_of_range("weight must be positive"));
        }
        Ok(())
    }
}

/// New body-fat reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBodyFat {
    /// Body-fat percentage
    pub percentage: f64,
    /// When the measurement was taken
    pub recorded_at: DateTime<Utc>,
}

impl NewBodyFat {
    /// # Errors
    ///
    /// Returns a range error unless the percentage is in (0, 100].
    pub fn validate(&self) -> AppResult<()> {
        if self.percentage <= 0.0 || self.percentage > 100.0 {
            return Err(AppError::out_of_range(
                "body fat percentage must be between 0 and 100",
            ));
        }
        Ok(())
    }
}

/// New workout entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkout {
    /// Activity description, required
    pub activity: String,
    /// Number of sets
    #[serde(default)]
    pub sets: Option<i64>,
    /// Reps per set
    #[serde(default)]
    pub reps: Option<i64>,
    /// Load lifted
    #[serde(default)]
    pub load: Option<f64>,
    /// Distance covered
    #[serde(default)]
    pub distance: Option<f64>,
    /// Duration in minutes
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    /// Free-text intensity note
    #[serde(default)]
    pub intensity: Option<String>,
    /// When the workout happened
    pub performed_at: DateTime<Utc>,
}

impl NewWorkout {
    /// # Errors
    ///
    /// Returns a validation error if the activity is empty or any numeric
    /// field is present but not positive.
    pub fn validate(&self) -> AppResult<()> {
        if self.activity.trim().is_empty() {
            return Err(AppError::invalid_input("activity is required"));
        }
        require_positive_int("sets", self.sets)?;
        require_positive_int("reps", self.reps)?;
        require_positive("load", self.load)?;
        require_positive("distance", self.distance)?;
        require_positive("duration_minutes", self.duration_minutes)?;
        Ok(())
    }
}

/// New meal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeal {
    /// What was eaten, required
    pub description: String,
    /// Total calories
    #[serde(default)]
    pub calories: Option<f64>,
    /// Protein grams
    #[serde(default)]
    pub protein_g: Option<f64>,
    /// Carbohydrate grams
    #[serde(default)]
    pub carbs_g: Option<f64>,
    /// Fat grams
    #[serde(default)]
    pub fats_g: Option<f64>,
    /// When the meal was eaten
    pub eaten_at: DateTime<Utc>,
}

impl NewMeal {
    /// # Errors
    ///
    /// Returns a validation error if the description is empty or any numeric
    /// field is present but not positive.
    pub fn validate(&self) -> AppResult<()> {
        if self.description.trim().is_empty() {
            return Err(AppError::invalid_input("description is required"));
        }
        require_positive("calories", self.calories)?;
        require_positive("protein_g", self.protein_g)?;
        require_positive("carbs_g", self.carbs_g)?;
        require_positive("fats_g", self.fats_g)?;
        Ok(())
    }
}

fn require_positive(field: &str, value: Option<f64>) -> AppResult<()> {
    match value {
        Some(v) if v <= 0.0 => Err(AppError::out_of_range(format!(
            "{field} must be positive"
        ))),
        _ => Ok(()),
    }
}

fn require_positive_int(field: &str, value: Option<i64>) -> AppResult<()> {
    match value {
        Some(v) if v <= 0 => Err(AppError::out_of_range(format!(
            "{field} must be positive"
        ))),
        _ => Ok(()),
    }
}

// ============================================================================
// Extraction payloads
// ============================================================================

/// One typed entry extracted from a chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractedEntry {
    /// Weight reading
    Weight(NewWeight),
    /// Body-fat reading
    BodyFat(NewBodyFat),
    /// Workout entry
    Workout(NewWorkout),
    /// Meal entry
    Meal(NewMeal),
}

impl ExtractedEntry {
    /// Validate the wrapped payload's field ranges
    ///
    /// # Errors
    ///
    /// Returns the wrapped payload's validation error.
    pub fn validate(&self) -> AppResult<()> {
        match self {
            Self::Weight(w) => w.validate(),
            Self::BodyFat(b) => b.validate(),
            Self::Workout(w) => w.validate(),
            Self::Meal(m) => m.validate(),
        }
    }

}

/// Plan request extracted from a chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Workout or diet
    pub plan_type: PlanType,
    /// Optional focus ("upper body strength", "cutting", ...)
    #[serde(default)]
    pub focus: Option<String>,
    /// Optional duration in weeks
    #[serde(default)]
    pub duration_weeks: Option<u32>,
}

impl PlanRequest {
    /// # Errors
    ///
    /// Returns a range error if the duration is present but zero.
    pub fn validate(&self) -> AppResult<()> {
        if self.duration_weeks == Some(0) {
            return Err(AppError::out_of_range("duration_weeks must be positive"));
        }
        Ok(())
    }
}

/// Complete structured output of one extraction call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredChatPayload {
    /// Extracted typed entries, possibly empty
    #[serde(default)]
    pub entries: Vec<ExtractedEntry>,
    /// Plan request, when the user asked for one
    #[serde(default)]
    pub plan_request: Option<PlanRequest>,
    /// True when the model could not confidently extract concrete values
    #[serde(default)]
    pub clarification_needed: bool,
    /// Question to ask the user when clarification is needed
    #[serde(default)]
    pub clarification_message: Option<String>,
    /// Short conversational acknowledgements
    #[serde(default)]
    pub acknowledgements: Vec<String>,
}

impl StructuredChatPayload {
    /// Validate every extracted entry's field ranges and the plan request
    ///
    /// # Errors
    ///
    /// Returns the first failing entry's validation error, or the plan
    /// request's.
    pub fn validate(&self) -> AppResult<()> {
        for entry in &self.entries {
            entry.validate()?;
        }
        if let Some(plan_request) = &self.plan_request {
            plan_request.validate()?;
        }
        Ok(())
    }
}

// ============================================================================
// Generated plans
// ============================================================================

/// Minimum schedule entries a structured plan must carry
pub const PLAN_MIN_SCHEDULE_DAYS: usize = 3;

/// One day in a generated plan's schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanScheduleDay {
    /// Day label ("Day 1", "Monday", ...)
    pub day: String,
    /// One-line headline for the day
    pub headline: String,
    /// Detailed instructions for the day
    pub details: String,
}

/// Structured plan object produced by the first plan-generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPlan {
    /// Workout or diet
    pub plan_type: PlanType,
    /// Short plan title
    pub title: String,
    /// Focus the plan targets, if any
    #[serde(default)]
    pub focus: Option<String>,
    /// One-paragraph overview
    pub summary: String,
    /// Ordered day-by-day schedule, at least three entries
    pub schedule: Vec<PlanScheduleDay>,
    /// Key points to follow, at least one
    pub key_points: Vec<String>,
    /// Practical tips, at least one
    pub tips: Vec<String>,
}

impl GeneratedPlan {
    /// Enforce the minimum-cardinality constraints on a model-produced plan
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the schedule has fewer than three days
    /// or key points or tips are empty.
    pub fn validate(&self) -> AppResult<()> {
        if self.schedule.len() < PLAN_MIN_SCHEDULE_DAYS {
            return Err(AppError::external_service(
                "llm",
                format!(
                    "plan schedule has {} entries, need at least {PLAN_MIN_SCHEDULE_DAYS}",
                    self.schedule.len()
                ),
            ));
        }
        if self.key_points.is_empty() {
            return Err(AppError::external_service("llm", "plan has no key points"));
        }
        if self.tips.is_empty() {
            return Err(AppError::external_service("llm", "plan has no tips"));
        }
        Ok(())
    }
}

// ============================================================================
// Chat wire shapes
// ============================================================================

/// One prior conversation turn sent with a chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// "user" or "assistant"
    pub role: String,
    /// Turn text
    pub content: String,
}

/// Per-type counts of records stored by one chat request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCounts {
    /// Weight readings stored
    pub weights: usize,
    /// Body-fat readings stored
    #[serde(rename = "bodyFat")]
    pub body_fat: usize,
    /// Workouts stored
    pub workouts: usize,
    /// Meals stored
    pub meals: usize,
}

impl StoredCounts {
    /// True when nothing was stored
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.weights == 0 && self.body_fat == 0 && self.workouts == 0 && self.meals == 0
    }
}
