// ABOUTME: Pure derived-statistics functions behind the dashboard endpoint
// ABOUTME: Weight deltas, calorie averages, workout cadence, volume series
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

//! # Dashboard Aggregation
//!
//! Free functions over record slices, with no I/O, so each derived statistic
//! is unit-testable in isolation. The route layer fetches ranged slices from
//! the store and feeds them here.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{MealRecord, WeightRecord, WeightUnit, WorkoutRecord};

/// Volume assigned to a workout with no sets, duration, or distance data
const FALLBACK_VOLUME: f64 = 100.0;

/// Net weight change across a window
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightChange {
    /// Last reading minus first reading, by time
    pub delta: f64,
    /// Delta relative to the first reading, in percent
    pub percent: f64,
    /// Unit of the most recent reading
    pub unit: WeightUnit,
}

/// One point in the daily training-volume series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    /// Calendar day
    pub day: NaiveDate,
    /// Summed volume for the day
    pub volume: f64,
}

/// Net weight change, requiring at least two readings
///
/// Readings may arrive in any order; they are compared by `recorded_at`.
#[must_use]
pub fn weight_change(records: &[WeightRecord]) -> Option<WeightChange> {
    if records.len() < 2 {
        return None;
    }

    let first = records.iter().min_by_key(|r| r.recorded_at)?;
    let last = records.iter().max_by_key(|r| r.recorded_at)?;
    if first.weight.abs() < f64::EPSILON {
        return None;
    }

    let delta = last.weight - first.weight;
    Some(WeightChange {
        delta,
        percent: delta / first.weight * 100.0,
        unit: last.unit,
    })
}

/// Average calories per calendar day with any calorie data
#[must_use]
pub fn average_daily_calories(meals: &[MealRecord]) -> Option<f64> {
    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for meal in meals {
        if let Some(calories) = meal.calories {
            *per_day.entry(meal.eaten_at.date_naive()).or_default() += calories;
        }
    }
    if per_day.is_empty() {
        return None;
    }
    let total: f64 = per_day.values().sum();
    Some(total / per_day.len() as f64)
}

/// Workout cadence: count divided by the number of weeks in the window
#[must_use]
pub fn workouts_per_week(count: usize, window_days: u32) -> f64 {
    if window_days == 0 {
        return 0.0;
    }
    count as f64 / (f64::from(window_days) / 7.0)
}

/// Estimated volume for one workout
///
/// Fallback ladder: sets x reps x load when all three are present, else
/// duration x 10, else distance x 100, else a flat constant.
#[must_use]
pub fn workout_volume(workout: &WorkoutRecord) -> f64 {
    match (workout.sets, workout.reps, workout.load) {
        (Some(sets), Some(reps), Some(load)) => (sets * reps) as f64 * load,
        _ => workout.duration_minutes.map_or_else(
            || workout.distance.map_or(FALLBACK_VOLUME, |d| d * 100.0),
            |minutes| minutes * 10.0,
        ),
    }
}

/// Daily training-volume series, ascending by day
#[must_use]
pub fn daily_volume_series(workouts: &[WorkoutRecord]) -> Vec<VolumePoint> {
    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for workout in workouts {
        *per_day
            .entry(workout.performed_at.date_naive())
            .or_default() += workout_volume(workout);
    }
    per_day
        .into_iter()
        .map(|(day, volume)| VolumePoint { day, volume })
        .collect()
}

/// Bound a series to `cap` points by keeping every `stride`-th element
#[must_use]
pub fn downsample<T: Clone>(points: &[T], cap: usize) -> Vec<T> {
    if cap == 0 || points.len() <= cap {
        return points.to_vec();
    }
    let stride = points.len().div_ceil(cap);
    points
        .iter()
        .enumerate()
        .filter(|(i, _)| i % stride == 0)
        .map(|(_, p)| p.clone())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn at(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::days(day)
    }

    fn weight(value: f64, day: i64) -> WeightRecord {
        WeightRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            weight: value,
            unit: WeightUnit::Lbs,
            recorded_at: at(day),
            created_at: at(day),
            updated_at: at(day),
        }
    }

    fn meal(calories: Option<f64>, day: i64) -> MealRecord {
        MealRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            description: "meal".to_owned(),
            calories,
            protein_g: None,
            carbs_g: None,
            fats_g: None,
            eaten_at: at(day),
            created_at: at(day),
            updated_at: at(day),
        }
    }

    fn workout(
        sets: Option<i64>,
        reps: Option<i64>,
        load: Option<f64>,
        duration: Option<f64>,
        distance: Option<f64>,
        day: i64,
    ) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            activity: "training".to_owned(),
            sets,
            reps,
            load,
            distance,
            duration_minutes: duration,
            intensity: None,
            performed_at: at(day),
            created_at: at(day),
            updated_at: at(day),
        }
    }

    #[test]
    fn test_weight_change_last_minus_first() {
        let records = vec![weight(180.0, 0), weight(175.0, 10)];
        let change = weight_change(&records).unwrap();
        assert!((change.delta - -5.0).abs() < 1e-9);
        assert!((change.percent - -2.7778).abs() < 1e-3);
        assert_eq!(change.unit, WeightUnit::Lbs);
    }

    #[test]
    fn test_weight_change_order_independent() {
        let records = vec![weight(175.0, 10), weight(180.0, 0)];
        let change = weight_change(&records).unwrap();
        assert!((change.delta - -5.0).abs() < 1e-9);
    }

    #[test]
    fn test_weight_change_needs_two_points() {
        assert!(weight_change(&[weight(180.0, 0)]).is_none());
        assert!(weight_change(&[]).is_none());
    }

    #[test]
    fn test_average_daily_calories_distinct_days() {
        let meals = vec![meal(Some(500.0), 1), meal(Some(300.0), 1), meal(Some(700.0), 2)];
        let average = average_daily_calories(&meals).unwrap();
        assert!((average - 750.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_daily_calories_ignores_missing() {
        let meals = vec![meal(None, 1), meal(Some(600.0), 2)];
        let average = average_daily_calories(&meals).unwrap();
        assert!((average - 600.0).abs() < 1e-9);

        assert!(average_daily_calories(&[meal(None, 1)]).is_none());
    }

    #[test]
    fn test_workouts_per_week() {
        assert!((workouts_per_week(6, 14) - 3.0).abs() < 1e-9);
        assert!((workouts_per_week(0, 7)).abs() < 1e-9);
    }

    #[test]
    fn test_volume_ladder() {
        let lifting = workout(Some(3), Some(10), Some(100.0), Some(45.0), None, 0);
        assert!((workout_volume(&lifting) - 3000.0).abs() < 1e-9);

        let timed = workout(Some(3), None, None, Some(45.0), None, 0);
        assert!((workout_volume(&timed) - 450.0).abs() < 1e-9);

        let run = workout(None, None, None, None, Some(5.0), 0);
        assert!((workout_volume(&run) - 500.0).abs() < 1e-9);

        let bare = workout(None, None, None, None, None, 0);
        assert!((workout_volume(&bare) - FALLBACK_VOLUME).abs() < 1e-9);
    }

    #[test]
    fn test_daily_volume_series_sums_per_day_ascending() {
        let workouts = vec![
            workout(None, None, None, Some(30.0), None, 1),
            workout(None, None, None, Some(20.0), None, 1),
            workout(None, None, None, Some(10.0), None, 0),
        ];
        let series = daily_volume_series(&workouts);
        assert_eq!(series.len(), 2);
        assert!((series[0].volume - 100.0).abs() < 1e-9);
        assert!((series[1].volume - 500.0).abs() < 1e-9);
        assert!(series[0].day < series[1].day);
    }

    #[test]
    fn test_downsample_stride() {
        let points: Vec<u32> = (0..200).collect();
        let sampled = downsample(&points, 80);
        assert!(sampled.len() <= 80);
        assert_eq!(sampled[0], 0);
        assert_eq!(sampled[1], 3);

        let short: Vec<u32> = (0..10).collect();
        assert_eq!(downsample(&short, 80).len(), 10);
    }
}
