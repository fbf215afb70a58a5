// ABOUTME: Integration tests for the dashboard summary endpoint
// ABOUTME: Exercises derived statistics over seeded records and window rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs, clippy::missing_errors_doc, clippy::missing_panics_doc)]

mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use http::StatusCode;

use common::{request_json, test_resources, test_router, test_user};
use fitlog_server::models::{NewMeal, NewWeight, NewWorkout, WeightUnit};

#[tokio::test]
async fn summary_reports_weight_change_and_calories() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (user_id, token) = test_user(&resources)?;
    let now = Utc::now();

    let weights = resources.database.weights();
    weights
        .create(user_id, &NewWeight {
            weight: 180.0,
            unit: WeightUnit::Lbs,
            recorded_at: now - Duration::days(10),
        })
        .await?;
    weights
        .create(user_id, &NewWeight {
            weight: 175.0,
            unit: WeightUnit::Lbs,
            recorded_at: now - Duration::hours(1),
        })
        .await?;

    let meals = resources.database.meals();
    for (calories, days_ago) in [(500.0, 2), (300.0, 2), (700.0, 1)] {
        meals
            .create(user_id, &NewMeal {
                description: "meal".to_owned(),
                calories: Some(calories),
                protein_g: None,
                carbs_g: None,
                fats_g: None,
                eaten_at: now - Duration::days(days_ago),
            })
            .await?;
    }

    let (status, body) = request_json(
        &router,
        "GET",
        "/api/dashboard/summary?days=30",
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"], 30);

    let change = &body["weight_change"];
    assert!((change["delta"].as_f64().unwrap() - -5.0).abs() < 1e-9);
    assert!((change["percent"].as_f64().unwrap() - -2.7778).abs() < 1e-3);
    assert_eq!(change["unit"], "lbs");

    assert!((body["average_daily_calories"].as_f64().unwrap() - 750.0).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn summary_computes_workout_cadence_and_volume() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (user_id, token) = test_user(&resources)?;
    let now = Utc::now();

    let workouts = resources.database.workouts();
    workouts
        .create(user_id, &NewWorkout {
            activity: "bench press".to_owned(),
            sets: Some(3),
            reps: Some(10),
            load: Some(100.0),
            distance: None,
            duration_minutes: None,
            intensity: None,
            performed_at: now - Duration::days(2),
        })
        .await?;
    workouts
        .create(user_id, &NewWorkout {
            activity: "easy run".to_owned(),
            sets: None,
            reps: None,
            load: None,
            distance: None,
            duration_minutes: Some(45.0),
            intensity: Some("easy".to_owned()),
            performed_at: now - Duration::days(1),
        })
        .await?;

    let (status, body) = request_json(
        &router,
        "GET",
        "/api/dashboard/summary?days=7",
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    assert!((body["workouts_per_week"].as_f64().unwrap() - 2.0).abs() < 1e-9);

    let series = body["volume_series"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    // Ascending by day: bench day (3000) before run day (450)
    assert!((series[0]["volume"].as_f64().unwrap() - 3000.0).abs() < 1e-9);
    assert!((series[1]["volume"].as_f64().unwrap() - 450.0).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn summary_with_sparse_data_returns_nulls() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (user_id, token) = test_user(&resources)?;

    resources
        .database
        .weights()
        .create(user_id, &NewWeight {
            weight: 180.0,
            unit: WeightUnit::Lbs,
            recorded_at: Utc::now(),
        })
        .await?;

    let (status, body) = request_json(
        &router,
        "GET",
        "/api/dashboard/summary?days=7",
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weight_change"], serde_json::Value::Null);
    assert_eq!(body["average_daily_calories"], serde_json::Value::Null);
    assert_eq!(body["volume_series"].as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn summary_rejects_unknown_window() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (_, token) = test_user(&resources)?;

    let (status, body) = request_json(
        &router,
        "GET",
        "/api/dashboard/summary?days=13",
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    Ok(())
}

#[tokio::test]
async fn summary_defaults_to_thirty_days_and_requires_auth() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (_, token) = test_user(&resources)?;

    let (status, body) = request_json(
        &router,
        "GET",
        "/api/dashboard/summary",
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"], 30);

    let (status, _) = request_json(&router, "GET", "/api/dashboard/summary", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn health_probe_is_unauthenticated() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);

    let (status, body) = request_json(&router, "GET", "/api/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}
