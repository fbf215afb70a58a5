// ABOUTME: Integration tests for plan listing, creation, and generation
// ABOUTME: Covers id lookups, context-backed generation, and auth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs, clippy::missing_errors_doc, clippy::missing_panics_doc)]

mod common;

use anyhow::Result;
use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{request_json, scripted_plan, test_resources, test_router, test_user, TestLlmProvider};

#[tokio::test]
async fn plans_create_and_list() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (_, token) = test_user(&resources)?;

    let (status, created) = request_json(
        &router,
        "POST",
        "/api/plans",
        Some(&token),
        Some(json!({
            "plan_type": "diet",
            "title": "Cut Week",
            "summary": "Calorie deficit basics",
            "content": {"schedule": []}
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Cut Week");

    let (status, listed) = request_json(&router, "GET", "/api/plans", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let id = created["id"].as_str().unwrap();
    let (status, by_id) = request_json(
        &router,
        "GET",
        &format!("/api/plans?id={id}"),
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id["data"][0]["id"], created["id"]);
    Ok(())
}

#[tokio::test]
async fn plans_unknown_id_is_not_found() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (_, token) = test_user(&resources)?;

    let (status, body) = request_json(
        &router,
        "GET",
        &format!("/api/plans?id={}", Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn plans_create_rejects_empty_title() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (_, token) = test_user(&resources)?;

    let (status, body) = request_json(
        &router,
        "POST",
        "/api/plans",
        Some(&token),
        Some(json!({"plan_type": "workout", "title": "  ", "content": {}})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    Ok(())
}

#[tokio::test]
async fn plans_generate_persists_and_returns_rendering() -> Result<()> {
    let rendering = "Here is Starter Block, three days a week. Happy with it?";
    let llm = TestLlmProvider::new(vec![scripted_plan("workout"), rendering.to_owned()]);
    let resources = test_resources(Some(llm)).await?;
    let router = test_router(&resources);
    let (user_id, token) = test_user(&resources)?;

    // Seed some history so generation context is exercised
    resources
        .database
        .weights()
        .create(
            user_id,
            &fitlog_server::models::NewWeight {
                weight: 180.0,
                unit: fitlog_server::models::WeightUnit::Lbs,
                recorded_at: chrono::Utc::now(),
            },
        )
        .await?;

    let (status, body) = request_json(
        &router,
        "POST",
        "/api/plans/generate",
        Some(&token),
        Some(json!({"planType": "workout", "focus": "strength"})),
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["content"], rendering);
    assert_eq!(body["plan"]["plan_type"], "workout");

    let plans = resources.database.plans().list(user_id, None).await?;
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].title, "Starter Block");
    Ok(())
}

#[tokio::test]
async fn plans_generate_rejects_zero_duration() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (_, token) = test_user(&resources)?;

    // Validation fires before the credential check
    let (status, body) = request_json(
        &router,
        "POST",
        "/api/plans/generate",
        Some(&token),
        Some(json!({"planType": "workout", "duration_weeks": 0})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");
    Ok(())
}

#[tokio::test]
async fn plans_generate_without_credential_is_config_error() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (_, token) = test_user(&resources)?;

    let (status, body) = request_json(
        &router,
        "POST",
        "/api/plans/generate",
        Some(&token),
        Some(json!({"planType": "diet"})),
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "CONFIG_MISSING");
    Ok(())
}

#[tokio::test]
async fn plans_require_authentication() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);

    let (status, _) = request_json(&router, "GET", "/api/plans", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request_json(
        &router,
        "POST",
        "/api/plans/generate",
        None,
        Some(json!({"planType": "workout"})),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
