// ABOUTME: Integration tests for profile settings endpoints
// ABOUTME: Lazy default creation, upserts, and validation limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs, clippy::missing_errors_doc, clippy::missing_panics_doc)]

mod common;

use anyhow::Result;
use http::StatusCode;
use serde_json::json;

use common::{request_json, test_resources, test_router, test_user};

#[tokio::test]
async fn profile_is_lazily_created_with_defaults() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (user_id, token) = test_user(&resources)?;

    let (status, body) = request_json(&router, "GET", "/api/profile", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user_id.to_string());
    assert_eq!(body["weight_unit"], "lbs");
    assert_eq!(body["theme_preference"], "system");
    assert_eq!(body["target_weight"], serde_json::Value::Null);

    // Second read returns the same row, not a new one
    let (_, again) = request_json(&router, "GET", "/api/profile", Some(&token), None).await?;
    assert_eq!(again["id"], body["id"]);
    Ok(())
}

#[tokio::test]
async fn profile_upsert_round_trips() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (_, token) = test_user(&resources)?;

    let (status, updated) = request_json(
        &router,
        "PUT",
        "/api/profile",
        Some(&token),
        Some(json!({
            "target_weight": 172.5,
            "weight_unit": "kg",
            "dietary_preference": "vegetarian",
            "theme_preference": "dark"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["target_weight"], 172.5);
    assert_eq!(updated["weight_unit"], "kg");

    let (_, fetched) = request_json(&router, "GET", "/api/profile", Some(&token), None).await?;
    assert_eq!(fetched["dietary_preference"], "vegetarian");
    assert_eq!(fetched["theme_preference"], "dark");
    Ok(())
}

#[tokio::test]
async fn profile_rejects_out_of_range_target_weight() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (_, token) = test_user(&resources)?;

    for bad in [0.0, -5.0, 1200.0] {
        let (status, body) = request_json(
            &router,
            "PUT",
            "/api/profile",
            Some(&token),
            Some(json!({"target_weight": bad})),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "target_weight {bad}");
        assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");
    }
    Ok(())
}

#[tokio::test]
async fn profile_rejects_over_length_dietary_preference() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);
    let (_, token) = test_user(&resources)?;

    let (status, body) = request_json(
        &router,
        "PUT",
        "/api/profile",
        Some(&token),
        Some(json!({"dietary_preference": "x".repeat(121)})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    Ok(())
}

#[tokio::test]
async fn profile_requires_authentication() -> Result<()> {
    let resources = test_resources(None).await?;
    let router = test_router(&resources);

    let (status, _) = request_json(&router, "GET", "/api/profile", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request_json(
        &router,
        "PUT",
        "/api/profile",
        None,
        Some(json!({"weight_unit": "kg"})),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
