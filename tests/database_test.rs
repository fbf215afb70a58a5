// ABOUTME: Integration tests for the persistence layer itself
// ABOUTME: File-backed databases, migration idempotence, manager round trips
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs, clippy::missing_errors_doc, clippy::missing_panics_doc)]

mod common;

use anyhow::Result;
use chrono::{Duration, SubsecRound, Utc};
use uuid::Uuid;

use fitlog_server::database::Database;
use fitlog_server::models::{NewBodyFat, NewWeight, WeightUnit};

#[tokio::test]
async fn file_backed_database_is_created_and_migration_is_idempotent() -> Result<()> {
    common::init_test_logging();
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite:{}/fitlog-test.db", dir.path().display());

    let database = Database::new(&url).await?;
    database.migrate().await?;
    database.migrate().await?;
    database.ping().await?;

    let user_id = Uuid::new_v4();
    let record = database
        .weights()
        .create(
            user_id,
            &NewWeight {
                weight: 181.0,
                unit: WeightUnit::Lbs,
                recorded_at: Utc::now().trunc_subsecs(0),
            },
        )
        .await?;

    // A fresh connection to the same file sees the committed row
    let reopened = Database::new(&url).await?;
    let listed = reopened.weights().list(user_id, None, None, None).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
    assert_eq!(listed[0].recorded_at, record.recorded_at);
    Ok(())
}

#[tokio::test]
async fn range_filters_are_inclusive() -> Result<()> {
    common::init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    database.migrate().await?;

    let user_id = Uuid::new_v4();
    let manager = database.body_fat();
    let at = Utc::now().trunc_subsecs(0) - Duration::days(1);
    manager
        .create(
            user_id,
            &NewBodyFat {
                percentage: 18.5,
                recorded_at: at,
            },
        )
        .await?;

    let exact = manager.list(user_id, Some(at), Some(at), None).await?;
    assert_eq!(exact.len(), 1);

    let before = manager
        .list(user_id, None, Some(at - Duration::seconds(1)), None)
        .await?;
    assert!(before.is_empty());
    Ok(())
}

#[tokio::test]
async fn validation_failures_do_not_reach_storage() -> Result<()> {
    common::init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    database.migrate().await?;

    let user_id = Uuid::new_v4();
    let result = database
        .weights()
        .create(
            user_id,
            &NewWeight {
                weight: -3.0,
                unit: WeightUnit::Kg,
                recorded_at: Utc::now(),
            },
        )
        .await;
    assert!(result.is_err());

    let listed = database.weights().list(user_id, None, None, None).await?;
    assert!(listed.is_empty());
    Ok(())
}
