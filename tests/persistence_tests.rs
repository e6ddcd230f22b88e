// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage failure and restart tests.

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use waxworm_tracker::config::{Config, StorageBackend};
use waxworm_tracker::db::JsonFileDb;

mod common;
use common::{body_json, empty_request, json_request};

#[tokio::test]
async fn test_failed_save_keeps_change_in_memory() {
    let (app, state, db) = common::create_test_app().await;
    db.set_fail_saves(true);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/egg-logs",
            json!({"date": "2024-06-03", "grams_logged": 2.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "storage_error");

    // Still visible to readers, just not saved
    assert_eq!(state.store.entries().await.len(), 1);
    assert!(db.stored().is_none());

    // The next successful save carries it along
    db.set_fail_saves(false);
    let response = app
        .oneshot(json_request("PUT", "/api/goal", json!({"weekly_goal_grams": 12.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = db.stored().unwrap();
    assert_eq!(stored.entries.len(), 1);
    assert_eq!(stored.goal.weekly_goal_grams, 12.0);
}

#[tokio::test]
async fn test_file_backend_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("egg_logs.json");
    let config = Config {
        storage_backend: StorageBackend::File,
        data_file: path.clone(),
        ..Config::default()
    };

    let id = {
        let (app, _) =
            common::create_test_app_with(config.clone(), Arc::new(JsonFileDb::new(&path))).await;

        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/goal", json!({"weekly_goal_grams": 20.0})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/egg-logs",
                json!({"date": "2024-06-05T07:30:00Z", "grams_logged": 3.1, "notes": "bin 2"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["entry"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    };

    let (app, _) = common::create_test_app_with(config, Arc::new(JsonFileDb::new(&path))).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/egg-logs"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    let entry = &body["entries"][0];
    assert_eq!(entry["id"], id.as_str());
    assert_eq!(entry["grams_logged"], 3.1);
    assert_eq!(entry["egg_count"], 2015);
    assert_eq!(entry["notes"], "bin 2");

    let response = app.oneshot(empty_request("GET", "/api/goal")).await.unwrap();
    assert_eq!(body_json(response).await["weekly_goal_grams"], 20.0);
}
