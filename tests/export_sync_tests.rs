// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV export and spreadsheet webhook tests.
//!
//! The webhook is a local axum server that answers like the Apps Script.

use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

mod common;
use common::{body_json, body_text, empty_request, json_request};

type Received = Arc<Mutex<Vec<Value>>>;

/// Start a fake webhook; returns its URL and the bodies it has received.
async fn spawn_webhook(accept: bool) -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();

    let app = Router::new().route(
        "/exec",
        get(|| async { Json(json!({"message": "Waxworm webhook is running"})) }).post(
            move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    sink.lock().unwrap().push(body);
                    if accept {
                        Json(json!({"success": true, "message": "ok"}))
                    } else {
                        Json(json!({"success": false, "error": "sheet is locked"}))
                    }
                }
            },
        ),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/exec", addr), received)
}

async fn wait_for(received: &Received, count: usize) {
    for _ in 0..100 {
        if received.lock().unwrap().len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("webhook did not receive {} requests", count);
}

#[tokio::test]
async fn test_csv_export() {
    let (app, _, _) = common::create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/egg-logs",
            json!({"date": "2024-06-03", "grams_logged": 2.5, "notes": "tray A, top shelf"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(empty_request("POST", "/api/export/csv"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("attachment; filename=\"waxworm-egg-logs-"));

    let text = body_text(response).await;
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Date,Grams Logged,Egg Count,Notes,Created At")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("2024-06-03,2.5,1625,\"tray A, top shelf\","));
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn test_sync_requires_configuration() {
    let (app, _, _) = common::create_test_app().await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/sync/status"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["configured"], false);

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/api/export/google-sheets"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/setup-google-sheets",
            json!({"webhook_url": "ftp://example.com/hook"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_setup_then_mirror_and_backfill() {
    let (url, received) = spawn_webhook(true).await;
    let (app, state, _) = common::create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/setup-google-sheets",
            json!({"webhook_url": url}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    // New entries are mirrored in the background
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/egg-logs",
            json!({"date": "2024-06-03", "grams_logged": 1.5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["entry"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    wait_for(&received, 1).await;
    {
        let bodies = received.lock().unwrap();
        assert_eq!(bodies[0]["action"], "CREATE");
        assert_eq!(bodies[0]["entry"]["id"], id.as_str());
        assert_eq!(bodies[0]["entry"]["gramsLogged"], 1.5);
        assert_eq!(bodies[0]["entry"]["eggCount"], 975);
    }

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/sync-google-sheets",
            json!({"id": id, "action": "UPDATE"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(received.lock().unwrap()[1]["action"], "UPDATE");

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/api/export/google-sheets"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["result"]["synced"], 1);
    assert_eq!(body["result"]["failed"], 0);

    let status = state.sheets.status().await;
    assert!(status.configured);
    assert!(status.last_success_at.is_some());
    assert!(status.last_error.is_none());
}

#[tokio::test]
async fn test_rejected_mirror_does_not_undo_entry() {
    let (url, received) = spawn_webhook(false).await;
    let (app, state, _) = common::create_test_app().await;
    state.sheets.configure(&url).await.unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/egg-logs",
            json!({"date": "2024-06-04", "grams_logged": 2.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["entry"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    wait_for(&received, 1).await;
    assert_eq!(state.store.entries().await.len(), 1);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sync-google-sheets",
            json!({"id": id, "action": "CREATE"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let status = state.sheets.status().await;
    assert!(status
        .last_error
        .as_deref()
        .is_some_and(|e| e.contains("sheet is locked")));
}

#[tokio::test]
async fn test_sync_unknown_entry_is_not_found() {
    let (url, _) = spawn_webhook(true).await;
    let (app, state, _) = common::create_test_app().await;
    state.sheets.configure(&url).await.unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sync-google-sheets",
            json!({"id": "missing", "action": "DELETE"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_backfill_reports_rejected_entries() {
    let (url, received) = spawn_webhook(false).await;
    let (app, state, _) = common::create_test_app().await;
    state.sheets.configure(&url).await.unwrap();

    let mut ids = Vec::new();
    for (date, grams) in [("2024-06-03", 1.0), ("2024-06-04", 2.0)] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/egg-logs",
                json!({"date": date, "grams_logged": grams}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        ids.push(body_json(response).await["entry"]["id"].as_str().unwrap().to_string());
    }
    wait_for(&received, 2).await;

    let response = app
        .oneshot(empty_request("POST", "/api/export/google-sheets"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["result"]["synced"], 0);
    assert_eq!(body["result"]["failed"], 2);

    let mut failed: Vec<String> = body["result"]["failed_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    failed.sort();
    ids.sort();
    assert_eq!(failed, ids);
}
