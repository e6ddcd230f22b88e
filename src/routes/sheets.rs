// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export and spreadsheet sync routes.

use crate::error::{AppError, Result};
use crate::models::{SyncAction, SyncStatus};
use crate::services::export::{export_filename, render_csv};
use crate::services::SyncBackfillResult;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/export/csv", post(export_csv))
        .route("/api/export/google-sheets", post(export_google_sheets))
        .route("/api/setup-google-sheets", post(setup_google_sheets))
        .route("/api/sync-google-sheets", post(sync_google_sheets))
        .route("/api/sync/status", get(sync_status))
}

/// Download every entry as a CSV attachment.
async fn export_csv(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let entries = state.store.entries().await;
    let body = render_csv(&entries)?;
    let disposition = format!("attachment; filename=\"{}\"", export_filename(Utc::now()));

    tracing::info!(entries = entries.len(), "Exported egg logs as CSV");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BackfillResponse {
    pub success: bool,
    pub result: SyncBackfillResult,
}

/// Push every stored entry to the configured spreadsheet.
async fn export_google_sheets(State(state): State<Arc<AppState>>) -> Result<Json<BackfillResponse>> {
    let entries = state.store.entries().await;
    let result = state.sheets.backfill(entries).await?;

    Ok(Json(BackfillResponse {
        success: result.is_complete_success(),
        result,
    }))
}

#[derive(Deserialize)]
pub struct SetupSheetsRequest {
    pub webhook_url: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SetupSheetsResponse {
    pub success: bool,
    pub message: String,
}

/// Test a webhook URL and start mirroring to it.
async fn setup_google_sheets(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetupSheetsRequest>,
) -> Result<Json<SetupSheetsResponse>> {
    let url = req.webhook_url.trim();
    if url.is_empty() {
        return Err(AppError::BadRequest("webhook_url is required".to_string()));
    }

    state.sheets.configure(url).await?;

    Ok(Json(SetupSheetsResponse {
        success: true,
        message: "Spreadsheet webhook connected".to_string(),
    }))
}

#[derive(Deserialize)]
pub struct SyncEntryRequest {
    pub id: String,
    pub action: SyncAction,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SyncEntryResponse {
    pub success: bool,
    pub id: String,
    pub action: SyncAction,
}

/// Mirror one stored entry on demand.
async fn sync_google_sheets(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SyncEntryRequest>,
) -> Result<Json<SyncEntryResponse>> {
    let entry = state
        .store
        .find(&req.id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Egg log {} not found", req.id)))?;

    state.sheets.sync_entry(&entry, req.action).await?;

    Ok(Json(SyncEntryResponse {
        success: true,
        id: entry.id,
        action: req.action,
    }))
}

async fn sync_status(State(state): State<Arc<AppState>>) -> Json<SyncStatus> {
    Json(state.sheets.status().await)
}
