// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Egg log and goal routes.

use crate::error::{AppError, Result};
use crate::models::{EggLogEntry, GoalSettings, HarvestPolicy, NewEggLog, PlacementInstruction};
use crate::services::placement::{can_harvest_on_date, day_name, is_off_schedule_harvest, placement_for};
use crate::services::AddOutcome;
use crate::time_utils::{calendar_day, parse_harvest_date};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const MAX_LIST_LIMIT: usize = 500;

/// Egg log and goal routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/egg-logs", get(list_entries).post(create_entry))
        .route("/api/egg-logs/{id}", put(update_entry).delete(delete_entry))
        .route("/api/goal", get(get_goal).put(update_goal))
}

// ─── Entries ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListQuery {
    /// Only the N most recently created entries
    limit: Option<usize>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EntriesResponse {
    pub entries: Vec<EggLogEntry>,
    /// Number of stored entries (before `limit`)
    pub total: usize,
}

/// List entries, most recently created first.
async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<EntriesResponse>> {
    let mut entries = state.store.entries().await;
    let total = entries.len();

    if let Some(limit) = params.limit {
        if limit == 0 || limit > MAX_LIST_LIMIT {
            return Err(AppError::BadRequest(format!(
                "limit must be between 1 and {}",
                MAX_LIST_LIMIT
            )));
        }
        entries.truncate(limit);
    }

    Ok(Json(EntriesResponse { entries, total }))
}

/// Harvest submission (create and full-record edit).
#[derive(Debug, Deserialize, Validate)]
pub struct LogEggRequest {
    /// `YYYY-MM-DD` or RFC3339
    pub date: String,
    #[validate(range(exclusive_min = 0.0, message = "grams_logged must be greater than 0"))]
    pub grams_logged: f64,
    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

impl LogEggRequest {
    /// Validate and convert, enforcing the harvest-day policy.
    fn into_new_log(self, policy: HarvestPolicy) -> Result<NewEggLog> {
        self.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let date = parse_harvest_date(&self.date).ok_or_else(|| {
            AppError::BadRequest(
                "Invalid 'date': expected YYYY-MM-DD or RFC3339 datetime".to_string(),
            )
        })?;

        let day = calendar_day(date);
        if !can_harvest_on_date(day, policy) {
            return Err(AppError::BadRequest(format!(
                "{} is a rest day; no harvest is logged",
                day_name(day)
            )));
        }

        Ok(NewEggLog {
            date,
            grams_logged: self.grams_logged,
            notes: self.notes,
        })
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogEggResponse {
    pub success: bool,
    /// The submission matched a just-created entry and was not stored again
    pub duplicate: bool,
    pub entry: EggLogEntry,
    /// Where this harvest should go
    pub placement: PlacementInstruction,
    /// Harvest fell on Thursday or Saturday
    pub off_schedule: bool,
}

fn log_response(entry: EggLogEntry, duplicate: bool, policy: HarvestPolicy) -> LogEggResponse {
    let day = entry.harvest_day();
    LogEggResponse {
        success: true,
        duplicate,
        placement: placement_for(day, policy),
        off_schedule: is_off_schedule_harvest(day),
        entry,
    }
}

/// Log a harvest.
async fn create_entry(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogEggRequest>,
) -> Result<(StatusCode, Json<LogEggResponse>)> {
    let policy = state.config.harvest_policy;
    let input = req.into_new_log(policy)?;

    tracing::debug!(date = %input.date, grams = input.grams_logged, "Logging harvest");

    let (status, entry, duplicate) = match state.store.add_entry(input).await? {
        AddOutcome::Created(entry) => (StatusCode::CREATED, entry, false),
        AddOutcome::Duplicate(entry) => (StatusCode::OK, entry, true),
    };

    Ok((status, Json(log_response(entry, duplicate, policy))))
}

/// Replace an entry's date, weight and notes.
async fn update_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<LogEggRequest>,
) -> Result<Json<LogEggResponse>> {
    let policy = state.config.harvest_policy;
    let fields = req.into_new_log(policy)?;
    let entry = state.store.update_entry(&id, fields).await?;
    Ok(Json(log_response(entry, false, policy)))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteEntryResponse {
    pub success: bool,
    pub id: String,
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteEntryResponse>> {
    let removed = state.store.delete_entry(&id).await?;
    Ok(Json(DeleteEntryResponse {
        success: true,
        id: removed.id,
    }))
}

// ─── Goal ────────────────────────────────────────────────────

async fn get_goal(State(state): State<Arc<AppState>>) -> Json<GoalSettings> {
    Json(state.store.goal().await)
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGoalRequest {
    #[validate(range(min = 0.0, message = "weekly_goal_grams must not be negative"))]
    pub weekly_goal_grams: f64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UpdateGoalResponse {
    pub success: bool,
    pub goal: GoalSettings,
}

async fn update_goal(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<Json<UpdateGoalResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let goal = state.store.update_goal(req.weekly_goal_grams).await?;
    Ok(Json(UpdateGoalResponse {
        success: true,
        goal,
    }))
}
