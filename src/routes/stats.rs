// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly progress, trend and placement routes.

use crate::error::{AppError, Result};
use crate::models::{HarvestPolicy, PlacementInstruction, TotalCollections, TrendPoint, WeeklyStats};
use crate::services::aggregation::{
    total_collections, trend_series, trend_window, weekly_stats_for_day, DEFAULT_TREND_WEEKS,
};
use crate::services::placement::{can_harvest_on_date, day_name, is_off_schedule_harvest, placement_for};
use crate::time_utils::parse_day;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_TREND_WEEKS: u32 = 52;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stats/weekly", get(get_weekly_stats))
        .route("/api/stats/trends", get(get_trends))
        .route("/api/stats/totals", get(get_totals))
        .route("/api/placement", get(get_placement))
}

/// Parse an optional `YYYY-MM-DD` query parameter.
fn optional_day(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(s) => parse_day(s).map(Some).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid '{}': expected YYYY-MM-DD", name))
        }),
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Deserialize)]
struct WeeklyQuery {
    week_of: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklyStatsResponse {
    pub success: bool,
    pub stats: WeeklyStats,
}

async fn get_weekly_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeeklyQuery>,
) -> Result<Json<WeeklyStatsResponse>> {
    let day = optional_day("week_of", params.week_of.as_deref())?.unwrap_or_else(today);

    let snapshot = state.store.snapshot().await;
    let stats = weekly_stats_for_day(&snapshot.entries, day, snapshot.goal.weekly_goal_grams);

    Ok(Json(WeeklyStatsResponse {
        success: true,
        stats,
    }))
}

#[derive(Deserialize)]
struct TrendQuery {
    start: Option<String>,
    end: Option<String>,
    weeks: Option<u32>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrendsResponse {
    pub success: bool,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub trends: Vec<TrendPoint>,
}

/// Resolve the trend range from explicit bounds or a week count ending today.
fn resolve_trend_range(params: &TrendQuery, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let weeks = params.weeks.unwrap_or(DEFAULT_TREND_WEEKS);
    if weeks == 0 || weeks > MAX_TREND_WEEKS {
        return Err(AppError::BadRequest(format!(
            "weeks must be between 1 and {}",
            MAX_TREND_WEEKS
        )));
    }

    let end = optional_day("end", params.end.as_deref())?.unwrap_or(today);
    let start = match optional_day("start", params.start.as_deref())? {
        Some(start) => start,
        None => {
            trend_window(end, weeks)
                .ok_or_else(|| AppError::BadRequest("'end' is too early for a trend window".to_string()))?
                .0
        }
    };

    if start > end {
        return Err(AppError::BadRequest(
            "'start' must not be after 'end'".to_string(),
        ));
    }
    Ok((start, end))
}

async fn get_trends(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendQuery>,
) -> Result<Json<TrendsResponse>> {
    let (start, end) = resolve_trend_range(&params, today())?;
    let entries = state.store.entries().await;

    Ok(Json(TrendsResponse {
        success: true,
        start,
        end,
        trends: trend_series(&entries, start, end),
    }))
}

async fn get_totals(State(state): State<Arc<AppState>>) -> Json<TotalCollections> {
    let entries = state.store.entries().await;
    Json(total_collections(&entries))
}

#[derive(Deserialize)]
struct PlacementQuery {
    date: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlacementResponse {
    pub date: NaiveDate,
    pub day_name: String,
    pub can_harvest: bool,
    pub off_schedule: bool,
    pub policy: HarvestPolicy,
    pub instruction: PlacementInstruction,
}

/// Where a harvest on `date` (default today) should go.
async fn get_placement(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlacementQuery>,
) -> Result<Json<PlacementResponse>> {
    let date = optional_day("date", params.date.as_deref())?.unwrap_or_else(today);
    let policy = state.config.harvest_policy;

    Ok(Json(PlacementResponse {
        date,
        day_name: day_name(date),
        can_harvest: can_harvest_on_date(date, policy),
        off_schedule: is_off_schedule_harvest(date),
        policy,
        instruction: placement_for(date, policy),
    }))
}
