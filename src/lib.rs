// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Waxworm Tracker: log egg harvests and keep the weekly collection on goal.
//!
//! This crate provides the backend API for recording harvest weights,
//! converting them to estimated egg counts, tracking progress against a
//! weekly goal, and telling the keeper where each day's eggs belong.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod units;

use anyhow::Context;
use config::Config;
use db::LogRepository;
use models::GoalSettings;
use services::{EntryStore, SheetsSyncService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: EntryStore,
    pub sheets: Arc<SheetsSyncService>,
}

impl AppState {
    /// Open the store on `repo` and wire spreadsheet mirroring into it.
    pub async fn new(config: Config, repo: Arc<dyn LogRepository>) -> anyhow::Result<Self> {
        let sheets = Arc::new(SheetsSyncService::new(
            config.sheets_webhook_url.clone(),
            config.sync_timeout,
        )?);

        let store = EntryStore::open(
            repo,
            GoalSettings::from_grams(config.default_weekly_goal_grams),
        )
        .await
        .context("failed to load egg logs")?
        .with_persist_timeout(config.persist_timeout)
        .with_sync_hook(sheets.clone());

        Ok(Self {
            config,
            store,
            sheets,
        })
    }
}
