// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Best-effort mirroring of egg logs to a spreadsheet webhook.
//!
//! The webhook is an Apps Script web app that accepts
//! `{action, entry, timestamp}` and answers `{success, message|error}`.
//! Sync results are advisory: they are logged and recorded in
//! [`SyncStatus`], and never undo a local change.

use crate::models::{EggLogEntry, SyncAction, SyncStatus};
use crate::services::store::SyncHook;
use crate::time_utils::format_utc_rfc3339;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_CONCURRENT_SYNCS: usize = 4;

/// Spreadsheet row payload, in the field naming the Apps Script expects.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SheetEntry<'a> {
    id: &'a str,
    date: String,
    grams_logged: f64,
    egg_count: i64,
    notes: Option<&'a str>,
    created_at: String,
}

impl<'a> From<&'a EggLogEntry> for SheetEntry<'a> {
    fn from(entry: &'a EggLogEntry) -> Self {
        Self {
            id: &entry.id,
            date: format_utc_rfc3339(entry.date),
            grams_logged: entry.grams_logged,
            egg_count: entry.egg_count,
            notes: entry.notes.as_deref(),
            created_at: format_utc_rfc3339(entry.created_at),
        }
    }
}

#[derive(Serialize)]
struct WebhookRequest<'a> {
    action: SyncAction,
    entry: SheetEntry<'a>,
    timestamp: String,
}

#[derive(Deserialize)]
struct WebhookResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Result of mirroring many entries at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SyncBackfillResult {
    pub synced: u32,
    pub failed: u32,
    pub failed_ids: Vec<String>,
}

impl SyncBackfillResult {
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }
}

/// Errors from spreadsheet sync.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("No spreadsheet webhook configured")]
    NotConfigured,

    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(String),

    #[error("Spreadsheet webhook timed out")]
    Timeout,

    #[error("Spreadsheet webhook request failed: {0}")]
    Http(String),

    #[error("Spreadsheet webhook rejected the change: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SyncError::Timeout
        } else {
            SyncError::Http(e.to_string())
        }
    }
}

/// Webhook client with a runtime-configurable URL.
pub struct SheetsSyncService {
    http: reqwest::Client,
    webhook_url: RwLock<Option<String>>,
    status: RwLock<SyncStatus>,
}

impl SheetsSyncService {
    /// Every request is bounded by `timeout`.
    pub fn new(webhook_url: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed building spreadsheet HTTP client")?;

        let webhook_url = webhook_url.filter(|u| !u.trim().is_empty());
        let status = SyncStatus {
            configured: webhook_url.is_some(),
            ..SyncStatus::default()
        };

        Ok(Self {
            http,
            webhook_url: RwLock::new(webhook_url),
            status: RwLock::new(status),
        })
    }

    pub async fn status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    /// Check that `url` answers like the spreadsheet webhook.
    ///
    /// The script's GET handler replies with a JSON `message` mentioning
    /// "webhook".
    pub async fn test_connection(&self, url: &str) -> Result<bool, SyncError> {
        validate_url(url)?;

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Webhook test returned non-success");
            return Ok(false);
        }

        let body: WebhookResponse = match response.json().await {
            Ok(body) => body,
            Err(_) => return Ok(false),
        };
        Ok(body
            .message
            .is_some_and(|m| m.to_ascii_lowercase().contains("webhook")))
    }

    /// Test `url` and, if it responds correctly, use it from now on.
    pub async fn configure(&self, url: &str) -> Result<(), SyncError> {
        if !self.test_connection(url).await? {
            return Err(SyncError::Remote(
                "URL did not respond like the spreadsheet webhook".to_string(),
            ));
        }

        *self.webhook_url.write().await = Some(url.to_string());
        self.status.write().await.configured = true;
        tracing::info!("Spreadsheet webhook configured");
        Ok(())
    }

    /// Mirror one change to the spreadsheet.
    pub async fn sync_entry(&self, entry: &EggLogEntry, action: SyncAction) -> Result<(), SyncError> {
        let url = self
            .webhook_url
            .read()
            .await
            .clone()
            .ok_or(SyncError::NotConfigured)?;

        let result = self.post(&url, entry, action).await;
        self.record(&result).await;

        match &result {
            Ok(()) => tracing::debug!(id = %entry.id, action = %action, "Synced entry to spreadsheet"),
            Err(e) => tracing::warn!(id = %entry.id, action = %action, error = %e, "Spreadsheet sync failed"),
        }
        result
    }

    /// Mirror every entry as a CREATE.
    pub async fn backfill(&self, entries: Vec<EggLogEntry>) -> Result<SyncBackfillResult, SyncError> {
        if self.webhook_url.read().await.is_none() {
            return Err(SyncError::NotConfigured);
        }

        let outcomes: Vec<(String, Result<(), SyncError>)> = stream::iter(entries)
            .map(|entry| async move {
                let outcome = self.sync_entry(&entry, SyncAction::Create).await;
                (entry.id, outcome)
            })
            .buffer_unordered(MAX_CONCURRENT_SYNCS)
            .collect()
            .await;

        let mut result = SyncBackfillResult::default();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => result.synced += 1,
                Err(_) => {
                    result.failed += 1;
                    result.failed_ids.push(id);
                }
            }
        }

        tracing::info!(
            synced = result.synced,
            failed = result.failed,
            "Spreadsheet backfill finished"
        );
        Ok(result)
    }

    async fn post(&self, url: &str, entry: &EggLogEntry, action: SyncAction) -> Result<(), SyncError> {
        let body = WebhookRequest {
            action,
            entry: SheetEntry::from(entry),
            timestamp: format_utc_rfc3339(Utc::now()),
        };

        let response = self.http.post(url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Http(format!("HTTP {}", status)));
        }

        let reply: WebhookResponse = response.json().await?;
        if reply.success {
            Ok(())
        } else {
            Err(SyncError::Remote(
                reply
                    .error
                    .unwrap_or_else(|| "unknown error from spreadsheet script".to_string()),
            ))
        }
    }

    async fn record(&self, result: &Result<(), SyncError>) {
        let now = Utc::now();
        let mut status = self.status.write().await;
        status.last_attempt_at = Some(now);
        match result {
            Ok(()) => {
                status.last_success_at = Some(now);
                status.last_error = None;
            }
            Err(e) => status.last_error = Some(e.to_string()),
        }
    }
}

#[async_trait]
impl SyncHook for SheetsSyncService {
    async fn mirror(&self, entry: &EggLogEntry, action: SyncAction) -> Result<(), SyncError> {
        // Mirroring is opt-in; nothing to do until a webhook is set.
        if self.webhook_url.read().await.is_none() {
            return Ok(());
        }
        self.sync_entry(entry, action).await
    }
}

fn validate_url(url: &str) -> Result<(), SyncError> {
    let parsed =
        reqwest::Url::parse(url).map_err(|e| SyncError::InvalidUrl(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(SyncError::InvalidUrl(format!("unsupported scheme '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_entry_uses_script_field_names() {
        let entry = EggLogEntry {
            id: "e1".to_string(),
            date: "2024-06-03T00:00:00Z".parse().unwrap(),
            grams_logged: 2.5,
            egg_count: 1625,
            notes: None,
            created_at: "2024-06-03T08:15:00Z".parse().unwrap(),
        };
        let body = WebhookRequest {
            action: SyncAction::Create,
            entry: SheetEntry::from(&entry),
            timestamp: "2024-06-03T08:15:01Z".to_string(),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["action"], "CREATE");
        assert_eq!(json["entry"]["gramsLogged"], 2.5);
        assert_eq!(json["entry"]["eggCount"], 1625);
        assert_eq!(json["entry"]["createdAt"], "2024-06-03T08:15:00Z");
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://script.google.com/macros/s/abc/exec").is_ok());
        assert!(matches!(
            validate_url("ftp://example.com"),
            Err(SyncError::InvalidUrl(_))
        ));
        assert!(matches!(validate_url("not a url"), Err(SyncError::InvalidUrl(_))));
    }

    fn sample_entry(id: &str) -> EggLogEntry {
        EggLogEntry {
            id: id.to_string(),
            date: Utc::now(),
            grams_logged: 1.0,
            egg_count: 650,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_backfill_runs_on_spawned_task() {
        let service = std::sync::Arc::new(
            SheetsSyncService::new(None, Duration::from_secs(1)).unwrap(),
        );
        let entries = vec![sample_entry("e1"), sample_entry("e2")];

        let task = tokio::spawn({
            let service = service.clone();
            async move { service.backfill(entries).await }
        });

        assert!(matches!(task.await.unwrap(), Err(SyncError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_unconfigured_sync_errors_and_hook_skips() {
        let service = SheetsSyncService::new(None, Duration::from_secs(1)).unwrap();
        let entry = sample_entry("e1");

        assert!(matches!(
            service.sync_entry(&entry, SyncAction::Create).await,
            Err(SyncError::NotConfigured)
        ));
        assert!(service.mirror(&entry, SyncAction::Create).await.is_ok());
        assert!(!service.status().await.configured);
    }
}
