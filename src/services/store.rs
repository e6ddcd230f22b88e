// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entry store: owns the log entries and the weekly goal.
//!
//! Every mutation follows the same path:
//! 1. Validate input (no state change on failure)
//! 2. Apply the change in memory
//! 3. Persist the full snapshot through the injected [`LogRepository`]
//! 4. Broadcast a [`StoreEvent`] to subscribers
//! 5. Spawn the optional [`SyncHook`] without waiting for it
//!
//! If step 3 fails the in-memory change stays applied and the caller gets
//! [`StoreError::Persistence`]; the next successful save writes it out.

use crate::db::{LogRepository, RepositoryError};
use crate::models::{EggLogEntry, GoalSettings, NewEggLog, StoreSnapshot, SyncAction};
use crate::services::sheets::SyncError;
use crate::time_utils::calendar_day;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

/// Two submissions closer together than this are candidates for duplicates.
const DUPLICATE_WINDOW_MS: i64 = 1000;
const EVENT_CHANNEL_CAPACITY: usize = 64;
const DEFAULT_PERSIST_TIMEOUT: Duration = Duration::from_secs(5);
/// Default number of entries in the "recent" view.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Post-commit hook for mirroring entry changes elsewhere.
#[async_trait]
pub trait SyncHook: Send + Sync {
    async fn mirror(&self, entry: &EggLogEntry, action: SyncAction) -> Result<(), SyncError>;
}

/// Change notification sent after each successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    EntryAdded(EggLogEntry),
    EntryUpdated(EggLogEntry),
    EntryDeleted { id: String },
    GoalUpdated(GoalSettings),
    /// The sync hook failed for a committed change.
    SyncFailed {
        entry_id: String,
        action: SyncAction,
        error: String,
    },
}

/// Result of [`EntryStore::add_entry`].
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Created(EggLogEntry),
    /// Suppressed as a double submission of this existing entry.
    Duplicate(EggLogEntry),
}

impl AddOutcome {
    pub fn entry(&self) -> &EggLogEntry {
        match self {
            AddOutcome::Created(e) | AddOutcome::Duplicate(e) => e,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, AddOutcome::Duplicate(_))
    }
}

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Failed to persist changes: {0}")]
    Persistence(String),
}

impl From<RepositoryError> for StoreError {
    fn from(e: RepositoryError) -> Self {
        StoreError::Persistence(e.to_string())
    }
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Canonical owner of the entry collection and goal.
pub struct EntryStore {
    state: Mutex<StoreSnapshot>,
    repo: Arc<dyn LogRepository>,
    events: broadcast::Sender<StoreEvent>,
    sync_hook: Option<Arc<dyn SyncHook>>,
    persist_timeout: Duration,
    clock: Clock,
}

impl EntryStore {
    /// Load the store from `repo`, starting empty with `default_goal` on first run.
    pub async fn open(
        repo: Arc<dyn LogRepository>,
        default_goal: GoalSettings,
    ) -> Result<Self, StoreError> {
        let snapshot = match repo.load().await? {
            Some(snapshot) => {
                tracing::info!(
                    backend = repo.backend_name(),
                    entries = snapshot.entries.len(),
                    goal_grams = snapshot.goal.weekly_goal_grams,
                    "Loaded egg logs"
                );
                snapshot
            }
            None => {
                tracing::info!(
                    backend = repo.backend_name(),
                    goal_grams = default_goal.weekly_goal_grams,
                    "Starting with empty egg log"
                );
                StoreSnapshot::fresh(default_goal)
            }
        };

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            state: Mutex::new(snapshot),
            repo,
            events,
            sync_hook: None,
            persist_timeout: DEFAULT_PERSIST_TIMEOUT,
            clock: Arc::new(Utc::now),
        })
    }

    /// Mirror committed entry changes through `hook`.
    pub fn with_sync_hook(mut self, hook: Arc<dyn SyncHook>) -> Self {
        self.sync_hook = Some(hook);
        self
    }

    /// Bound every save by `timeout`.
    pub fn with_persist_timeout(mut self, timeout: Duration) -> Self {
        self.persist_timeout = timeout;
        self
    }

    /// Replace the clock used for `created_at` (tests).
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Receive a [`StoreEvent`] after every successful mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // ─── Reads ───────────────────────────────────────────────────

    /// All entries, most recently created first.
    pub async fn entries(&self) -> Vec<EggLogEntry> {
        let mut entries = self.state.lock().await.entries.clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    /// The `limit` most recently created entries.
    pub async fn recent_entries(&self, limit: usize) -> Vec<EggLogEntry> {
        let mut entries = self.entries().await;
        entries.truncate(limit);
        entries
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn find(&self, id: &str) -> Option<EggLogEntry> {
        self.state
            .lock()
            .await
            .entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    pub async fn goal(&self) -> GoalSettings {
        self.state.lock().await.goal
    }

    /// Consistent copy of entries and goal taken under one lock.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().await.clone()
    }

    // ─── Mutations ───────────────────────────────────────────────

    /// Record a new harvest.
    ///
    /// A submission with the same weight and harvest day as an entry created
    /// less than a second ago is treated as a double submit and dropped.
    pub async fn add_entry(&self, input: NewEggLog) -> Result<AddOutcome, StoreError> {
        validate_grams(input.grams_logged)?;

        let now = (self.clock)();
        let day = calendar_day(input.date);
        let mut state = self.state.lock().await;

        if let Some(existing) = state.entries.iter().find(|e| {
            e.grams_logged == input.grams_logged
                && e.harvest_day() == day
                && (e.created_at - now).num_milliseconds().abs() < DUPLICATE_WINDOW_MS
        }) {
            tracing::warn!(
                existing_id = %existing.id,
                grams = input.grams_logged,
                day = %day,
                "Duplicate submission suppressed"
            );
            return Ok(AddOutcome::Duplicate(existing.clone()));
        }

        let entry = EggLogEntry::new(uuid::Uuid::new_v4().to_string(), input, now);
        state.entries.push(entry.clone());
        self.persist(&mut state).await?;
        drop(state);

        tracing::info!(
            id = %entry.id,
            grams = entry.grams_logged,
            eggs = entry.egg_count,
            "Egg log added"
        );
        self.commit(StoreEvent::EntryAdded(entry.clone()), &entry, SyncAction::Create);
        Ok(AddOutcome::Created(entry))
    }

    /// Replace an entry's date, weight and notes.
    ///
    /// `id` and `created_at` are kept from the stored record and `egg_count`
    /// is recomputed, whatever the caller sent.
    pub async fn edit_entry(&self, updated: EggLogEntry) -> Result<EggLogEntry, StoreError> {
        let id = updated.id.clone();
        self.update_entry(
            &id,
            NewEggLog {
                date: updated.date,
                grams_logged: updated.grams_logged,
                notes: updated.notes,
            },
        )
        .await
    }

    /// Full-record edit of the entry with `id`.
    pub async fn update_entry(&self, id: &str, fields: NewEggLog) -> Result<EggLogEntry, StoreError> {
        validate_grams(fields.grams_logged)?;

        let mut state = self.state.lock().await;
        let slot = state
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let entry = EggLogEntry::new(slot.id.clone(), fields, slot.created_at);
        *slot = entry.clone();
        self.persist(&mut state).await?;
        drop(state);

        tracing::info!(id = %entry.id, grams = entry.grams_logged, "Egg log updated");
        self.commit(StoreEvent::EntryUpdated(entry.clone()), &entry, SyncAction::Update);
        Ok(entry)
    }

    /// Remove the entry with `id`, returning it.
    pub async fn delete_entry(&self, id: &str) -> Result<EggLogEntry, StoreError> {
        let mut state = self.state.lock().await;
        let index = state
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let removed = state.entries.remove(index);
        self.persist(&mut state).await?;
        drop(state);

        tracing::info!(id = %removed.id, "Egg log deleted");
        self.commit(
            StoreEvent::EntryDeleted {
                id: removed.id.clone(),
            },
            &removed,
            SyncAction::Delete,
        );
        Ok(removed)
    }

    /// Replace the weekly goal.
    pub async fn update_goal(&self, weekly_goal_grams: f64) -> Result<GoalSettings, StoreError> {
        if !weekly_goal_grams.is_finite() || weekly_goal_grams < 0.0 {
            return Err(StoreError::Validation(
                "weekly_goal_grams must be zero or a positive number".to_string(),
            ));
        }

        let goal = GoalSettings::from_grams(weekly_goal_grams);
        let mut state = self.state.lock().await;
        state.goal = goal;
        self.persist(&mut state).await?;
        drop(state);

        tracing::info!(
            goal_grams = goal.weekly_goal_grams,
            goal_eggs = goal.weekly_goal_eggs,
            "Weekly goal updated"
        );
        let _ = self.events.send(StoreEvent::GoalUpdated(goal));
        Ok(goal)
    }

    // ─── Internals ───────────────────────────────────────────────

    async fn persist(&self, state: &mut StoreSnapshot) -> Result<(), StoreError> {
        state.last_saved = Some((self.clock)());

        match tokio::time::timeout(self.persist_timeout, self.repo.save(state)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!(
                    backend = self.repo.backend_name(),
                    error = %e,
                    "Failed to persist egg logs"
                );
                Err(e.into())
            }
            Err(_) => {
                tracing::error!(
                    backend = self.repo.backend_name(),
                    timeout_ms = self.persist_timeout.as_millis() as u64,
                    "Timed out persisting egg logs"
                );
                Err(StoreError::Persistence(format!(
                    "save timed out after {:?}",
                    self.persist_timeout
                )))
            }
        }
    }

    /// Notify subscribers, then hand the change to the sync hook in the background.
    fn commit(&self, event: StoreEvent, entry: &EggLogEntry, action: SyncAction) {
        // No receivers is fine
        let _ = self.events.send(event);

        let Some(hook) = self.sync_hook.clone() else {
            return;
        };
        let events = self.events.clone();
        let entry = entry.clone();
        tokio::spawn(async move {
            if let Err(e) = hook.mirror(&entry, action).await {
                tracing::warn!(
                    id = %entry.id,
                    action = %action,
                    error = %e,
                    "Spreadsheet sync failed"
                );
                let _ = events.send(StoreEvent::SyncFailed {
                    entry_id: entry.id.clone(),
                    action,
                    error: e.to_string(),
                });
            }
        });
    }
}

fn validate_grams(grams: f64) -> Result<(), StoreError> {
    if grams.is_finite() && grams > 0.0 {
        Ok(())
    } else {
        Err(StoreError::Validation(
            "grams_logged must be a positive number".to_string(),
        ))
    }
}
