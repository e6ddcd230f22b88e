// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory backend.
//!
//! Stands in for a remote store during development and tests. It can add a
//! fixed latency to every call and can be told to fail saves.

use crate::db::{LogRepository, RepositoryError};
use crate::models::StoreSnapshot;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Process-local snapshot storage.
#[derive(Debug, Default)]
pub struct MemoryDb {
    snapshot: Mutex<Option<StoreSnapshot>>,
    latency: Option<Duration>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every load and save by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Copy of the currently stored snapshot.
    pub fn stored(&self) -> Option<StoreSnapshot> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<StoreSnapshot>> {
        self.snapshot.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl LogRepository for MemoryDb {
    async fn load(&self) -> Result<Option<StoreSnapshot>, RepositoryError> {
        self.simulate_latency().await;
        Ok(self.lock().clone())
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<(), RepositoryError> {
        self.simulate_latency().await;

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "memory backend set to fail saves".to_string(),
            ));
        }

        *self.lock() = Some(snapshot.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
