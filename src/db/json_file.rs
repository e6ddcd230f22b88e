// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON file backend.
//!
//! The whole snapshot lives in one pretty-printed file. Writes go to a
//! sibling temp file which is then renamed over the original, so a crash
//! mid-write leaves the previous snapshot intact.

use crate::db::{LogRepository, RepositoryError};
use crate::models::StoreSnapshot;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed snapshot storage.
#[derive(Debug, Clone)]
pub struct JsonFileDb {
    path: PathBuf,
}

impl JsonFileDb {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl LogRepository for JsonFileDb {
    async fn load(&self) -> Result<Option<StoreSnapshot>, RepositoryError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No saved data yet");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: StoreSnapshot = serde_json::from_slice(&data)?;
        tracing::debug!(
            path = %self.path.display(),
            entries = snapshot.entries.len(),
            "Loaded snapshot"
        );
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec_pretty(snapshot)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, &data).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            entries = snapshot.entries.len(),
            bytes = data.len(),
            "Saved snapshot"
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
