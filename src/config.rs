//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use crate::models::goal::DEFAULT_WEEKLY_GOAL_GRAMS;
use crate::models::HarvestPolicy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Where the egg log is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// JSON file on disk (survives restarts)
    File,
    /// Process memory only (development/demo)
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(StorageBackend::File),
            "memory" | "mock" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    pub storage_backend: StorageBackend,
    /// Snapshot path for the file backend
    pub data_file: PathBuf,
    /// Thursday/Saturday harvest rule
    pub harvest_policy: HarvestPolicy,
    /// Goal used on a fresh install
    pub default_weekly_goal_grams: f64,
    /// Spreadsheet webhook; mirroring is off when unset
    pub sheets_webhook_url: Option<String>,
    pub sync_timeout: Duration,
    pub persist_timeout: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            storage_backend: StorageBackend::Memory,
            data_file: PathBuf::from("data/egg_logs.json"),
            harvest_policy: HarvestPolicy::RestDays,
            default_weekly_goal_grams: DEFAULT_WEEKLY_GOAL_GRAMS,
            sheets_webhook_url: None,
            sync_timeout: Duration::from_secs(10),
            persist_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let default_weekly_goal_grams: f64 = parse_var(
            "DEFAULT_WEEKLY_GOAL_GRAMS",
            DEFAULT_WEEKLY_GOAL_GRAMS,
        )?;
        if !default_weekly_goal_grams.is_finite() || default_weekly_goal_grams < 0.0 {
            return Err(ConfigError::Invalid {
                name: "DEFAULT_WEEKLY_GOAL_GRAMS",
                reason: "must be zero or positive".to_string(),
            });
        }

        Ok(Self {
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            storage_backend: parse_var("STORAGE_BACKEND", StorageBackend::File)?,
            data_file: env::var("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/egg_logs.json")),
            harvest_policy: parse_var("HARVEST_POLICY", HarvestPolicy::RestDays)?,
            default_weekly_goal_grams,
            sheets_webhook_url: env::var("SHEETS_WEBHOOK_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            sync_timeout: Duration::from_secs(parse_var("SYNC_TIMEOUT_SECS", 10)?),
            persist_timeout: Duration::from_secs(parse_var("PERSIST_TIMEOUT_SECS", 5)?),
        })
    }
}

/// Parse `name` if set, otherwise use `default`.
fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
