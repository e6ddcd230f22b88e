//! Persistence layer.
//!
//! The entry store talks to storage only through [`LogRepository`]; the
//! concrete backend is picked once at startup.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileDb;
pub use memory::MemoryDb;

use crate::models::StoreSnapshot;
use async_trait::async_trait;

/// Storage backend for the entry collection and goal.
#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Load the last saved snapshot, or `None` on first run.
    async fn load(&self) -> Result<Option<StoreSnapshot>, RepositoryError>;

    /// Replace the stored snapshot.
    async fn save(&self, snapshot: &StoreSnapshot) -> Result<(), RepositoryError>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Errors from persistence backends.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
