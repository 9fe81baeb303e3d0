//! Snapshot storage
//!
//! The mastery ledger persists a single serialized snapshot under a fixed key. Backends:
//! - `MemoryStore` - process-local map, used for tests and throwaway sessions
//! - `JsonFileStore` - one JSON file per key in a data directory
//! - `SqliteStore` - key/value table in a local SQLite database
//!
//! `RemoteSnapshotSync` is the optional per-user remote copy of the same snapshot.

pub mod file;
pub mod memory;
pub mod remote;
pub mod sqlite;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use remote::{InMemoryRemote, RemoteSnapshotSync};
pub use sqlite::SqliteStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("remote sync error: {0}")]
    Remote(String),

    #[error("lock error: {0}")]
    LockError(String),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable key/value medium holding serialized snapshots.
pub trait SnapshotStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
