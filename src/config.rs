use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::compose::DeckSource;
use crate::storage::{JsonFileStore, MemoryStore, SnapshotStore, SqliteStore, StorageResult};

const SQLITE_FILE: &str = "danci.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    Memory,
    #[default]
    File,
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "file" | "json" => Ok(StoreBackend::File),
            "sqlite" => Ok(StoreBackend::Sqlite),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// Directory for the daily rolling log file; file logging is off when unset.
    pub log_dir: Option<PathBuf>,
    pub store_backend: StoreBackend,
    pub data_dir: PathBuf,
    pub native_language: String,
    pub session_size: usize,
    /// Preset name (`standard`, `blitz`) or a path to a mode JSON file.
    pub mode: String,
    pub deck_source: DeckSource,
}

impl Config {
    pub fn from_env() -> Self {
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = std::env::var("DANCI_LOG_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let store_backend = std::env::var("DANCI_STORE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();

        let data_dir = std::env::var("DANCI_DATA_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let native_language =
            std::env::var("DANCI_NATIVE_LANGUAGE").unwrap_or_else(|_| "en".to_string());

        let session_size = std::env::var("DANCI_SESSION_SIZE")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(10);

        let mode = std::env::var("DANCI_MODE").unwrap_or_else(|_| "standard".to_string());

        let deck_source = std::env::var("DANCI_DECK_SOURCE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();

        Self {
            log_level,
            log_dir,
            store_backend,
            data_dir,
            native_language,
            session_size,
            mode,
            deck_source,
        }
    }

    pub fn open_store(&self) -> StorageResult<Arc<dyn SnapshotStore>> {
        let store: Arc<dyn SnapshotStore> = match self.store_backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::File => Arc::new(JsonFileStore::open(&self.data_dir)?),
            StoreBackend::Sqlite => Arc::new(SqliteStore::open(self.data_dir.join(SQLITE_FILE))?),
        };
        Ok(store)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("danci")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("SQLite".parse::<StoreBackend>().unwrap(), StoreBackend::Sqlite);
        assert_eq!("json".parse::<StoreBackend>().unwrap(), StoreBackend::File);
        assert!("redis".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_open_store_per_backend() {
        let dir = TempDir::new().unwrap();
        for backend in [StoreBackend::Memory, StoreBackend::File, StoreBackend::Sqlite] {
            let config = Config {
                log_level: "info".to_string(),
                log_dir: None,
                store_backend: backend,
                data_dir: dir.path().join(format!("{backend:?}")),
                native_language: "en".to_string(),
                session_size: 10,
                mode: "standard".to_string(),
                deck_source: DeckSource::Unseen,
            };
            let store = config.open_store().unwrap();
            store.set("k", "v").unwrap();
            assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        }
        assert!(dir.path().join("Sqlite").join(SQLITE_FILE).exists());
    }
}
