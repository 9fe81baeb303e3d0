use std::collections::HashMap;

use parking_lot::Mutex;

use super::StorageResult;

/// Per-user remote copy of the ledger snapshot.
pub trait RemoteSnapshotSync: Send + Sync {
    fn push(&self, user_id: &str, snapshot: &str) -> StorageResult<()>;

    fn pull(&self, user_id: &str) -> StorageResult<Option<String>>;
}

/// Process-local remote, keyed by user id. Stands in for a sync server in tests and offline
/// builds.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    snapshots: Mutex<HashMap<String, String>>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot_for(&self, user_id: &str) -> Option<String> {
        self.snapshots.lock().get(user_id).cloned()
    }
}

impl RemoteSnapshotSync for InMemoryRemote {
    fn push(&self, user_id: &str, snapshot: &str) -> StorageResult<()> {
        self.snapshots
            .lock()
            .insert(user_id.to_string(), snapshot.to_string());
        Ok(())
    }

    fn pull(&self, user_id: &str) -> StorageResult<Option<String>> {
        Ok(self.snapshot_for(user_id))
    }
}
