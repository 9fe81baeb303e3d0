use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;

use crate::mastery::stats::{MasteryStats, WordKey, WordStat, MASTERY_MAX};
use crate::storage::{MemoryStore, RemoteSnapshotSync, SnapshotStore, StorageResult};

/// Fixed key the ledger snapshot lives under in every store.
pub const STORAGE_KEY: &str = "word_mastery_stats";

/// What the session scheduler needs from the ledger. Recording must never fail from the
/// caller's point of view.
pub trait EncounterRecorder: Send + Sync {
    fn record_encounter(&self, term: &str, translation: &str, category: &str, success: bool);

    fn mark_as_skipped(&self, term: &str, translation: &str, category: &str);
}

struct RemoteBinding {
    user_id: String,
    sync: Arc<dyn RemoteSnapshotSync>,
}

/// Per-word proficiency that outlives any single session.
///
/// Every mutation updates memory first, then writes the whole snapshot to the backing store
/// (and the remote, when one is attached). Persistence failures are logged and dropped.
///
/// Snapshot writes are serialized through `persist_lock`, so the store only ever moves to a
/// newer snapshot.
pub struct MasteryLedger {
    stats: RwLock<HashMap<WordKey, WordStat>>,
    store: RwLock<Arc<dyn SnapshotStore>>,
    remote: RwLock<Option<RemoteBinding>>,
    persist_lock: Mutex<()>,
}

impl MasteryLedger {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        let stats = load_snapshot(store.as_ref());
        tracing::debug!(words = stats.len(), "mastery ledger loaded");

        Self {
            stats: RwLock::new(stats),
            store: RwLock::new(store),
            remote: RwLock::new(None),
            persist_lock: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn record_encounter(
        &self,
        term: &str,
        translation: &str,
        category: &str,
        success: bool,
    ) -> WordStat {
        let updated = {
            let mut stats = self.stats.write();
            let stat = stats
                .entry(WordKey::new(term, translation))
                .or_insert_with(|| WordStat::new(term, translation, category));
            stat.record(success, Utc::now());
            stat.clone()
        };

        tracing::debug!(
            term = %term,
            translation = %translation,
            success,
            mastery_level = updated.mastery_level,
            "encounter recorded"
        );
        self.persist();
        updated
    }

    pub fn mark_as_skipped(&self, term: &str, translation: &str, category: &str) {
        {
            let mut stats = self.stats.write();
            stats
                .entry(WordKey::new(term, translation))
                .or_insert_with(|| WordStat::new(term, translation, category))
                .skipped = true;
        }

        tracing::debug!(term = %term, translation = %translation, "word marked as skipped");
        self.persist();
    }

    pub fn get_stats(&self, term: &str, translation: &str) -> Option<WordStat> {
        self.stats
            .read()
            .get(&WordKey::new(term, translation))
            .cloned()
    }

    /// True when the word has any entry, skipped ones included.
    pub fn has_stats(&self, term: &str, translation: &str) -> bool {
        self.stats
            .read()
            .contains_key(&WordKey::new(term, translation))
    }

    /// Non-skipped words, ordered by key.
    pub fn get_all_stats(&self) -> Vec<WordStat> {
        let stats = self.stats.read();
        let mut active: Vec<(&WordKey, &WordStat)> =
            stats.iter().filter(|(_, stat)| !stat.skipped).collect();
        active.sort_by(|a, b| a.0.cmp(b.0));
        active.into_iter().map(|(_, stat)| stat.clone()).collect()
    }

    pub fn get_stats_by_category(&self, category: &str) -> Vec<WordStat> {
        self.get_all_stats()
            .into_iter()
            .filter(|stat| stat.category == category)
            .collect()
    }

    /// Lowest mastery first; ties broken by the higher error rate.
    pub fn get_words_needing_practice(&self, limit: usize) -> Vec<WordStat> {
        let mut words = self.get_all_stats();
        words.sort_by(|a, b| {
            a.mastery_level
                .cmp(&b.mastery_level)
                .then_with(|| b.error_rate().total_cmp(&a.error_rate()))
        });
        words.truncate(limit);
        words
    }

    /// Words at or above the mastered threshold, strongest first.
    pub fn get_mastered_words(&self, limit: usize) -> Vec<WordStat> {
        let mut words: Vec<WordStat> = self
            .get_all_stats()
            .into_iter()
            .filter(WordStat::is_mastered)
            .collect();
        words.sort_by(|a, b| {
            b.mastery_level
                .cmp(&a.mastery_level)
                .then_with(|| a.error_rate().total_cmp(&b.error_rate()))
        });
        words.truncate(limit);
        words
    }

    pub fn get_mastery_stats(&self) -> MasteryStats {
        let stats = self.stats.read();
        MasteryStats::from_stats(stats.values().filter(|stat| !stat.skipped))
    }

    pub fn clear_all_stats(&self) {
        self.stats.write().clear();
        tracing::info!("mastery ledger cleared");
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.stats.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.read().is_empty()
    }

    /// Swaps the backing store and reloads state from it.
    pub fn replace_store(&self, store: Arc<dyn SnapshotStore>) {
        let _persisting = self.persist_lock.lock();
        let loaded = load_snapshot(store.as_ref());
        tracing::info!(words = loaded.len(), "mastery ledger store replaced");
        *self.stats.write() = loaded;
        *self.store.write() = store;
    }

    pub fn attach_remote(&self, user_id: impl Into<String>, sync: Arc<dyn RemoteSnapshotSync>) {
        let user_id = user_id.into();
        tracing::info!(user_id = %user_id, "remote mastery sync attached");
        *self.remote.write() = Some(RemoteBinding { user_id, sync });
    }

    pub fn detach_remote(&self) {
        *self.remote.write() = None;
    }

    /// Overwrites local state with the attached user's remote snapshot, if there is one.
    ///
    /// Returns whether a remote snapshot was adopted.
    pub fn adopt_remote_snapshot(&self) -> StorageResult<bool> {
        let pulled = {
            let remote = self.remote.read();
            match remote.as_ref() {
                Some(binding) => binding.sync.pull(&binding.user_id)?,
                None => return Ok(false),
            }
        };

        let Some(raw) = pulled else {
            return Ok(false);
        };

        let adopted = parse_snapshot(&raw)?;
        tracing::info!(words = adopted.len(), "remote mastery snapshot adopted");
        let _persisting = self.persist_lock.lock();
        *self.stats.write() = adopted;

        let snapshot = self.serialize_snapshot()?;
        let store = self.store.read().clone();
        if let Err(err) = store.set(STORAGE_KEY, &snapshot) {
            tracing::warn!(error = %err, "failed to persist adopted mastery snapshot");
        }
        Ok(true)
    }

    fn persist(&self) {
        let _persisting = self.persist_lock.lock();
        let snapshot = match self.serialize_snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize mastery snapshot");
                return;
            }
        };

        let store = self.store.read().clone();
        if let Err(err) = store.set(STORAGE_KEY, &snapshot) {
            tracing::warn!(error = %err, "failed to persist mastery snapshot");
        }

        let remote = self.remote.read();
        if let Some(binding) = remote.as_ref() {
            if let Err(err) = binding.sync.push(&binding.user_id, &snapshot) {
                tracing::warn!(
                    user_id = %binding.user_id,
                    error = %err,
                    "failed to push mastery snapshot"
                );
            }
        }
    }

    /// Stats as a JSON array ordered by key.
    fn serialize_snapshot(&self) -> Result<String, serde_json::Error> {
        let stats = self.stats.read();
        let mut entries: Vec<(&WordKey, &WordStat)> = stats.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        let ordered: Vec<&WordStat> = entries.into_iter().map(|(_, stat)| stat).collect();
        serde_json::to_string(&ordered)
    }
}

impl EncounterRecorder for MasteryLedger {
    fn record_encounter(&self, term: &str, translation: &str, category: &str, success: bool) {
        MasteryLedger::record_encounter(self, term, translation, category, success);
    }

    fn mark_as_skipped(&self, term: &str, translation: &str, category: &str) {
        MasteryLedger::mark_as_skipped(self, term, translation, category);
    }
}

fn load_snapshot(store: &dyn SnapshotStore) -> HashMap<WordKey, WordStat> {
    match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => parse_snapshot(&raw).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "discarding unreadable mastery snapshot");
            HashMap::new()
        }),
        Ok(None) => HashMap::new(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load mastery snapshot");
            HashMap::new()
        }
    }
}

/// Older snapshots were objects keyed by `term::translation`; their keys are ignored.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    List(Vec<WordStat>),
    Keyed(HashMap<String, WordStat>),
}

fn parse_snapshot(raw: &str) -> Result<HashMap<WordKey, WordStat>, serde_json::Error> {
    let entries: Vec<WordStat> = match serde_json::from_str(raw)? {
        StoredSnapshot::List(entries) => entries,
        StoredSnapshot::Keyed(entries) => entries.into_values().collect(),
    };

    let mut stats = HashMap::with_capacity(entries.len());
    for mut stat in entries {
        stat.mastery_level = stat.mastery_level.min(MASTERY_MAX);
        let key = stat.key();
        if let Some(dropped) = stats.insert(key, stat) {
            tracing::warn!(
                term = %dropped.term,
                translation = %dropped.translation,
                "duplicate word in mastery snapshot, keeping the later entry"
            );
        }
    }
    Ok(stats)
}
