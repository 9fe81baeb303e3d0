//! Deck composition for new sessions.
//!
//! Vocabulary comes from an external source; the ledger decides which entries make it into
//! the deck depending on the kind of session requested.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mastery::{MasteryLedger, WordKey, WordStat};
use crate::session::Card;
use crate::storage::StorageResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub term: String,
    pub translations: HashMap<String, String>,
    #[serde(default)]
    pub category: String,
}

impl VocabularyEntry {
    pub fn load_json<P: AsRef<Path>>(path: P) -> StorageResult<Vec<VocabularyEntry>> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn key(&self, native_language: &str) -> Option<WordKey> {
        self.translations
            .get(native_language)
            .map(|translation| WordKey::new(&self.term, translation))
    }

    fn to_card(&self) -> Card {
        Card {
            id: Uuid::new_v4().to_string(),
            term: self.term.clone(),
            translations: self.translations.clone(),
            category: self.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeckSource {
    /// Words the ledger has never seen, skipped ones included.
    #[default]
    Unseen,
    Practice,
    Mastered,
    Any,
}

impl fmt::Display for DeckSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeckSource::Unseen => "unseen",
            DeckSource::Practice => "practice",
            DeckSource::Mastered => "mastered",
            DeckSource::Any => "any",
        };
        f.write_str(name)
    }
}

impl FromStr for DeckSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unseen" | "new" => Ok(DeckSource::Unseen),
            "practice" => Ok(DeckSource::Practice),
            "mastered" => Ok(DeckSource::Mastered),
            "any" => Ok(DeckSource::Any),
            other => Err(format!("unknown deck source: {other}")),
        }
    }
}

/// Builds up to `size` cards. Entries without a translation for `native_language` are
/// never drawn, since the ledger could not key their answers.
pub fn compose_deck(
    entries: &[VocabularyEntry],
    ledger: &MasteryLedger,
    source: DeckSource,
    native_language: &str,
    size: usize,
) -> Vec<Card> {
    let usable: Vec<(WordKey, &VocabularyEntry)> = entries
        .iter()
        .filter_map(|entry| entry.key(native_language).map(|key| (key, entry)))
        .collect();

    let selected: Vec<&VocabularyEntry> = match source {
        DeckSource::Any => usable.iter().map(|(_, entry)| *entry).take(size).collect(),
        DeckSource::Unseen => usable
            .iter()
            .filter(|(key, _)| !ledger.has_stats(key.term(), key.translation()))
            .map(|(_, entry)| *entry)
            .take(size)
            .collect(),
        DeckSource::Practice => {
            match_ranked(&usable, ledger.get_words_needing_practice(ledger.len()), size)
        }
        DeckSource::Mastered => match_ranked(&usable, ledger.get_mastered_words(ledger.len()), size),
    };

    tracing::debug!(
        source = %source,
        candidates = usable.len(),
        selected = selected.len(),
        "deck composed"
    );
    selected.into_iter().map(VocabularyEntry::to_card).collect()
}

fn match_ranked<'a>(
    usable: &[(WordKey, &'a VocabularyEntry)],
    ranked: Vec<WordStat>,
    size: usize,
) -> Vec<&'a VocabularyEntry> {
    let by_key: HashMap<&WordKey, &'a VocabularyEntry> =
        usable.iter().map(|(key, entry)| (key, *entry)).collect();

    ranked
        .iter()
        .filter_map(|stat| by_key.get(&stat.key()).copied())
        .take(size)
        .collect()
}
