//! Mastery Ledger - long-term per-word proficiency
//!
//! Contains:
//! - WordStat / WordKey - per-word counters and the 0..=5 mastery level
//! - MasteryStats - aggregate bucket counts
//! - MasteryLedger - persistent store, queries used for session composition

pub mod ledger;
pub mod stats;

pub use ledger::{EncounterRecorder, MasteryLedger, STORAGE_KEY};
pub use stats::{
    MasteryStats, WordKey, WordStat, LEARNING_THRESHOLD, MASTERED_THRESHOLD, MASTERY_MAX,
};
