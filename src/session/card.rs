use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::rounds::TERM_FIELD;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub term: String,
    #[serde(default)]
    pub translations: HashMap<String, String>,
    #[serde(default)]
    pub category: String,
}

impl Card {
    pub fn new(id: impl Into<String>, term: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            translations: HashMap::new(),
            category: category.into(),
        }
    }

    pub fn with_translation(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.translations.insert(field.into(), value.into());
        self
    }

    pub fn translation(&self, field: &str) -> Option<&str> {
        self.translations.get(field).map(String::as_str)
    }

    /// Resolves a layout field: `term` or a translation key.
    pub fn field(&self, name: &str) -> Option<&str> {
        if name == TERM_FIELD {
            Some(&self.term)
        } else {
            self.translation(name)
        }
    }
}

/// A card's occupancy of the current round's queue.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub card: Arc<Card>,
    pub success_count: u32,
    pub failure_count: u32,
}

impl QueueEntry {
    pub fn new(card: Arc<Card>) -> Self {
        Self {
            card,
            success_count: 0,
            failure_count: 0,
        }
    }
}
