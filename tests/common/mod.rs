#![allow(dead_code)]

use std::collections::HashMap;

use danci_session::compose::VocabularyEntry;
use danci_session::session::{Card, SessionPhase, SessionScheduler};

const ANIMALS: [(&str, &str, &str); 3] = [
    ("Hund", "dog", "chien"),
    ("Katze", "cat", "chat"),
    ("Maus", "mouse", "souris"),
];

pub fn animals_deck() -> Vec<Card> {
    ANIMALS
        .iter()
        .enumerate()
        .map(|(i, (term, en, fr))| {
            Card::new(format!("card-{i}"), *term, "animals")
                .with_translation("en", *en)
                .with_translation("fr", *fr)
        })
        .collect()
}

pub fn animals_vocabulary() -> Vec<VocabularyEntry> {
    ANIMALS
        .iter()
        .map(|(term, en, fr)| VocabularyEntry {
            term: term.to_string(),
            translations: HashMap::from([
                ("en".to_string(), en.to_string()),
                ("fr".to_string(), fr.to_string()),
            ]),
            category: "animals".to_string(),
        })
        .collect()
}

/// Answers every remaining card correctly.
pub fn play_until_complete(scheduler: &mut SessionScheduler) {
    let mut guard = 0;
    while scheduler.phase() == SessionPhase::Playing {
        scheduler.submit_answer(true);
        guard += 1;
        assert!(guard < 10_000, "session did not terminate");
    }
}
