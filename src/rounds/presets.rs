use std::str::FromStr;

use super::model::{
    CompletionCriteria, FailurePolicy, InputSource, LayoutKind, Mode, Round, RoundLayout, TERM_FIELD,
};
use super::ModeError;

const RECOGNITION_OFFSET: i64 = 3;
const WRITING_OFFSET: i64 = 5;
const BLITZ_REVIEW_BACKOFF: [i64; 3] = [2, 4, 8];

/// Built-in modes, instantiated per caller so the native-language field is never global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModePreset {
    Standard,
    Blitz,
}

impl FromStr for ModePreset {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ModePreset::Standard),
            "blitz" => Ok(ModePreset::Blitz),
            other => Err(ModeError::UnknownPreset(other.to_string())),
        }
    }
}

impl ModePreset {
    pub fn build(self, native_language: &str) -> Result<Mode, ModeError> {
        match self {
            ModePreset::Standard => standard(native_language),
            ModePreset::Blitz => blitz(native_language),
        }
    }
}

/// Recognition, recall and writing passes over the whole deck.
pub fn standard(native_language: &str) -> Result<Mode, ModeError> {
    let rounds = vec![
        Round::new(
            "recognition",
            "Recognition",
            RoundLayout::new(LayoutKind::Flashcard, TERM_FIELD, native_language),
            InputSource::DeckStart,
            CompletionCriteria::successes(1),
            FailurePolicy::requeue(RECOGNITION_OFFSET),
        )?,
        Round::new(
            "recall",
            "Recall",
            RoundLayout::new(LayoutKind::MultipleChoice, native_language, TERM_FIELD),
            InputSource::DeckStart,
            CompletionCriteria::successes(1),
            FailurePolicy::requeue(RECOGNITION_OFFSET),
        )?,
        Round::new(
            "writing",
            "Writing",
            RoundLayout::new(LayoutKind::Typing, native_language, TERM_FIELD),
            InputSource::DeckStart,
            CompletionCriteria::successes(1),
            FailurePolicy::requeue(WRITING_OFFSET),
        )?,
    ];

    Mode::new(
        "standard",
        "Recognition, recall and writing over the full deck",
        native_language,
        rounds,
    )
}

/// One sudden-death pass; whatever was not cleared is drilled again with backoff.
pub fn blitz(native_language: &str) -> Result<Mode, ModeError> {
    let rounds = vec![
        Round::new(
            "blitz",
            "Blitz",
            RoundLayout::new(LayoutKind::Flashcard, TERM_FIELD, native_language),
            InputSource::DeckStart,
            CompletionCriteria::successes(1),
            FailurePolicy::game_over(),
        )?,
        Round::new(
            "blitz-review",
            "Review",
            RoundLayout::new(LayoutKind::Typing, native_language, TERM_FIELD),
            InputSource::PrevRoundFailures,
            CompletionCriteria::successes(1),
            FailurePolicy::backoff(BLITZ_REVIEW_BACKOFF.to_vec()),
        )?,
    ];

    Mode::new(
        "blitz",
        "Single sudden-death pass followed by a review of missed words",
        native_language,
        rounds,
    )
}
