use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ModeError;

/// Layout field name that resolves to the card's primary term instead of a translation.
pub const TERM_FIELD: &str = "term";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    DeckStart,
    PrevRoundFailures,
    PrevRoundSuccesses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailureAction {
    #[default]
    Requeue,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequeueStrategy {
    #[default]
    StaticOffset,
    GeometricBackoff,
}

impl fmt::Display for RequeueStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequeueStrategy::StaticOffset => f.write_str("static_offset"),
            RequeueStrategy::GeometricBackoff => f.write_str("geometric_backoff"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    #[default]
    Flashcard,
    MultipleChoice,
    Typing,
}

/// Cosmetic description of how a round is presented. The scheduler never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundLayout {
    pub kind: LayoutKind,
    pub prompt_field: String,
    pub answer_field: String,
}

impl RoundLayout {
    pub fn new(kind: LayoutKind, prompt_field: impl Into<String>, answer_field: impl Into<String>) -> Self {
        Self {
            kind,
            prompt_field: prompt_field.into(),
            answer_field: answer_field.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionCriteria {
    pub required_successes: u32,
}

impl CompletionCriteria {
    pub fn successes(required_successes: u32) -> Self {
        Self { required_successes }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailurePolicy {
    pub action: FailureAction,
    pub strategy: RequeueStrategy,
    pub params: Vec<i64>,
}

impl FailurePolicy {
    pub fn requeue(offset: i64) -> Self {
        Self {
            action: FailureAction::Requeue,
            strategy: RequeueStrategy::StaticOffset,
            params: vec![offset],
        }
    }

    pub fn backoff(offsets: Vec<i64>) -> Self {
        Self {
            action: FailureAction::Requeue,
            strategy: RequeueStrategy::GeometricBackoff,
            params: offsets,
        }
    }

    pub fn game_over() -> Self {
        Self {
            action: FailureAction::GameOver,
            strategy: RequeueStrategy::StaticOffset,
            params: vec![0],
        }
    }

    /// Reinsertion offset after the `failure_count`-th failure of a card in the current round.
    ///
    /// Backoff params past the end are clamped to the last entry. Callers still clamp the
    /// result to the queue length.
    pub fn offset_for(&self, failure_count: u32) -> usize {
        let index = match self.strategy {
            RequeueStrategy::StaticOffset => 0,
            RequeueStrategy::GeometricBackoff => {
                let nth = failure_count.saturating_sub(1) as usize;
                nth.min(self.params.len().saturating_sub(1))
            }
        };
        self.params
            .get(index)
            .map(|offset| (*offset).max(0) as usize)
            .unwrap_or(0)
    }

    fn validate(&self, round: &str) -> Result<(), ModeError> {
        if self.params.is_empty() {
            return Err(ModeError::MissingPolicyParams {
                round: round.to_string(),
                strategy: self.strategy,
            });
        }
        if let Some(value) = self.params.iter().copied().find(|v| *v < 0) {
            return Err(ModeError::NegativeOffset {
                round: round.to_string(),
                value,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRound")]
pub struct Round {
    id: String,
    name: String,
    layout: RoundLayout,
    input_source: InputSource,
    completion_criteria: CompletionCriteria,
    failure_policy: FailurePolicy,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRound {
    id: String,
    name: String,
    layout: RoundLayout,
    input_source: InputSource,
    completion_criteria: CompletionCriteria,
    failure_policy: FailurePolicy,
}

impl TryFrom<RawRound> for Round {
    type Error = ModeError;

    fn try_from(raw: RawRound) -> Result<Self, Self::Error> {
        Round::new(
            raw.id,
            raw.name,
            raw.layout,
            raw.input_source,
            raw.completion_criteria,
            raw.failure_policy,
        )
    }
}

impl Round {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        layout: RoundLayout,
        input_source: InputSource,
        completion_criteria: CompletionCriteria,
        failure_policy: FailurePolicy,
    ) -> Result<Self, ModeError> {
        let id = id.into();
        if completion_criteria.required_successes == 0 {
            return Err(ModeError::InvalidCompletion { round: id });
        }
        failure_policy.validate(&id)?;

        Ok(Self {
            id,
            name: name.into(),
            layout,
            input_source,
            completion_criteria,
            failure_policy,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> &RoundLayout {
        &self.layout
    }

    pub fn input_source(&self) -> InputSource {
        self.input_source
    }

    pub fn completion_criteria(&self) -> CompletionCriteria {
        self.completion_criteria
    }

    pub fn required_successes(&self) -> u32 {
        self.completion_criteria.required_successes
    }

    pub fn failure_policy(&self) -> &FailurePolicy {
        &self.failure_policy
    }
}

/// An ordered, validated sequence of rounds plus the native-language field the ledger is
/// keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawMode")]
pub struct Mode {
    id: String,
    description: String,
    native_language: String,
    rounds: Vec<Round>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMode {
    id: String,
    #[serde(default)]
    description: String,
    native_language: String,
    rounds: Vec<Round>,
}

impl TryFrom<RawMode> for Mode {
    type Error = ModeError;

    fn try_from(raw: RawMode) -> Result<Self, Self::Error> {
        Mode::new(raw.id, raw.description, raw.native_language, raw.rounds)
    }
}

impl Mode {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        native_language: impl Into<String>,
        rounds: Vec<Round>,
    ) -> Result<Self, ModeError> {
        let id = id.into();
        if rounds.is_empty() {
            return Err(ModeError::NoRounds(id));
        }

        let mut seen = HashSet::with_capacity(rounds.len());
        for round in &rounds {
            if !seen.insert(round.id()) {
                return Err(ModeError::DuplicateRound(round.id().to_string()));
            }
        }

        Ok(Self {
            id,
            description: description.into(),
            native_language: native_language.into(),
            rounds,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ModeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn native_language(&self) -> &str {
        &self.native_language
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }
}
