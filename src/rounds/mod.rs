//! Round configuration - declarative description of a learning Mode
//!
//! Contains:
//! - Mode / Round data model with construction-time validation
//! - Failure policy offset computation (static offset, geometric backoff)
//! - Preset factory for the Standard and Blitz modes

pub mod model;
pub mod presets;

pub use model::{
    CompletionCriteria, FailureAction, FailurePolicy, InputSource, LayoutKind, Mode, RequeueStrategy,
    Round, RoundLayout, TERM_FIELD,
};
pub use presets::ModePreset;

#[derive(Debug, thiserror::Error)]
pub enum ModeError {
    #[error("mode {0} has no rounds")]
    NoRounds(String),
    #[error("round {round}: requiredSuccesses must be at least 1")]
    InvalidCompletion { round: String },
    #[error("round {round}: {strategy} failure policy needs at least one offset param")]
    MissingPolicyParams {
        round: String,
        strategy: RequeueStrategy,
    },
    #[error("round {round}: negative requeue offset {value}")]
    NegativeOffset { round: String, value: i64 },
    #[error("duplicate round id: {0}")]
    DuplicateRound(String),
    #[error("unknown mode preset: {0}")]
    UnknownPreset(String),
    #[error("invalid mode definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read mode file: {0}")]
    Io(#[from] std::io::Error),
}
