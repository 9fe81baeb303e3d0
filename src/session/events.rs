use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    GameStarted {
        mode_id: String,
        deck_size: usize,
    },
    RoundStarted {
        round_index: usize,
        round_id: String,
        size: usize,
    },
    Answered {
        card_id: String,
        round_index: usize,
        success: bool,
    },
    CardGraduated {
        card_id: String,
        round_index: usize,
    },
    Skipped {
        card_id: String,
        round_index: usize,
    },
    GameCompleted {
        skipped: usize,
    },
    Reset,
}

impl SessionEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::GameStarted { .. } => "GAME_STARTED",
            SessionEvent::RoundStarted { .. } => "ROUND_STARTED",
            SessionEvent::Answered { .. } => "ANSWERED",
            SessionEvent::CardGraduated { .. } => "CARD_GRADUATED",
            SessionEvent::Skipped { .. } => "SKIPPED",
            SessionEvent::GameCompleted { .. } => "GAME_COMPLETED",
            SessionEvent::Reset => "RESET",
        }
    }
}

pub type SessionListener = Box<dyn Fn(&SessionEvent) + Send + Sync>;
