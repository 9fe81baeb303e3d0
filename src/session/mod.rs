//! Session scheduling
//!
//! A session pushes a frozen deck through the rounds of a `Mode`. Wrong answers are requeued
//! inside the round according to its failure policy, right answers graduate, skipped cards
//! leave the session for good. One `SessionScheduler` per active session.

pub mod card;
pub mod events;
pub mod scheduler;

pub use card::{Card, QueueEntry};
pub use events::{SessionEvent, SessionListener};
pub use scheduler::{SessionPhase, SessionScheduler, SessionSnapshot, SUCCESS_REINSERT_OFFSET};
