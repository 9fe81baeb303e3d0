use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::mastery::EncounterRecorder;
use crate::rounds::{FailureAction, InputSource, Mode, Round};
use crate::session::card::{Card, QueueEntry};
use crate::session::events::{SessionEvent, SessionListener};

/// Successful but not yet graduated cards come back this many places later.
pub const SUCCESS_REINSERT_OFFSET: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    #[default]
    Idle,
    Playing,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub mode_id: Option<String>,
    pub round_index: usize,
    pub round_id: Option<String>,
    pub current_card_id: Option<String>,
    pub queue_len: usize,
    pub graduated: usize,
    pub skipped: usize,
    pub progress: f64,
}

#[derive(Default)]
struct SessionState {
    phase: SessionPhase,
    mode: Option<Arc<Mode>>,
    round_index: usize,
    original_deck: Vec<Arc<Card>>,
    live_deck: Vec<Arc<Card>>,
    queue: VecDeque<QueueEntry>,
    graduated: Vec<Arc<Card>>,
    skipped: Vec<Arc<Card>>,
    round_initial_size: usize,
    round_graduated_count: usize,
    round_skipped_count: usize,
}

/// Drives one session's deck through the rounds of a Mode.
///
/// Every public call finishes its round-advancement cascade before returning. Answers and
/// skips are reported to the recorder; its persistence outcome never affects scheduling.
pub struct SessionScheduler {
    recorder: Arc<dyn EncounterRecorder>,
    state: SessionState,
    listeners: Vec<SessionListener>,
}

impl SessionScheduler {
    pub fn new(recorder: Arc<dyn EncounterRecorder>) -> Self {
        Self {
            recorder,
            state: SessionState::default(),
            listeners: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn start_game(&mut self, mode: Arc<Mode>, cards: Vec<Card>) {
        let deck: Vec<Arc<Card>> = cards.into_iter().map(Arc::new).collect();
        let mode_id = mode.id().to_string();
        let first_round_id = mode.round(0).map(|r| r.id().to_string()).unwrap_or_default();

        self.state = SessionState {
            phase: SessionPhase::Playing,
            mode: Some(mode),
            round_index: 0,
            queue: deck.iter().cloned().map(QueueEntry::new).collect(),
            original_deck: deck.clone(),
            live_deck: deck,
            round_initial_size: 0,
            ..SessionState::default()
        };
        self.state.round_initial_size = self.state.queue.len();

        tracing::info!(mode = %mode_id, deck_size = self.state.round_initial_size, "session started");
        self.emit(SessionEvent::GameStarted {
            mode_id,
            deck_size: self.state.round_initial_size,
        });

        if self.state.queue.is_empty() {
            self.advance_round();
        } else {
            self.emit(SessionEvent::RoundStarted {
                round_index: 0,
                round_id: first_round_id,
                size: self.state.round_initial_size,
            });
        }
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.state.queue.front().map(|entry| entry.card.as_ref())
    }

    /// The round the live queue belongs to; `None` unless a round is being played.
    pub fn current_round_config(&self) -> Option<&Round> {
        if self.state.phase != SessionPhase::Playing {
            return None;
        }
        self.state
            .mode
            .as_ref()
            .and_then(|mode| mode.round(self.state.round_index))
    }

    pub fn submit_answer(&mut self, success: bool) {
        let Some(mode) = self.state.mode.clone() else {
            return;
        };
        let Some(round) = mode.round(self.state.round_index) else {
            return;
        };
        let Some(mut entry) = self.state.queue.pop_front() else {
            return;
        };

        self.report_encounter(&entry.card, mode.native_language(), success);
        let round_index = self.state.round_index;
        self.emit(SessionEvent::Answered {
            card_id: entry.card.id.clone(),
            round_index,
            success,
        });

        if success {
            entry.success_count += 1;
            if entry.success_count >= round.required_successes() {
                let card_id = entry.card.id.clone();
                self.state.graduated.push(entry.card);
                self.state.round_graduated_count += 1;
                self.emit(SessionEvent::CardGraduated {
                    card_id,
                    round_index,
                });
            } else {
                self.reinsert(entry, SUCCESS_REINSERT_OFFSET);
            }
        } else {
            let policy = round.failure_policy();
            match policy.action {
                FailureAction::Requeue => {
                    entry.failure_count += 1;
                    let offset = policy.offset_for(entry.failure_count);
                    self.reinsert(entry, offset);
                }
                FailureAction::GameOver => {
                    tracing::debug!(
                        round = round.id(),
                        abandoned = self.state.queue.len() + 1,
                        "round ended by failure"
                    );
                    self.state.queue.clear();
                }
            }
        }

        if self.state.queue.is_empty() {
            self.advance_round();
        }
    }

    pub fn skip_current_card(&mut self) {
        let Some(entry) = self.state.queue.pop_front() else {
            return;
        };
        let card = entry.card;

        let native_language = self
            .state
            .mode
            .as_ref()
            .map(|mode| mode.native_language().to_string())
            .unwrap_or_default();
        let translation = resolve_translation(&card, &native_language);
        self.recorder
            .mark_as_skipped(&card.term, translation, &card.category);

        self.state.live_deck.retain(|c| c.id != card.id);
        self.state.round_skipped_count += 1;
        self.emit(SessionEvent::Skipped {
            card_id: card.id.clone(),
            round_index: self.state.round_index,
        });
        self.state.skipped.push(card);

        if self.state.queue.is_empty() {
            self.advance_round();
        }
    }

    /// Percentage of the current round's cards that have graduated.
    pub fn progress(&self) -> f64 {
        if self.state.round_initial_size == 0 {
            return 0.0;
        }
        self.state.round_graduated_count as f64 / self.state.round_initial_size as f64 * 100.0
    }

    pub fn reset(&mut self) {
        self.state = SessionState::default();
        tracing::info!("session reset");
        self.emit(SessionEvent::Reset);
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn mode(&self) -> Option<&Mode> {
        self.state.mode.as_deref()
    }

    pub fn round_index(&self) -> usize {
        self.state.round_index
    }

    /// Cards in queue order.
    pub fn queue(&self) -> Vec<&Card> {
        self.state.queue.iter().map(|entry| entry.card.as_ref()).collect()
    }

    pub fn queue_entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.state.queue.iter()
    }

    /// Cards graduated in the current (or, once complete, the last played) round.
    pub fn graduated(&self) -> Vec<&Card> {
        self.state.graduated.iter().map(Arc::as_ref).collect()
    }

    pub fn skipped(&self) -> Vec<&Card> {
        self.state.skipped.iter().map(Arc::as_ref).collect()
    }

    pub fn live_deck(&self) -> Vec<&Card> {
        self.state.live_deck.iter().map(Arc::as_ref).collect()
    }

    pub fn original_deck(&self) -> Vec<&Card> {
        self.state.original_deck.iter().map(Arc::as_ref).collect()
    }

    pub fn round_initial_size(&self) -> usize {
        self.state.round_initial_size
    }

    pub fn round_graduated_count(&self) -> usize {
        self.state.round_graduated_count
    }

    pub fn round_skipped_count(&self) -> usize {
        self.state.round_skipped_count
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.state.phase,
            mode_id: self.state.mode.as_ref().map(|m| m.id().to_string()),
            round_index: self.state.round_index,
            round_id: self.current_round_config().map(|r| r.id().to_string()),
            current_card_id: self.current_card().map(|c| c.id.clone()),
            queue_len: self.state.queue.len(),
            graduated: self.state.graduated.len(),
            skipped: self.state.skipped.len(),
            progress: self.progress(),
        }
    }

    fn reinsert(&mut self, entry: QueueEntry, offset: usize) {
        let index = offset.min(self.state.queue.len());
        self.state.queue.insert(index, entry);
    }

    fn report_encounter(&self, card: &Card, native_language: &str, success: bool) {
        let translation = resolve_translation(card, native_language);
        self.recorder
            .record_encounter(&card.term, translation, &card.category, success);
    }

    /// Moves to the next round whose source set is non-empty, or completes the session.
    ///
    /// The scan only moves forward, so it terminates at the end of the Mode even when every
    /// remaining round resolves to nothing.
    fn advance_round(&mut self) {
        let Some(mode) = self.state.mode.clone() else {
            return;
        };

        let mut candidate = self.state.round_index + 1;
        while let Some(round) = mode.round(candidate) {
            let source = self.resolve_source(round.input_source());
            if !source.is_empty() {
                self.begin_round(candidate, round, source);
                return;
            }
            tracing::debug!(round = round.id(), "round has no cards, skipping");
            candidate += 1;
        }

        self.state.phase = SessionPhase::Complete;
        tracing::info!(
            mode = mode.id(),
            skipped = self.state.skipped.len(),
            "session complete"
        );
        self.emit(SessionEvent::GameCompleted {
            skipped: self.state.skipped.len(),
        });
    }

    fn resolve_source(&self, source: InputSource) -> Vec<Arc<Card>> {
        let skipped: HashSet<&str> = self.state.skipped.iter().map(|c| c.id.as_str()).collect();
        let graduated: HashSet<&str> = self.state.graduated.iter().map(|c| c.id.as_str()).collect();

        match source {
            InputSource::DeckStart => self
                .state
                .original_deck
                .iter()
                .filter(|c| !skipped.contains(c.id.as_str()))
                .cloned()
                .collect(),
            InputSource::PrevRoundFailures => self
                .state
                .original_deck
                .iter()
                .filter(|c| !graduated.contains(c.id.as_str()) && !skipped.contains(c.id.as_str()))
                .cloned()
                .collect(),
            InputSource::PrevRoundSuccesses => self
                .state
                .graduated
                .iter()
                .filter(|c| !skipped.contains(c.id.as_str()))
                .cloned()
                .collect(),
        }
    }

    fn begin_round(&mut self, index: usize, round: &Round, source: Vec<Arc<Card>>) {
        self.state.round_index = index;
        self.state.queue = source.into_iter().map(QueueEntry::new).collect();
        self.state.graduated.clear();
        self.state.round_initial_size = self.state.queue.len();
        self.state.round_graduated_count = 0;
        self.state.round_skipped_count = 0;

        tracing::debug!(
            round = round.id(),
            round_index = index,
            size = self.state.round_initial_size,
            "round started"
        );
        self.emit(SessionEvent::RoundStarted {
            round_index: index,
            round_id: round.id().to_string(),
            size: self.state.round_initial_size,
        });
    }

    fn emit(&self, event: SessionEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}

fn resolve_translation<'a>(card: &'a Card, native_language: &str) -> &'a str {
    match card.translation(native_language) {
        Some(translation) => translation,
        None => {
            tracing::warn!(
                card_id = %card.id,
                field = native_language,
                "card has no translation for the native language"
            );
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mastery::MasteryLedger;
    use crate::rounds::{CompletionCriteria, FailurePolicy, LayoutKind, RoundLayout, TERM_FIELD};
    use parking_lot::Mutex;

    fn card(term: &str) -> Card {
        Card::new(term, term, "test").with_translation("en", format!("{term}-en"))
    }

    fn deck(terms: &[&str]) -> Vec<Card> {
        terms.iter().map(|t| card(t)).collect()
    }

    fn round(id: &str, source: InputSource, required: u32, policy: FailurePolicy) -> Round {
        Round::new(
            id,
            id,
            RoundLayout::new(LayoutKind::Flashcard, TERM_FIELD, "en"),
            source,
            CompletionCriteria::successes(required),
            policy,
        )
        .unwrap()
    }

    fn mode(rounds: Vec<Round>) -> Arc<Mode> {
        Arc::new(Mode::new("test", "", "en", rounds).unwrap())
    }

    fn single_round(required: u32, offset: i64) -> Arc<Mode> {
        mode(vec![round(
            "r1",
            InputSource::DeckStart,
            required,
            FailurePolicy::requeue(offset),
        )])
    }

    fn scheduler() -> (SessionScheduler, Arc<MasteryLedger>) {
        let ledger = Arc::new(MasteryLedger::in_memory());
        (SessionScheduler::new(ledger.clone()), ledger)
    }

    fn ids(cards: Vec<&Card>) -> Vec<String> {
        cards.into_iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_start_game_initializes_state() {
        let (mut s, ledger) = scheduler();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.current_round_config().is_none());

        s.start_game(single_round(1, 3), deck(&["A", "B", "C"]));
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert_eq!(s.round_index(), 0);
        assert_eq!(ids(s.queue()), vec!["A", "B", "C"]);
        assert_eq!(s.current_card().unwrap().id, "A");
        assert_eq!(s.current_round_config().unwrap().id(), "r1");
        assert_eq!(s.round_initial_size(), 3);
        assert_eq!(s.progress(), 0.0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_concrete_scenario() {
        let (mut s, ledger) = scheduler();
        s.start_game(single_round(1, 3), deck(&["A", "B", "C"]));

        s.submit_answer(false);
        assert_eq!(ids(s.queue()), vec!["B", "C", "A"]);

        s.submit_answer(true);
        assert_eq!(ids(s.graduated()), vec!["B"]);
        assert_eq!(ids(s.queue()), vec!["C", "A"]);

        s.submit_answer(true);
        assert_eq!(ids(s.graduated()), vec!["B", "C"]);
        assert_eq!(ids(s.queue()), vec!["A"]);

        s.submit_answer(true);
        assert_eq!(ids(s.graduated()), vec!["B", "C", "A"]);
        assert!(s.queue().is_empty());
        assert_eq!(s.phase(), SessionPhase::Complete);
        assert!(s.current_card().is_none());

        let a = ledger.get_stats("A", "A-en").unwrap();
        assert_eq!(a.times_encountered, 2);
        assert_eq!(a.times_incorrect, 1);
        assert_eq!(a.times_correct, 1);
    }

    #[test]
    fn test_failure_offset_within_queue() {
        let (mut s, _) = scheduler();
        s.start_game(single_round(1, 2), deck(&["A", "B", "C", "D", "E"]));

        s.submit_answer(false);
        assert_eq!(ids(s.queue()), vec!["B", "C", "A", "D", "E"]);
    }

    #[test]
    fn test_success_reinserted_at_fixed_offset() {
        let terms: Vec<String> = (0..15).map(|i| format!("c{i}")).collect();
        let refs: Vec<&str> = terms.iter().map(String::as_str).collect();
        let (mut s, _) = scheduler();
        s.start_game(single_round(2, 3), deck(&refs));

        s.submit_answer(true);
        let queue = ids(s.queue());
        assert_eq!(queue.len(), 15);
        assert_eq!(queue[SUCCESS_REINSERT_OFFSET], "c0");
        assert_eq!(s.round_graduated_count(), 0);
        assert_eq!(s.queue_entries().nth(10).unwrap().success_count, 1);
    }

    #[test]
    fn test_success_reinsert_clamped_to_queue_end() {
        let (mut s, _) = scheduler();
        s.start_game(single_round(2, 3), deck(&["A", "B"]));

        s.submit_answer(true);
        assert_eq!(ids(s.queue()), vec!["B", "A"]);
    }

    #[test]
    fn test_backoff_grows_with_repeat_failures() {
        let terms: Vec<String> = (0..10).map(|i| format!("c{i}")).collect();
        let refs: Vec<&str> = terms.iter().map(String::as_str).collect();
        let m = mode(vec![round(
            "r1",
            InputSource::DeckStart,
            1,
            FailurePolicy::backoff(vec![1, 4]),
        )]);
        let (mut s, _) = scheduler();
        s.start_game(m, deck(&refs));

        s.submit_answer(false);
        assert_eq!(ids(s.queue())[1], "c0");

        s.submit_answer(true); // c1 graduates, c0 is at the head
        assert_eq!(s.current_card().unwrap().id, "c0");
        s.submit_answer(false);
        assert_eq!(ids(s.queue())[4], "c0");
        assert_eq!(s.queue_entries().nth(4).unwrap().failure_count, 2);
    }

    #[test]
    fn test_progress_within_round() {
        let (mut s, _) = scheduler();
        s.start_game(single_round(1, 3), deck(&["A", "B", "C", "D"]));

        let mut last = s.progress();
        assert_eq!(last, 0.0);
        s.submit_answer(false);
        assert_eq!(s.progress(), last);
        for _ in 0..3 {
            s.submit_answer(true);
            assert!(s.progress() >= last);
            last = s.progress();
        }
        assert_eq!(last, 75.0);
        s.submit_answer(true);
        assert_eq!(s.progress(), 100.0);
        assert_eq!(s.phase(), SessionPhase::Complete);
    }

    #[test]
    fn test_multi_round_completion() {
        let m = mode(vec![
            round("r1", InputSource::DeckStart, 1, FailurePolicy::requeue(3)),
            round("r2", InputSource::DeckStart, 1, FailurePolicy::requeue(3)),
        ]);
        let (mut s, _) = scheduler();
        s.start_game(m, deck(&["A", "B", "C"]));

        for _ in 0..3 {
            s.submit_answer(true);
        }
        assert_eq!(s.round_index(), 1);
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert_eq!(s.progress(), 0.0);
        assert!(s.graduated().is_empty());

        for _ in 0..3 {
            s.submit_answer(true);
        }
        assert_eq!(s.phase(), SessionPhase::Complete);
        assert_eq!(s.graduated().len(), 3);
    }

    #[test]
    fn test_skip_is_permanent_for_session() {
        let m = mode(vec![
            round("r1", InputSource::DeckStart, 1, FailurePolicy::requeue(3)),
            round("r2", InputSource::DeckStart, 1, FailurePolicy::requeue(3)),
            round("r3", InputSource::PrevRoundSuccesses, 1, FailurePolicy::requeue(3)),
        ]);
        let (mut s, ledger) = scheduler();
        s.start_game(m, deck(&["A", "B", "C"]));

        s.skip_current_card();
        assert_eq!(ids(s.skipped()), vec!["A"]);
        assert_eq!(ids(s.live_deck()), vec!["B", "C"]);
        assert_eq!(ids(s.original_deck()), vec!["A", "B", "C"]);
        assert!(ledger.get_stats("A", "A-en").unwrap().skipped);

        s.submit_answer(true);
        s.submit_answer(true);
        assert_eq!(s.round_index(), 1);
        assert_eq!(ids(s.queue()), vec!["B", "C"]);

        s.submit_answer(true);
        s.submit_answer(true);
        assert_eq!(s.round_index(), 2);
        assert_eq!(ids(s.queue()), vec!["B", "C"]);
    }

    #[test]
    fn test_round_accounting_invariant_with_skips() {
        let (mut s, _) = scheduler();
        s.start_game(single_round(1, 1), deck(&["A", "B", "C", "D"]));

        s.submit_answer(true);
        s.skip_current_card();
        s.submit_answer(false);
        assert_eq!(
            s.queue().len() + s.graduated().len() + s.round_skipped_count(),
            s.round_initial_size()
        );
    }

    #[test]
    fn test_failures_round_skipped_when_everything_graduated() {
        let m = mode(vec![
            round("r1", InputSource::DeckStart, 1, FailurePolicy::requeue(3)),
            round("retry", InputSource::PrevRoundFailures, 1, FailurePolicy::requeue(3)),
            round("r3", InputSource::PrevRoundSuccesses, 1, FailurePolicy::requeue(3)),
        ]);
        let (mut s, _) = scheduler();
        s.start_game(m, deck(&["A", "B"]));

        s.submit_answer(false);
        s.submit_answer(true);
        s.submit_answer(true);
        assert_eq!(s.round_index(), 2);
        assert_eq!(s.current_round_config().unwrap().id(), "r3");
        assert_eq!(ids(s.queue()), vec!["B", "A"]);
    }

    #[test]
    fn test_all_rounds_empty_terminates() {
        let m = mode(vec![
            round("r1", InputSource::DeckStart, 1, FailurePolicy::requeue(3)),
            round("r2", InputSource::PrevRoundFailures, 1, FailurePolicy::requeue(3)),
            round("r3", InputSource::PrevRoundSuccesses, 1, FailurePolicy::requeue(3)),
            round("r4", InputSource::DeckStart, 1, FailurePolicy::requeue(3)),
        ]);
        let (mut s, _) = scheduler();
        s.start_game(m, deck(&["A", "B"]));

        s.skip_current_card();
        s.skip_current_card();
        assert_eq!(s.phase(), SessionPhase::Complete);
        assert_eq!(s.skipped().len(), 2);
        assert!(s.current_round_config().is_none());
    }

    #[test]
    fn test_empty_deck_completes_immediately() {
        let (mut s, _) = scheduler();
        s.start_game(single_round(1, 3), Vec::new());
        assert_eq!(s.phase(), SessionPhase::Complete);
        assert_eq!(s.progress(), 0.0);
    }

    #[test]
    fn test_game_over_feeds_failures_round() {
        let m = mode(vec![
            round("blitz", InputSource::DeckStart, 1, FailurePolicy::game_over()),
            round("review", InputSource::PrevRoundFailures, 1, FailurePolicy::requeue(3)),
        ]);
        let (mut s, _) = scheduler();
        s.start_game(m, deck(&["A", "B", "C", "D"]));

        s.submit_answer(true);
        s.submit_answer(false);
        assert_eq!(s.round_index(), 1);
        assert_eq!(ids(s.queue()), vec!["B", "C", "D"]);

        for _ in 0..3 {
            s.submit_answer(true);
        }
        assert_eq!(s.phase(), SessionPhase::Complete);
    }

    #[test]
    fn test_no_current_card_is_noop() {
        let (mut s, ledger) = scheduler();
        s.submit_answer(true);
        s.skip_current_card();
        assert_eq!(s.phase(), SessionPhase::Idle);

        s.start_game(single_round(1, 3), deck(&["A"]));
        s.submit_answer(true);
        assert_eq!(s.phase(), SessionPhase::Complete);
        s.submit_answer(false);
        s.skip_current_card();
        assert_eq!(s.phase(), SessionPhase::Complete);
        assert_eq!(ledger.get_stats("A", "A-en").unwrap().times_encountered, 1);
    }

    #[test]
    fn test_reset_clears_session_but_not_ledger() {
        let (mut s, ledger) = scheduler();
        s.start_game(single_round(1, 3), deck(&["A", "B"]));
        s.submit_answer(true);
        s.reset();

        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.queue().is_empty());
        assert!(s.original_deck().is_empty());
        assert!(s.mode().is_none());
        assert_eq!(s.round_index(), 0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_missing_translation_keys_by_empty_string() {
        let (mut s, ledger) = scheduler();
        s.start_game(single_round(1, 3), vec![Card::new("x", "Wort", "c")]);
        s.submit_answer(true);
        assert!(ledger.get_stats("Wort", "").is_some());
    }

    #[test]
    fn test_listeners_receive_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let (mut s, _) = scheduler();
        s.subscribe(move |event| sink.lock().push(event.event_type()));

        s.start_game(single_round(1, 3), deck(&["A", "B"]));
        s.submit_answer(true);
        s.skip_current_card();

        assert_eq!(
            *seen.lock(),
            vec![
                "GAME_STARTED",
                "ROUND_STARTED",
                "ANSWERED",
                "CARD_GRADUATED",
                "SKIPPED",
                "GAME_COMPLETED"
            ]
        );
    }

    #[test]
    fn test_snapshot_reports_progress() {
        let (mut s, _) = scheduler();
        s.start_game(single_round(1, 3), deck(&["A", "B"]));
        s.submit_answer(true);

        let snap = s.snapshot();
        assert_eq!(snap.phase, SessionPhase::Playing);
        assert_eq!(snap.mode_id.as_deref(), Some("test"));
        assert_eq!(snap.round_id.as_deref(), Some("r1"));
        assert_eq!(snap.current_card_id.as_deref(), Some("B"));
        assert_eq!(snap.queue_len, 1);
        assert_eq!(snap.progress, 50.0);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["phase"], "playing");
        assert_eq!(json["queueLen"], 1);
    }
}
