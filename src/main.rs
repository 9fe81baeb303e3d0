use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use danci_session::compose::{compose_deck, VocabularyEntry};
use danci_session::config::Config;
use danci_session::logging;
use danci_session::mastery::MasteryLedger;
use danci_session::rounds::{Mode, ModeError, ModePreset};
use danci_session::session::{SessionPhase, SessionScheduler};
use danci_session::storage::StorageError;

const SKIP_COMMAND: &str = "!skip";
const QUIT_COMMAND: &str = "!quit";

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("usage: danci-session <vocabulary.json>")]
    Usage,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error("terminal io error: {0}")]
    Io(#[from] io::Error),
}

fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config);

    if let Err(err) = run(&config) {
        tracing::error!(error = %err, "session aborted");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), AppError> {
    let vocabulary_path = std::env::args().nth(1).ok_or(AppError::Usage)?;
    let vocabulary = VocabularyEntry::load_json(&vocabulary_path)?;

    let ledger = Arc::new(MasteryLedger::new(config.open_store()?));
    let mode = Arc::new(resolve_mode(config)?);

    let deck = compose_deck(
        &vocabulary,
        &ledger,
        config.deck_source,
        mode.native_language(),
        config.session_size,
    );
    if deck.is_empty() {
        println!("No {} words available for a session.", config.deck_source);
        return Ok(());
    }

    let mut scheduler = SessionScheduler::new(ledger.clone());
    scheduler.subscribe(|event| tracing::debug!(event = event.event_type(), "session event"));
    scheduler.start_game(mode, deck);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut last_round = None;

    while scheduler.phase() == SessionPhase::Playing {
        let (Some(card), Some(round)) = (scheduler.current_card(), scheduler.current_round_config())
        else {
            break;
        };

        if last_round != Some(scheduler.round_index()) {
            last_round = Some(scheduler.round_index());
            println!("\n== {} ==", round.name());
        }

        let prompt = card.field(&round.layout().prompt_field).unwrap_or(card.term.as_str());
        let expected = card
            .field(&round.layout().answer_field)
            .unwrap_or_default()
            .to_string();
        print!("[{:>3.0}%] {prompt} > ", scheduler.progress());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            scheduler.reset();
            break;
        };
        let answer = line?;

        match answer.trim() {
            QUIT_COMMAND => {
                scheduler.reset();
                break;
            }
            SKIP_COMMAND => scheduler.skip_current_card(),
            given => {
                let correct = answers_match(given, &expected);
                if !correct {
                    println!("  -> {expected}");
                }
                scheduler.submit_answer(correct);
            }
        }
    }

    if scheduler.phase() == SessionPhase::Complete {
        println!("\nSession complete. Skipped: {}", scheduler.skipped().len());
    }
    print_summary(&ledger);
    Ok(())
}

fn resolve_mode(config: &Config) -> Result<Mode, ModeError> {
    if Path::new(&config.mode).is_file() {
        return Mode::from_path(&config.mode);
    }
    config
        .mode
        .parse::<ModePreset>()?
        .build(&config.native_language)
}

fn answers_match(given: &str, expected: &str) -> bool {
    !expected.is_empty() && given.trim().to_lowercase() == expected.trim().to_lowercase()
}

fn print_summary(ledger: &MasteryLedger) {
    let stats = ledger.get_mastery_stats();
    println!(
        "Words: {}  mastered: {}  learning: {}  needs practice: {}  average: {:.2}",
        stats.total, stats.mastered, stats.learning, stats.needs_practice, stats.average_mastery
    );

    let weakest: Vec<String> = ledger
        .get_words_needing_practice(5)
        .into_iter()
        .map(|stat| stat.term)
        .collect();
    if !weakest.is_empty() {
        println!("Practice next: {}", weakest.join(", "));
    }
}
