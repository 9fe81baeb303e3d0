use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MASTERY_MAX: u8 = 5;
pub const MASTERED_THRESHOLD: u8 = 4;
pub const LEARNING_THRESHOLD: u8 = 2;

const SUCCESS_GAIN: u8 = 1;
// Failure regresses faster than success advances.
const FAILURE_PENALTY: u8 = 2;

/// Case-insensitive identity of a word: (term, native translation).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordKey {
    term: String,
    translation: String,
}

impl WordKey {
    pub fn new(term: &str, translation: &str) -> Self {
        Self {
            term: normalize(term),
            translation: normalize(translation),
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStat {
    pub term: String,
    pub translation: String,
    pub category: String,
    pub times_encountered: u32,
    pub times_correct: u32,
    pub times_incorrect: u32,
    pub last_encountered_at: Option<DateTime<Utc>>,
    pub mastery_level: u8,
    #[serde(default)]
    pub skipped: bool,
}

impl WordStat {
    pub fn new(term: &str, translation: &str, category: &str) -> Self {
        Self {
            term: term.to_string(),
            translation: translation.to_string(),
            category: category.to_string(),
            times_encountered: 0,
            times_correct: 0,
            times_incorrect: 0,
            last_encountered_at: None,
            mastery_level: 0,
            skipped: false,
        }
    }

    pub fn key(&self) -> WordKey {
        WordKey::new(&self.term, &self.translation)
    }

    pub fn record(&mut self, success: bool, at: DateTime<Utc>) {
        self.times_encountered = self.times_encountered.saturating_add(1);
        self.last_encountered_at = Some(at);

        if success {
            self.times_correct = self.times_correct.saturating_add(1);
            self.mastery_level = self
                .mastery_level
                .saturating_add(SUCCESS_GAIN)
                .min(MASTERY_MAX);
        } else {
            self.times_incorrect = self.times_incorrect.saturating_add(1);
            self.mastery_level = self.mastery_level.saturating_sub(FAILURE_PENALTY);
        }
    }

    /// `timesIncorrect / max(1, timesEncountered)`
    pub fn error_rate(&self) -> f64 {
        self.times_incorrect as f64 / self.times_encountered.max(1) as f64
    }

    pub fn is_mastered(&self) -> bool {
        self.mastery_level >= MASTERED_THRESHOLD
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryStats {
    pub total: usize,
    pub mastered: usize,
    pub learning: usize,
    pub needs_practice: usize,
    pub average_mastery: f64,
}

impl MasteryStats {
    pub fn from_stats<'a, I>(stats: I) -> Self
    where
        I: IntoIterator<Item = &'a WordStat>,
    {
        let mut summary = MasteryStats::default();
        let mut level_sum: u64 = 0;

        for stat in stats {
            summary.total += 1;
            level_sum += u64::from(stat.mastery_level);
            match stat.mastery_level {
                level if level >= MASTERED_THRESHOLD => summary.mastered += 1,
                level if level >= LEARNING_THRESHOLD => summary.learning += 1,
                _ => summary.needs_practice += 1,
            }
        }

        if summary.total > 0 {
            let mean = level_sum as f64 / summary.total as f64;
            summary.average_mastery = (mean * 100.0).round() / 100.0;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_key_is_case_insensitive() {
        assert_eq!(WordKey::new("Hund", "Dog"), WordKey::new("hund ", "dog"));
        assert_ne!(WordKey::new("Hund", "dog"), WordKey::new("Hund", "hound"));
    }

    #[test]
    fn test_failure_costs_more_than_success() {
        let now = Utc::now();
        let mut stat = WordStat::new("chat", "cat", "animals");
        stat.record(true, now);
        stat.record(true, now);
        stat.record(true, now);
        assert_eq!(stat.mastery_level, 3);

        stat.record(false, now);
        assert_eq!(stat.mastery_level, 1);
        stat.record(false, now);
        assert_eq!(stat.mastery_level, 0);

        assert_eq!(stat.times_encountered, 5);
        assert_eq!(stat.times_correct, 3);
        assert_eq!(stat.times_incorrect, 2);
        assert!((stat.error_rate() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_error_rate_of_unseen_word_is_zero() {
        assert_eq!(WordStat::new("a", "b", "c").error_rate(), 0.0);
    }

    #[test]
    fn test_summary_buckets_and_average() {
        let levels = [0u8, 1, 2, 3, 4, 5];
        let stats: Vec<WordStat> = levels
            .iter()
            .map(|level| {
                let mut stat = WordStat::new(&format!("t{level}"), "x", "c");
                stat.mastery_level = *level;
                stat
            })
            .collect();

        let summary = MasteryStats::from_stats(&stats);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.needs_practice, 2);
        assert_eq!(summary.learning, 2);
        assert_eq!(summary.mastered, 2);
        assert_eq!(summary.average_mastery, 2.5);
    }

    #[test]
    fn test_average_rounds_to_two_places() {
        let stats: Vec<WordStat> = [1u8, 1, 2]
            .iter()
            .enumerate()
            .map(|(i, level)| {
                let mut stat = WordStat::new(&format!("t{i}"), "x", "c");
                stat.mastery_level = *level;
                stat
            })
            .collect();

        assert_eq!(MasteryStats::from_stats(&stats).average_mastery, 1.33);
        assert_eq!(MasteryStats::from_stats(&Vec::new()).average_mastery, 0.0);
    }
}
