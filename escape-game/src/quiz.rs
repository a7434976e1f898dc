//! Question records and the per-(stage, difficulty) question bank

use crate::content::{AnswerSpec, GameContent, QuestionEntry};
use escape_common::events::Difficulty;
use escape_common::{Error, Result};
use rand::seq::SliceRandom;
use std::collections::HashMap;
use tracing::debug;

/// The correct answer for a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    /// Multiple choice: options as displayed, `correct` is 1-based
    Choice { options: Vec<String>, correct: usize },

    /// Free text: canonical answer, stored whitespace-free
    FreeText { answer: String },
}

/// One immutable quiz question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub prompt: String,
    pub answer: AnswerKey,

    /// Audio asset the question is about, if any
    pub audio: Option<String>,
}

/// Strip all whitespace from a submitted or canonical answer
///
/// Free-text answers are recorded space-free and the prompt instructs
/// the player to type them the same way; normalization makes `" 꽃 "`
/// equal to `"꽃"`. Exact match after stripping, no fuzzy credit.
pub fn normalize_answer(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

impl QuestionRecord {
    /// Validate a submitted answer line
    ///
    /// Unparsable input where a choice index is expected is simply
    /// wrong: the run offers one shot per stage, no re-prompt.
    pub fn check(&self, submitted: &str) -> bool {
        match &self.answer {
            AnswerKey::Choice { correct, .. } => {
                match submitted.trim().parse::<usize>() {
                    Ok(index) => index == *correct,
                    Err(_) => false,
                }
            }
            AnswerKey::FreeText { answer } => normalize_answer(submitted) == *answer,
        }
    }
}

/// Fixed question tables, one list per (stage, difficulty) pair
///
/// Construction validates that every configured stage has at least one
/// question for every difficulty; a hole is a configuration error
/// raised at startup, before any stage runs.
pub struct QuestionBank {
    records: HashMap<(String, Difficulty), Vec<QuestionRecord>>,
}

impl QuestionBank {
    /// Build and validate the bank from loaded content
    pub fn from_content(content: &GameContent) -> Result<Self> {
        let mut records: HashMap<(String, Difficulty), Vec<QuestionRecord>> = HashMap::new();

        for entry in &content.questions {
            let record = Self::build_record(entry)?;
            records
                .entry((entry.stage.clone(), entry.difficulty))
                .or_default()
                .push(record);
        }

        for stage in &content.stages {
            for difficulty in [Difficulty::Easy, Difficulty::Hard] {
                let key = (stage.id.clone(), difficulty);
                if records.get(&key).map_or(true, |list| list.is_empty()) {
                    return Err(Error::Config(format!(
                        "no {} questions registered for stage '{}'",
                        difficulty, stage.id
                    )));
                }
            }
        }

        Ok(Self { records })
    }

    fn build_record(entry: &QuestionEntry) -> Result<QuestionRecord> {
        let answer = match (&entry.answer, entry.choices.is_empty()) {
            (AnswerSpec::Index(correct), false) => {
                if *correct == 0 || *correct > entry.choices.len() {
                    return Err(Error::Config(format!(
                        "stage '{}': answer index {} out of range 1..={}",
                        entry.stage,
                        correct,
                        entry.choices.len()
                    )));
                }
                AnswerKey::Choice {
                    options: entry.choices.clone(),
                    correct: *correct,
                }
            }
            (AnswerSpec::Text(answer), true) => {
                let canonical = normalize_answer(answer);
                if canonical.is_empty() {
                    return Err(Error::Config(format!(
                        "stage '{}': empty free-text answer",
                        entry.stage
                    )));
                }
                AnswerKey::FreeText { answer: canonical }
            }
            (AnswerSpec::Index(_), true) => {
                return Err(Error::Config(format!(
                    "stage '{}': index answer without choices",
                    entry.stage
                )))
            }
            (AnswerSpec::Text(_), false) => {
                return Err(Error::Config(format!(
                    "stage '{}': text answer on a multiple-choice question",
                    entry.stage
                )))
            }
        };

        Ok(QuestionRecord {
            prompt: entry.prompt.clone(),
            answer,
            audio: entry.audio.clone(),
        })
    }

    /// Draw one question uniformly at random for a stage attempt
    ///
    /// Sampling is with replacement across calls; each call is
    /// independent.
    pub fn draw(&self, stage_id: &str, difficulty: Difficulty) -> Result<&QuestionRecord> {
        let record = self
            .records
            .get(&(stage_id.to_string(), difficulty))
            .and_then(|list| list.choose(&mut rand::thread_rng()))
            .ok_or_else(|| {
                Error::Config(format!(
                    "no {} questions registered for stage '{}'",
                    difficulty, stage_id
                ))
            })?;
        debug!(stage = stage_id, %difficulty, "drew question: {}", record.prompt);
        Ok(record)
    }

    /// Registered questions for one pair, for membership assertions
    pub fn questions_for(&self, stage_id: &str, difficulty: Difficulty) -> &[QuestionRecord] {
        self.records
            .get(&(stage_id.to_string(), difficulty))
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_free_text(answer: &str) -> QuestionRecord {
        QuestionRecord {
            prompt: "Q. Name the song.".to_string(),
            answer: AnswerKey::FreeText {
                answer: normalize_answer(answer),
            },
            audio: None,
        }
    }

    fn record_choice(correct: usize) -> QuestionRecord {
        QuestionRecord {
            prompt: "Q. Pick one.".to_string(),
            answer: AnswerKey::Choice {
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct,
            },
            audio: None,
        }
    }

    #[test]
    fn test_choice_answer_matches_correct_index() {
        let record = record_choice(3);
        assert!(record.check("3"));
        assert!(record.check(" 3 "));
        assert!(!record.check("1"));
    }

    #[test]
    fn test_unparsable_choice_input_is_wrong_not_error() {
        let record = record_choice(2);
        assert!(!record.check("two"));
        assert!(!record.check(""));
        assert!(!record.check("2.0"));
    }

    #[test]
    fn test_free_text_normalizes_surrounding_whitespace() {
        // Surrounding whitespace in the submitted line must not count
        // against the canonical space-free form
        let record = record_free_text("꽃");
        assert!(record.check(" 꽃 "));
        assert!(record.check("꽃"));
        assert!(!record.check("풀"));
    }

    #[test]
    fn test_free_text_requires_exact_match_after_stripping() {
        let record = record_free_text("사랑은늘도망가");
        assert!(record.check("사랑은 늘 도망가"));
        assert!(!record.check("사랑은늘도망"));
    }

    fn bank_from(raw: &str) -> Result<QuestionBank> {
        let content: GameContent = escape_common::config::parse_toml(raw).unwrap();
        QuestionBank::from_content(&content)
    }

    const SINGLE_STAGE: &str = r#"
        [[stages]]
        id = "music"
        title = "Music Room"

        [[questions]]
        stage = "music"
        difficulty = "easy"
        prompt = "Q. One."
        answer = "one"

        [[questions]]
        stage = "music"
        difficulty = "easy"
        prompt = "Q. Two."
        answer = "two"

        [[questions]]
        stage = "music"
        difficulty = "hard"
        prompt = "Q. Three."
        answer = "three"
    "#;

    #[test]
    fn test_draw_returns_member_of_configured_list() {
        let bank = bank_from(SINGLE_STAGE).unwrap();
        let configured = bank.questions_for("music", Difficulty::Easy);
        for _ in 0..50 {
            let drawn = bank.draw("music", Difficulty::Easy).unwrap();
            assert!(configured.contains(drawn));
        }
    }

    #[test]
    fn test_every_record_is_drawn_eventually() {
        let bank = bank_from(SINGLE_STAGE).unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let drawn = bank.draw("music", Difficulty::Easy).unwrap();
            seen.insert(drawn.prompt.clone());
        }
        // Two configured easy records; both must surface
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_missing_pair_is_config_error_at_construction() {
        // A stage with zero registered records for one difficulty
        // fails construction, before any stage could run
        let raw = r#"
            [[stages]]
            id = "music"
            title = "Music Room"

            [[questions]]
            stage = "music"
            difficulty = "easy"
            prompt = "Q. One."
            answer = "one"
        "#;
        match bank_from(raw) {
            Err(Error::Config(msg)) => assert!(msg.contains("music")),
            other => panic!("expected Config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_out_of_range_answer_index_rejected() {
        let raw = r#"
            [[stages]]
            id = "art"
            title = "Art Room"

            [[questions]]
            stage = "art"
            difficulty = "easy"
            prompt = "Q. Pick."
            choices = ["a", "b"]
            answer = 5

            [[questions]]
            stage = "art"
            difficulty = "hard"
            prompt = "Q. Pick."
            choices = ["a", "b"]
            answer = 1
        "#;
        assert!(matches!(bank_from(raw), Err(Error::Config(_))));
    }

    #[test]
    fn test_draw_unknown_stage_is_config_error() {
        let bank = bank_from(SINGLE_STAGE).unwrap();
        assert!(matches!(
            bank.draw("gym", Difficulty::Easy),
            Err(Error::Config(_))
        ));
    }
}
