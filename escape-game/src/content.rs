//! Game content: stages, narration scripts, and question tables
//!
//! Everything the run presents is data. The catalogue (themed rooms,
//! narration beats, question sets per difficulty, asset ids) is
//! deserialized from TOML; a default catalogue is embedded in the
//! binary so the game runs without an external content file.

use escape_common::events::Difficulty;
use escape_common::{config, Result};
use serde::Deserialize;
use std::path::Path;

/// One narration beat: a console line, an optional one-shot sound
/// effect, and how long to hold before the next beat.
#[derive(Debug, Clone, Deserialize)]
pub struct Beat {
    pub text: String,

    /// Asset id of a one-shot cue played when the beat prints
    #[serde(default)]
    pub sfx: Option<String>,

    /// Pause after the beat, in milliseconds (scaled by pacing)
    #[serde(default)]
    pub hold_ms: u64,
}

/// Narration scripts owned by the session, not by any stage
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SessionScript {
    /// Back-story beats before difficulty selection
    #[serde(default)]
    pub prologue: Vec<Beat>,

    /// Beats between difficulty selection and the first stage
    #[serde(default)]
    pub entry: Vec<Beat>,

    /// Beats played when every stage has been passed
    #[serde(default)]
    pub ending: Vec<Beat>,

    /// Beats played when a stage ends the run
    #[serde(default)]
    pub failure: Vec<Beat>,

    /// Ambient one-shot started as the run begins
    #[serde(default)]
    pub ambient: Option<String>,
}

/// One themed challenge room
#[derive(Debug, Clone, Deserialize)]
pub struct StageContent {
    /// Stable id, also the key into the question tables
    pub id: String,

    /// Console header, e.g. "Science Lab"
    pub title: String,

    /// Beats played on entering the room
    #[serde(default)]
    pub intro: Vec<Beat>,

    /// Background cue while the question is open, unless the drawn
    /// question carries its own audio
    #[serde(default)]
    pub music: Option<String>,

    /// Beats played after a correct answer
    #[serde(default)]
    pub success: Vec<Beat>,
}

/// The recorded correct answer, as written in content
///
/// An integer is a 1-based choice index (as displayed); a string is a
/// canonical free-text answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnswerSpec {
    Index(usize),
    Text(String),
}

/// One question table entry
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionEntry {
    /// Stage id this question belongs to
    pub stage: String,

    pub difficulty: Difficulty,

    pub prompt: String,

    /// Multiple-choice options; empty means free-text mode
    #[serde(default)]
    pub choices: Vec<String>,

    pub answer: AnswerSpec,

    /// Audio asset the question is about (e.g. the song to identify);
    /// overrides the stage's background cue when present
    #[serde(default)]
    pub audio: Option<String>,
}

/// Full game catalogue
#[derive(Debug, Clone, Deserialize)]
pub struct GameContent {
    #[serde(default)]
    pub session: SessionScript,

    pub stages: Vec<StageContent>,

    #[serde(default)]
    pub questions: Vec<QuestionEntry>,
}

/// Default catalogue: the four-room school scenario
const BUILTIN_CONTENT: &str = include_str!("../content/game.toml");

impl GameContent {
    /// Load a catalogue from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content: GameContent = config::load_toml(path)?;
        content.validate()?;
        Ok(content)
    }

    /// The embedded default catalogue
    pub fn builtin() -> Result<Self> {
        let content: GameContent = config::parse_toml(BUILTIN_CONTENT)?;
        content.validate()?;
        Ok(content)
    }

    /// Structural checks that don't depend on the question tables
    /// (those are validated by `QuestionBank` construction)
    fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(escape_common::Error::Config(
                "content defines no stages".to_string(),
            ));
        }
        for (i, stage) in self.stages.iter().enumerate() {
            if stage.id.trim().is_empty() {
                return Err(escape_common::Error::Config(format!(
                    "stage {} has an empty id",
                    i
                )));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for stage in &self.stages {
            if !seen.insert(stage.id.as_str()) {
                return Err(escape_common::Error::Config(format!(
                    "duplicate stage id: {}",
                    stage.id
                )));
            }
        }
        Ok(())
    }
}
