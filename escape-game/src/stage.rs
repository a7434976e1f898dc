//! Stage: one themed challenge, end to end
//!
//! Protocol, in order: narration beats, one question draw, background
//! cue start, one blocking answer, cue stop, validation. One wrong (or
//! unparsable) answer ends the run; there is no retry within a stage.

use crate::audio::AudioWorker;
use crate::console::Console;
use crate::content::{Beat, StageContent};
use crate::quiz::{AnswerKey, QuestionBank};
use escape_common::events::Difficulty;
use tracing::{info, warn};

/// Outcome of one stage attempt; produced exactly once, consumed
/// immediately by the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageResult {
    Passed,
    Failed,
}

/// Narration pacing: scales every beat's hold time
///
/// The binary runs at full pace; tests run instant so nothing sleeps.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    scale: f64,
}

impl Pacing {
    pub fn real() -> Self {
        Self { scale: 1.0 }
    }

    pub fn instant() -> Self {
        Self { scale: 0.0 }
    }

    async fn hold(&self, ms: u64) {
        let scaled = (ms as f64 * self.scale) as u64;
        if scaled > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(scaled)).await;
        }
    }
}

/// Everything a stage borrows from the session for one attempt
pub struct StageContext<'a> {
    pub audio: &'a AudioWorker,
    pub bank: &'a QuestionBank,
    pub console: &'a mut dyn Console,
    pub difficulty: Difficulty,
    pub pacing: Pacing,
}

/// Play a narration script: each beat fires its one-shot cue, prints,
/// then holds. Purely presentational, never gating.
pub async fn narrate(
    beats: &[Beat],
    audio: &AudioWorker,
    console: &mut dyn Console,
    pacing: Pacing,
) {
    for beat in beats {
        if let Some(sfx) = &beat.sfx {
            let _ = audio.play_once(sfx);
        }
        console.print(&beat.text);
        pacing.hold(beat.hold_ms).await;
    }
}

/// One parametrized challenge room, configured entirely by content
pub struct Stage {
    content: StageContent,
}

impl Stage {
    pub fn new(content: StageContent) -> Self {
        Self { content }
    }

    pub fn id(&self) -> &str {
        &self.content.id
    }

    /// Run the stage protocol once
    pub async fn run(&self, ctx: &mut StageContext<'_>) -> StageResult {
        let audio = ctx.audio;
        let bank = ctx.bank;

        ctx.console.print(&format!(
            "==================== {} ====================",
            self.content.title
        ));
        narrate(&self.content.intro, audio, ctx.console, ctx.pacing).await;

        let question = match bank.draw(&self.content.id, ctx.difficulty) {
            Ok(question) => question,
            Err(e) => {
                // Bank construction validates every pair, so this is
                // unreachable in a correctly started game; a failure
                // still resolves to an outcome, never an escape
                warn!(stage = %self.content.id, "question draw failed: {}", e);
                return StageResult::Failed;
            }
        };

        let cue_asset = question.audio.as_deref().or(self.content.music.as_deref());
        let cue = match cue_asset {
            Some(asset) => Some(audio.play_cancellable(asset).await),
            None => None,
        };

        ctx.console.print(&format!(
            "================= {} Question =================",
            self.content.title
        ));
        ctx.console.print(&question.prompt);
        if let AnswerKey::Choice { options, .. } = &question.answer {
            for (i, option) in options.iter().enumerate() {
                ctx.console.print(&format!("[{}] {}", i + 1, option));
            }
        }

        let submitted = ctx.console.prompt("Answer : ");

        // Stop before validation so the cue never bleeds into the next
        // stage (or the ending narration)
        if let Some(handle) = &cue {
            audio.stop(handle).await;
        }

        let submitted = match submitted {
            Ok(line) => line,
            Err(e) => {
                warn!(stage = %self.content.id, "input unavailable: {}", e);
                return StageResult::Failed;
            }
        };

        if question.check(&submitted) {
            info!(stage = %self.content.id, "stage passed");
            narrate(&self.content.success, audio, ctx.console, ctx.pacing).await;
            StageResult::Passed
        } else {
            info!(stage = %self.content.id, "stage failed");
            StageResult::Failed
        }
    }
}
