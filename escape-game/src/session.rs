//! Game session: one full run from a logged-in player to an outcome
//!
//! Orchestrates prologue narration, difficulty selection, the stage
//! sequencer, and the ending or failure narration. Every failure mode
//! inside the run resolves to `Success` or `Failure`; nothing
//! propagates past the session, and a new run always starts at stage
//! zero.

use crate::audio::AudioWorker;
use crate::auth::PlayerHandle;
use crate::console::Console;
use crate::content::{GameContent, SessionScript};
use crate::quiz::QuestionBank;
use crate::sequencer::{SequencerState, StageSequencer};
use crate::stage::{narrate, Pacing, Stage, StageContext};
use escape_common::events::Difficulty;
use escape_common::{EventBus, GameEvent};
use tracing::{info, warn};

/// Session-level outcome; the process exit code does not distinguish
/// the two
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Success,
    Failure,
}

/// Snapshot of a finished (or failed) run
#[derive(Debug, Clone)]
pub struct SessionState {
    pub player: PlayerHandle,
    pub difficulty: Difficulty,
    pub progress: SequencerState,
}

/// One single-player run
pub struct GameSession {
    script: SessionScript,
    sequencer: StageSequencer,
    bank: QuestionBank,
    audio: AudioWorker,
    console: Box<dyn Console>,
    bus: EventBus,
    pacing: Pacing,
    player: PlayerHandle,
    state: Option<SessionState>,
}

impl GameSession {
    pub fn new(
        content: GameContent,
        bank: QuestionBank,
        audio: AudioWorker,
        console: Box<dyn Console>,
        bus: EventBus,
        pacing: Pacing,
        player: PlayerHandle,
    ) -> Self {
        let stages: Vec<Stage> = content.stages.into_iter().map(Stage::new).collect();
        let sequencer = StageSequencer::new(stages, bus.clone());
        Self {
            script: content.session,
            sequencer,
            bank,
            audio,
            console,
            bus,
            pacing,
            player,
            state: None,
        }
    }

    /// State of the last run, if one happened
    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    /// Run the session to its outcome
    pub async fn run(&mut self) -> SessionOutcome {
        if let Some(ambient) = &self.script.ambient {
            let _ = self.audio.play_once(ambient);
        }
        narrate(
            &self.script.prologue,
            &self.audio,
            self.console.as_mut(),
            self.pacing,
        )
        .await;

        let difficulty = match self.select_difficulty() {
            Some(difficulty) => difficulty,
            None => {
                warn!("console input ended before difficulty selection");
                self.bus.emit_lossy(GameEvent::SessionFailed {
                    timestamp: chrono::Utc::now(),
                });
                return SessionOutcome::Failure;
            }
        };

        info!(player = %self.player.id, %difficulty, "session starting");
        self.bus.emit_lossy(GameEvent::SessionStarted {
            difficulty,
            timestamp: chrono::Utc::now(),
        });
        self.console
            .print(&format!("{} difficulty selected.", difficulty));

        narrate(
            &self.script.entry,
            &self.audio,
            self.console.as_mut(),
            self.pacing,
        )
        .await;

        let mut ctx = StageContext {
            audio: &self.audio,
            bank: &self.bank,
            console: self.console.as_mut(),
            difficulty,
            pacing: self.pacing,
        };
        let progress = self.sequencer.run(&mut ctx).await;

        self.state = Some(SessionState {
            player: self.player.clone(),
            difficulty,
            progress,
        });

        match progress {
            SequencerState::Complete => {
                narrate(
                    &self.script.ending,
                    &self.audio,
                    self.console.as_mut(),
                    self.pacing,
                )
                .await;
                self.console
                    .print("\n\n\nCongratulations!! You cleared the game!!!");
                info!("session complete: success");
                self.bus.emit_lossy(GameEvent::SessionCompleted {
                    timestamp: chrono::Utc::now(),
                });
                SessionOutcome::Success
            }
            _ => {
                narrate(
                    &self.script.failure,
                    &self.audio,
                    self.console.as_mut(),
                    self.pacing,
                )
                .await;
                self.console.print("\nGAME OVER");
                info!("session complete: failure");
                self.bus.emit_lossy(GameEvent::SessionFailed {
                    timestamp: chrono::Utc::now(),
                });
                SessionOutcome::Failure
            }
        }
    }

    /// Menu-style difficulty selection; invalid selections re-prompt.
    /// `None` only when the console itself runs dry.
    fn select_difficulty(&mut self) -> Option<Difficulty> {
        loop {
            let choice = match self
                .console
                .prompt("Select difficulty : [1] Easy [2] Hard >> ")
            {
                Ok(line) => line,
                Err(_) => return None,
            };
            match choice.trim() {
                "1" => return Some(Difficulty::Easy),
                "2" => return Some(Difficulty::Hard),
                _ => self.console.print("Invalid choice.. try again!"),
            }
        }
    }
}
