//! Stage sequencer: an explicit finite-state machine over the ordered
//! stage list
//!
//! States: `Pending(i)` (stage i about to run), `Passed(i)` (stage i
//! just cleared), and the terminals `Failed` and `Complete`. The
//! transition logic is independent of how many stages exist or what
//! they contain; reordering the list never touches it.

use crate::stage::{Stage, StageContext, StageResult};
use escape_common::{EventBus, GameEvent};
use tracing::info;

/// Sequencer state
///
/// The stage index is monotonically non-decreasing and bounded by the
/// stage count; once a terminal state is reached no stage executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// Stage `i` is next to run
    Pending(usize),

    /// Stage `i` returned `Passed`; not yet advanced
    Passed(usize),

    /// A stage failed; terminal
    Failed,

    /// Every stage passed; terminal
    Complete,
}

impl SequencerState {
    pub fn initial() -> Self {
        SequencerState::Pending(0)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SequencerState::Failed | SequencerState::Complete)
    }

    /// Fold a stage outcome into the state
    ///
    /// Only `Pending(i)` reacts; terminal states absorb.
    pub fn on_result(self, result: StageResult) -> Self {
        match (self, result) {
            (SequencerState::Pending(i), StageResult::Passed) => SequencerState::Passed(i),
            (SequencerState::Pending(_), StageResult::Failed) => SequencerState::Failed,
            (state, _) => state,
        }
    }

    /// Move past a just-passed stage
    pub fn advance(self, stage_count: usize) -> Self {
        match self {
            SequencerState::Passed(i) if i + 1 < stage_count => SequencerState::Pending(i + 1),
            SequencerState::Passed(_) => SequencerState::Complete,
            state => state,
        }
    }
}

/// Drives the stage list to a terminal state, halting at the first
/// failure; stages after a failure never run
pub struct StageSequencer {
    stages: Vec<Stage>,
    state: SequencerState,
    bus: EventBus,
}

impl StageSequencer {
    pub fn new(stages: Vec<Stage>, bus: EventBus) -> Self {
        Self {
            stages,
            state: SequencerState::initial(),
            bus,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Run stages in order until a terminal state is reached
    pub async fn run(&mut self, ctx: &mut StageContext<'_>) -> SequencerState {
        loop {
            let index = match self.state {
                SequencerState::Pending(i) if i < self.stages.len() => i,
                SequencerState::Pending(_) => {
                    // An empty stage list is vacuously complete
                    self.state = SequencerState::Complete;
                    break;
                }
                _ => break,
            };
            let stage = &self.stages[index];

            info!(stage = stage.id(), index, "stage starting");
            self.bus.emit_lossy(GameEvent::StageStarted {
                stage_id: stage.id().to_string(),
                index,
                timestamp: chrono::Utc::now(),
            });

            let result = stage.run(ctx).await;
            match result {
                StageResult::Passed => self.bus.emit_lossy(GameEvent::StagePassed {
                    stage_id: stage.id().to_string(),
                    index,
                    timestamp: chrono::Utc::now(),
                }),
                StageResult::Failed => self.bus.emit_lossy(GameEvent::StageFailed {
                    stage_id: stage.id().to_string(),
                    index,
                    timestamp: chrono::Utc::now(),
                }),
            }

            self.state = self.state.on_result(result).advance(self.stages.len());
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_advances_to_next_pending() {
        let state = SequencerState::Pending(0)
            .on_result(StageResult::Passed)
            .advance(4);
        assert_eq!(state, SequencerState::Pending(1));
    }

    #[test]
    fn test_last_pass_completes() {
        let state = SequencerState::Pending(3)
            .on_result(StageResult::Passed)
            .advance(4);
        assert_eq!(state, SequencerState::Complete);
    }

    #[test]
    fn test_fail_is_terminal_from_any_pending() {
        for i in 0..4 {
            let state = SequencerState::Pending(i)
                .on_result(StageResult::Failed)
                .advance(4);
            assert_eq!(state, SequencerState::Failed);
        }
    }

    #[test]
    fn test_terminal_states_absorb() {
        for terminal in [SequencerState::Failed, SequencerState::Complete] {
            assert!(terminal.is_terminal());
            assert_eq!(terminal.on_result(StageResult::Passed), terminal);
            assert_eq!(terminal.on_result(StageResult::Failed), terminal);
            assert_eq!(terminal.advance(4), terminal);
        }
    }

    #[test]
    fn test_single_stage_list_completes() {
        let state = SequencerState::initial()
            .on_result(StageResult::Passed)
            .advance(1);
        assert_eq!(state, SequencerState::Complete);
    }

    #[tokio::test]
    async fn test_empty_stage_list_completes_without_running() {
        use crate::audio::{AudioBackend, AudioWorker};
        use crate::console::ScriptedConsole;
        use crate::quiz::QuestionBank;
        use crate::stage::Pacing;
        use escape_common::events::Difficulty;
        use escape_common::EventBus;
        use std::path::{Path, PathBuf};
        use std::sync::Arc;
        use tokio_util::sync::CancellationToken;

        struct SilentBackend;

        impl AudioBackend for SilentBackend {
            fn play(
                &self,
                _path: &Path,
                _cancel: &CancellationToken,
            ) -> escape_common::Result<()> {
                Ok(())
            }
        }

        let raw = r#"
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
            difficulty = "hard"
            prompt = "Q. Two."
            answer = "two"
        "#;
        let content: crate::content::GameContent =
            escape_common::config::parse_toml(raw).unwrap();
        let bank = QuestionBank::from_content(&content).unwrap();
        let bus = EventBus::new(16);
        let audio = AudioWorker::new(
            Arc::new(SilentBackend),
            PathBuf::from("assets"),
            bus.clone(),
        );
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let mut ctx = StageContext {
            audio: &audio,
            bank: &bank,
            console: &mut console,
            difficulty: Difficulty::Easy,
            pacing: Pacing::instant(),
        };

        let mut sequencer = StageSequencer::new(Vec::new(), bus);
        assert_eq!(sequencer.run(&mut ctx).await, SequencerState::Complete);
        assert!(console.transcript.is_empty());
    }

    #[test]
    fn test_index_is_monotonic_over_a_full_pass() {
        let mut state = SequencerState::initial();
        let mut last_index = 0;
        while let SequencerState::Pending(i) = state {
            assert!(i >= last_index);
            assert!(i < 4);
            last_index = i;
            state = state.on_result(StageResult::Passed).advance(4);
        }
        assert_eq!(state, SequencerState::Complete);
    }
}
