//! Shared fixtures for session-level tests: a silent instant audio
//! backend, a deterministic four-room catalogue (one question per
//! pair, so scripted answers are predictable), and session wiring.

use escape_common::{EventBus, GameEvent};
use escape_game::audio::{AudioBackend, AudioWorker};
use escape_game::auth::PlayerHandle;
use escape_game::console::ScriptedConsole;
use escape_game::content::GameContent;
use escape_game::quiz::QuestionBank;
use escape_game::session::GameSession;
use escape_game::stage::Pacing;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Completes every cue immediately; no device, no sleeping
pub struct InstantBackend;

impl AudioBackend for InstantBackend {
    fn play(&self, _path: &Path, _cancel: &CancellationToken) -> escape_common::Result<()> {
        Ok(())
    }
}

/// Four rooms in run order, exactly one question per (stage,
/// difficulty): easy answers are "1", "1", "꽃", "1".
pub const SCENARIO_CONTENT: &str = r#"
    [[stages]]
    id = "science"
    title = "Science Lab"
    music = "music/tense.mp3"

    [[stages]]
    id = "art"
    title = "Art Room"
    music = "music/tense.mp3"

    [[stages]]
    id = "music"
    title = "Music Room"

    [[stages]]
    id = "computer"
    title = "Computer Room"
    music = "music/tense.mp3"

    [[questions]]
    stage = "science"
    difficulty = "easy"
    prompt = "Q. Pick the first option."
    choices = ["right", "wrong"]
    answer = 1

    [[questions]]
    stage = "science"
    difficulty = "hard"
    prompt = "Q. Pick the second option."
    choices = ["wrong", "right"]
    answer = 2

    [[questions]]
    stage = "art"
    difficulty = "easy"
    prompt = "Q. Pick the first option."
    choices = ["right", "wrong"]
    answer = 1

    [[questions]]
    stage = "art"
    difficulty = "hard"
    prompt = "Q. Pick the second option."
    choices = ["wrong", "right"]
    answer = 2

    [[questions]]
    stage = "music"
    difficulty = "easy"
    prompt = "Q. Enter the title of the song you hear, with no spaces."
    answer = "꽃"
    audio = "music/kkot.mp3"

    [[questions]]
    stage = "music"
    difficulty = "hard"
    prompt = "Q. Enter the title of the song you hear, with no spaces."
    answer = "취중고백"
    audio = "music/drunken_confession.mp3"

    [[questions]]
    stage = "computer"
    difficulty = "easy"
    prompt = "Q. Pick the first option."
    choices = ["right", "wrong"]
    answer = 1

    [[questions]]
    stage = "computer"
    difficulty = "hard"
    prompt = "Q. Pick the second option."
    choices = ["wrong", "right"]
    answer = 2
"#;

pub fn scenario_content() -> GameContent {
    escape_common::config::parse_toml(SCENARIO_CONTENT).unwrap()
}

/// Build a session over the scenario catalogue with a scripted console
/// (first script entry is the difficulty menu selection)
pub fn scripted_session<I, S>(answers: I) -> (GameSession, broadcast::Receiver<GameEvent>)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let content = scenario_content();
    let bank = QuestionBank::from_content(&content).unwrap();
    let bus = EventBus::new(256);
    let rx = bus.subscribe();
    let audio = AudioWorker::new(
        Arc::new(InstantBackend),
        PathBuf::from("assets"),
        bus.clone(),
    );
    let console = ScriptedConsole::new(answers);
    let session = GameSession::new(
        content,
        bank,
        audio,
        Box::new(console),
        bus,
        Pacing::instant(),
        PlayerHandle {
            id: "kang".to_string(),
        },
    );
    (session, rx)
}

/// Drain everything the run broadcast, in emission order
pub fn drain(rx: &mut broadcast::Receiver<GameEvent>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
