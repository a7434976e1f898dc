//! Escape room game - main entry point
//!
//! Login menu, content loading and validation, then one session run.
//! The process exits 0 for both outcomes; only the narration differs.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use escape_common::{config, EventBus};
use escape_game::audio::{AudioWorker, RodioBackend};
use escape_game::auth::{Authenticator, MemoryAuthenticator, PlayerHandle};
use escape_game::console::{Console, StdConsole};
use escape_game::content::GameContent;
use escape_game::quiz::QuestionBank;
use escape_game::session::{GameSession, SessionOutcome};
use escape_game::stage::Pacing;

/// Command-line arguments for escape-game
#[derive(Parser, Debug)]
#[command(name = "escape-game")]
#[command(about = "Console escape-room quiz game")]
#[command(version)]
struct Args {
    /// Root folder containing audio assets
    #[arg(short = 'r', long, env = "ESCAPE_ASSETS_ROOT")]
    assets_root: Option<PathBuf>,

    /// Content catalogue file (defaults to the embedded catalogue)
    #[arg(short, long, env = "ESCAPE_CONTENT")]
    content: Option<PathBuf>,

    /// Skip narration pauses
    #[arg(long)]
    fast: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "escape_game=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let content = match &args.content {
        Some(path) => GameContent::load(path),
        None => GameContent::builtin(),
    }
    .context("Failed to load game content")?;

    // Question tables are validated before any stage can run; a hole
    // in the catalogue aborts here
    let bank = QuestionBank::from_content(&content)
        .context("Question catalogue is incomplete")?;

    let assets_root =
        config::resolve_assets_root(args.assets_root.as_deref(), "ESCAPE_ASSETS_ROOT");
    info!("Assets root: {}", assets_root.display());

    let bus = EventBus::new(256);
    let audio = AudioWorker::new(Arc::new(RodioBackend::new()), assets_root, bus.clone());

    let mut console = StdConsole;
    let mut auth = MemoryAuthenticator::new();
    let player = match login_menu(&mut console, &mut auth, &audio)? {
        Some(player) => player,
        None => return Ok(()),
    };

    let pacing = if args.fast {
        Pacing::instant()
    } else {
        Pacing::real()
    };

    let mut session = GameSession::new(
        content,
        bank,
        audio,
        Box::new(console),
        bus,
        pacing,
        player,
    );

    match session.run().await {
        SessionOutcome::Success => info!("Run finished: success"),
        SessionOutcome::Failure => info!("Run finished: failure"),
    }

    Ok(())
}

/// Register/login menu; retries until login succeeds or the player
/// quits. Authentication retry lives here, outside the game core.
fn login_menu(
    console: &mut StdConsole,
    auth: &mut MemoryAuthenticator,
    audio: &AudioWorker,
) -> Result<Option<PlayerHandle>> {
    loop {
        let choice = console.prompt("[1] Register [2] Login [3] Quit >> ")?;
        match choice.trim() {
            "1" => {
                let id = console.prompt("ID : ")?;
                let pw = console.prompt("PW : ")?;
                let name = console.prompt("NAME : ")?;
                if auth.register(id.trim(), pw.trim(), name.trim()) {
                    console.print("Registered! Now log in.");
                } else {
                    console.print("That id is already taken.");
                }
            }
            "2" => {
                let id = console.prompt("ID : ")?;
                let pw = console.prompt("PW : ")?;
                if auth.login(id.trim(), pw.trim()) {
                    let _ = audio.play_once("sfx/game_button.mp3");
                    console.print("Login successful!");
                    return Ok(Some(PlayerHandle {
                        id: id.trim().to_string(),
                    }));
                }
                console.print("Login failed.. try again!\n");
            }
            "3" => return Ok(None),
            _ => console.print("Invalid choice.. try again!"),
        }
    }
}
