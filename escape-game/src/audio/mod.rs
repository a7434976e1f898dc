//! Audio worker: background cue playback with cooperative cancellation
//!
//! Two kinds of cue:
//! - one-shot: fire-and-forget narration effects; never stall the
//!   foreground, never tracked
//! - cancellable: question background music; exactly one may be alive,
//!   controlled through the returned `CueHandle`
//!
//! Ordering contract: `stop(handle)` happens-after the matching
//! `play_cancellable` and happens-before the next `play_cancellable`;
//! starting a new cancellable cue first stops (cancels and awaits) the
//! previous one, so cues never overlap across stages.

mod backend;

pub use backend::{AudioBackend, RodioBackend};

use escape_common::{EventBus, GameEvent};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

/// Handle to a running (or already finished) cancellable cue
#[derive(Debug, Clone)]
pub struct CueHandle {
    id: Uuid,
    token: CancellationToken,
}

impl CueHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the cue's cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

struct ActiveCue {
    id: Uuid,
    token: CancellationToken,
    task: JoinHandle<()>,
}

/// Plays audio assets on background tasks
///
/// Asset ids are opaque; they resolve to paths under the assets root.
/// A missing or unreadable asset is logged and skipped — the narrative
/// proceeds even when a sound file is absent.
pub struct AudioWorker {
    backend: Arc<dyn AudioBackend>,
    assets_root: PathBuf,

    /// The single cancellable-cue slot. Holding the lock across
    /// stop-then-start is what makes last-writer-wins atomic.
    active: Mutex<Option<ActiveCue>>,

    bus: EventBus,
}

impl AudioWorker {
    pub fn new(backend: Arc<dyn AudioBackend>, assets_root: PathBuf, bus: EventBus) -> Self {
        Self {
            backend,
            assets_root,
            active: Mutex::new(None),
            bus,
        }
    }

    fn resolve(&self, asset: &str) -> PathBuf {
        self.assets_root.join(asset)
    }

    /// Start a one-shot cue and return immediately
    ///
    /// The returned task handle may be ignored; it exists so tests can
    /// await natural completion.
    pub fn play_once(&self, asset: &str) -> JoinHandle<()> {
        let path = self.resolve(asset);
        let backend = Arc::clone(&self.backend);
        let asset = asset.to_string();

        tokio::spawn(async move {
            let token = CancellationToken::new();
            let outcome =
                tokio::task::spawn_blocking(move || backend.play(&path, &token)).await;
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(asset = %asset, "skipping cue: {}", e),
                Err(e) => warn!(asset = %asset, "cue task failed: {}", e),
            }
        })
    }

    /// Start a cancellable cue, stopping any previous one first
    ///
    /// Last-writer-wins: if a cancellable cue is still active it is
    /// cancelled and awaited before the new cue's handle becomes
    /// active. Cues are never queued.
    pub async fn play_cancellable(&self, asset: &str) -> CueHandle {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            debug!(cue_id = %previous.id, "superseding active cue");
            self.halt(previous).await;
        }

        let id = Uuid::new_v4();
        let token = CancellationToken::new();
        let path = self.resolve(asset);
        let backend = Arc::clone(&self.backend);
        let task_token = token.clone();
        let asset_name = asset.to_string();

        let task = tokio::spawn(async move {
            let outcome =
                tokio::task::spawn_blocking(move || backend.play(&path, &task_token)).await;
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(asset = %asset_name, "skipping cue: {}", e),
                Err(e) => warn!(asset = %asset_name, "cue task failed: {}", e),
            }
        });

        debug!(cue_id = %id, asset = %asset, "cancellable cue started");
        self.bus.emit_lossy(GameEvent::CueStarted {
            cue_id: id,
            asset: asset.to_string(),
            timestamp: chrono::Utc::now(),
        });

        *active = Some(ActiveCue {
            id,
            token: token.clone(),
            task,
        });
        CueHandle { id, token }
    }

    /// Stop a cancellable cue; idempotent
    ///
    /// If the handle still names the active cue, the cue is cancelled
    /// and its task awaited — after return no further audio from it is
    /// produced. A handle that was already stopped or superseded is a
    /// no-op.
    pub async fn stop(&self, handle: &CueHandle) {
        let mut active = self.active.lock().await;
        match active.take() {
            Some(cue) if cue.id == handle.id => {
                self.halt(cue).await;
            }
            other => {
                // Already stopped, finished, or superseded
                *active = other;
            }
        }
    }

    async fn halt(&self, cue: ActiveCue) {
        cue.token.cancel();
        if let Err(e) = cue.task.await {
            warn!(cue_id = %cue.id, "cue task join failed: {}", e);
        }
        debug!(cue_id = %cue.id, "cue stopped");
        self.bus.emit_lossy(GameEvent::CueStopped {
            cue_id: cue.id,
            timestamp: chrono::Utc::now(),
        });
    }
}
