//! Audio backend seam
//!
//! Actual sample output sits behind `AudioBackend` so the worker's
//! contract (single active cancellable cue, idempotent stop) can be
//! tested without a sound device. The real backend decodes and plays
//! through rodio; cancellation is cooperative via the token.

use escape_common::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Playback of a single resolved asset
pub trait AudioBackend: Send + Sync + 'static {
    /// Play the asset to its natural end, or until `cancel` fires.
    ///
    /// Blocking; the worker always invokes it off the async runtime.
    /// A missing or undecodable asset is `Error::Asset`.
    fn play(&self, path: &Path, cancel: &CancellationToken) -> Result<()>;
}

/// rodio-backed output to the default device
pub struct RodioBackend {
    /// How often the cancellation token is observed mid-cue
    poll: Duration,
}

impl RodioBackend {
    pub fn new() -> Self {
        Self {
            poll: Duration::from_millis(50),
        }
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for RodioBackend {
    fn play(&self, path: &Path, cancel: &CancellationToken) -> Result<()> {
        let file = File::open(path).map_err(|_| Error::Asset {
            asset: path.display().to_string(),
        })?;
        let source = rodio::Decoder::new(BufReader::new(file)).map_err(|_| Error::Asset {
            asset: path.display().to_string(),
        })?;

        // Stream and sink live on this blocking thread for the cue's
        // whole lifetime; both are torn down when it returns.
        let (_stream, handle) = rodio::OutputStream::try_default()
            .map_err(|e| Error::Audio(e.to_string()))?;
        let sink = rodio::Sink::try_new(&handle).map_err(|e| Error::Audio(e.to_string()))?;
        sink.append(source);

        while !sink.empty() {
            if cancel.is_cancelled() {
                sink.stop();
                break;
            }
            std::thread::sleep(self.poll);
        }

        Ok(())
    }
}
