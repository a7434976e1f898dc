//! Common error types for the escape-room game

use thiserror::Error;

/// Common result type for game operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the game crates
///
/// Unparsable user answers are deliberately not represented here: a
/// malformed answer is an ordinary wrong answer (`StageResult::Failed`),
/// never an error that propagates.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Content loading or validation error. Fatal at startup; raised
    /// before any stage runs.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audio asset missing or unreadable. Recovered locally by the
    /// audio worker: logged, playback skipped, narrative continues.
    #[error("Asset unavailable: {asset}")]
    Asset { asset: String },

    /// Audio backend failure while a cue was playing
    #[error("Audio error: {0}")]
    Audio(String),
}
