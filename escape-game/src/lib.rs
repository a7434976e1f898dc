//! # Escape Room Game Library (escape-game)
//!
//! Core stage-progression engine with concurrent, cancellable audio
//! playback.
//!
//! **Purpose:** Drive a linear sequence of themed quiz stages: each
//! stage narrates, draws a random question, plays a background cue
//! while the player answers, and either unlocks the next stage or ends
//! the run.
//!
//! **Architecture:** One foreground task owns console input and stage
//! progression; audio cues run on background tokio tasks with
//! cooperative cancellation, at most one cancellable cue alive at a
//! time.

pub mod audio;
pub mod auth;
pub mod console;
pub mod content;
pub mod quiz;
pub mod sequencer;
pub mod session;
pub mod stage;

pub use escape_common::{Error, Result};
