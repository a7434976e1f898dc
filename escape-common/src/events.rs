//! Event types for the game event system
//!
//! Provides shared event definitions and the EventBus used by the game
//! crates. Events are broadcast as progression happens; tests subscribe
//! to assert transition order and call counts without poking at
//! component internals.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Session-wide difficulty setting
///
/// Selected once at the start of a run and fixed for the lifetime of
/// the session; every stage reads it when drawing questions and
/// choosing assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Game event types
///
/// Events are broadcast via EventBus. Emission is lossy: a run with no
/// subscribers proceeds normally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A session run began (after login, difficulty locked in)
    SessionStarted {
        difficulty: Difficulty,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A stage attempt began
    StageStarted {
        stage_id: String,
        /// Zero-based position in the configured stage list
        index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A stage attempt ended with a correct answer
    StagePassed {
        stage_id: String,
        index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A stage attempt ended with a wrong (or unparsable) answer
    StageFailed {
        stage_id: String,
        index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Every stage passed; the run is over and won
    SessionCompleted {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A stage failed; the run is over and lost
    SessionFailed {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A cancellable cue started playing
    CueStarted {
        cue_id: Uuid,
        asset: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A cancellable cue was stopped (or finished and then stopped)
    CueStopped {
        cue_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl GameEvent {
    /// Event type name, for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::SessionStarted { .. } => "SessionStarted",
            GameEvent::StageStarted { .. } => "StageStarted",
            GameEvent::StagePassed { .. } => "StagePassed",
            GameEvent::StageFailed { .. } => "StageFailed",
            GameEvent::SessionCompleted { .. } => "SessionCompleted",
            GameEvent::SessionFailed { .. } => "SessionFailed",
            GameEvent::CueStarted { .. } => "CueStarted",
            GameEvent::CueStopped { .. } => "CueStopped",
        }
    }
}

/// Central event distribution bus
///
/// Wraps tokio::broadcast, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GameEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: GameEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
