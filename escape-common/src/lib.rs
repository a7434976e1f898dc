//! # Escape Room Common Library
//!
//! Shared code for the escape-room game crates:
//! - Error type used across the workspace
//! - Event types (GameEvent enum) and the EventBus
//! - Configuration resolution and content-file loading

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
pub use events::{EventBus, GameEvent};
