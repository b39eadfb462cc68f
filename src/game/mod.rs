//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine owns the state; front-ends drive it through `tick`, `set_direction`,
//! `toggle_pause` and `reset`, and read it back through snapshots.

pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, TickResult};
pub use error::{ConfigError, ConfigResult};
pub use state::{EndReason, GameState, GameStatus, Position, Snake, Snapshot};
