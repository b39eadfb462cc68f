//! Snake & Fruits - a terminal Snake game
//!
//! This library provides:
//! - Core game logic (game module): engine, state, configuration
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive session that ties them together (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
