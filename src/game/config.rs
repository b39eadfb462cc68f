use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

/// Largest accepted grid side; keeps cell math and screen coordinates within range
pub const MAX_GRID_SIZE: usize = u8::MAX as usize;

/// Configuration for the game
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// grid_size = 30
/// tick_interval_ms = 100
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid, in cells
    pub grid_size: usize,
    /// Length of the snake after a reset
    pub initial_snake_length: usize,
    /// Period of the game timer
    pub tick_interval_ms: u64,
    /// Points awarded per fruit eaten
    pub food_score: u32,
    /// Fixed RNG seed for reproducible food placement
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_snake_length: 3,
            tick_interval_ms: 150,
            food_score: 10,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small seeded grid for testing
    pub fn small() -> Self {
        Self {
            grid_size: 10,
            seed: Some(7),
            ..Default::default()
        }
    }

    pub fn from_toml<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Total number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.grid_size == 0 {
            return Err(ConfigError::Invalid("grid_size must be positive".into()));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::Invalid(format!(
                "grid_size {} exceeds the maximum of {}",
                self.grid_size, MAX_GRID_SIZE
            )));
        }
        if self.initial_snake_length == 0 {
            return Err(ConfigError::Invalid(
                "initial_snake_length must be positive".into(),
            ));
        }
        if self.initial_snake_length > self.grid_size {
            return Err(ConfigError::Invalid(format!(
                "initial_snake_length {} does not fit on a row of {} cells",
                self.initial_snake_length, self.grid_size
            )));
        }
        if self.initial_snake_length >= self.cell_count() {
            return Err(ConfigError::Invalid(
                "grid has no free cell left for food".into(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}
