//! Match configuration

use crate::game::logger::VerbosityLevel;
use crate::{JudgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rules constants and limits for a match
///
/// Missing fields in a JSON file take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_life: i32,
    pub opening_hand_size: usize,
    pub max_hand_size: usize,
    /// The match is stopped without a winner after this many turns
    pub max_turns: u32,
    /// Sides of the die rolled to pick the starting player
    pub dice_sides: u32,
    pub verbosity: VerbosityLevel,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            starting_life: 20,
            opening_hand_size: 7,
            max_hand_size: 7,
            max_turns: 100,
            dice_sides: 20,
            verbosity: VerbosityLevel::default(),
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_starting_life(mut self, starting_life: i32) -> Self {
        self.starting_life = starting_life;
        self
    }

    pub fn with_opening_hand_size(mut self, size: usize) -> Self {
        self.opening_hand_size = size;
        self
    }

    /// Reject settings a match cannot be played with
    pub fn validate(&self) -> Result<()> {
        // Every roll of a one-sided die ties
        if self.dice_sides < 2 {
            return Err(JudgeError::InvalidConfig(format!(
                "dice_sides must be at least 2, got {}",
                self.dice_sides
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
