//! Error types for the rules engine
//!
//! Only structural problems are errors. Rule violations made by a strategy
//! are reported through `ValidationResult` and never abort a match.

use crate::core::{ActionKind, CostKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("No cost handler registered for cost kind {0:?}")]
    MissingCostHandler(CostKind),

    #[error("No action handler registered for action kind {0:?}")]
    MissingActionHandler(ActionKind),

    #[error("A match requires exactly 2 players, got {0}")]
    InvalidPlayerCount(usize),

    #[error("Player {0} has no deck")]
    MissingDeck(String),

    #[error("Player {0} has no strategy attached")]
    MissingStrategy(u32),

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JudgeError>;
