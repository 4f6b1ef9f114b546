//! MTG Judge - a two-player tabletop rules engine
//!
//! Judges advance a shared tabletop through the turn structure, settle
//! priority and the stack, and resolve combat. Strategies propose what the
//! players do; the judges validate it.

pub mod config;
pub mod core;
pub mod error;
pub mod experiment;
pub mod game;
pub mod loader;
pub mod simulator;
pub mod zones;

pub use error::{JudgeError, Result};
