//! Strongly-typed wrappers for game concepts
//!
//! Newtypes keep names and counters from being confused with each other.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card name (distinct from other string types)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardName(String);

impl CardName {
    pub fn new(s: impl Into<String>) -> Self {
        CardName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CardName {
    fn from(s: &str) -> Self {
        CardName(s.to_string())
    }
}

impl From<String> for CardName {
    fn from(s: String) -> Self {
        CardName(s)
    }
}

/// Player name (distinct from other string types)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: impl Into<String>) -> Self {
        PlayerName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerName {
    fn from(s: &str) -> Self {
        PlayerName(s.to_string())
    }
}

impl From<String> for PlayerName {
    fn from(s: String) -> Self {
        PlayerName(s)
    }
}

/// Turn counter
///
/// `TurnId::PRE_GAME` (0) is the value before the first Beginning phase.
/// Every Beginning phase moves it forward by exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnId(u32);

impl TurnId {
    pub const PRE_GAME: TurnId = TurnId(0);

    pub const fn new(turn: u32) -> Self {
        TurnId(turn)
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn next(self) -> Self {
        TurnId(self.0 + 1)
    }

    pub fn is_pre_game(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_name() {
        let name = CardName::new("Grizzly Bears");
        assert_eq!(name.as_str(), "Grizzly Bears");
        assert_eq!(name.to_string(), "Grizzly Bears");
    }

    #[test]
    fn test_turn_id_progression() {
        let turn = TurnId::PRE_GAME;
        assert!(turn.is_pre_game());
        let first = turn.next();
        assert_eq!(first.as_u32(), 1);
        assert!(!first.is_pre_game());
        assert!(first < first.next());
    }
}
