//! Cost system for actions and activated abilities
//!
//! Costs are immutable values. Handlers that validate and pay them are looked
//! up by `CostKind` in the execution registry.

use crate::core::ManaCost;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cost that must be paid to perform an action or activate an ability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cost {
    /// Nothing to pay
    #[default]
    None,

    /// A cost the engine cannot interpret; never payable
    Unknown,

    /// Tap the source permanent ({T})
    Tapping,

    /// Pay mana
    PayingMana(ManaCost),
}

/// Tag of a `Cost`, used as the registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostKind {
    None,
    Unknown,
    Tapping,
    PayingMana,
}

impl CostKind {
    pub const ALL: [CostKind; 4] = [
        CostKind::None,
        CostKind::Unknown,
        CostKind::Tapping,
        CostKind::PayingMana,
    ];
}

impl Cost {
    pub fn kind(&self) -> CostKind {
        match self {
            Cost::None => CostKind::None,
            Cost::Unknown => CostKind::Unknown,
            Cost::Tapping => CostKind::Tapping,
            Cost::PayingMana(_) => CostKind::PayingMana,
        }
    }

    /// Read a cost as written in deck files
    ///
    /// Accepts "" (no cost), "T" / "{T}" (tap), or mana symbols such as "1R".
    /// Anything else becomes `Cost::Unknown`.
    pub fn parse(cost_str: &str) -> Self {
        let trimmed = cost_str.trim();
        if trimmed.is_empty() {
            return Cost::None;
        }

        let stripped: String = trimmed.chars().filter(|c| !matches!(c, '{' | '}')).collect();
        if stripped == "T" {
            return Cost::Tapping;
        }

        let is_mana = stripped
            .chars()
            .all(|c| c.is_ascii_digit() || "WUBRGC".contains(c));
        if is_mana {
            let mana = ManaCost::from_string(&stripped);
            if mana.is_free() {
                Cost::None
            } else {
                Cost::PayingMana(mana)
            }
        } else {
            Cost::Unknown
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::None => write!(f, "no cost"),
            Cost::Unknown => write!(f, "unknown cost"),
            Cost::Tapping => write!(f, "{{T}}"),
            Cost::PayingMana(mana) => write!(f, "{mana}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;

    #[test]
    fn test_parse_tap() {
        assert_eq!(Cost::parse("T"), Cost::Tapping);
        assert_eq!(Cost::parse("{T}"), Cost::Tapping);
        assert_eq!(Cost::Tapping.kind(), CostKind::Tapping);
    }

    #[test]
    fn test_parse_mana() {
        let cost = Cost::parse("2R");
        match cost {
            Cost::PayingMana(mana) => {
                assert_eq!(mana.generic, 2);
                assert_eq!(mana.colored.get(Color::Red), 1);
            }
            other => panic!("Expected mana cost, got {other:?}"),
        }
        assert_eq!(Cost::parse("0"), Cost::None);
        assert_eq!(Cost::parse(""), Cost::None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Cost::parse("Sac<1/Creature>"), Cost::Unknown);
        assert_eq!(Cost::parse("PayLife<2>").kind(), CostKind::Unknown);
    }
}
