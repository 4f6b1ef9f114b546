//! Mana colors, costs and pools

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mana colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl Color {
    /// WUBRG order followed by colorless; also the generic payment order
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Colorless,
    ];

    const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Blue => 1,
            Color::Black => 2,
            Color::Red => 3,
            Color::Green => 4,
            Color::Colorless => 5,
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Color> {
        match symbol {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            'C' => Some(Color::Colorless),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Color::White => "W",
            Color::Blue => "U",
            Color::Black => "B",
            Color::Red => "R",
            Color::Green => "G",
            Color::Colorless => "C",
        };
        write!(f, "{symbol}")
    }
}

/// Amounts of mana per color
///
/// Used both as a player's pool and as the colored part of a cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaPool {
    amounts: [u8; 6],
}

impl ManaPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool holding `amount` mana of a single color
    pub fn of(color: Color, amount: u8) -> Self {
        let mut pool = ManaPool::new();
        pool.add(color, amount);
        pool
    }

    pub fn get(&self, color: Color) -> u8 {
        self.amounts[color.index()]
    }

    pub fn add(&mut self, color: Color, amount: u8) {
        let slot = &mut self.amounts[color.index()];
        *slot = slot.saturating_add(amount);
    }

    pub fn add_color(&mut self, color: Color) {
        self.add(color, 1);
    }

    pub fn add_pool(&mut self, other: &ManaPool) {
        for color in Color::ALL {
            self.add(color, other.get(color));
        }
    }

    pub fn clear(&mut self) {
        self.amounts = [0; 6];
    }

    pub fn total(&self) -> u32 {
        self.amounts.iter().map(|&a| a as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Check if this pool covers the given cost
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        let colored_ok = Color::ALL
            .iter()
            .all(|&color| self.get(color) >= cost.colored.get(color));
        colored_ok && self.total() >= cost.cmc()
    }

    /// Deduct a cost from this pool
    ///
    /// Colored requirements are paid first, then generic mana is taken in
    /// WUBRG-then-colorless order. The pool is left untouched on failure.
    pub fn pay_cost(&mut self, cost: &ManaCost) -> Result<(), String> {
        if !self.can_pay(cost) {
            return Err(format!(
                "Insufficient mana to pay cost {cost}. Pool has: {self}"
            ));
        }

        for color in Color::ALL {
            self.amounts[color.index()] -= cost.colored.get(color);
        }

        let mut generic_remaining = cost.generic;
        for color in Color::ALL {
            let slot = &mut self.amounts[color.index()];
            let used = generic_remaining.min(*slot);
            *slot -= used;
            generic_remaining -= used;
        }
        debug_assert_eq!(generic_remaining, 0, "Failed to pay generic cost");

        Ok(())
    }
}

impl fmt::Display for ManaPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }
        for color in Color::ALL {
            for _ in 0..self.get(color) {
                write!(f, "{color}")?;
            }
        }
        Ok(())
    }
}

/// A mana cost such as "2RR" (2 generic + 2 red)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaCost {
    pub generic: u8,
    pub colored: ManaPool,
}

impl ManaCost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a cost written in mana symbols, e.g. "2RR" or "1UB"
    ///
    /// Unknown characters (braces, spaces) are skipped. A generic amount too
    /// large for a cost is capped at `u8::MAX`.
    pub fn from_string(s: &str) -> Self {
        let (generic, colored) = Self::read_symbols(s);
        ManaCost {
            generic: u8::try_from(generic).unwrap_or(u8::MAX),
            colored,
        }
    }

    /// Like `from_string`, but `None` when the generic amount does not fit
    pub fn parse(s: &str) -> Option<Self> {
        let (generic, colored) = Self::read_symbols(s);
        Some(ManaCost {
            generic: u8::try_from(generic).ok()?,
            colored,
        })
    }

    fn read_symbols(s: &str) -> (u32, ManaPool) {
        let mut generic: u32 = 0;
        let mut colored = ManaPool::new();

        for c in s.chars() {
            if let Some(color) = Color::from_symbol(c) {
                colored.add_color(color);
            } else if let Some(digit) = c.to_digit(10) {
                generic = generic.saturating_mul(10).saturating_add(digit);
            }
        }

        (generic, colored)
    }

    /// Total converted mana cost
    pub fn cmc(&self) -> u32 {
        self.generic as u32 + self.colored.total()
    }

    pub fn is_free(&self) -> bool {
        self.cmc() == 0
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic > 0 || self.colored.is_empty() {
            write!(f, "{}", self.generic)?;
        }
        for color in Color::ALL {
            for _ in 0..self.colored.get(color) {
                write!(f, "{color}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mana_cost_parsing() {
        let cost = ManaCost::from_string("2RR");
        assert_eq!(cost.generic, 2);
        assert_eq!(cost.colored.get(Color::Red), 2);
        assert_eq!(cost.cmc(), 4);
        assert_eq!(cost.to_string(), "2RR");

        let free = ManaCost::from_string("");
        assert!(free.is_free());
        assert_eq!(free.to_string(), "0");
    }

    #[test]
    fn test_oversized_generic_is_never_free() {
        let capped = ManaCost::from_string("300");
        assert_eq!(capped.generic, u8::MAX);
        assert!(!capped.is_free());
        assert_eq!(ManaCost::from_string("99999999999G").cmc(), 256);

        assert_eq!(ManaCost::parse("300"), None);
        assert_eq!(ManaCost::parse("255G"), Some(ManaCost::from_string("255G")));
    }

    #[test]
    fn test_can_pay() {
        let mut pool = ManaPool::new();
        pool.add(Color::Red, 2);
        pool.add_color(Color::Blue);

        assert!(pool.can_pay(&ManaCost::from_string("1R")));
        assert!(pool.can_pay(&ManaCost::from_string("2R")));
        assert!(!pool.can_pay(&ManaCost::from_string("3R")));
        assert!(!pool.can_pay(&ManaCost::from_string("RRR")));
    }

    #[test]
    fn test_pay_cost_uses_wubrg_order_for_generic() {
        let mut pool = ManaPool::new();
        pool.add(Color::Red, 3);
        pool.add_color(Color::Blue);

        pool.pay_cost(&ManaCost::from_string("2R")).unwrap();
        assert_eq!(pool.get(Color::Red), 1);
        assert_eq!(pool.get(Color::Blue), 0);
        assert_eq!(pool.total(), 1);
    }

    #[test]
    fn test_pay_cost_failure_leaves_pool_untouched() {
        let mut pool = ManaPool::of(Color::Blue, 2);
        assert!(pool.pay_cost(&ManaCost::from_string("RR")).is_err());
        assert_eq!(pool.get(Color::Blue), 2);
    }

    #[test]
    fn test_add_pool() {
        let mut pool = ManaPool::of(Color::Green, 1);
        pool.add_pool(&ManaPool::of(Color::Green, 2));
        assert_eq!(pool.get(Color::Green), 3);
        assert_eq!(pool.to_string(), "GGG");
        pool.clear();
        assert!(pool.is_empty());
    }
}
