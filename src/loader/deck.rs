//! Deck file loader (.dck format)
//!
//! ```text
//! [metadata]
//! Name=Mono Green
//!
//! [Main]
//! 17 Forest
//! 4 Grizzly Bears
//! ```

use crate::core::Color;
use crate::loader::CardPool;
use crate::{JudgeError, Result};
use std::fs;
use std::path::Path;

/// Deck loader for .dck files
pub struct DeckLoader;

impl DeckLoader {
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        let mut deck = Self::parse(&content)?;
        if deck.name.is_empty() {
            deck.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(deck)
    }

    /// Parse a deck from its text content
    ///
    /// Sideboard entries are skipped; only the main deck is played.
    pub fn parse(content: &str) -> Result<DeckList> {
        let mut name = String::new();
        let mut main_deck = Vec::new();
        let mut in_sideboard = false;

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                in_sideboard = line.eq_ignore_ascii_case("[sideboard]");
                continue;
            }
            if let Some(value) = line.strip_prefix("Name=") {
                name = value.trim().to_string();
                continue;
            }

            // Format: "4 Card Name" or "4 Card Name|SET"
            let Some((count_str, rest)) = line.split_once(' ') else {
                continue;
            };
            let Ok(count) = count_str.parse::<u8>() else {
                continue;
            };
            let card_name = rest.split_once('|').map_or(rest, |(name, _set)| name).trim();

            if !in_sideboard {
                main_deck.push(DeckEntry {
                    card_name: card_name.to_string(),
                    count,
                });
            }
        }

        if main_deck.is_empty() {
            return Err(JudgeError::InvalidDeckFormat("Empty deck".to_string()));
        }

        Ok(DeckList { name, main_deck })
    }
}

/// A deck entry (card name and count)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_name: String,
    pub count: u8,
}

/// A complete deck list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckList {
    pub name: String,
    pub main_deck: Vec<DeckEntry>,
}

impl DeckList {
    pub fn total_cards(&self) -> usize {
        self.main_deck.iter().map(|e| e.count as usize).sum()
    }

    /// Built-in 40 card mono-colored deck
    ///
    /// 17 basic lands, 3 Mind Stones and four copies of each creature of
    /// the color. Colorless gets the green creatures.
    pub fn sample(color: Color) -> DeckList {
        let (deck_name, land, creatures) = match color {
            Color::White => (
                "Mono White",
                "Plains",
                ["Eager Cadet", "Savannah Lions", "Youthful Knight", "Standing Troops", "Serra Angel"],
            ),
            Color::Blue => (
                "Mono Blue",
                "Island",
                ["Merfolk of the Pearl Trident", "Coral Merfolk", "Horned Turtle", "Wall of Air", "Air Elemental"],
            ),
            Color::Black => (
                "Mono Black",
                "Swamp",
                ["Walking Corpse", "Hypnotic Specter", "Feral Shadow", "Serpent Warrior", "Bog Wraith"],
            ),
            Color::Red => (
                "Mono Red",
                "Mountain",
                ["Raging Goblin", "Goblin Piker", "Gray Ogre", "Hill Giant", "Fire Elemental"],
            ),
            Color::Green | Color::Colorless => (
                "Mono Green",
                "Forest",
                ["Llanowar Elves", "Grizzly Bears", "Centaur Courser", "Giant Spider", "Craw Wurm"],
            ),
        };

        let mut main_deck = vec![
            DeckEntry {
                card_name: land.to_string(),
                count: 17,
            },
            DeckEntry {
                card_name: "Mind Stone".to_string(),
                count: 3,
            },
        ];
        main_deck.extend(creatures.iter().map(|name| DeckEntry {
            card_name: name.to_string(),
            count: 4,
        }));

        DeckList {
            name: deck_name.to_string(),
            main_deck,
        }
    }

    /// Fail on the first card the pool does not know
    pub fn check_against(&self, pool: &CardPool) -> Result<()> {
        match self.main_deck.iter().find(|e| !pool.contains(&e.card_name)) {
            Some(entry) => Err(JudgeError::InvalidDeckFormat(format!(
                "Card not found in card pool: {}",
                entry.card_name
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_deck() {
        let content = r#"
[metadata]
Name=Test Deck

[Main]
20 Mountain
40 Goblin Piker|M10

[Sideboard]
15 Raging Goblin
"#;

        let deck = DeckLoader::parse(content).unwrap();
        assert_eq!(deck.name, "Test Deck");
        assert_eq!(deck.main_deck.len(), 2);
        assert_eq!(deck.total_cards(), 60);

        assert_eq!(deck.main_deck[0].card_name, "Mountain");
        assert_eq!(deck.main_deck[0].count, 20);
        assert_eq!(deck.main_deck[1].card_name, "Goblin Piker");
        assert_eq!(deck.main_deck[1].count, 40);
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        assert!(matches!(
            DeckLoader::parse("[Main]\n# nothing here\n"),
            Err(JudgeError::InvalidDeckFormat(_))
        ));
    }

    #[test]
    fn test_sample_decks_are_playable() {
        let pool = CardPool::builtin().unwrap();
        for color in Color::ALL {
            let deck = DeckList::sample(color);
            assert_eq!(deck.total_cards(), 40, "{}", deck.name);
            deck.check_against(&pool).unwrap();
        }
    }

    #[test]
    fn test_unknown_card() {
        let pool = CardPool::builtin().unwrap();
        let deck = DeckLoader::parse("4 Black Lotus").unwrap();
        assert!(matches!(deck.check_against(&pool), Err(JudgeError::InvalidDeckFormat(_))));
    }
}
