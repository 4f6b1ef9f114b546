//! Card and deck loaders
//!
//! Parsers for card scripts and the deck format (.dck), and the factory
//! that seats players from them.

pub mod card;
pub mod deck;
pub mod game_init;

pub use card::{CardDefinition, CardLoader, CardPool};
pub use deck::{DeckEntry, DeckList, DeckLoader};
pub use game_init::{DefinitionFactory, EntityFactory, PlayerDefinition, StrategyKind};
