//! Match initialization from player definitions
//!
//! Turns deck lists and strategy choices into a tabletop with full,
//! unshuffled libraries.

use crate::config::GameConfig;
use crate::core::{DeckRef, Player, PlayerId};
use crate::game::aggressive_strategy::AggressiveStrategy;
use crate::game::random_strategy::RandomStrategy;
use crate::game::state::Tabletop;
use crate::game::strategy::Strategy;
use crate::game::zero_strategy::ZeroStrategy;
use crate::loader::{CardPool, DeckList};
use crate::zones::Zone;
use crate::{JudgeError, Result};
use serde::{Deserialize, Serialize};

/// Strategies the crate ships with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    #[default]
    Zero,
    Random,
    Aggressive,
}

impl StrategyKind {
    /// Build a fresh strategy; `seed` only matters for `Random`
    pub fn build(self, seed: u64) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Zero => Box::new(ZeroStrategy::new()),
            StrategyKind::Random => Box::new(RandomStrategy::with_seed(seed)),
            StrategyKind::Aggressive => Box::new(AggressiveStrategy::new()),
        }
    }
}

/// Everything needed to seat a player
#[derive(Debug, Clone)]
pub struct PlayerDefinition {
    pub name: String,
    pub deck: Option<DeckList>,
    pub strategy: StrategyKind,
}

impl PlayerDefinition {
    pub fn new(name: impl Into<String>, deck: DeckList, strategy: StrategyKind) -> Self {
        PlayerDefinition {
            name: name.into(),
            deck: Some(deck),
            strategy,
        }
    }
}

/// Creates the runtime players and cards of a match
///
/// Shared across experiment worker threads, so implementations must be
/// thread safe.
pub trait EntityFactory: Send + Sync {
    fn create_tabletop(
        &self,
        players: &[PlayerDefinition],
        config: &GameConfig,
        seed: u64,
    ) -> Result<Tabletop>;
}

/// Factory resolving deck entries against a card pool
#[derive(Debug, Clone)]
pub struct DefinitionFactory {
    pool: CardPool,
}

impl DefinitionFactory {
    pub fn new(pool: CardPool) -> Self {
        DefinitionFactory { pool }
    }

    /// Factory over the built-in card pool
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(CardPool::builtin()?))
    }

    pub fn pool(&self) -> &CardPool {
        &self.pool
    }

    /// Create every card of `deck` in `player_id`'s library, in deck order
    fn load_deck_into_game(&self, tabletop: &mut Tabletop, player_id: PlayerId, deck: &DeckList) -> Result<()> {
        for entry in &deck.main_deck {
            let definition = self.pool.get(&entry.card_name).ok_or_else(|| {
                JudgeError::InvalidDeckFormat(format!("Card not found in card pool: {}", entry.card_name))
            })?;

            for _ in 0..entry.count {
                tabletop.create_card(player_id, Zone::Library, |id| definition.instantiate(id, player_id))?;
            }
        }
        Ok(())
    }
}

impl EntityFactory for DefinitionFactory {
    fn create_tabletop(
        &self,
        definitions: &[PlayerDefinition],
        config: &GameConfig,
        seed: u64,
    ) -> Result<Tabletop> {
        if definitions.len() != 2 {
            return Err(JudgeError::InvalidPlayerCount(definitions.len()));
        }

        let mut players = Vec::with_capacity(2);
        let mut decks = Vec::with_capacity(2);
        for (seat, definition) in definitions.iter().enumerate() {
            let deck = definition
                .deck
                .as_ref()
                .ok_or_else(|| JudgeError::MissingDeck(definition.name.clone()))?;
            deck.check_against(&self.pool)?;

            let id = PlayerId::new(seat as u32);
            let strategy = definition.strategy.build(seed.wrapping_add(seat as u64));
            players.push(
                Player::new(id, definition.name.as_str(), config.starting_life)
                    .with_deck(DeckRef::new(deck.name.as_str(), deck.total_cards()))
                    .with_strategy(strategy),
            );
            decks.push((id, deck));
        }

        let mut tabletop = Tabletop::from_players(players)?;
        for (id, deck) in decks {
            self.load_deck_into_game(&mut tabletop, id, deck)?;
        }
        Ok(tabletop)
    }
}
