//! Player representation

use crate::core::{GameEntity, ManaPool, PlayerId, PlayerName};
use crate::game::strategy::Strategy;
use crate::zones::PlayerZones;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which deck a player brought: its name and size
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRef {
    pub name: String,
    pub card_count: usize,
}

impl DeckRef {
    pub fn new(name: impl Into<String>, card_count: usize) -> Self {
        DeckRef {
            name: name.into(),
            card_count,
        }
    }
}

/// Represents a player in the game
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub life: i32,
    pub zones: PlayerZones,
    pub mana_pool: ManaPool,

    /// Lands played this turn; gates one land per turn
    pub played_land_count: u8,

    pub deck: DeckRef,

    /// Taken out while being consulted, see `game::strategy::consult_strategy`
    pub strategy: Option<Box<dyn Strategy>>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>, starting_life: i32) -> Self {
        Player {
            id,
            name: name.into(),
            life: starting_life,
            zones: PlayerZones::new(id),
            mana_pool: ManaPool::new(),
            played_land_count: 0,
            deck: DeckRef::default(),
            strategy: None,
        }
    }

    pub fn with_deck(mut self, deck: DeckRef) -> Self {
        self.deck = deck;
        self
    }

    pub fn with_strategy(mut self, strategy: Box<dyn Strategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn lose_life(&mut self, amount: i32) {
        self.life -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0
    }

    pub fn can_play_land(&self) -> bool {
        self.played_land_count == 0
    }

    pub fn empty_mana_pool(&mut self) {
        self.mana_pool.clear();
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("life", &self.life)
            .field("zones", &self.zones)
            .field("mana_pool", &self.mana_pool)
            .field("played_land_count", &self.played_land_count)
            .field("deck", &self.deck)
            .field("has_strategy", &self.strategy.is_some())
            .finish()
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::zero_strategy::ZeroStrategy;

    #[test]
    fn test_player_creation() {
        let id = PlayerId::new(1);
        let player = Player::new(id, "Alice", 20);

        assert_eq!(player.id, id);
        assert_eq!(player.name.as_str(), "Alice");
        assert_eq!(player.life, 20);
        assert!(player.strategy.is_none());
        assert!(player.can_play_land());
        assert!(player.zones.hand.is_empty());
    }

    #[test]
    fn test_player_life() {
        let mut player = Player::new(PlayerId::new(1), "Bob", 20);

        player.lose_life(5);
        assert_eq!(player.life, 15);
        assert!(!player.is_dead());

        player.lose_life(15);
        assert_eq!(player.life, 0);
        assert!(player.is_dead());
    }

    #[test]
    fn test_debug_hides_strategy() {
        let player = Player::new(PlayerId::new(0), "Carol", 20)
            .with_deck(DeckRef::new("Mono Green", 40))
            .with_strategy(Box::new(ZeroStrategy::new()));
        let debug = format!("{player:?}");
        assert!(debug.contains("has_strategy: true"));
        assert!(debug.contains("Mono Green"));
    }
}
