//! Card types and instances

use crate::core::{CardId, CardName, Cost, GameEntity, ManaCost, ManaPool, PlayerId, TurnId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Land,
    Creature,
    Artifact,
    Enchantment,
    Sorcery,
    Instant,
}

/// Activated ability that adds mana
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaAbility {
    pub cost: Cost,
    pub produces: ManaPool,
}

impl ManaAbility {
    /// "{T}: add one mana of `color`"
    pub fn tap_for(color: crate::core::Color) -> Self {
        ManaAbility {
            cost: Cost::Tapping,
            produces: ManaPool::of(color, 1),
        }
    }
}

/// A card instance during play
///
/// Zone membership lives in the zones; the card only carries the state
/// that matters while it is a permanent (tapped, damage, entry turn).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: CardName,
    pub mana_cost: ManaCost,
    pub types: SmallVec<[CardType; 2]>,
    pub power: Option<i32>,
    pub toughness: Option<i32>,
    pub mana_abilities: SmallVec<[ManaAbility; 1]>,
    pub owner: PlayerId,
    pub controller: PlayerId,
    pub tapped: bool,

    /// Damage marked this turn
    pub damage: i32,

    /// Turn the card last entered the battlefield
    pub entered_turn: Option<TurnId>,
}

impl Card {
    pub fn new(id: CardId, name: impl Into<CardName>, owner: PlayerId) -> Self {
        Card {
            id,
            name: name.into(),
            mana_cost: ManaCost::new(),
            types: SmallVec::new(),
            power: None,
            toughness: None,
            mana_abilities: SmallVec::new(),
            owner,
            controller: owner,
            tapped: false,
            damage: 0,
            entered_turn: None,
        }
    }

    pub fn with_mana_cost(mut self, cost: &str) -> Self {
        self.mana_cost = ManaCost::from_string(cost);
        self
    }

    pub fn with_type(mut self, card_type: CardType) -> Self {
        if !self.types.contains(&card_type) {
            self.types.push(card_type);
        }
        self
    }

    pub fn with_power_toughness(mut self, power: i32, toughness: i32) -> Self {
        self.power = Some(power);
        self.toughness = Some(toughness);
        self
    }

    pub fn with_mana_ability(mut self, ability: ManaAbility) -> Self {
        self.mana_abilities.push(ability);
        self
    }

    pub fn is_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    pub fn is_creature(&self) -> bool {
        self.is_type(CardType::Creature)
    }

    pub fn is_land(&self) -> bool {
        self.is_type(CardType::Land)
    }

    /// Sorceries and instants never stay on the battlefield
    pub fn is_permanent(&self) -> bool {
        !self.is_type(CardType::Sorcery) && !self.is_type(CardType::Instant)
    }

    pub fn has_mana_ability(&self) -> bool {
        !self.mana_abilities.is_empty()
    }

    /// The cost to play this card from hand
    pub fn play_cost(&self) -> Cost {
        if self.mana_cost.is_free() {
            Cost::None
        } else {
            Cost::PayingMana(self.mana_cost)
        }
    }

    pub fn tap(&mut self) {
        self.tapped = true;
    }

    pub fn untap(&mut self) {
        self.tapped = false;
    }

    /// Forget everything the card picked up while on the battlefield
    pub fn reset_permanent_state(&mut self) {
        self.tapped = false;
        self.damage = 0;
        self.entered_turn = None;
        self.controller = self.owner;
    }
}

impl GameEntity<Card> for Card {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
