//! Core game types and entities

pub mod action;
pub mod card;
pub mod costs;
pub mod creature;
pub mod entity;
pub mod mana;
pub mod player;
pub mod types;

pub use action::{Action, ActionKind, ParameterKey, Parameters, Target};
pub use card::{Card, CardType, ManaAbility};
pub use costs::{Cost, CostKind};
pub use creature::Creature;
pub use entity::{EntityId, EntityStore, GameEntity};
pub use mana::{Color, ManaCost, ManaPool};
pub use player::{DeckRef, Player};
pub use types::{CardName, PlayerName, TurnId};

pub type CardId = EntityId<Card>;
pub type PlayerId = EntityId<Player>;
