//! Actions proposed by strategies and executed by the judges

use crate::core::{CardId, Cost, PlayerId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Kind of an action, used as the registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// No decision was made; treated as a pass
    None,
    /// An action the engine cannot interpret; always rejected
    Unknown,
    Pass,
    PlayLand,
    PlayNonLand,
    Discard,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::None,
        ActionKind::Unknown,
        ActionKind::Pass,
        ActionKind::PlayLand,
        ActionKind::PlayNonLand,
        ActionKind::Discard,
    ];
}

/// What an action is aimed at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub cards: SmallVec<[CardId; 2]>,
    pub player: Option<PlayerId>,
}

impl Target {
    pub fn card(card: CardId) -> Self {
        Target {
            cards: smallvec::smallvec![card],
            player: None,
        }
    }

    pub fn cards(cards: impl IntoIterator<Item = CardId>) -> Self {
        Target {
            cards: cards.into_iter().collect(),
            player: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.player.is_none()
    }
}

/// Keys for action parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKey {
    /// How many cards or how much of something the action involves
    Amount,
}

/// Keyed numeric parameters attached to an action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    values: SmallVec<[(ParameterKey, i32); 1]>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: ParameterKey, value: i32) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: ParameterKey, value: i32) {
        if let Some((_, slot)) = self.values.iter_mut().find(|(k, _)| *k == key) {
            *slot = value;
        } else {
            self.values.push((key, value));
        }
    }

    pub fn get(&self, key: ParameterKey) -> Option<i32> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    pub fn amount(&self) -> i32 {
        self.get(ParameterKey::Amount).unwrap_or(0)
    }
}

/// An action a player wants to take
///
/// `source` is the card being played, if any. Mandatory actions such as
/// discarding name their cards in `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub owner: PlayerId,
    pub source: Option<CardId>,
    pub cost: Cost,
    pub target: Target,
    pub parameters: Parameters,
}

impl Action {
    fn bare(kind: ActionKind, owner: PlayerId) -> Self {
        Action {
            kind,
            owner,
            source: None,
            cost: Cost::None,
            target: Target::default(),
            parameters: Parameters::new(),
        }
    }

    /// "No decision" sentinel
    pub fn none(owner: PlayerId) -> Self {
        Self::bare(ActionKind::None, owner)
    }

    pub fn unknown(owner: PlayerId) -> Self {
        Action {
            cost: Cost::Unknown,
            ..Self::bare(ActionKind::Unknown, owner)
        }
    }

    pub fn pass(owner: PlayerId) -> Self {
        Self::bare(ActionKind::Pass, owner)
    }

    pub fn play_land(owner: PlayerId, card: CardId) -> Self {
        Action {
            source: Some(card),
            ..Self::bare(ActionKind::PlayLand, owner)
        }
    }

    pub fn play_non_land(owner: PlayerId, card: CardId, cost: Cost) -> Self {
        Action {
            source: Some(card),
            cost,
            ..Self::bare(ActionKind::PlayNonLand, owner)
        }
    }

    /// Discard the given cards; `Amount` records how many are required
    pub fn discard(owner: PlayerId, amount: usize, cards: impl IntoIterator<Item = CardId>) -> Self {
        Action {
            target: Target::cards(cards),
            parameters: Parameters::new().with(ParameterKey::Amount, amount as i32),
            ..Self::bare(ActionKind::Discard, owner)
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self.kind, ActionKind::Pass | ActionKind::None)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.source) {
            (ActionKind::PlayLand, Some(card)) => write!(f, "play land #{card}"),
            (ActionKind::PlayNonLand, Some(card)) => write!(f, "play #{card} for {}", self.cost),
            (ActionKind::Discard, _) => write!(f, "discard {} card(s)", self.target.cards.len()),
            (kind, _) => write!(f, "{kind:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManaCost;

    #[test]
    fn test_parameters() {
        let mut params = Parameters::new().with(ParameterKey::Amount, 2);
        assert_eq!(params.amount(), 2);
        params.set(ParameterKey::Amount, 5);
        assert_eq!(params.get(ParameterKey::Amount), Some(5));
        assert_eq!(Parameters::new().amount(), 0);
    }

    #[test]
    fn test_action_constructors() {
        let owner = PlayerId::new(0);
        let card = CardId::new(10);

        assert!(Action::none(owner).is_pass());
        assert!(Action::pass(owner).is_pass());
        assert_eq!(Action::unknown(owner).cost, Cost::Unknown);

        let land = Action::play_land(owner, card);
        assert_eq!(land.kind, ActionKind::PlayLand);
        assert_eq!(land.source, Some(card));
        assert_eq!(land.cost, Cost::None);

        let spell = Action::play_non_land(owner, card, Cost::PayingMana(ManaCost::from_string("1G")));
        assert_eq!(spell.to_string(), "play #10 for 1G");

        let discard = Action::discard(owner, 2, [CardId::new(3), CardId::new(4)]);
        assert_eq!(discard.parameters.amount(), 2);
        assert_eq!(discard.target.cards.len(), 2);
    }
}
