//! Creature view over a battlefield card

use crate::core::{Card, CardId, PlayerId, TurnId};

/// Combat-relevant projection of a permanent
///
/// Recomputed whenever it is needed; never stored.
#[derive(Debug, Clone, Copy)]
pub struct Creature<'a> {
    card: &'a Card,
    current_turn: TurnId,
}

impl<'a> Creature<'a> {
    /// View `card` as a creature, or `None` if it is not one
    pub fn view(card: &'a Card, current_turn: TurnId) -> Option<Self> {
        card.is_creature().then_some(Creature { card, current_turn })
    }

    pub fn id(&self) -> CardId {
        self.card.id
    }

    pub fn card(&self) -> &'a Card {
        self.card
    }

    pub fn controller(&self) -> PlayerId {
        self.card.controller
    }

    pub fn power(&self) -> i32 {
        self.card.power.unwrap_or(0).max(0)
    }

    pub fn toughness(&self) -> i32 {
        self.card.toughness.unwrap_or(0)
    }

    pub fn damage(&self) -> i32 {
        self.card.damage
    }

    pub fn is_tapped(&self) -> bool {
        self.card.tapped
    }

    /// Entered the battlefield this turn
    pub fn has_summoning_sickness(&self) -> bool {
        self.card.entered_turn == Some(self.current_turn)
    }

    pub fn is_lethally_damaged(&self) -> bool {
        self.damage() >= self.toughness()
    }

    pub fn can_attack(&self) -> bool {
        !self.is_tapped() && !self.has_summoning_sickness()
    }

    /// Summoning sickness does not prevent blocking
    pub fn can_block(&self) -> bool {
        !self.is_tapped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardType;

    fn bears(entered: Option<TurnId>) -> Card {
        let mut card = Card::new(CardId::new(7), "Grizzly Bears", PlayerId::new(0))
            .with_type(CardType::Creature)
            .with_power_toughness(2, 2);
        card.entered_turn = entered;
        card
    }

    #[test]
    fn test_non_creature_has_no_view() {
        let land = Card::new(CardId::new(1), "Forest", PlayerId::new(0)).with_type(CardType::Land);
        assert!(Creature::view(&land, TurnId::new(1)).is_none());
    }

    #[test]
    fn test_summoning_sickness() {
        let card = bears(Some(TurnId::new(3)));

        let same_turn = Creature::view(&card, TurnId::new(3)).unwrap();
        assert!(same_turn.has_summoning_sickness());
        assert!(!same_turn.can_attack());
        assert!(same_turn.can_block());

        let next_turn = Creature::view(&card, TurnId::new(4)).unwrap();
        assert!(!next_turn.has_summoning_sickness());
        assert!(next_turn.can_attack());
    }

    #[test]
    fn test_tapped_creature_cannot_block() {
        let mut card = bears(None);
        card.tap();
        let creature = Creature::view(&card, TurnId::new(2)).unwrap();
        assert!(!creature.can_block());
        assert!(!creature.can_attack());
    }

    #[test]
    fn test_lethal_damage() {
        let mut card = bears(None);
        card.damage = 1;
        assert!(!Creature::view(&card, TurnId::new(1)).unwrap().is_lethally_damaged());
        card.damage = 2;
        assert!(Creature::view(&card, TurnId::new(1)).unwrap().is_lethally_damaged());
    }
}
