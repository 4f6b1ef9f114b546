//! Strategy interface and the read-only view strategies receive
//!
//! A strategy proposes decisions; the judges validate them. An invalid
//! proposal is replaced by the "no decision" sentinel and the strategy is
//! not asked again for the same decision.

use crate::core::{Action, ActionKind, Card, CardId, Creature, ManaPool, Parameters, PlayerId};
use crate::game::assistant::{CreatureModifier, JudicialAssistant, PlayerModifier};
use crate::game::combat::{AttackingDecision, BlockingDecision};
use crate::game::state::Tabletop;
use crate::{JudgeError, Result};

/// Decision maker for one player
pub trait Strategy {
    /// Choose attackers at the start of combat (active player)
    fn declare_attacker(&mut self, view: &PlayerView) -> AttackingDecision;

    /// Choose blocks against the declared attackers (non-active player)
    fn declare_blocker(&mut self, view: &PlayerView) -> BlockingDecision;

    /// Act while holding priority as the active player with an empty stack
    fn perform_prioritized_action(&mut self, view: &PlayerView) -> Action;

    /// Act while holding priority in any other situation
    fn perform_non_prioritized_action(&mut self, view: &PlayerView) -> Action;

    /// Choose how to carry out an action the rules require
    fn perform_required_action(
        &mut self,
        view: &PlayerView,
        kind: ActionKind,
        parameters: &Parameters,
    ) -> Action;
}

/// What a strategy may look at when deciding
pub struct PlayerView<'a> {
    tabletop: &'a Tabletop,
    player: PlayerId,
    legal_actions: Vec<Action>,
    attack_candidates: Vec<CardId>,
    block_candidates: Vec<CardId>,
}

impl<'a> PlayerView<'a> {
    pub fn new(tabletop: &'a Tabletop, player: PlayerId, assistant: &JudicialAssistant) -> Result<Self> {
        let modifier = PlayerModifier::of(tabletop, player);
        Ok(PlayerView {
            tabletop,
            player,
            legal_actions: assistant.find_legal_actions(tabletop, modifier)?,
            attack_candidates: assistant.find_creature_ids(tabletop, modifier, CreatureModifier::CanAttack),
            block_candidates: assistant.find_creature_ids(tabletop, modifier, CreatureModifier::CanBlock),
        })
    }

    pub fn player_id(&self) -> PlayerId {
        self.player
    }

    pub fn tabletop(&self) -> &'a Tabletop {
        self.tabletop
    }

    pub fn is_active(&self) -> bool {
        self.tabletop.is_active(self.player)
    }

    fn opponent(&self) -> PlayerId {
        self.tabletop
            .opponent_of(self.player)
            .unwrap_or(self.player)
    }

    pub fn life(&self) -> i32 {
        self.tabletop.player(self.player).map(|p| p.life).unwrap_or(0)
    }

    pub fn opponent_life(&self) -> i32 {
        self.tabletop
            .player(self.opponent())
            .map(|p| p.life)
            .unwrap_or(0)
    }

    pub fn mana_pool(&self) -> ManaPool {
        self.tabletop
            .player(self.player)
            .map(|p| p.mana_pool)
            .unwrap_or_default()
    }

    pub fn hand(&self) -> &'a [CardId] {
        self.tabletop
            .player(self.player)
            .map(|p| p.zones.hand.cards.as_slice())
            .unwrap_or(&[])
    }

    /// Permanents this player controls
    pub fn battlefield(&self) -> Vec<CardId> {
        self.tabletop.permanents_of(self.player).map(|c| c.id).collect()
    }

    pub fn opponent_battlefield(&self) -> Vec<CardId> {
        self.tabletop.permanents_of(self.opponent()).map(|c| c.id).collect()
    }

    pub fn card(&self, id: CardId) -> Option<&'a Card> {
        self.tabletop.card(id).ok()
    }

    pub fn creature(&self, id: CardId) -> Option<Creature<'a>> {
        self.tabletop.creature(id).ok().flatten()
    }

    pub fn legal_actions(&self) -> &[Action] {
        &self.legal_actions
    }

    /// Creatures that could legally attack right now
    pub fn attack_candidates(&self) -> &[CardId] {
        &self.attack_candidates
    }

    /// Creatures that could legally block right now
    pub fn block_candidates(&self) -> &[CardId] {
        &self.block_candidates
    }

    /// Attackers declared this combat
    pub fn attackers(&self) -> &'a [CardId] {
        self.tabletop.attacking.attackers()
    }

    pub fn pass(&self) -> Action {
        Action::pass(self.player)
    }
}

/// Run `decide` with the strategy of `player`
///
/// The strategy is taken out of the player for the duration of the call
/// so the view can borrow the whole tabletop.
pub fn consult_strategy<R>(
    tabletop: &mut Tabletop,
    assistant: &JudicialAssistant,
    player: PlayerId,
    decide: impl FnOnce(&mut dyn Strategy, &PlayerView<'_>) -> R,
) -> Result<R> {
    let mut strategy = tabletop
        .player_mut(player)?
        .strategy
        .take()
        .ok_or(JudgeError::MissingStrategy(player.as_u32()))?;

    let outcome = PlayerView::new(tabletop, player, assistant).map(|view| decide(strategy.as_mut(), &view));

    tabletop.player_mut(player)?.strategy = Some(strategy);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardType, TurnId};
    use crate::game::registry::ExecutionRegistry;
    use crate::game::zero_strategy::ZeroStrategy;
    use crate::zones::Zone;
    use std::sync::Arc;

    #[test]
    fn test_consult_requires_strategy() {
        let mut tabletop = Tabletop::new_two_player("Alice", "Bob", 20);
        let alice = tabletop.active_player_id();
        let assistant = JudicialAssistant::new(Arc::new(ExecutionRegistry::standard()));

        let missing = consult_strategy(&mut tabletop, &assistant, alice, |_, view| view.pass());
        assert!(matches!(missing, Err(JudgeError::MissingStrategy(0))));
    }

    #[test]
    fn test_consult_restores_strategy() {
        let mut tabletop = Tabletop::new_two_player("Alice", "Bob", 20);
        let alice = tabletop.active_player_id();
        tabletop.set_strategy(alice, Box::new(ZeroStrategy::new())).unwrap();
        let assistant = JudicialAssistant::new(Arc::new(ExecutionRegistry::standard()));

        let action = consult_strategy(&mut tabletop, &assistant, alice, |strategy, view| {
            strategy.perform_prioritized_action(view)
        })
        .unwrap();
        assert!(action.is_pass());
        assert!(tabletop.player(alice).unwrap().strategy.is_some());
    }

    #[test]
    fn test_view_contents() {
        let mut tabletop = Tabletop::new_two_player("Alice", "Bob", 20);
        tabletop.turn_id = TurnId::new(2);
        let alice = tabletop.active_player_id();
        let bob = tabletop.non_active_player_id();
        let land = tabletop
            .create_card(alice, Zone::Hand, |id| Card::new(id, "Forest", alice).with_type(CardType::Land))
            .unwrap();
        let blocker = tabletop
            .create_card(bob, Zone::Battlefield, |id| {
                Card::new(id, "Wall", bob)
                    .with_type(CardType::Creature)
                    .with_power_toughness(0, 4)
            })
            .unwrap();
        tabletop.player_mut(bob).unwrap().life = 12;

        let assistant = JudicialAssistant::new(Arc::new(ExecutionRegistry::standard()));
        let view = PlayerView::new(&tabletop, alice, &assistant).unwrap();
        assert!(view.is_active());
        assert_eq!(view.hand(), &[land]);
        assert_eq!(view.legal_actions(), &[Action::play_land(alice, land)]);
        assert_eq!(view.opponent_life(), 12);
        assert_eq!(view.opponent_battlefield(), vec![blocker]);
        assert!(view.attack_candidates().is_empty());

        let bob_view = PlayerView::new(&tabletop, bob, &assistant).unwrap();
        assert!(bob_view.legal_actions().is_empty());
        assert_eq!(bob_view.block_candidates(), &[blocker]);
        assert_eq!(bob_view.creature(blocker).unwrap().toughness(), 4);
    }
}
