//! Scripted strategy for deterministic tests
//!
//! Replays queued decisions in order. Once a queue runs dry the strategy
//! passes and declares nothing.

use crate::core::{Action, ActionKind, CardId, Parameters};
use crate::game::combat::{AttackingDecision, BlockingDecision, Combat};
use crate::game::strategy::{PlayerView, Strategy};
use std::collections::VecDeque;

#[derive(Debug, Default, Clone)]
pub struct ScriptedStrategy {
    actions: VecDeque<Action>,
    attacks: VecDeque<AttackingDecision>,
    blocks: VecDeque<BlockingDecision>,
    discards: VecDeque<Vec<CardId>>,
}

impl ScriptedStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action for the next time this player holds priority
    pub fn then_act(mut self, action: Action) -> Self {
        self.actions.push_back(action);
        self
    }

    pub fn attack_with(mut self, attackers: impl IntoIterator<Item = CardId>) -> Self {
        self.attacks.push_back(AttackingDecision::declared(attackers));
        self
    }

    /// Queue a combat with no attack, to skip ahead to a later one
    pub fn hold_back(mut self) -> Self {
        self.attacks.push_back(AttackingDecision::None);
        self
    }

    pub fn block_with(mut self, combats: Vec<Combat>) -> Self {
        self.blocks.push_back(BlockingDecision::Declared(combats));
        self
    }

    pub fn discard(mut self, cards: impl IntoIterator<Item = CardId>) -> Self {
        self.discards.push_back(cards.into_iter().collect());
        self
    }

    /// Whether every queued decision has been used
    pub fn is_exhausted(&self) -> bool {
        self.actions.is_empty() && self.attacks.is_empty() && self.blocks.is_empty() && self.discards.is_empty()
    }

    fn next_action(&mut self, view: &PlayerView) -> Action {
        self.actions.pop_front().unwrap_or_else(|| view.pass())
    }
}

impl Strategy for ScriptedStrategy {
    fn declare_attacker(&mut self, _view: &PlayerView) -> AttackingDecision {
        self.attacks.pop_front().unwrap_or_default()
    }

    fn declare_blocker(&mut self, _view: &PlayerView) -> BlockingDecision {
        self.blocks.pop_front().unwrap_or_default()
    }

    fn perform_prioritized_action(&mut self, view: &PlayerView) -> Action {
        self.next_action(view)
    }

    fn perform_non_prioritized_action(&mut self, view: &PlayerView) -> Action {
        self.next_action(view)
    }

    fn perform_required_action(
        &mut self,
        view: &PlayerView,
        kind: ActionKind,
        parameters: &Parameters,
    ) -> Action {
        match kind {
            ActionKind::Discard => {
                let cards = self.discards.pop_front().unwrap_or_default();
                Action::discard(view.player_id(), parameters.amount().max(0) as usize, cards)
            }
            _ => Action::none(view.player_id()),
        }
    }
}
