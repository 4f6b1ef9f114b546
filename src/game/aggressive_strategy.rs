//! Aggressive strategy: develop the board and swing with everything
//!
//! - Plays a land first, then the most expensive castable card
//! - Attacks with every creature able to attack
//! - Blocks an attacker only when the blocker survives or trades with it
//! - Discards the most expensive cards first

use crate::core::{Action, ActionKind, CardId, Cost, Parameters};
use crate::game::combat::{AttackingDecision, BlockingDecision, Combat};
use crate::game::strategy::{PlayerView, Strategy};

#[derive(Debug, Default, Clone, Copy)]
pub struct AggressiveStrategy;

impl AggressiveStrategy {
    pub fn new() -> Self {
        AggressiveStrategy
    }

    fn mana_value(action: &Action) -> u32 {
        match &action.cost {
            Cost::PayingMana(cost) => cost.cmc(),
            _ => 0,
        }
    }
}

impl Strategy for AggressiveStrategy {
    fn declare_attacker(&mut self, view: &PlayerView) -> AttackingDecision {
        let candidates = view.attack_candidates();
        if candidates.is_empty() {
            AttackingDecision::None
        } else {
            AttackingDecision::declared(candidates.iter().copied())
        }
    }

    fn declare_blocker(&mut self, view: &PlayerView) -> BlockingDecision {
        let mut available: Vec<CardId> = view.block_candidates().to_vec();
        let mut combats = Vec::new();

        for &attacker_id in view.attackers() {
            let Some(attacker) = view.creature(attacker_id) else {
                continue;
            };
            let good_block = available.iter().position(|&blocker_id| {
                view.creature(blocker_id).is_some_and(|blocker| {
                    let survives = blocker.toughness() > attacker.power();
                    let trades = blocker.power() >= attacker.toughness();
                    survives || trades
                })
            });
            if let Some(index) = good_block {
                combats.push(Combat::new(attacker_id, [available.remove(index)]));
            }
        }

        if combats.is_empty() {
            BlockingDecision::None
        } else {
            BlockingDecision::Declared(combats)
        }
    }

    fn perform_prioritized_action(&mut self, view: &PlayerView) -> Action {
        let actions = view.legal_actions();
        if let Some(land) = actions.iter().find(|a| a.kind == ActionKind::PlayLand) {
            return land.clone();
        }
        actions
            .iter()
            .filter(|a| a.kind == ActionKind::PlayNonLand)
            // First of equally expensive cards wins
            .rev()
            .max_by_key(|a| Self::mana_value(a))
            .cloned()
            .unwrap_or_else(|| view.pass())
    }

    fn perform_non_prioritized_action(&mut self, view: &PlayerView) -> Action {
        view.pass()
    }

    fn perform_required_action(
        &mut self,
        view: &PlayerView,
        kind: ActionKind,
        parameters: &Parameters,
    ) -> Action {
        match kind {
            ActionKind::Discard => {
                let amount = parameters.amount().max(0) as usize;
                let mut hand: Vec<CardId> = view.hand().to_vec();
                hand.sort_by_key(|&id| {
                    std::cmp::Reverse(view.card(id).map_or(0, |card| card.mana_cost.cmc()))
                });
                hand.truncate(amount);
                Action::discard(view.player_id(), amount, hand)
            }
            _ => Action::none(view.player_id()),
        }
    }
}
