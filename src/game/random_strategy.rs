//! Random strategy: uniform choices from what is legal
//!
//! Seeded so that a match replays identically from the same seed.

use crate::core::{Action, ActionKind, CardId, Parameters};
use crate::game::combat::{AttackingDecision, BlockingDecision, Combat};
use crate::game::strategy::{PlayerView, Strategy};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

pub struct RandomStrategy {
    rng: ChaCha12Rng,
}

impl RandomStrategy {
    pub fn with_seed(seed: u64) -> Self {
        RandomStrategy {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    /// Random subset of `candidates`, keeping their order
    fn subset(&mut self, candidates: &[CardId]) -> Vec<CardId> {
        candidates
            .iter()
            .copied()
            .filter(|_| self.rng.gen_bool(0.5))
            .collect()
    }
}

impl Strategy for RandomStrategy {
    fn declare_attacker(&mut self, view: &PlayerView) -> AttackingDecision {
        let attackers = self.subset(view.attack_candidates());
        if attackers.is_empty() {
            AttackingDecision::None
        } else {
            AttackingDecision::declared(attackers)
        }
    }

    fn declare_blocker(&mut self, view: &PlayerView) -> BlockingDecision {
        let attackers = view.attackers();
        if attackers.is_empty() {
            return BlockingDecision::None;
        }

        let mut combats: Vec<Combat> = Vec::new();
        for blocker in self.subset(view.block_candidates()) {
            let Some(&attacker) = attackers.choose(&mut self.rng) else {
                continue;
            };
            match combats.iter_mut().find(|c| c.attacker == attacker) {
                Some(combat) => combat.blockers.push(blocker),
                None => combats.push(Combat::new(attacker, [blocker])),
            }
        }

        if combats.is_empty() {
            BlockingDecision::None
        } else {
            BlockingDecision::Declared(combats)
        }
    }

    fn perform_prioritized_action(&mut self, view: &PlayerView) -> Action {
        // Passing is always one of the options
        let choice = self.rng.gen_range(0..=view.legal_actions().len());
        view.legal_actions()
            .get(choice)
            .cloned()
            .unwrap_or_else(|| view.pass())
    }

    fn perform_non_prioritized_action(&mut self, view: &PlayerView) -> Action {
        self.perform_prioritized_action(view)
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
                let chosen: Vec<CardId> = view
                    .hand()
                    .choose_multiple(&mut self.rng, amount)
                    .copied()
                    .collect();
                Action::discard(view.player_id(), amount, chosen)
            }
            _ => Action::none(view.player_id()),
        }
    }
}
