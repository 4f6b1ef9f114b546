//! Zero strategy: always takes the first option
//!
//! Deterministic and cheap, which makes it the default for tests and
//! benchmarks:
//! - Takes the first legal action, otherwise passes
//! - Never attacks and never blocks
//! - Discards the first N cards from hand

use crate::core::{Action, ActionKind, Parameters};
use crate::game::combat::{AttackingDecision, BlockingDecision};
use crate::game::strategy::{PlayerView, Strategy};

#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroStrategy;

impl ZeroStrategy {
    pub fn new() -> Self {
        ZeroStrategy
    }
}

impl Strategy for ZeroStrategy {
    fn declare_attacker(&mut self, _view: &PlayerView) -> AttackingDecision {
        AttackingDecision::None
    }

    fn declare_blocker(&mut self, _view: &PlayerView) -> BlockingDecision {
        BlockingDecision::None
    }

    fn perform_prioritized_action(&mut self, view: &PlayerView) -> Action {
        view.legal_actions()
            .first()
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
                let cards = view.hand().iter().take(amount).copied();
                Action::discard(view.player_id(), amount, cards)
            }
            _ => Action::none(view.player_id()),
        }
    }
}
