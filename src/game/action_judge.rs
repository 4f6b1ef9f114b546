//! Action judge: priority passing and the stack
//!
//! Rejected proposals count as a pass so play always moves forward.

use crate::core::{Action, ActionKind, PlayerId};
use crate::game::registry::{ActionSpeed, ExecutionRegistry};
use crate::game::results::{ExecutionResult, QueueingResult};
use crate::game::state::Tabletop;
use crate::Result;
use std::sync::Arc;

pub struct ActionJudge {
    registry: Arc<ExecutionRegistry>,
}

impl ActionJudge {
    pub fn new(registry: Arc<ExecutionRegistry>) -> Self {
        ActionJudge { registry }
    }

    pub fn registry(&self) -> &ExecutionRegistry {
        &self.registry
    }

    /// Offer an action from the player holding priority
    pub fn queue_action(&self, tabletop: &mut Tabletop, action: Action) -> Result<QueueingResult> {
        let mut result = QueueingResult::default();
        let holder = tabletop.priority.unwrap_or(action.owner);

        match action.kind {
            ActionKind::None | ActionKind::Pass => {
                self.pass(tabletop, holder, &mut result)?;
                return Ok(result);
            }
            ActionKind::Unknown => {
                result.push(format!("Rejected unrecognized action from player {}", action.owner));
                self.pass(tabletop, holder, &mut result)?;
                return Ok(result);
            }
            _ => {}
        }

        let handler = self.registry.find_action_handler(action.kind)?;
        let validation = handler.validate(tabletop, &self.registry, &action)?;
        if !validation.is_valid() {
            result.push(format!("Rejected {action}"));
            result.messages.extend(validation.messages());
            self.pass(tabletop, holder, &mut result)?;
            return Ok(result);
        }

        match handler.speed() {
            ActionSpeed::Pass => self.pass(tabletop, holder, &mut result)?,
            ActionSpeed::Special => {
                let performed = handler.perform(tabletop, &self.registry, &action)?;
                result.messages.extend(performed.messages);
                tabletop.consecutive_passes = 0;
                result.special_performed = true;
            }
            ActionSpeed::Normal => {
                let stack_size = tabletop.stack.len();
                let performed = handler.perform(tabletop, &self.registry, &action)?;
                result.messages.extend(performed.messages);
                // Nothing reached the stack, so the player passed after all
                if tabletop.stack.len() > stack_size {
                    tabletop.consecutive_passes = 0;
                    tabletop.priority = Some(tabletop.opponent_of(holder)?);
                    result.normal_performed = true;
                } else {
                    self.pass(tabletop, holder, &mut result)?;
                }
            }
            ActionSpeed::Mandatory => {
                result.push(format!("Rejected {action}: only performed when the rules require it"));
                self.pass(tabletop, holder, &mut result)?;
            }
        }

        Ok(result)
    }

    /// Give up priority; resolves the top of the stack after two passes in a row
    fn pass(&self, tabletop: &mut Tabletop, holder: PlayerId, result: &mut QueueingResult) -> Result<()> {
        tabletop.consecutive_passes = tabletop.consecutive_passes.saturating_add(1);
        tabletop.priority = Some(tabletop.opponent_of(holder)?);

        if tabletop.consecutive_passes >= 2 {
            if let Some(item) = tabletop.stack.pop() {
                let handler = self.registry.find_action_handler(item.action.kind)?;
                let resolved = handler.resolve(tabletop, &item.action)?;
                result.messages.extend(resolved.messages);
                result.stack_resolved = true;
                tabletop.consecutive_passes = 0;
                tabletop.priority = Some(tabletop.active_player_id());
            }
        }

        Ok(())
    }

    /// Apply an action outright, outside of priority
    ///
    /// An invalid action is replaced by its handler's fallback when there is
    /// one; otherwise nothing happens.
    pub fn execute_action(&self, tabletop: &mut Tabletop, action: Action) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new();
        if matches!(action.kind, ActionKind::None | ActionKind::Pass) {
            return Ok(result);
        }
        if action.kind == ActionKind::Unknown {
            result.push(format!("Rejected unrecognized action from player {}", action.owner));
            return Ok(result);
        }

        let handler = self.registry.find_action_handler(action.kind)?;
        let validation = handler.validate(tabletop, &self.registry, &action)?;

        let action = if validation.is_valid() {
            action
        } else {
            result.push(format!("Rejected {action}"));
            result.messages.extend(validation.messages());

            let Some(fallback) = handler.fallback(tabletop, &action) else {
                return Ok(result);
            };
            if !handler.validate(tabletop, &self.registry, &fallback)?.is_valid() {
                return Ok(result);
            }
            result.push(format!("Substituted {fallback}"));
            fallback
        };

        result.merge(handler.perform(tabletop, &self.registry, &action)?);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardId, CardType, Color, ManaAbility, TurnId};
    use crate::game::registry::ActionHandler;
    use crate::game::validation::ValidationResult;
    use crate::zones::Zone;

    fn setup() -> (ActionJudge, Tabletop, PlayerId, PlayerId) {
        let mut tabletop = Tabletop::new_two_player("Alice", "Bob", 20);
        tabletop.turn_id = TurnId::new(1);
        let alice = tabletop.active_player_id();
        let bob = tabletop.non_active_player_id();
        tabletop.priority = Some(alice);
        (ActionJudge::new(Arc::new(ExecutionRegistry::standard())), tabletop, alice, bob)
    }

    fn forest(owner: PlayerId) -> impl FnOnce(CardId) -> Card {
        move |id| {
            Card::new(id, "Forest", owner)
                .with_type(CardType::Land)
                .with_mana_ability(ManaAbility::tap_for(Color::Green))
        }
    }

    fn elves(owner: PlayerId) -> impl FnOnce(CardId) -> Card {
        move |id| {
            Card::new(id, "Llanowar Elves", owner)
                .with_mana_cost("G")
                .with_type(CardType::Creature)
                .with_power_toughness(1, 1)
        }
    }

    #[test]
    fn test_pass_hands_priority_over() {
        let (judge, mut tabletop, alice, bob) = setup();

        let result = judge.queue_action(&mut tabletop, Action::pass(alice)).unwrap();
        assert!(!result.special_performed && !result.normal_performed && !result.stack_resolved);
        assert_eq!(tabletop.priority, Some(bob));
        assert_eq!(tabletop.consecutive_passes, 1);

        judge.queue_action(&mut tabletop, Action::none(bob)).unwrap();
        assert_eq!(tabletop.priority, Some(alice));
        assert_eq!(tabletop.consecutive_passes, 2);
    }

    #[test]
    fn test_play_land_keeps_priority() {
        let (judge, mut tabletop, alice, _) = setup();
        let land = tabletop.create_card(alice, Zone::Hand, forest(alice)).unwrap();

        let result = judge.queue_action(&mut tabletop, Action::play_land(alice, land)).unwrap();
        assert!(result.special_performed);
        assert_eq!(tabletop.priority, Some(alice));
        assert!(tabletop.battlefield.contains(land));
    }

    #[test]
    fn test_invalid_action_counts_as_pass() {
        let (judge, mut tabletop, alice, bob) = setup();
        let card = tabletop.create_card(alice, Zone::Hand, elves(alice)).unwrap();

        let result = judge
            .queue_action(&mut tabletop, Action::play_land(alice, card))
            .unwrap();
        assert!(!result.special_performed);
        assert!(result.messages[0].starts_with("Rejected"));
        assert_eq!(tabletop.priority, Some(bob));
        assert_eq!(tabletop.consecutive_passes, 1);
        assert!(tabletop.player(alice).unwrap().zones.hand.contains(card));
    }

    #[test]
    fn test_unseated_owner_counts_as_pass() {
        let (judge, mut tabletop, alice, bob) = setup();
        let land = tabletop.create_card(alice, Zone::Hand, forest(alice)).unwrap();
        let stranger = PlayerId::new(77);

        let result = judge
            .queue_action(&mut tabletop, Action::play_land(stranger, land))
            .unwrap();
        assert!(!result.special_performed);
        assert!(result.messages[0].starts_with("Rejected"));
        assert!(result.messages.iter().any(|message| message.contains("not seated")));
        assert_eq!(tabletop.priority, Some(bob));
        assert!(tabletop.player(alice).unwrap().zones.hand.contains(land));

        let discard = judge
            .execute_action(&mut tabletop, Action::discard(stranger, 1, [land]))
            .unwrap();
        assert!(discard.messages[0].starts_with("Rejected"));
        assert!(tabletop.player(alice).unwrap().zones.hand.contains(land));
    }

    /// Accepts every cast but never puts anything on the stack
    struct FizzlingHandler;

    impl ActionHandler for FizzlingHandler {
        fn speed(&self) -> ActionSpeed {
            ActionSpeed::Normal
        }

        fn validate(&self, _: &Tabletop, _: &ExecutionRegistry, _: &Action) -> Result<ValidationResult> {
            Ok(ValidationResult::success())
        }

        fn perform(&self, _: &mut Tabletop, _: &ExecutionRegistry, _: &Action) -> Result<ExecutionResult> {
            Ok(ExecutionResult::with_message("Payment failed"))
        }
    }

    #[test]
    fn test_normal_action_without_stack_item_is_a_pass() {
        let mut registry = ExecutionRegistry::standard();
        registry.register_action_handler(ActionKind::PlayNonLand, Arc::new(FizzlingHandler));
        let judge = ActionJudge::new(Arc::new(registry));
        let (_, mut tabletop, alice, bob) = setup();
        let card = tabletop.create_card(alice, Zone::Hand, elves(alice)).unwrap();
        let cost = tabletop.card(card).unwrap().play_cost();

        let result = judge
            .queue_action(&mut tabletop, Action::play_non_land(alice, card, cost))
            .unwrap();
        assert!(!result.normal_performed);
        assert_eq!(result.messages, vec!["Payment failed".to_string()]);
        assert!(tabletop.stack.is_empty());
        assert_eq!(tabletop.priority, Some(bob));
        assert_eq!(tabletop.consecutive_passes, 1);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let (judge, mut tabletop, alice, bob) = setup();
        let result = judge.queue_action(&mut tabletop, Action::unknown(alice)).unwrap();
        assert_eq!(result.messages.len(), 1);
        assert_eq!(tabletop.priority, Some(bob));
    }

    #[test]
    fn test_spell_resolves_after_two_passes() {
        let (judge, mut tabletop, alice, bob) = setup();
        tabletop.create_card(alice, Zone::Battlefield, forest(alice)).unwrap();
        let card = tabletop.create_card(alice, Zone::Hand, elves(alice)).unwrap();
        let cost = tabletop.card(card).unwrap().play_cost();

        let cast = judge
            .queue_action(&mut tabletop, Action::play_non_land(alice, card, cost))
            .unwrap();
        assert!(cast.normal_performed);
        assert_eq!(tabletop.stack.len(), 1);
        assert_eq!(tabletop.priority, Some(bob));

        judge.queue_action(&mut tabletop, Action::pass(bob)).unwrap();
        assert_eq!(tabletop.stack.len(), 1);

        let resolved = judge.queue_action(&mut tabletop, Action::pass(alice)).unwrap();
        assert!(resolved.stack_resolved);
        assert!(tabletop.stack.is_empty());
        assert!(tabletop.battlefield.contains(card));
        assert_eq!(tabletop.consecutive_passes, 0);
        assert_eq!(tabletop.priority, Some(alice));
    }

    #[test]
    fn test_mandatory_action_with_priority_is_a_pass() {
        let (judge, mut tabletop, alice, bob) = setup();
        let result = judge
            .queue_action(&mut tabletop, Action::discard(alice, 0, []))
            .unwrap();
        assert!(result.messages[0].starts_with("Rejected"));
        assert_eq!(tabletop.priority, Some(bob));
        assert_eq!(tabletop.consecutive_passes, 1);
    }

    #[test]
    fn test_execute_action_uses_fallback() {
        let (judge, mut tabletop, alice, _) = setup();
        for _ in 0..3 {
            tabletop.create_card(alice, Zone::Hand, elves(alice)).unwrap();
        }

        let bogus = Action::discard(alice, 2, [CardId::new(999)]);
        let result = judge.execute_action(&mut tabletop, bogus).unwrap();
        assert!(result.messages.iter().any(|m| m.starts_with("Substituted")));
        assert_eq!(tabletop.player(alice).unwrap().zones.hand.len(), 1);
        assert_eq!(tabletop.player(alice).unwrap().zones.graveyard.len(), 2);
    }

    #[test]
    fn test_missing_handler_is_fatal() {
        let judge = ActionJudge::new(Arc::new(ExecutionRegistry::new()));
        let mut tabletop = Tabletop::new_two_player("Alice", "Bob", 20);
        let alice = tabletop.active_player_id();
        let result = judge.execute_action(&mut tabletop, Action::discard(alice, 0, []));
        assert!(matches!(
            result,
            Err(crate::JudgeError::MissingActionHandler(ActionKind::Discard))
        ));
    }
}
