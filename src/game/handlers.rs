//! Standard cost and action handlers

use crate::core::{Action, CardId, Cost, Creature, Player, PlayerId};
use crate::game::assistant::potential_mana_pool;
use crate::game::registry::{ActionHandler, ActionSpeed, CostHandler, ExecutionRegistry, Payment};
use crate::game::results::ExecutionResult;
use crate::game::state::{StackItem, Tabletop};
use crate::game::validation::{ReasonCause, ValidationReason, ValidationResult};
use crate::zones::Zone;
use crate::Result;
use rustc_hash::FxHashSet;

fn card_name(tabletop: &Tabletop, card: CardId) -> String {
    tabletop
        .card(card)
        .map(|c| c.name.to_string())
        .unwrap_or_else(|_| format!("card {card}"))
}

fn player_name(tabletop: &Tabletop, player: PlayerId) -> String {
    tabletop
        .player(player)
        .map(|p| p.name.to_string())
        .unwrap_or_else(|_| format!("player {player}"))
}

/// The player proposing `action`, or a recorded reason when nobody holds that seat
fn seated_owner<'a>(tabletop: &'a Tabletop, action: &Action, result: &mut ValidationResult) -> Option<&'a Player> {
    let player = tabletop.player(action.owner).ok();
    if player.is_none() {
        result.push(
            ValidationReason::new(ReasonCause::EntityMissing, format!("Player {} is not seated", action.owner))
                .with_entity(action.owner.as_u32()),
        );
    }
    player
}

/// Costs nothing
pub struct NoCostHandler;

impl CostHandler for NoCostHandler {
    fn validate(&self, _: &Tabletop, _: &ExecutionRegistry, _: &Payment) -> Result<ValidationResult> {
        Ok(ValidationResult::success())
    }

    fn pay(&self, _: &mut Tabletop, _: &ExecutionRegistry, _: &Payment) -> Result<ValidationResult> {
        Ok(ValidationResult::success())
    }
}

/// Rejects every payment
pub struct UnknownCostHandler;

impl UnknownCostHandler {
    fn rejection() -> ValidationResult {
        ValidationResult::failure(ValidationReason::new(
            ReasonCause::Unsupported,
            "Cost cannot be paid: it is not understood by the engine",
        ))
    }
}

impl CostHandler for UnknownCostHandler {
    fn validate(&self, _: &Tabletop, _: &ExecutionRegistry, _: &Payment) -> Result<ValidationResult> {
        Ok(Self::rejection())
    }

    fn pay(&self, _: &mut Tabletop, _: &ExecutionRegistry, _: &Payment) -> Result<ValidationResult> {
        Ok(Self::rejection())
    }
}

/// {T}: tap the untapped source permanent
pub struct TappingCostHandler;

impl CostHandler for TappingCostHandler {
    fn validate(
        &self,
        tabletop: &Tabletop,
        _: &ExecutionRegistry,
        payment: &Payment,
    ) -> Result<ValidationResult> {
        let Some(source) = payment.source else {
            return Ok(ValidationResult::failure(ValidationReason::new(
                ReasonCause::Unsupported,
                "A tapping cost needs a source permanent",
            )));
        };

        let mut result = ValidationResult::success();
        let card = tabletop.card(source)?;
        let name = card.name.as_str();

        if !tabletop.battlefield.contains(source) {
            result.push(
                ValidationReason::new(ReasonCause::NotOnBattlefield, format!("{name} is not on the battlefield"))
                    .with_entity(source.as_u32())
                    .with_reference(name),
            );
        }
        if card.controller != payment.payer {
            result.push(
                ValidationReason::new(ReasonCause::WrongController, format!("{name} is controlled by another player"))
                    .with_entity(source.as_u32())
                    .with_reference(name)
                    .with_rule("602.2"),
            );
        }
        if card.tapped {
            result.push(
                ValidationReason::new(ReasonCause::Tapped, format!("{name} is already tapped"))
                    .with_entity(source.as_u32())
                    .with_reference(name)
                    .with_rule("602.5a"),
            );
        }
        if Creature::view(card, tabletop.turn_id).is_some_and(|c| c.has_summoning_sickness()) {
            result.push(
                ValidationReason::new(ReasonCause::SummoningSick, format!("{name} cannot tap the turn it arrived"))
                    .with_entity(source.as_u32())
                    .with_reference(name)
                    .with_rule("302.6"),
            );
        }

        Ok(result)
    }

    fn pay(
        &self,
        tabletop: &mut Tabletop,
        registry: &ExecutionRegistry,
        payment: &Payment,
    ) -> Result<ValidationResult> {
        let validation = self.validate(tabletop, registry, payment)?;
        if let (true, Some(source)) = (validation.is_valid(), payment.source) {
            tabletop.card_mut(source)?.tap();
        }
        Ok(validation)
    }
}

/// Pays mana from the payer's pool
///
/// With `auto_tap`, untapped mana sources are activated once each in
/// battlefield order until the pool covers the cost.
pub struct PayingManaCostHandler;

impl CostHandler for PayingManaCostHandler {
    fn validate(
        &self,
        tabletop: &Tabletop,
        registry: &ExecutionRegistry,
        payment: &Payment,
    ) -> Result<ValidationResult> {
        let Cost::PayingMana(mana) = payment.cost else {
            return Ok(ValidationResult::failure(ValidationReason::new(
                ReasonCause::Unsupported,
                format!("{} is not a mana cost", payment.cost),
            )));
        };

        let pool = if payment.auto_tap {
            potential_mana_pool(tabletop, registry, payment.payer)?
        } else {
            tabletop.player(payment.payer)?.mana_pool
        };

        if pool.can_pay(&mana) {
            Ok(ValidationResult::success())
        } else {
            Ok(ValidationResult::failure(
                ValidationReason::new(
                    ReasonCause::InsufficientMana,
                    format!("Cannot pay {mana} with {pool} available"),
                )
                .with_reference(player_name(tabletop, payment.payer))
                .with_rule("601.2g"),
            ))
        }
    }

    fn pay(
        &self,
        tabletop: &mut Tabletop,
        registry: &ExecutionRegistry,
        payment: &Payment,
    ) -> Result<ValidationResult> {
        let validation = self.validate(tabletop, registry, payment)?;
        let Cost::PayingMana(mana) = payment.cost else {
            return Ok(validation);
        };
        if !validation.is_valid() {
            return Ok(validation);
        }

        if payment.auto_tap {
            let sources: Vec<CardId> = tabletop
                .permanents_of(payment.payer)
                .filter(|card| !card.tapped && card.has_mana_ability())
                .map(|card| card.id)
                .collect();

            for source in sources {
                if tabletop.player(payment.payer)?.mana_pool.can_pay(&mana) {
                    break;
                }
                let abilities = tabletop.card(source)?.mana_abilities.clone();
                for ability in abilities {
                    let ability_payment = Payment::for_ability(payment.payer, source, ability.cost);
                    if registry.pay(tabletop, &ability_payment)?.is_valid() {
                        tabletop
                            .player_mut(payment.payer)?
                            .mana_pool
                            .add_pool(&ability.produces);
                        break;
                    }
                }
            }
        }

        let name = player_name(tabletop, payment.payer);
        match tabletop.player_mut(payment.payer)?.mana_pool.pay_cost(&mana) {
            Ok(()) => Ok(ValidationResult::success()),
            Err(message) => Ok(ValidationResult::failure(
                ValidationReason::new(ReasonCause::InsufficientMana, message)
                    .with_reference(name)
                    .with_rule("601.2h"),
            )),
        }
    }
}

/// Common checks for playing a card from hand
fn validate_card_in_hand(tabletop: &Tabletop, action: &Action, result: &mut ValidationResult) -> Result<Option<CardId>> {
    let Some(owner) = seated_owner(tabletop, action, result) else {
        return Ok(None);
    };
    let Some(card_id) = action.source else {
        result.push(ValidationReason::new(ReasonCause::Unsupported, "No card named to play"));
        return Ok(None);
    };

    if !tabletop.cards.contains(card_id) {
        result.push(
            ValidationReason::new(ReasonCause::EntityMissing, format!("Card {card_id} does not exist"))
                .with_entity(card_id.as_u32()),
        );
        return Ok(None);
    }

    let name = card_name(tabletop, card_id);
    if !owner.zones.hand.contains(card_id) {
        result.push(
            ValidationReason::new(ReasonCause::NotInHand, format!("{name} is not in the player's hand"))
                .with_entity(card_id.as_u32())
                .with_reference(name.as_str()),
        );
    }
    if !tabletop.is_active(action.owner) {
        result.push(
            ValidationReason::new(ReasonCause::NotActivePlayer, "Only the active player may play cards")
                .with_reference(player_name(tabletop, action.owner))
                .with_rule("307.1"),
        );
    }
    if tabletop.priority != Some(action.owner) {
        result.push(
            ValidationReason::new(ReasonCause::NoPriority, "Player does not hold priority")
                .with_reference(player_name(tabletop, action.owner))
                .with_rule("117.1"),
        );
    }

    Ok(Some(card_id))
}

/// Gives up priority; bookkeeping is done by the action judge
pub struct PassHandler;

impl ActionHandler for PassHandler {
    fn speed(&self) -> ActionSpeed {
        ActionSpeed::Pass
    }

    fn validate(&self, _: &Tabletop, _: &ExecutionRegistry, _: &Action) -> Result<ValidationResult> {
        Ok(ValidationResult::success())
    }

    fn perform(&self, _: &mut Tabletop, _: &ExecutionRegistry, _: &Action) -> Result<ExecutionResult> {
        Ok(ExecutionResult::new())
    }
}

/// Put a land from hand onto the battlefield (special action)
pub struct PlayLandHandler;

impl ActionHandler for PlayLandHandler {
    fn speed(&self) -> ActionSpeed {
        ActionSpeed::Special
    }

    fn validate(
        &self,
        tabletop: &Tabletop,
        _: &ExecutionRegistry,
        action: &Action,
    ) -> Result<ValidationResult> {
        let mut result = ValidationResult::success();
        let Some(card_id) = validate_card_in_hand(tabletop, action, &mut result)? else {
            return Ok(result);
        };

        let card = tabletop.card(card_id)?;
        if !card.is_land() {
            result.push(
                ValidationReason::new(ReasonCause::WrongCardType, format!("{} is not a land", card.name))
                    .with_entity(card_id.as_u32())
                    .with_reference(card.name.as_str()),
            );
        }
        if !tabletop.stack.is_empty() {
            result.push(
                ValidationReason::new(ReasonCause::StackNotEmpty, "Lands can only be played while the stack is empty")
                    .with_rule("305.1"),
            );
        }
        if tabletop.player(action.owner).is_ok_and(|player| !player.can_play_land()) {
            result.push(
                ValidationReason::new(ReasonCause::LandAlreadyPlayed, "A land was already played this turn")
                    .with_reference(player_name(tabletop, action.owner))
                    .with_rule("305.2"),
            );
        }

        Ok(result)
    }

    fn perform(
        &self,
        tabletop: &mut Tabletop,
        _: &ExecutionRegistry,
        action: &Action,
    ) -> Result<ExecutionResult> {
        let Some(card_id) = action.source else {
            return Ok(ExecutionResult::new());
        };
        tabletop.move_card(card_id, Zone::Hand, Zone::Battlefield)?;
        tabletop.player_mut(action.owner)?.played_land_count += 1;

        Ok(ExecutionResult::with_message(format!(
            "{} plays {}",
            player_name(tabletop, action.owner),
            card_name(tabletop, card_id)
        )))
    }
}

/// Play a non-land card: pay its cost and put it on the stack
pub struct PlayNonLandHandler;

impl ActionHandler for PlayNonLandHandler {
    fn speed(&self) -> ActionSpeed {
        ActionSpeed::Normal
    }

    fn validate(
        &self,
        tabletop: &Tabletop,
        registry: &ExecutionRegistry,
        action: &Action,
    ) -> Result<ValidationResult> {
        let mut result = ValidationResult::success();
        let Some(card_id) = validate_card_in_hand(tabletop, action, &mut result)? else {
            return Ok(result);
        };

        let card = tabletop.card(card_id)?;
        if card.is_land() {
            result.push(
                ValidationReason::new(ReasonCause::WrongCardType, format!("{} is a land", card.name))
                    .with_entity(card_id.as_u32())
                    .with_reference(card.name.as_str()),
            );
        }
        if action.cost != card.play_cost() {
            result.push(
                ValidationReason::new(
                    ReasonCause::Unsupported,
                    format!("{} costs {}, not {}", card.name, card.play_cost(), action.cost),
                )
                .with_entity(card_id.as_u32())
                .with_reference(card.name.as_str())
                .with_rule("601.2f"),
            );
            return Ok(result);
        }
        if tabletop.has_pending_action(action.owner) {
            result.push(
                ValidationReason::new(ReasonCause::ActionPending, "Player already has an action on the stack")
                    .with_reference(player_name(tabletop, action.owner)),
            );
        }

        result.merge(registry.validate_payment(tabletop, &Payment::for_action(action))?);
        Ok(result)
    }

    fn perform(
        &self,
        tabletop: &mut Tabletop,
        registry: &ExecutionRegistry,
        action: &Action,
    ) -> Result<ExecutionResult> {
        let Some(card_id) = action.source else {
            return Ok(ExecutionResult::new());
        };

        let payment = registry.pay(tabletop, &Payment::for_action(action))?;
        if !payment.is_valid() {
            let mut result = ExecutionResult::new();
            for message in payment.messages() {
                result.push(message);
            }
            return Ok(result);
        }

        tabletop.move_card(card_id, Zone::Hand, Zone::Stack)?;
        tabletop.stack.push(StackItem {
            action: action.clone(),
        });

        Ok(ExecutionResult::with_message(format!(
            "{} casts {}",
            player_name(tabletop, action.owner),
            card_name(tabletop, card_id)
        )))
    }

    fn resolve(&self, tabletop: &mut Tabletop, action: &Action) -> Result<ExecutionResult> {
        let Some(card_id) = action.source else {
            return Ok(ExecutionResult::new());
        };

        let destination = if tabletop.card(card_id)?.is_permanent() {
            Zone::Battlefield
        } else {
            Zone::Graveyard
        };
        tabletop.move_card(card_id, Zone::Stack, destination)?;

        Ok(ExecutionResult::with_message(format!(
            "{} resolves",
            card_name(tabletop, card_id)
        )))
    }
}

/// Discard cards from hand down to the required amount
pub struct DiscardHandler;

impl ActionHandler for DiscardHandler {
    fn speed(&self) -> ActionSpeed {
        ActionSpeed::Mandatory
    }

    fn validate(
        &self,
        tabletop: &Tabletop,
        _: &ExecutionRegistry,
        action: &Action,
    ) -> Result<ValidationResult> {
        let mut result = ValidationResult::success();
        let Some(owner) = seated_owner(tabletop, action, &mut result) else {
            return Ok(result);
        };
        let amount = action.parameters.amount();
        let chosen = &action.target.cards;

        if amount < 0 || chosen.len() != amount as usize {
            result.push(
                ValidationReason::new(
                    ReasonCause::InvalidAmount,
                    format!("Must discard exactly {amount} card(s), {} chosen", chosen.len()),
                )
                .with_reference(player_name(tabletop, action.owner))
                .with_rule("514.1"),
            );
        }

        let hand = &owner.zones.hand;
        let mut seen = FxHashSet::default();
        for &card in chosen {
            if !seen.insert(card) {
                result.push(
                    ValidationReason::new(ReasonCause::Duplicate, format!("Card {card} chosen twice"))
                        .with_entity(card.as_u32()),
                );
            } else if !hand.contains(card) {
                result.push(
                    ValidationReason::new(ReasonCause::NotInHand, format!("Card {card} is not in hand"))
                        .with_entity(card.as_u32()),
                );
            }
        }

        Ok(result)
    }

    fn perform(
        &self,
        tabletop: &mut Tabletop,
        _: &ExecutionRegistry,
        action: &Action,
    ) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new();
        let owner = player_name(tabletop, action.owner);
        for &card in &action.target.cards {
            tabletop.move_card(card, Zone::Hand, Zone::Graveyard)?;
            result.push(format!("{owner} discards {}", card_name(tabletop, card)));
        }
        Ok(result)
    }

    /// Discard the most recently drawn cards
    fn fallback(&self, tabletop: &Tabletop, action: &Action) -> Option<Action> {
        let amount = action.parameters.amount().max(0) as usize;
        let hand = &tabletop.player(action.owner).ok()?.zones.hand;
        let skip = hand.len().saturating_sub(amount);
        Some(Action::discard(action.owner, amount, hand.iter().skip(skip)))
    }
}
