//! Judicial assistant: read-only queries over the tabletop

use crate::core::{Action, CardId, Creature, ManaPool, PlayerId};
use crate::game::registry::{ExecutionRegistry, Payment};
use crate::game::state::Tabletop;
use crate::Result;
use std::sync::Arc;

/// Which player a query is about, relative to the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerModifier {
    Active,
    NonActive,
}

impl PlayerModifier {
    pub fn resolve(self, tabletop: &Tabletop) -> PlayerId {
        match self {
            PlayerModifier::Active => tabletop.active_player_id(),
            PlayerModifier::NonActive => tabletop.non_active_player_id(),
        }
    }

    /// The modifier that designates `player` on this tabletop
    pub fn of(tabletop: &Tabletop, player: PlayerId) -> Self {
        if tabletop.is_active(player) {
            PlayerModifier::Active
        } else {
            PlayerModifier::NonActive
        }
    }
}

/// Creature filter for `find_creatures`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatureModifier {
    /// Every creature on the battlefield
    None,
    /// Untapped creatures of the player without summoning sickness
    CanAttack,
    /// Untapped creatures of the player
    CanBlock,
}

/// Mana `player` could have by activating every usable mana ability
///
/// Each untapped permanent contributes its first ability whose cost
/// validates against the current state. Sources are considered
/// independently of each other and nothing is tapped.
pub fn potential_mana_pool(
    tabletop: &Tabletop,
    registry: &ExecutionRegistry,
    player: PlayerId,
) -> Result<ManaPool> {
    let mut pool = tabletop.player(player)?.mana_pool;

    for card in tabletop.permanents_of(player) {
        if card.tapped {
            continue;
        }
        for ability in &card.mana_abilities {
            let payment = Payment::for_ability(player, card.id, ability.cost);
            if registry.validate_payment(tabletop, &payment)?.is_valid() {
                pool.add_pool(&ability.produces);
                break;
            }
        }
    }

    Ok(pool)
}

/// Answers rule questions for judges and strategies without changing state
#[derive(Clone)]
pub struct JudicialAssistant {
    registry: Arc<ExecutionRegistry>,
}

impl JudicialAssistant {
    pub fn new(registry: Arc<ExecutionRegistry>) -> Self {
        JudicialAssistant { registry }
    }

    pub fn registry(&self) -> &ExecutionRegistry {
        &self.registry
    }

    /// Creatures on the battlefield matching `creature_modifier`, in battlefield order
    pub fn find_creatures<'a>(
        &self,
        tabletop: &'a Tabletop,
        player_modifier: PlayerModifier,
        creature_modifier: CreatureModifier,
    ) -> Vec<Creature<'a>> {
        let player = player_modifier.resolve(tabletop);

        tabletop
            .battlefield
            .iter()
            .filter_map(|id| tabletop.cards.get(id).ok())
            .filter_map(|card| Creature::view(card, tabletop.turn_id))
            .filter(|creature| match creature_modifier {
                CreatureModifier::None => true,
                CreatureModifier::CanAttack => {
                    creature.controller() == player && creature.can_attack()
                }
                CreatureModifier::CanBlock => creature.controller() == player && creature.can_block(),
            })
            .collect()
    }

    /// Ids of the creatures `find_creatures` would return
    pub fn find_creature_ids(
        &self,
        tabletop: &Tabletop,
        player_modifier: PlayerModifier,
        creature_modifier: CreatureModifier,
    ) -> Vec<CardId> {
        self.find_creatures(tabletop, player_modifier, creature_modifier)
            .iter()
            .map(|c| c.id())
            .collect()
    }

    /// Plays the player could start right now
    ///
    /// The non-active player never has any.
    pub fn find_legal_actions(&self, tabletop: &Tabletop, player_modifier: PlayerModifier) -> Result<Vec<Action>> {
        if player_modifier == PlayerModifier::NonActive {
            return Ok(Vec::new());
        }

        let player_id = player_modifier.resolve(tabletop);
        let player = tabletop.player(player_id)?;
        let mut actions = Vec::new();

        if tabletop.stack.is_empty() && player.can_play_land() {
            for card_id in player.zones.hand.iter() {
                if tabletop.card(card_id)?.is_land() {
                    actions.push(Action::play_land(player_id, card_id));
                }
            }
        }

        if !tabletop.has_pending_action(player_id) {
            let potential = self.calculate_potential_mana_pool(tabletop, player_modifier)?;
            for card_id in player.zones.hand.iter() {
                let card = tabletop.card(card_id)?;
                if card.is_land() {
                    continue;
                }
                if potential.can_pay(&card.mana_cost) {
                    actions.push(Action::play_non_land(player_id, card_id, card.play_cost()));
                }
            }
        }

        Ok(actions)
    }

    /// Current pool plus what every usable mana source would add
    pub fn calculate_potential_mana_pool(
        &self,
        tabletop: &Tabletop,
        player_modifier: PlayerModifier,
    ) -> Result<ManaPool> {
        potential_mana_pool(tabletop, &self.registry, player_modifier.resolve(tabletop))
    }
}
