//! Rule validation results and combat decision checks
//!
//! Validation never fails with an error for rule violations: it returns a
//! `ValidationResult` listing what was wrong. Reasons own their data so they
//! can outlive the tabletop borrow that produced them.

use crate::core::{CardId, Creature};
use crate::game::combat::{AttackingDecision, BlockingDecision};
use crate::game::state::Tabletop;
use rustc_hash::FxHashSet;
use std::fmt;

/// Category of a rule violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonCause {
    EntityMissing,
    NotOnBattlefield,
    NotInHand,
    NotACreature,
    WrongCardType,
    WrongController,
    NotActivePlayer,
    NoPriority,
    Tapped,
    SummoningSick,
    Duplicate,
    UndeclaredAttacker,
    StackNotEmpty,
    ActionPending,
    LandAlreadyPlayed,
    InsufficientMana,
    InvalidAmount,
    Unsupported,
}

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReason {
    pub entity: Option<u32>,
    pub cause: ReasonCause,
    /// Names of the cards or players involved
    pub references: Vec<String>,
    /// Comprehensive rules sections the violation relates to
    pub rules: Vec<String>,
    pub message: String,
}

impl ValidationReason {
    pub fn new(cause: ReasonCause, message: impl Into<String>) -> Self {
        ValidationReason {
            entity: None,
            cause,
            references: Vec::new(),
            rules: Vec::new(),
            message: message.into(),
        }
    }

    pub fn with_entity(mut self, entity: u32) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.references.push(reference.into());
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rules.push(rule.into());
        self
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.rules.is_empty() {
            write!(f, " (rule {})", self.rules.join(", "))?;
        }
        Ok(())
    }
}

/// Outcome of a validation; empty means success
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    reasons: Vec<ValidationReason>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failure(reason: ValidationReason) -> Self {
        ValidationResult {
            reasons: vec![reason],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn push(&mut self, reason: ValidationReason) {
        self.reasons.push(reason);
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.reasons.extend(other.reasons);
    }

    pub fn reasons(&self) -> &[ValidationReason] {
        &self.reasons
    }

    /// One human-readable line per reason
    pub fn messages(&self) -> Vec<String> {
        self.reasons.iter().map(|r| r.to_string()).collect()
    }
}

/// Look up a battlefield creature, recording why it is unusable if it isn't one
fn battlefield_creature<'a>(
    tabletop: &'a Tabletop,
    card_id: CardId,
    result: &mut ValidationResult,
) -> Option<Creature<'a>> {
    let Ok(card) = tabletop.card(card_id) else {
        result.push(
            ValidationReason::new(ReasonCause::EntityMissing, format!("Card {card_id} does not exist"))
                .with_entity(card_id.as_u32()),
        );
        return None;
    };

    if !tabletop.battlefield.contains(card_id) {
        result.push(
            ValidationReason::new(
                ReasonCause::NotOnBattlefield,
                format!("{} is not on the battlefield", card.name),
            )
            .with_entity(card_id.as_u32())
            .with_reference(card.name.as_str()),
        );
        return None;
    }

    let creature = Creature::view(card, tabletop.turn_id);
    if creature.is_none() {
        result.push(
            ValidationReason::new(ReasonCause::NotACreature, format!("{} is not a creature", card.name))
                .with_entity(card_id.as_u32())
                .with_reference(card.name.as_str()),
        );
    }
    creature
}

/// Check an attack declared by the active player
///
/// Attackers must be untapped creatures the active player controls that
/// have been under their control since the start of the turn.
pub fn validate_attacking_decision(tabletop: &Tabletop, decision: &AttackingDecision) -> ValidationResult {
    let mut result = ValidationResult::success();
    let active = tabletop.active_player_id();
    let mut seen = FxHashSet::default();

    for &attacker in decision.attackers() {
        if !seen.insert(attacker) {
            result.push(
                ValidationReason::new(ReasonCause::Duplicate, format!("Card {attacker} declared as attacker twice"))
                    .with_entity(attacker.as_u32())
                    .with_rule("508.1a"),
            );
            continue;
        }

        let Some(creature) = battlefield_creature(tabletop, attacker, &mut result) else {
            continue;
        };
        let name = creature.card().name.as_str();

        if creature.controller() != active {
            result.push(
                ValidationReason::new(
                    ReasonCause::WrongController,
                    format!("{name} is not controlled by the active player"),
                )
                .with_entity(attacker.as_u32())
                .with_reference(name)
                .with_rule("508.1a"),
            );
        }
        if creature.is_tapped() {
            result.push(
                ValidationReason::new(ReasonCause::Tapped, format!("{name} is tapped and cannot attack"))
                    .with_entity(attacker.as_u32())
                    .with_reference(name)
                    .with_rule("508.1a"),
            );
        }
        if creature.has_summoning_sickness() {
            result.push(
                ValidationReason::new(
                    ReasonCause::SummoningSick,
                    format!("{name} came under its controller's control this turn"),
                )
                .with_entity(attacker.as_u32())
                .with_reference(name)
                .with_rule("302.6"),
            );
        }
    }

    result
}

/// Check blocks declared by the non-active player
///
/// Every blocked creature must be a declared attacker. Blockers must be
/// untapped creatures the defending player controls, and each may block
/// only one attacker.
pub fn validate_blocking_decision(
    tabletop: &Tabletop,
    attacking: &AttackingDecision,
    decision: &BlockingDecision,
) -> ValidationResult {
    let mut result = ValidationResult::success();
    let defender = tabletop.non_active_player_id();
    let attackers = attacking.attackers();
    let mut blocked = FxHashSet::default();
    let mut used_blockers = FxHashSet::default();

    for combat in decision.combats() {
        if !attackers.contains(&combat.attacker) {
            result.push(
                ValidationReason::new(
                    ReasonCause::UndeclaredAttacker,
                    format!("Card {} is not attacking", combat.attacker),
                )
                .with_entity(combat.attacker.as_u32())
                .with_rule("509.1a"),
            );
        }
        if !blocked.insert(combat.attacker) {
            result.push(
                ValidationReason::new(
                    ReasonCause::Duplicate,
                    format!("Attacker {} appears in more than one block", combat.attacker),
                )
                .with_entity(combat.attacker.as_u32()),
            );
        }

        for &blocker in &combat.blockers {
            if !used_blockers.insert(blocker) {
                result.push(
                    ValidationReason::new(ReasonCause::Duplicate, format!("Card {blocker} blocks more than once"))
                        .with_entity(blocker.as_u32())
                        .with_rule("509.1a"),
                );
                continue;
            }

            let Some(creature) = battlefield_creature(tabletop, blocker, &mut result) else {
                continue;
            };
            let name = creature.card().name.as_str();

            if creature.controller() != defender {
                result.push(
                    ValidationReason::new(
                        ReasonCause::WrongController,
                        format!("{name} is not controlled by the defending player"),
                    )
                    .with_entity(blocker.as_u32())
                    .with_reference(name)
                    .with_rule("509.1a"),
                );
            }
            if !creature.can_block() {
                result.push(
                    ValidationReason::new(ReasonCause::Tapped, format!("{name} is tapped and cannot block"))
                        .with_entity(blocker.as_u32())
                        .with_reference(name)
                        .with_rule("509.1a"),
                );
            }
        }
    }

    result
}
