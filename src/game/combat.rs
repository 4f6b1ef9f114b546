//! Combat decisions and damage resolution
//!
//! There is no first strike and no trample: attacker power left over after
//! every blocker has been assigned its toughness is lost.

use crate::core::{CardId, Creature, PlayerId};
use crate::game::state::Tabletop;
use crate::zones::Zone;
use crate::Result;
use smallvec::SmallVec;

/// Attackers declared by the active player, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AttackingDecision {
    /// No decision made
    #[default]
    None,
    Declared(SmallVec<[CardId; 4]>),
}

impl AttackingDecision {
    pub fn declared(attackers: impl IntoIterator<Item = CardId>) -> Self {
        AttackingDecision::Declared(attackers.into_iter().collect())
    }

    pub fn attackers(&self) -> &[CardId] {
        match self {
            AttackingDecision::None => &[],
            AttackingDecision::Declared(attackers) => attackers,
        }
    }

    pub fn is_attacking(&self, card: CardId) -> bool {
        self.attackers().contains(&card)
    }

    pub fn has_attackers(&self) -> bool {
        !self.attackers().is_empty()
    }
}

/// One attacker and the creatures blocking it, in damage assignment order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combat {
    pub attacker: CardId,
    pub blockers: SmallVec<[CardId; 2]>,
}

impl Combat {
    pub fn new(attacker: CardId, blockers: impl IntoIterator<Item = CardId>) -> Self {
        Combat {
            attacker,
            blockers: blockers.into_iter().collect(),
        }
    }
}

/// Blocks declared by the non-active player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BlockingDecision {
    /// No decision made
    #[default]
    None,
    Declared(Vec<Combat>),
}

impl BlockingDecision {
    pub fn combats(&self) -> &[Combat] {
        match self {
            BlockingDecision::None => &[],
            BlockingDecision::Declared(combats) => combats,
        }
    }

    pub fn combat_for(&self, attacker: CardId) -> Option<&Combat> {
        self.combats().iter().find(|c| c.attacker == attacker)
    }

    pub fn is_blocking(&self, card: CardId) -> bool {
        self.combats().iter().any(|c| c.blockers.contains(&card))
    }
}

/// Damage marked on a creature during combat damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageAssignment {
    pub card: CardId,
    pub amount: i32,
}

/// What happened during combat damage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatReport {
    /// Total damage dealt to the defending player
    pub player_damage: i32,
    pub assignments: Vec<DamageAssignment>,
    pub dead_attackers: Vec<CardId>,
    pub dead_blockers: Vec<CardId>,
    pub winner: Option<PlayerId>,
}

impl CombatReport {
    pub fn damage_to(&self, card: CardId) -> Option<i32> {
        self.assignments
            .iter()
            .find(|a| a.card == card)
            .map(|a| a.amount)
    }
}

fn creature_stats(tabletop: &Tabletop, card: CardId) -> Result<(i32, i32)> {
    let card = tabletop.card(card)?;
    Ok(Creature::view(card, tabletop.turn_id)
        .map(|c| (c.power(), c.toughness()))
        .unwrap_or((0, 0)))
}

/// Resolve combat damage for the current attacking and blocking decisions
///
/// Unblocked attackers hit the defending player. A blocked attacker takes
/// the combined power of its blockers and deals its own power to them in
/// declaration order, each blocker taking at most its toughness. Lethally
/// damaged creatures then go to their owner's graveyard. The active player
/// wins if the defender's life dropped to zero or below.
pub fn resolve_combat_damage(tabletop: &mut Tabletop) -> Result<CombatReport> {
    let mut report = CombatReport::default();
    let attackers: SmallVec<[CardId; 4]> = tabletop.attacking.attackers().iter().copied().collect();
    let defender = tabletop.non_active_player_id();

    for attacker in attackers.iter().copied() {
        let (attacker_power, _) = creature_stats(tabletop, attacker)?;

        let Some(combat) = tabletop.blocking.combat_for(attacker).cloned() else {
            tabletop.player_mut(defender)?.lose_life(attacker_power);
            report.player_damage += attacker_power;
            continue;
        };

        let mut blocker_power = 0;
        for &blocker in &combat.blockers {
            blocker_power += creature_stats(tabletop, blocker)?.0;
        }
        tabletop.card_mut(attacker)?.damage = blocker_power;
        report.assignments.push(DamageAssignment {
            card: attacker,
            amount: blocker_power,
        });

        let mut remaining = attacker_power;
        for &blocker in &combat.blockers {
            let (_, toughness) = creature_stats(tabletop, blocker)?;
            let assigned = remaining.min(toughness).max(0);
            tabletop.card_mut(blocker)?.damage = assigned;
            remaining -= assigned;
            report.assignments.push(DamageAssignment {
                card: blocker,
                amount: assigned,
            });
        }
    }

    for attacker in attackers.iter().copied() {
        if is_lethally_damaged(tabletop, attacker)? {
            tabletop.move_card(attacker, Zone::Battlefield, Zone::Graveyard)?;
            report.dead_attackers.push(attacker);
        }
    }

    let blockers: Vec<CardId> = tabletop
        .blocking
        .combats()
        .iter()
        .flat_map(|c| c.blockers.iter().copied())
        .collect();
    for blocker in blockers {
        if is_lethally_damaged(tabletop, blocker)? {
            tabletop.move_card(blocker, Zone::Battlefield, Zone::Graveyard)?;
            report.dead_blockers.push(blocker);
        }
    }

    if tabletop.player(defender)?.is_dead() {
        let winner = tabletop.active_player_id();
        tabletop.winner = Some(winner);
        report.winner = Some(winner);
    }

    Ok(report)
}

fn is_lethally_damaged(tabletop: &Tabletop, card: CardId) -> Result<bool> {
    if !tabletop.battlefield.contains(card) {
        return Ok(false);
    }
    Ok(tabletop
        .creature(card)?
        .is_some_and(|creature| creature.is_lethally_damaged()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardType};

    fn add_creature(tabletop: &mut Tabletop, owner: PlayerId, power: i32, toughness: i32) -> CardId {
        tabletop
            .create_card(owner, Zone::Battlefield, |id| {
                Card::new(id, format!("{power}/{toughness}"), owner)
                    .with_type(CardType::Creature)
                    .with_power_toughness(power, toughness)
            })
            .unwrap()
    }

    fn setup() -> (Tabletop, PlayerId, PlayerId) {
        let tabletop = Tabletop::new_two_player("Alice", "Bob", 20);
        let alice = tabletop.active_player_id();
        let bob = tabletop.non_active_player_id();
        (tabletop, alice, bob)
    }

    #[test]
    fn test_decision_accessors() {
        let decision = AttackingDecision::declared([CardId::new(4), CardId::new(5)]);
        assert!(decision.is_attacking(CardId::new(5)));
        assert!(!AttackingDecision::None.has_attackers());

        let blocking = BlockingDecision::Declared(vec![Combat::new(CardId::new(4), [CardId::new(9)])]);
        assert!(blocking.is_blocking(CardId::new(9)));
        assert!(blocking.combat_for(CardId::new(5)).is_none());
    }

    #[test]
    fn test_unblocked_attacker_hits_player() {
        let (mut tabletop, alice, bob) = setup();
        let attacker = add_creature(&mut tabletop, alice, 3, 3);
        tabletop.attacking = AttackingDecision::declared([attacker]);

        let report = resolve_combat_damage(&mut tabletop).unwrap();
        assert_eq!(report.player_damage, 3);
        assert_eq!(tabletop.player(bob).unwrap().life, 17);
        assert!(tabletop.battlefield.contains(attacker));
        assert!(report.dead_attackers.is_empty());
        assert_eq!(report.winner, None);
    }

    #[test]
    fn test_blocker_takes_at_most_its_toughness() {
        let (mut tabletop, alice, bob) = setup();
        let attacker = add_creature(&mut tabletop, alice, 2, 2);
        let blocker = add_creature(&mut tabletop, bob, 1, 2);
        tabletop.attacking = AttackingDecision::declared([attacker]);
        tabletop.blocking = BlockingDecision::Declared(vec![Combat::new(attacker, [blocker])]);

        let report = resolve_combat_damage(&mut tabletop).unwrap();
        assert_eq!(report.damage_to(attacker), Some(1));
        assert_eq!(report.damage_to(blocker), Some(2));
        assert_eq!(report.dead_blockers, vec![blocker]);
        assert!(report.dead_attackers.is_empty());

        assert_eq!(tabletop.card(attacker).unwrap().damage, 1);
        assert!(tabletop.player(bob).unwrap().zones.graveyard.contains(blocker));
        assert_eq!(tabletop.card(blocker).unwrap().damage, 0);
        assert_eq!(tabletop.player(bob).unwrap().life, 20);
    }

    #[test]
    fn test_excess_power_is_lost() {
        let (mut tabletop, alice, bob) = setup();
        let attacker = add_creature(&mut tabletop, alice, 6, 6);
        let first = add_creature(&mut tabletop, bob, 1, 2);
        let second = add_creature(&mut tabletop, bob, 1, 1);
        tabletop.attacking = AttackingDecision::declared([attacker]);
        tabletop.blocking = BlockingDecision::Declared(vec![Combat::new(attacker, [first, second])]);

        let report = resolve_combat_damage(&mut tabletop).unwrap();
        assert_eq!(report.damage_to(first), Some(2));
        assert_eq!(report.damage_to(second), Some(1));
        assert_eq!(report.damage_to(attacker), Some(2));
        assert_eq!(report.player_damage, 0);
        assert_eq!(tabletop.player(bob).unwrap().life, 20);
        assert_eq!(report.dead_blockers, vec![first, second]);
    }

    #[test]
    fn test_blockers_assigned_in_declaration_order() {
        let (mut tabletop, alice, bob) = setup();
        let attacker = add_creature(&mut tabletop, alice, 3, 5);
        let big = add_creature(&mut tabletop, bob, 0, 3);
        let small = add_creature(&mut tabletop, bob, 0, 1);
        tabletop.attacking = AttackingDecision::declared([attacker]);
        tabletop.blocking = BlockingDecision::Declared(vec![Combat::new(attacker, [big, small])]);

        let report = resolve_combat_damage(&mut tabletop).unwrap();
        assert_eq!(report.damage_to(big), Some(3));
        assert_eq!(report.damage_to(small), Some(0));
        assert_eq!(report.dead_blockers, vec![big]);
        assert!(tabletop.battlefield.contains(small));
    }

    #[test]
    fn test_trade() {
        let (mut tabletop, alice, bob) = setup();
        let attacker = add_creature(&mut tabletop, alice, 3, 1);
        let blocker = add_creature(&mut tabletop, bob, 2, 2);
        tabletop.attacking = AttackingDecision::declared([attacker]);
        tabletop.blocking = BlockingDecision::Declared(vec![Combat::new(attacker, [blocker])]);

        let report = resolve_combat_damage(&mut tabletop).unwrap();
        assert_eq!(report.dead_attackers, vec![attacker]);
        assert_eq!(report.dead_blockers, vec![blocker]);
        assert!(tabletop.player(alice).unwrap().zones.graveyard.contains(attacker));
        assert!(tabletop.player(bob).unwrap().zones.graveyard.contains(blocker));
    }

    #[test]
    fn test_lethal_damage_decides_winner() {
        let (mut tabletop, alice, bob) = setup();
        tabletop.player_mut(bob).unwrap().life = 4;
        let first = add_creature(&mut tabletop, alice, 2, 2);
        let second = add_creature(&mut tabletop, alice, 2, 2);
        tabletop.attacking = AttackingDecision::declared([first, second]);

        let report = resolve_combat_damage(&mut tabletop).unwrap();
        assert_eq!(tabletop.player(bob).unwrap().life, 0);
        assert_eq!(report.winner, Some(alice));
        assert_eq!(tabletop.winner, Some(alice));
    }
}
