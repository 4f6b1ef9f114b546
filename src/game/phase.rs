//! Turn phases and steps

use serde::{Deserialize, Serialize};
use std::fmt;

/// Major phases of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Beginning,
    PrecombatMain,
    Combat,
    PostcombatMain,
    Ending,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Beginning,
        Phase::PrecombatMain,
        Phase::Combat,
        Phase::PostcombatMain,
        Phase::Ending,
    ];

    /// The phase that follows this one; Ending wraps to Beginning
    pub fn next(self) -> Phase {
        match self {
            Phase::Beginning => Phase::PrecombatMain,
            Phase::PrecombatMain => Phase::Combat,
            Phase::Combat => Phase::PostcombatMain,
            Phase::PostcombatMain => Phase::Ending,
            Phase::Ending => Phase::Beginning,
        }
    }

    pub fn is_main(self) -> bool {
        matches!(self, Phase::PrecombatMain | Phase::PostcombatMain)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Beginning => "Beginning",
            Phase::PrecombatMain => "Precombat Main",
            Phase::Combat => "Combat",
            Phase::PostcombatMain => "Postcombat Main",
            Phase::Ending => "Ending",
        };
        write!(f, "{name}")
    }
}

/// Steps within phases (reduced set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    // Beginning Phase
    Untap,
    Draw,

    // Main Phases
    Main,

    // Combat Phase
    BeginCombat,
    DeclareAttackers,
    DeclareBlockers,
    CombatDamage,

    // Ending Phase
    End,
    Cleanup,
}

impl Step {
    /// Whether this step can occur in `phase`
    pub fn belongs_to(&self, phase: Phase) -> bool {
        match self {
            Step::Untap | Step::Draw => phase == Phase::Beginning,
            Step::Main => phase.is_main(),
            Step::BeginCombat
            | Step::DeclareAttackers
            | Step::DeclareBlockers
            | Step::CombatDamage => phase == Phase::Combat,
            Step::End | Step::Cleanup => phase == Phase::Ending,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
