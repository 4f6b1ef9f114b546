//! Notification sink for phase and step transitions

use crate::core::{PlayerName, TurnId};
use crate::game::phase::{Phase, Step};

/// Receives engine notifications; output only
///
/// Takes `&self` so one observer can be shared by a judge and its caller.
pub trait Observer {
    fn on_phase(&self, turn: TurnId, phase: Phase, active_player: &PlayerName);

    fn on_step(&self, step: Step);

    fn on_message(&self, message: &str);
}
