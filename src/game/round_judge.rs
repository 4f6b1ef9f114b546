//! Round judge: the phase state machine
//!
//! Each call advances the tabletop by one phase. Action resolution is
//! delegated to the action judge; combat is resolved here.

/// Notify the observer only when per-action formatting is compiled in
///
/// With the verbose-logging feature disabled this expands to nothing, so
/// the `format!` calls cost nothing in benchmark builds.
macro_rules! log_if_verbose {
    ($self:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $self.notify(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$self;
        }
    };
}

use crate::config::GameConfig;
use crate::core::{Action, ActionKind, CardId, ParameterKey, Parameters, PlayerId};
use crate::game::action_judge::ActionJudge;
use crate::game::assistant::JudicialAssistant;
use crate::game::combat::{resolve_combat_damage, AttackingDecision, BlockingDecision};
use crate::game::observer::Observer;
use crate::game::phase::{Phase, Step};
use crate::game::registry::ExecutionRegistry;
use crate::game::results::ExecutionResult;
use crate::game::state::Tabletop;
use crate::game::strategy::consult_strategy;
use crate::game::validation::{validate_attacking_decision, validate_blocking_decision};
use crate::Result;
use std::rc::Rc;
use std::sync::Arc;

/// Something that can drive a tabletop forward phase by phase
pub trait TurnExecutor {
    /// Run the phase after the current one
    fn execute_next_phase(&mut self, tabletop: &mut Tabletop) -> Result<ExecutionResult>;

    /// Run phases until the Ending phase completes or the match ends
    fn execute_next_turn(&mut self, tabletop: &mut Tabletop) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new();
        loop {
            result.merge(self.execute_next_phase(tabletop)?);
            if result.is_terminal() || tabletop.phase == Some(Phase::Ending) {
                return Ok(result);
            }
        }
    }
}

pub struct RoundJudge {
    action_judge: ActionJudge,
    assistant: JudicialAssistant,
    max_hand_size: usize,
    observer: Option<Rc<dyn Observer>>,
}

impl RoundJudge {
    pub fn new(registry: Arc<ExecutionRegistry>) -> Self {
        RoundJudge {
            action_judge: ActionJudge::new(registry.clone()),
            assistant: JudicialAssistant::new(registry),
            max_hand_size: GameConfig::default().max_hand_size,
            observer: None,
        }
    }

    /// Judge using the standard registry and the limits from `config`
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(Arc::new(ExecutionRegistry::standard())).with_max_hand_size(config.max_hand_size)
    }

    pub fn with_max_hand_size(mut self, max_hand_size: usize) -> Self {
        self.max_hand_size = max_hand_size;
        self
    }

    pub fn with_observer(mut self, observer: Rc<dyn Observer>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn assistant(&self) -> &JudicialAssistant {
        &self.assistant
    }

    pub fn action_judge(&self) -> &ActionJudge {
        &self.action_judge
    }

    #[allow(dead_code)]
    fn notify(&self, message: &str) {
        if let Some(observer) = &self.observer {
            observer.on_message(message);
        }
    }

    /// Record messages in the result and pass them to the observer
    fn absorb(&self, result: &mut ExecutionResult, messages: Vec<String>) {
        for message in messages {
            if let Some(observer) = &self.observer {
                observer.on_message(&message);
            }
            result.push(message);
        }
    }

    fn announce_phase(&self, tabletop: &Tabletop, phase: Phase) {
        if let Some(observer) = &self.observer {
            observer.on_phase(tabletop.turn_id, phase, &tabletop.active_player().name);
        }
    }

    fn enter_step(&self, tabletop: &mut Tabletop, step: Step) {
        tabletop.step = Some(step);
        if let Some(observer) = &self.observer {
            observer.on_step(step);
        }
    }

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

    fn execute_beginning(&mut self, tabletop: &mut Tabletop) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new();

        let first_turn = tabletop.turn_id.is_pre_game();
        tabletop.turn_id = tabletop.turn_id.next();
        if !first_turn {
            tabletop.swap_active();
            tabletop.priority = None;
        }
        self.announce_phase(tabletop, Phase::Beginning);
        let active = tabletop.active_player_id();

        self.enter_step(tabletop, Step::Untap);
        tabletop.untap_all(active)?;

        self.enter_step(tabletop, Step::Draw);
        match tabletop.draw_card(active)? {
            Some(card) => {
                log_if_verbose!(
                    self,
                    "{} draws {}",
                    Self::player_name(tabletop, active),
                    Self::card_name(tabletop, card)
                );
            }
            None => {
                let winner = tabletop.opponent_of(active)?;
                tabletop.winner = Some(winner);
                result.winner = Some(winner);
                let message = format!(
                    "{} cannot draw from an empty library and loses",
                    Self::player_name(tabletop, active)
                );
                self.absorb(&mut result, vec![message]);
            }
        }

        tabletop.priority = Some(active);
        Ok(result)
    }

    fn execute_main(&mut self, tabletop: &mut Tabletop, phase: Phase) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new();
        self.announce_phase(tabletop, phase);
        self.enter_step(tabletop, Step::Main);

        let active = tabletop.active_player_id();
        tabletop.priority = Some(active);
        tabletop.consecutive_passes = 0;

        while !(tabletop.consecutive_passes >= 2 && tabletop.stack.is_empty()) {
            let holder = tabletop.priority.unwrap_or(active);
            self.perform_action_step(tabletop, holder, &mut result)?;
        }

        tabletop.consecutive_passes = 0;
        Ok(result)
    }

    /// Let `holder` act until they do something other than a special action
    fn perform_action_step(
        &mut self,
        tabletop: &mut Tabletop,
        holder: PlayerId,
        result: &mut ExecutionResult,
    ) -> Result<()> {
        loop {
            let prioritized = tabletop.is_active(holder) && tabletop.stack.is_empty();
            let action = consult_strategy(tabletop, &self.assistant, holder, |strategy, view| {
                if prioritized {
                    strategy.perform_prioritized_action(view)
                } else {
                    strategy.perform_non_prioritized_action(view)
                }
            })?;

            let queued = self.action_judge.queue_action(tabletop, action)?;
            self.absorb(result, queued.messages);
            if !queued.special_performed {
                return Ok(());
            }
        }
    }

    fn execute_combat(&mut self, tabletop: &mut Tabletop) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new();
        self.announce_phase(tabletop, Phase::Combat);

        tabletop.attacking = AttackingDecision::None;
        tabletop.blocking = BlockingDecision::None;
        let active = tabletop.active_player_id();
        let defender = tabletop.non_active_player_id();

        self.enter_step(tabletop, Step::BeginCombat);
        tabletop.priority = Some(active);

        self.enter_step(tabletop, Step::DeclareAttackers);
        let proposal = consult_strategy(tabletop, &self.assistant, active, |strategy, view| {
            strategy.declare_attacker(view)
        })?;
        let validation = validate_attacking_decision(tabletop, &proposal);
        let attacking = if validation.is_valid() {
            proposal
        } else {
            let mut messages = vec![format!(
                "Attack by {} rejected",
                Self::player_name(tabletop, active)
            )];
            messages.extend(validation.messages());
            self.absorb(&mut result, messages);
            AttackingDecision::None
        };

        for &attacker in attacking.attackers() {
            tabletop.card_mut(attacker)?.tap();
            log_if_verbose!(
                self,
                "{} attacks with {}",
                Self::player_name(tabletop, active),
                Self::card_name(tabletop, attacker)
            );
        }
        tabletop.attacking = attacking;

        if !tabletop.attacking.has_attackers() {
            return Ok(result);
        }

        self.enter_step(tabletop, Step::DeclareBlockers);
        let proposal = consult_strategy(tabletop, &self.assistant, defender, |strategy, view| {
            strategy.declare_blocker(view)
        })?;
        let validation = validate_blocking_decision(tabletop, &tabletop.attacking, &proposal);
        let blocking = if validation.is_valid() {
            proposal
        } else {
            let mut messages = vec![format!(
                "Blocks by {} rejected",
                Self::player_name(tabletop, defender)
            )];
            messages.extend(validation.messages());
            self.absorb(&mut result, messages);
            BlockingDecision::None
        };

        for combat in blocking.combats() {
            for &blocker in &combat.blockers {
                log_if_verbose!(
                    self,
                    "{} blocks {}",
                    Self::card_name(tabletop, blocker),
                    Self::card_name(tabletop, combat.attacker)
                );
            }
        }
        tabletop.blocking = blocking;

        self.enter_step(tabletop, Step::CombatDamage);
        let report = resolve_combat_damage(tabletop)?;
        if report.player_damage > 0 {
            log_if_verbose!(
                self,
                "{} takes {} combat damage",
                Self::player_name(tabletop, defender),
                report.player_damage
            );
        }
        for &dead in report.dead_attackers.iter().chain(&report.dead_blockers) {
            log_if_verbose!(self, "{} dies", Self::card_name(tabletop, dead));
        }
        if let Some(winner) = report.winner {
            result.winner = Some(winner);
            let message = format!("{} wins", Self::player_name(tabletop, winner));
            self.absorb(&mut result, vec![message]);
        }

        Ok(result)
    }

    fn execute_ending(&mut self, tabletop: &mut Tabletop) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new();
        self.announce_phase(tabletop, Phase::Ending);
        let active = tabletop.active_player_id();

        self.enter_step(tabletop, Step::End);
        tabletop.priority = Some(active);

        self.enter_step(tabletop, Step::Cleanup);
        let hand_size = tabletop.player(active)?.zones.hand.len();
        if hand_size > self.max_hand_size {
            let excess = hand_size - self.max_hand_size;
            let parameters = Parameters::new().with(ParameterKey::Amount, excess as i32);
            let proposal = consult_strategy(tabletop, &self.assistant, active, |strategy, view| {
                strategy.perform_required_action(view, ActionKind::Discard, &parameters)
            })?;

            // The amount is the rules' to decide; only the card choice is the strategy's
            let chosen: Vec<CardId> = if proposal.kind == ActionKind::Discard {
                proposal.target.cards.to_vec()
            } else {
                Vec::new()
            };
            let discard = Action::discard(active, excess, chosen);
            let executed = self.action_judge.execute_action(tabletop, discard)?;
            self.absorb(&mut result, executed.messages);
        }

        for player_id in [active, tabletop.non_active_player_id()] {
            tabletop.player_mut(player_id)?.played_land_count = 0;
        }
        tabletop.clear_damage()?;

        Ok(result)
    }
}

impl TurnExecutor for RoundJudge {
    fn execute_next_phase(&mut self, tabletop: &mut Tabletop) -> Result<ExecutionResult> {
        let phase = tabletop.phase.map_or(Phase::Beginning, Phase::next);
        tabletop.phase = Some(phase);
        tabletop.step = None;

        let mut result = match phase {
            Phase::Beginning => self.execute_beginning(tabletop)?,
            Phase::PrecombatMain | Phase::PostcombatMain => self.execute_main(tabletop, phase)?,
            Phase::Combat => self.execute_combat(tabletop)?,
            Phase::Ending => self.execute_ending(tabletop)?,
        };

        tabletop.empty_mana_pools();
        if result.winner.is_none() {
            result.winner = tabletop.winner;
        }
        Ok(result)
    }
}
