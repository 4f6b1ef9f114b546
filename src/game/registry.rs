//! Execution registry: handlers for costs and actions
//!
//! Every cost kind and action kind the engine can meet at runtime must have
//! a handler registered before play starts. A missing handler is a
//! configuration bug and surfaces as a `JudgeError`.

use crate::core::{Action, ActionKind, CardId, Cost, CostKind, PlayerId};
use crate::game::results::ExecutionResult;
use crate::game::state::Tabletop;
use crate::game::validation::ValidationResult;
use crate::{JudgeError, Result};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A request to pay a cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payment {
    pub payer: PlayerId,
    /// Permanent whose ability is being paid for, if any
    pub source: Option<CardId>,
    pub cost: Cost,
    /// Activate mana abilities of untapped permanents to cover a mana cost
    pub auto_tap: bool,
}

impl Payment {
    /// Paying to play a card: mana sources are tapped as needed
    pub fn for_action(action: &Action) -> Self {
        Payment {
            payer: action.owner,
            source: action.source,
            cost: action.cost,
            auto_tap: true,
        }
    }

    /// Paying for an ability of `source`: only the current pool is used
    pub fn for_ability(payer: PlayerId, source: CardId, cost: Cost) -> Self {
        Payment {
            payer,
            source: Some(source),
            cost,
            auto_tap: false,
        }
    }
}

/// Validates and pays one kind of cost
pub trait CostHandler: Send + Sync {
    fn validate(
        &self,
        tabletop: &Tabletop,
        registry: &ExecutionRegistry,
        payment: &Payment,
    ) -> Result<ValidationResult>;

    /// Pay the cost; nothing is changed if the returned result is invalid
    fn pay(
        &self,
        tabletop: &mut Tabletop,
        registry: &ExecutionRegistry,
        payment: &Payment,
    ) -> Result<ValidationResult>;
}

/// How the action judge treats an action kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSpeed {
    /// Gives up priority
    Pass,
    /// Performed immediately; the player keeps priority
    Special,
    /// Goes on the stack and resolves later
    Normal,
    /// Required by the rules; applied outright
    Mandatory,
}

/// Validates, performs and resolves one kind of action
pub trait ActionHandler: Send + Sync {
    fn speed(&self) -> ActionSpeed;

    fn validate(
        &self,
        tabletop: &Tabletop,
        registry: &ExecutionRegistry,
        action: &Action,
    ) -> Result<ValidationResult>;

    /// Apply the action, paying its cost
    ///
    /// Only called after `validate` succeeded.
    fn perform(
        &self,
        tabletop: &mut Tabletop,
        registry: &ExecutionRegistry,
        action: &Action,
    ) -> Result<ExecutionResult>;

    /// Resolve the action when it leaves the stack
    fn resolve(&self, _tabletop: &mut Tabletop, _action: &Action) -> Result<ExecutionResult> {
        Ok(ExecutionResult::new())
    }

    /// A legal replacement for an invalid mandatory action
    fn fallback(&self, _tabletop: &Tabletop, _action: &Action) -> Option<Action> {
        None
    }
}

/// Lookup table from cost and action kinds to their handlers
#[derive(Default, Clone)]
pub struct ExecutionRegistry {
    cost_handlers: FxHashMap<CostKind, Arc<dyn CostHandler>>,
    action_handlers: FxHashMap<ActionKind, Arc<dyn ActionHandler>>,
}

impl ExecutionRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with handlers for every reachable cost and action kind
    pub fn standard() -> Self {
        use crate::game::handlers::*;

        let mut registry = ExecutionRegistry::new();
        registry.register_cost_handler(CostKind::None, Arc::new(NoCostHandler));
        registry.register_cost_handler(CostKind::Unknown, Arc::new(UnknownCostHandler));
        registry.register_cost_handler(CostKind::Tapping, Arc::new(TappingCostHandler));
        registry.register_cost_handler(CostKind::PayingMana, Arc::new(PayingManaCostHandler));

        registry.register_action_handler(ActionKind::Pass, Arc::new(PassHandler));
        registry.register_action_handler(ActionKind::PlayLand, Arc::new(PlayLandHandler));
        registry.register_action_handler(ActionKind::PlayNonLand, Arc::new(PlayNonLandHandler));
        registry.register_action_handler(ActionKind::Discard, Arc::new(DiscardHandler));
        registry
    }

    pub fn register_cost_handler(&mut self, kind: CostKind, handler: Arc<dyn CostHandler>) {
        self.cost_handlers.insert(kind, handler);
    }

    pub fn register_action_handler(&mut self, kind: ActionKind, handler: Arc<dyn ActionHandler>) {
        self.action_handlers.insert(kind, handler);
    }

    pub fn find_cost_handler(&self, kind: CostKind) -> Result<Arc<dyn CostHandler>> {
        self.cost_handlers
            .get(&kind)
            .cloned()
            .ok_or(JudgeError::MissingCostHandler(kind))
    }

    pub fn find_action_handler(&self, kind: ActionKind) -> Result<Arc<dyn ActionHandler>> {
        self.action_handlers
            .get(&kind)
            .cloned()
            .ok_or(JudgeError::MissingActionHandler(kind))
    }

    /// Validate a payment with the handler registered for its cost kind
    pub fn validate_payment(&self, tabletop: &Tabletop, payment: &Payment) -> Result<ValidationResult> {
        self.find_cost_handler(payment.cost.kind())?
            .validate(tabletop, self, payment)
    }

    /// Pay with the handler registered for the cost kind
    pub fn pay(&self, tabletop: &mut Tabletop, payment: &Payment) -> Result<ValidationResult> {
        self.find_cost_handler(payment.cost.kind())?
            .pay(tabletop, self, payment)
    }
}
