//! Judges, game state and turn structure

pub mod action_judge;
pub mod aggressive_strategy;
pub mod assistant;
pub mod combat;
pub mod handlers;
pub mod logger;
pub mod observer;
pub mod phase;
pub mod random;
pub mod random_strategy;
pub mod registry;
pub mod results;
pub mod round_judge;
pub mod scripted_strategy;
pub mod state;
pub mod stepping;
pub mod strategy;
pub mod validation;
pub mod zero_strategy;

pub use action_judge::ActionJudge;
pub use aggressive_strategy::AggressiveStrategy;
pub use assistant::{CreatureModifier, JudicialAssistant, PlayerModifier};
pub use combat::{AttackingDecision, BlockingDecision, Combat, CombatReport};
pub use logger::{GameLogger, OutputMode, VerbosityLevel};
pub use observer::Observer;
pub use phase::{Phase, Step};
pub use random::{RandomGenerator, SeededRandom};
pub use random_strategy::RandomStrategy;
pub use registry::{ActionHandler, ActionSpeed, CostHandler, ExecutionRegistry, Payment};
pub use results::{ExecutionResult, QueueingResult};
pub use round_judge::{RoundJudge, TurnExecutor};
pub use scripted_strategy::ScriptedStrategy;
pub use state::{StackItem, Tabletop};
pub use stepping::SteppingJudge;
pub use strategy::{PlayerView, Strategy};
pub use validation::{ReasonCause, ValidationReason, ValidationResult};
pub use zero_strategy::ZeroStrategy;
