//! Verbosity-gated game logger
//!
//! Prints to stdout, captures into an in-memory buffer, or both. Implements
//! `Observer` so it can be handed straight to a judge.

use crate::core::{PlayerName, TurnId};
use crate::game::observer::Observer;
use crate::game::phase::{Phase, Step};
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Verbosity level for game output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns, phases, and key actions (default)
    #[default]
    Normal = 2,
    /// Verbose - steps and every engine message
    Verbose = 3,
}

impl std::str::FromStr for VerbosityLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityLevel::Silent),
            "minimal" | "1" => Ok(VerbosityLevel::Minimal),
            "normal" | "2" => Ok(VerbosityLevel::Normal),
            "verbose" | "3" => Ok(VerbosityLevel::Verbose),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// Where a log entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogCategory {
    Phase,
    Step,
    Event,
}

/// A captured log line
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    pub category: LogCategory,
}

/// Read-only access to captured log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Game logger with verbosity filtering and optional capture
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    /// Logger that only captures, for tests and batch runs
    pub fn capturing(verbosity: VerbosityLevel) -> Self {
        let mut logger = Self::with_verbosity(verbosity);
        logger.set_output_mode(OutputMode::Memory);
        logger
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    /// Captured log entries
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&self) {
        self.log_buffer.borrow_mut().clear();
    }

    /// Print captured entries the verbosity allows, then clear the buffer
    pub fn flush_buffer(&self) {
        for entry in self.log_buffer.borrow().iter() {
            if entry.level <= self.verbosity {
                Self::print(entry.level, &entry.message);
            }
        }
        self.clear_logs();
    }

    fn print(level: VerbosityLevel, message: &str) {
        if level <= VerbosityLevel::Minimal {
            println!("{message}");
        } else {
            println!("  {message}");
        }
    }

    fn log(&self, level: VerbosityLevel, category: LogCategory, message: &str) {
        // Captured entries are kept regardless of verbosity; flush filters them
        if self.is_capturing() {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category,
            });
        }

        let to_stdout = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);
        if to_stdout && level <= self.verbosity {
            Self::print(level, message);
        }
    }

    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, LogCategory::Event, message);
    }

    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, LogCategory::Event, message);
    }

    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, LogCategory::Event, message);
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

impl Observer for GameLogger {
    fn on_phase(&self, turn: TurnId, phase: Phase, active_player: &PlayerName) {
        let message = if phase == Phase::Beginning {
            format!("Turn {turn} ({active_player})")
        } else {
            format!("{phase}")
        };
        let level = if phase == Phase::Beginning {
            VerbosityLevel::Normal
        } else {
            VerbosityLevel::Verbose
        };
        self.log(level, LogCategory::Phase, &message);
    }

    fn on_step(&self, step: Step) {
        self.log(VerbosityLevel::Verbose, LogCategory::Step, &format!("-- {step}"));
    }

    fn on_message(&self, message: &str) {
        self.log(VerbosityLevel::Normal, LogCategory::Event, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_creation() {
        let logger = GameLogger::new();
        assert_eq!(logger.verbosity(), VerbosityLevel::Normal);
        assert!(!logger.is_capturing());
    }

    #[test]
    fn test_verbosity_parsing() {
        assert_eq!("verbose".parse::<VerbosityLevel>().unwrap(), VerbosityLevel::Verbose);
        assert_eq!("1".parse::<VerbosityLevel>().unwrap(), VerbosityLevel::Minimal);
        assert!("loud".parse::<VerbosityLevel>().is_err());
        assert!(VerbosityLevel::Silent < VerbosityLevel::Normal);
    }

    #[test]
    fn test_log_capture() {
        let logger = GameLogger::capturing(VerbosityLevel::Silent);
        logger.normal("test message");
        logger.minimal("minimal message");

        let logs = logger.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "test message");
        assert_eq!(logs[1].level, VerbosityLevel::Minimal);
    }

    #[test]
    fn test_observer_notifications_are_categorized() {
        let logger = GameLogger::capturing(VerbosityLevel::Verbose);
        let name = PlayerName::new("Alice");

        logger.on_phase(TurnId::new(3), Phase::Beginning, &name);
        logger.on_step(Step::Draw);
        logger.on_message("Alice draws a card");

        let logs = logger.logs();
        assert_eq!(logs[0].message, "Turn 3 (Alice)");
        assert_eq!(logs[0].category, LogCategory::Phase);
        assert_eq!(logs[1].category, LogCategory::Step);
        assert_eq!(logs[2].category, LogCategory::Event);
    }

    #[test]
    fn test_flush_buffer_clears() {
        let logger = GameLogger::capturing(VerbosityLevel::Normal);
        logger.normal("message 1");
        logger.verbose("message 2");
        assert_eq!(logger.logs().len(), 2);

        logger.flush_buffer();
        assert_eq!(logger.logs().len(), 0);
    }
}
