//! Results returned by the judges

use crate::core::PlayerId;

/// Messages collected while executing a phase, turn or action
///
/// A result carrying a winner is terminal: the match is over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub messages: Vec<String>,
    pub winner: Option<PlayerId>,
}

impl ExecutionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        ExecutionResult {
            messages: vec![message.into()],
            winner: None,
        }
    }

    pub fn winner(winner: PlayerId) -> Self {
        ExecutionResult {
            messages: Vec::new(),
            winner: Some(winner),
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// Append another result; the first winner recorded is kept
    pub fn merge(&mut self, other: ExecutionResult) {
        self.messages.extend(other.messages);
        if self.winner.is_none() {
            self.winner = other.winner;
        }
    }
}

/// Outcome of offering one action to the action judge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueingResult {
    /// A special action was performed; the player keeps priority
    pub special_performed: bool,
    /// The top of the stack resolved
    pub stack_resolved: bool,
    /// An action was put on the stack
    pub normal_performed: bool,
    pub messages: Vec<String>,
}

impl QueueingResult {
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_first_winner() {
        let mut result = ExecutionResult::with_message("first");
        assert!(!result.is_terminal());

        result.merge(ExecutionResult::winner(PlayerId::new(1)));
        result.merge(ExecutionResult::winner(PlayerId::new(0)));
        assert!(result.is_terminal());
        assert_eq!(result.winner, Some(PlayerId::new(1)));
        assert_eq!(result.messages, vec!["first".to_string()]);
    }
}
