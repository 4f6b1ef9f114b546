//! Game simulator: one complete match
//!
//! Setup shuffles the libraries, rolls for the starting player and deals
//! opening hands. Play then runs whole turns until someone wins or the turn
//! cap is reached.

use crate::config::GameConfig;
use crate::core::PlayerId;
use crate::game::observer::Observer;
use crate::game::random::{RandomGenerator, SeededRandom};
use crate::game::round_judge::{RoundJudge, TurnExecutor};
use crate::game::state::Tabletop;
use crate::loader::{EntityFactory, PlayerDefinition};
use crate::{JudgeError, Result};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Why a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// A player's life reached 0 or less
    PlayerDeath,
    /// A player had to draw from an empty library
    DeckedOut,
    /// The turn cap was reached without a winner
    TurnLimit,
}

/// Final life of one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub deck: String,
    pub life: i32,
}

/// Outcome of a single match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub winner: Option<PlayerId>,
    pub winner_name: Option<String>,
    pub starting_player: PlayerId,
    pub turns_played: u32,
    pub end_reason: EndReason,
    /// In seat order
    pub players: Vec<PlayerSummary>,
}

impl GameSummary {
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

pub struct GameSimulator {
    config: GameConfig,
    observer: Option<Rc<dyn Observer>>,
}

impl GameSimulator {
    pub fn new(config: GameConfig) -> Self {
        GameSimulator { config, observer: None }
    }

    pub fn with_observer(mut self, observer: Rc<dyn Observer>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn notify(&self, message: &str) {
        if let Some(observer) = &self.observer {
            observer.on_message(message);
        }
    }

    /// Round judge configured like this simulator
    pub fn round_judge(&self) -> RoundJudge {
        let judge = RoundJudge::from_config(&self.config);
        match &self.observer {
            Some(observer) => judge.with_observer(observer.clone()),
            None => judge,
        }
    }

    /// Shuffle libraries, pick the starting player and deal opening hands
    ///
    /// Returns the starting player.
    pub fn setup(&self, tabletop: &mut Tabletop, random: &mut dyn RandomGenerator) -> Result<PlayerId> {
        self.config.validate()?;
        let seats: Vec<PlayerId> = tabletop.players().iter().map(|p| p.id).collect();

        for &player_id in &seats {
            let library = &mut tabletop.player_mut(player_id)?.zones.library;
            let indexes = random.generate_shuffling_indexes(library.len());
            if !library.reorder(&indexes) {
                return Err(JudgeError::InvalidAction(format!(
                    "Shuffle of player {player_id}'s library is not a permutation"
                )));
            }
        }

        // Highest roll starts; ties are rolled again
        let starting_player = loop {
            let first = random.roll_dice(self.config.dice_sides);
            let second = random.roll_dice(self.config.dice_sides);
            self.notify(&format!(
                "{} rolls {first}, {} rolls {second}",
                tabletop.player(seats[0])?.name,
                tabletop.player(seats[1])?.name
            ));
            if first != second {
                break if first > second { seats[0] } else { seats[1] };
            }
        };
        tabletop.set_active_player(starting_player)?;
        self.notify(&format!("{} starts", tabletop.player(starting_player)?.name));

        for &player_id in &seats {
            for _ in 0..self.config.opening_hand_size {
                if tabletop.draw_card(player_id)?.is_none() {
                    break;
                }
            }
        }

        Ok(starting_player)
    }

    /// Create and set up a tabletop for `players`
    pub fn prepare(
        &self,
        factory: &dyn EntityFactory,
        players: &[PlayerDefinition],
        seed: u64,
    ) -> Result<(Tabletop, PlayerId)> {
        let mut tabletop = factory.create_tabletop(players, &self.config, seed)?;
        let mut random = SeededRandom::new(seed);
        let starting_player = self.setup(&mut tabletop, &mut random)?;
        Ok((tabletop, starting_player))
    }

    /// Run turns until a winner is decided or the turn cap is reached
    pub fn play(&self, tabletop: &mut Tabletop, executor: &mut dyn TurnExecutor) -> Result<GameSummary> {
        let starting_player = tabletop.active_player_id();

        let end_reason = loop {
            if tabletop.turn_id.as_u32() >= self.config.max_turns {
                break EndReason::TurnLimit;
            }
            let result = executor.execute_next_turn(tabletop)?;
            if let Some(winner) = result.winner {
                tabletop.winner = Some(winner);
                let loser = tabletop.opponent_of(winner)?;
                break if tabletop.player(loser)?.is_dead() {
                    EndReason::PlayerDeath
                } else {
                    EndReason::DeckedOut
                };
            }
        };

        let summary = self.summarize(tabletop, starting_player, end_reason)?;
        match &summary.winner_name {
            Some(name) => self.notify(&format!("{name} wins after {} turns", summary.turns_played)),
            None => self.notify(&format!("No winner after {} turns", summary.turns_played)),
        }
        Ok(summary)
    }

    /// Create, set up and play a match with a round judge
    pub fn run(
        &self,
        factory: &dyn EntityFactory,
        players: &[PlayerDefinition],
        seed: u64,
    ) -> Result<GameSummary> {
        let (mut tabletop, _) = self.prepare(factory, players, seed)?;
        let mut judge = self.round_judge();
        self.play(&mut tabletop, &mut judge)
    }

    fn summarize(&self, tabletop: &Tabletop, starting_player: PlayerId, end_reason: EndReason) -> Result<GameSummary> {
        let winner_name = match tabletop.winner {
            Some(winner) => Some(tabletop.player(winner)?.name.to_string()),
            None => None,
        };
        Ok(GameSummary {
            winner: tabletop.winner,
            winner_name,
            starting_player,
            turns_played: tabletop.turn_id.as_u32(),
            end_reason,
            players: tabletop
                .players()
                .iter()
                .map(|p| PlayerSummary {
                    name: p.name.to_string(),
                    deck: p.deck.name.clone(),
                    life: p.life,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;
    use crate::game::logger::{GameLogger, VerbosityLevel};
    use crate::loader::{DefinitionFactory, DeckList, StrategyKind};

    /// Rolls from a fixed script and never shuffles
    struct ScriptedRandom {
        rolls: Vec<u32>,
    }

    impl RandomGenerator for ScriptedRandom {
        fn roll_dice(&mut self, _sides: u32) -> u32 {
            self.rolls.remove(0)
        }

        fn generate_shuffling_indexes(&mut self, count: usize) -> Vec<usize> {
            (0..count).collect()
        }
    }

    fn players(p1: StrategyKind, p2: StrategyKind) -> Vec<PlayerDefinition> {
        vec![
            PlayerDefinition::new("Alice", DeckList::sample(Color::Green), p1),
            PlayerDefinition::new("Bob", DeckList::sample(Color::Red), p2),
        ]
    }

    #[test]
    fn test_setup_rerolls_ties_and_deals_hands() {
        let factory = DefinitionFactory::builtin().unwrap();
        let simulator = GameSimulator::new(GameConfig::default());
        let mut tabletop = factory
            .create_tabletop(&players(StrategyKind::Zero, StrategyKind::Zero), simulator.config(), 0)
            .unwrap();
        let mut random = ScriptedRandom {
            rolls: vec![5, 5, 3, 17],
        };

        let starting = simulator.setup(&mut tabletop, &mut random).unwrap();
        assert_eq!(starting, PlayerId::new(1));
        assert_eq!(tabletop.active_player_id(), PlayerId::new(1));
        assert!(random.rolls.is_empty());
        for player in tabletop.players() {
            assert_eq!(player.zones.hand.len(), 7);
            assert_eq!(player.zones.library.len(), 33);
        }
    }

    #[test]
    fn test_single_sided_die_fails_setup() {
        let factory = DefinitionFactory::builtin().unwrap();
        let config = GameConfig {
            dice_sides: 1,
            ..GameConfig::default().with_max_turns(2)
        };
        let simulator = GameSimulator::new(config);

        let result = simulator.run(&factory, &players(StrategyKind::Zero, StrategyKind::Zero), 0);
        assert!(matches!(result, Err(JudgeError::InvalidConfig(_))));

        let mut tabletop = factory
            .create_tabletop(&players(StrategyKind::Zero, StrategyKind::Zero), simulator.config(), 0)
            .unwrap();
        let mut random = ScriptedRandom { rolls: vec![1, 1] };
        assert!(simulator.setup(&mut tabletop, &mut random).is_err());
        assert_eq!(random.rolls.len(), 2);
    }

    #[test]
    fn test_turn_limit() {
        let factory = DefinitionFactory::builtin().unwrap();
        let simulator = GameSimulator::new(GameConfig::default().with_max_turns(6));
        let summary = simulator
            .run(&factory, &players(StrategyKind::Zero, StrategyKind::Zero), 11)
            .unwrap();

        assert_eq!(summary.end_reason, EndReason::TurnLimit);
        assert_eq!(summary.turns_played, 6);
        assert!(summary.is_draw());
        assert_eq!(summary.players[0].life, 20);
        assert_eq!(summary.players[1].deck, "Mono Red");
    }

    #[test]
    fn test_same_seed_same_match() {
        let factory = DefinitionFactory::builtin().unwrap();
        let simulator = GameSimulator::new(GameConfig::default());
        let definitions = players(StrategyKind::Random, StrategyKind::Aggressive);

        let first = simulator.run(&factory, &definitions, 99).unwrap();
        let second = simulator.run(&factory, &definitions, 99).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_aggressive_match_ends_with_winner() {
        let factory = DefinitionFactory::builtin().unwrap();
        let simulator = GameSimulator::new(GameConfig::default());
        let summary = simulator
            .run(&factory, &players(StrategyKind::Aggressive, StrategyKind::Zero), 5)
            .unwrap();

        // Zero never blocks, so the aggressive player wins before decking
        assert_eq!(summary.winner_name.as_deref(), Some("Alice"));
        assert_eq!(summary.end_reason, EndReason::PlayerDeath);
        assert!(summary.players[1].life <= 0);
    }

    #[test]
    fn test_observer_sees_setup_and_result() {
        let factory = DefinitionFactory::builtin().unwrap();
        let logger = Rc::new(GameLogger::capturing(VerbosityLevel::Verbose));
        let simulator = GameSimulator::new(GameConfig::default().with_max_turns(2)).with_observer(logger.clone());
        simulator
            .run(&factory, &players(StrategyKind::Zero, StrategyKind::Zero), 3)
            .unwrap();

        let logs = logger.logs();
        assert!(logs.iter().any(|entry| entry.message.ends_with(" starts")));
        assert!(logs.iter().any(|entry| entry.message.starts_with("Turn 1")));
        assert_eq!(logs.last().map(|entry| entry.message.as_str()), Some("No winner after 2 turns"));
    }
}
