//! Experiment simulator: many independent matches in parallel
//!
//! Matches run on the rayon pool. Each one owns its tabletop, judges and
//! strategies; only the entity factory is shared. Match seeds are derived
//! from the experiment seed so a run is reproducible.

use crate::config::GameConfig;
use crate::loader::{EntityFactory, PlayerDefinition};
use crate::simulator::{GameSimulator, GameSummary};
use crate::Result;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Aggregated results of an experiment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub games_played: usize,
    /// Wins per seat, in seat order
    pub seat_wins: [usize; 2],
    pub draws: usize,
    /// Wins per deck name
    pub deck_wins: BTreeMap<String, usize>,
    /// Matches played per deck name; a mirror match counts once
    pub deck_games: BTreeMap<String, usize>,
    pub end_reasons: BTreeMap<String, usize>,
    pub average_turns: f64,
}

impl ExperimentSummary {
    /// Fold match summaries into one report
    pub fn from_games(games: &[GameSummary]) -> Self {
        let mut summary = ExperimentSummary {
            games_played: games.len(),
            ..Default::default()
        };
        let mut total_turns = 0u64;

        for game in games {
            total_turns += u64::from(game.turns_played);
            *summary
                .end_reasons
                .entry(format!("{:?}", game.end_reason))
                .or_insert(0) += 1;

            let mut decks: Vec<&str> = game.players.iter().map(|p| p.deck.as_str()).collect();
            decks.dedup();
            for deck in decks {
                *summary.deck_games.entry(deck.to_string()).or_insert(0) += 1;
            }

            match game.winner {
                Some(winner) => {
                    let seat = winner.as_u32() as usize;
                    if let Some(wins) = summary.seat_wins.get_mut(seat) {
                        *wins += 1;
                    }
                    if let Some(player) = game.players.get(seat) {
                        *summary.deck_wins.entry(player.deck.clone()).or_insert(0) += 1;
                    }
                }
                None => summary.draws += 1,
            }
        }

        if !games.is_empty() {
            summary.average_turns = total_turns as f64 / games.len() as f64;
        }
        summary
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn percent(count: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            100.0 * count as f64 / total as f64
        }
    }
}

impl fmt::Display for ExperimentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.games_played;
        writeln!(f, "=== Experiment Complete ===")?;
        writeln!(f, "Total games played: {total}")?;
        writeln!(f, "Average turns: {:.1}", self.average_turns)?;

        writeln!(f, "\n=== Player Position Statistics ===")?;
        for (seat, wins) in self.seat_wins.iter().enumerate() {
            writeln!(f, "P{} wins: {} ({:.1}%)", seat + 1, wins, Self::percent(*wins, total))?;
        }
        writeln!(f, "Draws: {} ({:.1}%)", self.draws, Self::percent(self.draws, total))?;

        writeln!(f, "\n=== Deck Win Rates ===")?;
        for (deck, games) in &self.deck_games {
            let wins = self.deck_wins.get(deck).copied().unwrap_or(0);
            writeln!(f, "  {deck}: {wins}/{games} ({:.1}%)", Self::percent(wins, *games))?;
        }

        writeln!(f, "\n=== End Reasons ===")?;
        for (reason, count) in &self.end_reasons {
            writeln!(f, "  {reason}: {count}")?;
        }
        Ok(())
    }
}

/// Runs the same pairing many times with different seeds
pub struct ExperimentSimulator {
    config: GameConfig,
    factory: Arc<dyn EntityFactory>,
    players: Vec<PlayerDefinition>,
}

impl ExperimentSimulator {
    pub fn new(config: GameConfig, factory: Arc<dyn EntityFactory>, players: Vec<PlayerDefinition>) -> Self {
        ExperimentSimulator {
            config,
            factory,
            players,
        }
    }

    /// Seed of match `game_idx`
    pub fn game_seed(seed: u64, game_idx: usize) -> u64 {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed.wrapping_add(game_idx as u64));
        rng.gen()
    }

    /// Play one match
    pub fn run_game(&self, seed: u64) -> Result<GameSummary> {
        GameSimulator::new(self.config.clone()).run(self.factory.as_ref(), &self.players, seed)
    }

    /// Play `games` matches in parallel, in match order
    ///
    /// The first structural error aborts the experiment.
    pub fn run_games(&self, games: usize, seed: u64) -> Result<Vec<GameSummary>> {
        (0..games)
            .into_par_iter()
            .map(|game_idx| self.run_game(Self::game_seed(seed, game_idx)))
            .collect()
    }

    pub fn run(&self, games: usize, seed: u64) -> Result<ExperimentSummary> {
        let summaries = self.run_games(games, seed)?;
        Ok(ExperimentSummary::from_games(&summaries))
    }
}
