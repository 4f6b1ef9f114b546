//! Injected randomness for match setup

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// Source of dice rolls and shuffles
pub trait RandomGenerator {
    /// Roll a die with `sides` faces; result in `1..=sides`
    fn roll_dice(&mut self, sides: u32) -> u32;

    /// A random permutation of `0..count`
    fn generate_shuffling_indexes(&mut self, count: usize) -> Vec<usize>;
}

/// ChaCha-backed generator; same seed, same match
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha12Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl RandomGenerator for SeededRandom {
    fn roll_dice(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides.max(1))
    }

    fn generate_shuffling_indexes(&mut self, count: usize) -> Vec<usize> {
        let mut indexes: Vec<usize> = (0..count).collect();
        indexes.shuffle(&mut self.rng);
        indexes
    }
}
