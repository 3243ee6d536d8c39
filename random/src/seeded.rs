//! The production random source: a seeded `StdRng`.

use crate::RandomSource;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Seeded pseudo-random source. Same seed, same stream.
pub struct SeededRandom {
    rng: StdRng,
    seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }

    fn name(&self) -> &str {
        "seeded-std-rng"
    }
}
