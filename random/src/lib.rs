//! Randomness for the NQG simulation.
//!
//! Every stochastic decision in a run (arrivals, reputation, past rounds,
//! behaviour, delegatees, trust edges) draws from one [`RandomSource`]. The
//! seeded implementation is the single seed-configuration point: the same
//! seed reproduces the same run.
//!
//! A source hands out a [`rand::RngCore`]; the distributions on the trait are
//! `rand`/`rand_distr` samplers driven by that generator, so a scripted
//! generator (see `nqg-nullables`) steers every sample in tests.

pub mod sampling;
pub mod seeded;

pub use sampling::{choose, sample_without_replacement};
pub use seeded::SeededRandom;

use rand::seq::index;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Poisson};

/// A generator plus the derived distributions the model needs.
pub trait RandomSource {
    /// The generator every draw goes through.
    fn rng(&mut self) -> &mut dyn RngCore;

    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Uniform sample from `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        self.rng().gen::<f64>()
    }

    /// Weighted coin: `true` with probability `p`, clamped to `[0, 1]`.
    fn bernoulli(&mut self, p: f64) -> bool {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self.rng().gen_bool(p)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index() over an empty range");
        self.rng().gen_range(0..len)
    }

    /// Poisson-distributed count with the given mean.
    ///
    /// Non-positive, infinite or NaN means yield 0.
    fn poisson(&mut self, mean: f64) -> usize {
        if !mean.is_finite() || mean <= 0.0 {
            return 0;
        }
        match Poisson::new(mean) {
            Ok(dist) => {
                let k: f64 = dist.sample(self.rng());
                k as usize
            }
            Err(_) => 0,
        }
    }

    /// Up to `amount` distinct indices from `0..len`.
    ///
    /// Asking for more than `len` is a capped draw, not an error.
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(self.rng(), len, amount.min(len)).into_vec()
    }
}
