//! Nullable random: a generator that replays scripted uniforms.

use nqg_random::RandomSource;
use rand::RngCore;

/// A deterministic generator for testing.
///
/// Each configured uniform `u` in `[0, 1)` becomes one generator word,
/// `u × 2³²` for `next_u32` and `u × 2⁶⁴` for `next_u64`, wrapping around at
/// the end of the script. Coins, floats and small Poisson walks therefore see
/// `u` directly. Integer range draws (`choose`, draws without replacement)
/// reject a word whose remainder falls in the biased zone and move on to the
/// next one, so a script used for them needs a value that is accepted for
/// every range it meets; `0.0` always is.
pub struct NullRandom {
    outputs: Vec<f64>,
    index: usize,
}

impl NullRandom {
    /// Create with a sequence of uniforms in `[0, 1)`.
    ///
    /// # Panics
    /// Panics if `outputs` is empty or holds a value outside `[0, 1)`.
    pub fn new(outputs: Vec<f64>) -> Self {
        assert!(!outputs.is_empty(), "NullRandom needs at least one value");
        assert!(
            outputs.iter().all(|v| (0.0..1.0).contains(v)),
            "NullRandom values must lie in [0, 1)"
        );
        Self { outputs, index: 0 }
    }

    /// Create with a single value that will be returned for every call.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of generator words handed out so far.
    pub fn draws(&self) -> usize {
        self.index
    }

    fn next_uniform(&mut self) -> f64 {
        let value = self.outputs[self.index % self.outputs.len()];
        self.index += 1;
        value
    }
}

impl RngCore for NullRandom {
    fn next_u32(&mut self) -> u32 {
        (self.next_uniform() * 2f64.powi(32)) as u32
    }

    fn next_u64(&mut self) -> u64 {
        (self.next_uniform() * 2f64.powi(64)) as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let word = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl RandomSource for NullRandom {
    fn rng(&mut self) -> &mut dyn RngCore {
        self
    }

    fn name(&self) -> &str {
        "null-random"
    }
}
