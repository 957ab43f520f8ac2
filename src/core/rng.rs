//! Deterministic random number generation for deck shuffling.
//!
//! The same seed produces the identical match setup, which keeps
//! recorded sessions and bug reports reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Deterministic RNG for a single match.
///
/// Uses ChaCha8 for speed while maintaining high-quality randomness.
/// Only the seed is serialized; the stream position is transient state
/// that a debug snapshot does not need.
#[derive(Clone, Debug, Serialize)]
pub struct MatchRng {
    seed: u64,
    #[serde(skip)]
    inner: ChaCha8Rng,
}

impl MatchRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Get the seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random value in a range.
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}
