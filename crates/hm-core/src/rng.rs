//! Seeded RNG for reproducible model setup.
//!
//! The `World` owns one [`SimRng`] seeded from `SimConfig::seed`.  Elements
//! draw from it during setup (initial perturbations, jittered rest lengths,
//! ...) so the same seed always assembles the same physical model.  Setup is
//! pre-order over the tree, so draw order is stable for a given tree shape.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG.
///
/// Single-threaded by construction; the tree it serves is never traversed
/// concurrently.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

impl std::fmt::Debug for SimRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SimRng(..)")
    }
}
