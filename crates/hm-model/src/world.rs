//! Execution context handed to every element during setup.

use hm_core::{BodyHandle, SimConfig, SimRng, Vec3};

/// The simulation-side context a model is set up into.
///
/// Stands in for the physics world that owns global time and collision
/// state.  Elements read gravity, draw reproducible randomness, and acquire
/// engine resources as [`BodyHandle`]s; nothing else is pulled from it.
#[derive(Debug)]
pub struct World {
    /// Gravity vector in m/s².
    pub gravity: Vec3,

    /// Seeded RNG shared by all elements.  Setup order is pre-order over the
    /// tree, so draws are reproducible for a given tree shape and seed.
    pub rng: SimRng,

    next_body: u32,
}

impl World {
    pub fn new(gravity: Vec3, seed: u64) -> Self {
        Self { gravity, rng: SimRng::new(seed), next_body: 0 }
    }

    /// Build the world described by a run configuration.
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.gravity, config.seed)
    }

    /// Hand out a fresh engine resource handle.
    pub fn acquire_body(&mut self) -> BodyHandle {
        let handle = BodyHandle(self.next_body);
        self.next_body += 1;
        handle
    }

    /// Number of handles issued since the world was created.
    #[inline]
    pub fn bodies_issued(&self) -> u32 {
        self.next_body
    }
}

impl Default for World {
    /// Earth gravity along -y, seed 0.
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.81, 0.0), 0)
    }
}
