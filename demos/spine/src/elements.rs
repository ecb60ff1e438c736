//! Leaf elements for the spine demo.

use std::f64::consts::TAU;

use hm_core::{BodyHandle, Vec3};
use hm_model::{Element, World};

// ── Rod ───────────────────────────────────────────────────────────────────────

/// A rigid rod between two points.  Acquires one body from the world.
pub struct Rod {
    pub from: Vec3,
    pub to:   Vec3,
    pub mass: f64,
    pub body: BodyHandle,
}

impl Rod {
    pub fn new(from: Vec3, to: Vec3, mass: f64) -> Self {
        Self { from, to, mass, body: BodyHandle::INVALID }
    }

    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }
}

impl Element for Rod {
    fn kind(&self) -> &'static str {
        "Rod"
    }

    fn setup(&mut self, world: &mut World) {
        self.body = world.acquire_body();
    }

    fn teardown(&mut self) {
        self.body = BodyHandle::INVALID;
    }
}

// ── Cable ─────────────────────────────────────────────────────────────────────

/// An actuated cable tracking a sinusoidal rest-length trajectory.
///
/// The length moves toward the target at no more than `max_speed` m/s, the
/// way a motor-driven spool would.
pub struct Cable {
    pub rest_length: f64,
    pub amplitude:   f64,
    pub frequency:   f64,
    pub max_speed:   f64,
    pub length:      f64,
    time:            f64,
}

impl Cable {
    pub fn new(rest_length: f64, amplitude: f64, frequency: f64) -> Self {
        Self {
            rest_length,
            amplitude,
            frequency,
            max_speed: 0.5,
            length: rest_length,
            time: 0.0,
        }
    }

    pub fn target(&self) -> f64 {
        self.rest_length * (1.0 + self.amplitude * (TAU * self.frequency * self.time).sin())
    }
}

impl Element for Cable {
    fn kind(&self) -> &'static str {
        "Cable"
    }

    fn setup(&mut self, world: &mut World) {
        // Small per-cable pretension offset, reproducible from the seed.
        self.length = self.rest_length * (1.0 + world.rng.gen_range(-0.01..0.01));
        self.time = 0.0;
    }

    fn step(&mut self, dt: f64) {
        self.time += dt;
        let error = self.target() - self.length;
        let limit = self.max_speed * dt;
        self.length += error.clamp(-limit, limit);
    }

    fn teardown(&mut self) {
        self.length = self.rest_length;
        self.time = 0.0;
    }
}
