//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter plus a fixed step
//! length held in `SimClock`:
//!
//!   sim_time = tick * dt_secs
//!
//! Every tick calls `step(dt_secs)` on the model tree exactly once.  Keeping
//! the tick as an integer means "how many steps have run" is exact even when
//! `dt_secs` is not representable in binary.

use std::fmt;

use crate::{CoreError, CoreResult, Vec3};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and converts it to simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per tick.
    pub dt_secs: f64,
    /// The current tick: advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(dt_secs: f64) -> Self {
        Self { dt_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.dt_secs
    }

    /// Rewind to tick 0.
    pub fn reset(&mut self) {
        self.current_tick = Tick::ZERO;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.4} s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically built in code by the application or loaded from a TOML/JSON
/// file (with the `serde` feature) and passed to the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Step length in simulated seconds.  Must be finite and > 0.
    pub dt_secs: f64,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always assembles the same model.
    pub seed: u64,

    /// Take an observer snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,

    /// Gravity handed to the world at setup.
    pub gravity: Vec3,
}

impl Default for SimConfig {
    /// 1 kHz stepping for one simulated second, Earth gravity along -y.
    fn default() -> Self {
        Self {
            dt_secs:               0.001,
            total_ticks:           1_000,
            seed:                  0,
            output_interval_ticks: 100,
            gravity:               Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

impl SimConfig {
    /// Reject configurations the tick loop cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.dt_secs.is_finite() && self.dt_secs > 0.0) {
            return Err(CoreError::Config(format!(
                "dt_secs must be finite and positive, got {}",
                self.dt_secs
            )));
        }
        if !self.gravity.is_finite() {
            return Err(CoreError::Config(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        Ok(())
    }

    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.dt_secs)
    }
}
