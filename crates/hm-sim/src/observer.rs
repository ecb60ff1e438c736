//! Simulation observer trait for progress reporting and inspection.

use hm_core::Tick;
use hm_model::{ModelRef, ModelVisitor};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// session.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, sim_time: f64) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: t = {sim_time:.3} s");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once after the model tree has been set up.
    fn on_setup(&mut self, _root: ModelRef<'_>) {}

    /// Called at the very start of each tick, before the tree is stepped.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the tree has been stepped.  `sim_time` is the simulated
    /// time reached at the end of this tick.
    fn on_tick_end(&mut self, _tick: Tick, _sim_time: f64) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with read-only access to the whole tree.
    fn on_snapshot(&mut self, _tick: Tick, _root: ModelRef<'_>) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Runs a [`ModelVisitor`] over the whole tree at every snapshot.
///
/// This is how a render or logging pass is hooked into the loop.
#[derive(Debug, Default)]
pub struct SnapshotVisitor<V> {
    pub visitor:   V,
    pub snapshots: usize,
}

impl<V: ModelVisitor> SnapshotVisitor<V> {
    pub fn new(visitor: V) -> Self {
        Self { visitor, snapshots: 0 }
    }

    pub fn into_inner(self) -> V {
        self.visitor
    }
}

impl<V: ModelVisitor> SimObserver for SnapshotVisitor<V> {
    fn on_snapshot(&mut self, _tick: Tick, root: ModelRef<'_>) {
        self.snapshots += 1;
        root.on_visit(&mut self.visitor);
    }
}
