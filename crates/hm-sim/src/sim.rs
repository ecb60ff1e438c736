//! The `Sim` struct and its tick loop.

use hm_core::{ModelId, SimClock, SimConfig, Tick};
use hm_model::{ModelRef, ModelTree, World};
use tracing::{debug, info};

use crate::{SimObserver, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim` owns a [`ModelTree`], the id of the root model it drives, and the
/// [`World`] the tree is set up into.  One session is:
///
/// 1. **Setup**: `setup(world)` over the root's subtree, once.
/// 2. **Ticks**: `step(config.dt_secs)` over the subtree per tick, with
///    observer callbacks around it.
/// 3. **Teardown**: explicit, via [`teardown`][Self::teardown].
///
/// Create via [`SimBuilder`][crate::SimBuilder].
#[derive(Debug)]
pub struct Sim {
    /// Run configuration (step length, tick count, seed, …).
    pub config: SimConfig,

    /// Current tick and step length.
    pub clock: SimClock,

    /// Every model node.  Mutate it between sessions, not during `run`.
    pub tree: ModelTree,

    /// The model the loop drives.
    pub root: ModelId,

    /// Execution context passed to `setup`.
    pub world: World,

    is_setup: bool,
}

impl Sim {
    pub(crate) fn new(config: SimConfig, tree: ModelTree, root: ModelId, world: World) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            tree,
            root,
            world,
            is_setup: false,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// `true` between a completed setup and the next teardown.
    #[inline]
    pub fn is_setup(&self) -> bool {
        self.is_setup
    }

    /// Read-only view of the root model.
    pub fn root(&self) -> SimResult<ModelRef<'_>> {
        Ok(self.tree.model(self.root)?)
    }

    /// Set the tree up into the world.  Does nothing if the session is
    /// already set up.
    pub fn setup(&mut self) -> SimResult<()> {
        if self.is_setup {
            return Ok(());
        }
        self.tree.setup(self.root, &mut self.world)?;
        self.is_setup = true;
        let nodes = self.tree.descendants(self.root)?.len() + 1;
        info!(root = %self.root, nodes, bodies = self.world.bodies_issued(), "model set up");
        Ok(())
    }

    /// Run the session from the current tick to `config.end_tick()`,
    /// setting it up first if needed.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.begin(observer)?;
        while self.clock.current_tick < self.config.end_tick() {
            self.process_tick(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        info!(ticks = self.clock.current_tick.0, sim_time = self.clock.elapsed_secs(), "run finished");
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        self.begin(observer)?;
        for _ in 0..n {
            self.process_tick(observer)?;
        }
        Ok(())
    }

    /// Tear the root model down and rewind the clock.
    ///
    /// This destroys every descendant of the root; the root itself stays in
    /// the tree, empty.
    pub fn teardown(&mut self) -> SimResult<()> {
        self.tree.teardown(self.root)?;
        self.is_setup = false;
        self.clock.reset();
        info!(root = %self.root, "model torn down");
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn begin<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if self.is_setup {
            return Ok(());
        }
        self.setup()?;
        observer.on_setup(self.root()?);
        Ok(())
    }

    fn process_tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        self.tree.step(self.root, self.clock.dt_secs)?;
        self.clock.advance();
        observer.on_tick_end(now, self.clock.elapsed_secs());

        if self.snapshot_due(now) {
            debug!(tick = %now, "snapshot");
            let root = self.tree.model(self.root)?;
            observer.on_snapshot(now, root);
        }
        Ok(())
    }

    fn snapshot_due(&self, now: Tick) -> bool {
        self.config.output_interval_ticks > 0
            && now.0 % self.config.output_interval_ticks == 0
    }
}
