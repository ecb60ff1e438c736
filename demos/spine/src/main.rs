//! spine: smallest end-to-end example for the rust_hm framework.
//!
//! Assembles a four-segment spine (two rods and one actuated cable per
//! segment, two markers on the root), runs two simulated seconds at 1 kHz,
//! and prints the tree before tearing it down.
//!
//! Set `RUST_LOG=debug` (or `trace`) to see lifecycle logging.

mod elements;
mod spine;

use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hm_core::{SimConfig, Tick, Vec3};
use hm_model::{ModelRef, ModelTree, StatsVisitor};
use hm_sim::{SimBuilder, SimObserver, SnapshotVisitor};

use elements::{Cable, Rod};
use spine::build_spine;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEGMENTS:              usize = 4;
const SEED:                  u64   = 42;
const DT_SECS:               f64   = 0.001;
const SIM_SECS:              f64   = 2.0;
const OUTPUT_INTERVAL_TICKS: u64   = 500;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs cable lengths at each snapshot and keeps a running stats pass.
struct CableLogger {
    stats: SnapshotVisitor<StatsVisitor>,
}

impl SimObserver for CableLogger {
    fn on_setup(&mut self, root: ModelRef<'_>) {
        info!(nodes = root.descendants().len() + 1, "spine ready");
    }

    fn on_snapshot(&mut self, tick: Tick, root: ModelRef<'_>) {
        let lengths: Vec<String> = root
            .descendants()
            .iter()
            .filter_map(|m| m.element::<Cable>())
            .map(|c| format!("{:.4}", c.length))
            .collect();
        info!(%tick, cables = %lengths.join(" "), "snapshot");
        self.stats.on_snapshot(tick, root);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Assemble the model.
    let mut tree = ModelTree::new();
    let root = build_spine(&mut tree, SEGMENTS)?;

    // Structural mistakes are rejected up front and leave the tree intact.
    let first_segment = tree.children(root)?[0];
    if let Err(e) = tree.add_child(first_segment, root) {
        println!("rejected as expected: {e}");
    }

    // 2. Configure and build the sim.
    let config = SimConfig {
        dt_secs:               DT_SECS,
        total_ticks:           (SIM_SECS / DT_SECS).round() as u64,
        seed:                  SEED,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
        gravity:               Vec3::new(0.0, -9.81, 0.0),
    };
    println!(
        "Sim: {} ticks of {} s, snapshot every {} ticks",
        config.total_ticks, config.dt_secs, config.output_interval_ticks
    );
    let mut sim = SimBuilder::new(config, tree, root).build()?;

    // 3. Run.
    let mut obs = CableLogger { stats: SnapshotVisitor::new(StatsVisitor::default()) };
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    println!("Simulation complete in {:.3} s", t0.elapsed().as_secs_f64());

    // 4. Summary.
    let stats = &obs.stats.visitor;
    println!(
        "{} snapshots; last pass saw {} nodes, {} markers",
        obs.stats.snapshots,
        stats.nodes() / obs.stats.snapshots.max(1),
        stats.markers / obs.stats.snapshots.max(1),
    );
    for (kind, count) in &stats.nodes_by_kind {
        println!("  {kind:<10} {}", count / obs.stats.snapshots.max(1));
    }
    println!("World issued {} bodies", sim.world.bodies_issued());

    let rods = sim.tree.find_tagged(sim.root, "rod A")?;
    for id in &rods {
        if let Some(rod) = sim.tree.element::<Rod>(*id).filter(|rod| rod.body.is_valid()) {
            println!("  {id} rod A: {:.3} m, {}", rod.length(), rod.body);
        }
    }

    println!();
    println!("Senseable descendants of the root:");
    for sensed in sim.tree.senseable_descendants(sim.root)? {
        println!("  {sensed}");
    }

    println!();
    println!("{}", sim.root()?);

    // 5. Tear down.
    sim.teardown()?;
    println!();
    println!("After teardown:\n{}", sim.root()?);

    Ok(())
}
