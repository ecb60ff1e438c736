//! `hm-sim`: session driver for the rust_hm framework.
//!
//! # Session shape
//!
//! ```text
//! setup(world)                     once, pre-order over the model tree
//! for tick in 0..config.total_ticks:
//!   ① on_tick_start
//!   ② step(config.dt_secs)         pre-order over the model tree
//!   ③ on_tick_end
//!   ④ on_snapshot                  every output_interval_ticks
//! on_sim_end
//! teardown()                       explicit; the tree stays inspectable until then
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hm_core::SimConfig;
//! use hm_model::{Composite, ModelTree};
//! use hm_sim::{NoopObserver, SimBuilder};
//!
//! let mut tree = ModelTree::new();
//! let root = tree.insert(Composite);
//! let mut sim = SimBuilder::new(SimConfig::default(), tree, root).build()?;
//! sim.run(&mut NoopObserver)?;
//! sim.teardown()?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, SnapshotVisitor};
pub use sim::Sim;
