//! Fluent builder for constructing a [`Sim`].

use hm_core::{ModelId, SimConfig};
use hm_model::{ModelTree, World};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: step length, tick count, seed, …
/// - [`ModelTree`] and the id of the root model to drive
///
/// # Optional inputs (have defaults)
///
/// | Method         | Default                                   |
/// |----------------|-------------------------------------------|
/// | `.world(w)`    | `World::from_config(&config)`             |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, tree, root)
///     .world(World::new(Vec3::ZERO, 7))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: SimConfig,
    tree:   ModelTree,
    root:   ModelId,
    world:  Option<World>,
}

impl SimBuilder {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, tree: ModelTree, root: ModelId) -> Self {
        Self { config, tree, root, world: None }
    }

    /// Supply the world the tree is set up into.
    ///
    /// If not called, a world is derived from the config's gravity and seed.
    pub fn world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        let root = self.tree.model(self.root)?;
        if root.is_attached() {
            return Err(SimError::Config(format!(
                "{} is owned by a parent; the simulation must drive a root model",
                self.root
            )));
        }

        let world = self.world.unwrap_or_else(|| World::from_config(&self.config));
        Ok(Sim::new(self.config, self.tree, self.root, world))
    }
}
