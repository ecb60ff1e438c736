//! The `Element` trait: the main extension point for user code.

use std::any::Any;

use crate::World;

/// Per-node behaviour plugged into a [`ModelTree`][crate::ModelTree] node.
///
/// The tree owns structure (children, markers, tags) and traversal order;
/// an element only reacts to the lifecycle hooks for its own node.  A plain
/// container uses [`Composite`][crate::Composite]; a leaf physical element
/// (rod, cable, sensor, ...) implements this trait with real work in
/// [`step`][Self::step].
///
/// # Required methods
///
/// Only [`kind`][Self::kind] is required.  The lifecycle hooks default to
/// no-ops so simple elements stay short.
///
/// # Hook order
///
/// - `setup` and `step` run pre-order: a node's element runs before any of
///   its children.
/// - `teardown` runs after the node's children have been torn down and
///   destroyed.
///
/// `step` is never called with a non-positive `dt`; the tree rejects such a
/// call before reaching any element.
///
/// # Example
///
/// ```rust,ignore
/// struct Spring { rest_length: f64, tension: f64 }
///
/// impl Element for Spring {
///     fn kind(&self) -> &'static str { "Spring" }
///     fn step(&mut self, dt: f64) { self.tension *= (-dt).exp(); }
/// }
/// ```
pub trait Element: AsAny {
    /// Short type label used in tree dumps and statistics (`"Composite"`,
    /// `"Rod"`, ...).
    fn kind(&self) -> &'static str;

    /// Acquire context-dependent resources.  Called once per session; the
    /// tree does not guard against a second call.
    fn setup(&mut self, _world: &mut World) {}

    /// Advance by `dt` simulated seconds (`dt > 0`).
    fn step(&mut self, _dt: f64) {}

    /// Release whatever `setup` acquired.  Must tolerate being called on an
    /// element that was never set up.
    fn teardown(&mut self) {}
}

/// Downcasting support for [`Element`] trait objects.
///
/// Blanket-implemented for every `'static` type; user code never implements
/// it by hand.
pub trait AsAny: Any {
    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
