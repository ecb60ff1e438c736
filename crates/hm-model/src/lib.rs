//! `hm-model`: the hierarchical model tree.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                       |
//! |-----------------|----------------------------------------------------------------|
//! | [`tree`]        | `ModelTree` arena, `ModelRef<'a>` read-only node view          |
//! | [`element`]     | `Element` trait: per-node behaviour (composite or leaf)        |
//! | [`composite`]   | `Composite`: the payload-free container element                |
//! | [`world`]       | `World`: execution context handed to `setup`                   |
//! | [`marker`]      | `Marker`: owned, tagged point of interest on a node            |
//! | [`senseable`]   | `Senseable<'a>`: shared view over nodes and markers            |
//! | [`visitor`]     | `ModelVisitor` trait and the counting/stats/dump visitors      |
//! | [`error`]       | `ModelError`, `ModelResult<T>`                                 |
//!
//! # Design notes
//!
//! Every node lives in one `ModelTree`.  A parent exclusively owns its
//! children through an ordered `Vec<ModelId>`; children hold no pointer back
//! to the parent.  All mutation goes through `&mut ModelTree`, so the borrow
//! checker rules out concurrent mutation and makes every `ModelRef` and
//! `Senseable` returned by a query unusable once the tree changes.
//!
//! Two capabilities stay orthogonal:
//!
//! 1. **`Element`**: what a node *does* on `setup`/`step`/`teardown`.
//!    Containers use [`Composite`]; leaves (rods, cables, sensors, …) carry
//!    their own element type.
//! 2. **`ModelVisitor`**: what an inspection pass does with each node.
//!
//! The tree performs the traversal and hands each visitor a [`ModelRef`]; the
//! visitor recovers the concrete element with [`ModelRef::element`].

pub mod composite;
pub mod element;
pub mod error;
pub mod marker;
pub mod senseable;
pub mod tree;
pub mod visitor;
pub mod world;

#[cfg(test)]
mod tests;

pub use composite::Composite;
pub use element::Element;
pub use error::{ModelError, ModelResult};
pub use marker::Marker;
pub use senseable::Senseable;
pub use tree::{ModelRef, ModelTree};
pub use visitor::{CountingVisitor, DumpVisitor, ModelVisitor, StatsVisitor};
pub use world::World;
