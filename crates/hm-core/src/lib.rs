//! `hm-core`: foundational types for the `rust_hm` hierarchical model
//! framework.
//!
//! This crate is a dependency of every other `hm-*` crate.  It has no `hm-*`
//! dependencies and only a handful of external ones (`generational-arena`,
//! `rand`, `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`ids`]    | `ModelId` (generational), `BodyHandle`                   |
//! | [`tags`]   | `Tags` label set, `Taggable` capability                  |
//! | [`vec3`]   | `Vec3` positions, offsets, colors                        |
//! | [`time`]   | `Tick`, `SimClock`, `SimConfig`                          |
//! | [`rng`]    | `SimRng` (seeded, reproducible)                          |
//! | [`error`]  | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to the plain-data types.    |

pub mod error;
pub mod ids;
pub mod rng;
pub mod tags;
pub mod time;
pub mod vec3;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{BodyHandle, ModelId};
pub use rng::SimRng;
pub use tags::{Taggable, Tags};
pub use time::{SimClock, SimConfig, Tick};
pub use vec3::Vec3;
