//! Strongly typed identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.
//!
//! [`ModelId`] is generational: once the node it names is destroyed, the
//! handle stays stale forever even if the arena slot is reused.  A stale
//! `ModelId` is how this framework spells "absent node".

use std::fmt;

use generational_arena::Index;

// ── ModelId ───────────────────────────────────────────────────────────────────

/// Handle of a node inside a `ModelTree` arena.
///
/// Only the tree hands these out.  The wrapped index is crate-visible to the
/// framework through [`ModelId::from_index`] / [`ModelId::index`] and never
/// exposed as a raw integer pair to user code.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ModelId(Index);

impl ModelId {
    /// Wrap an arena index.
    #[inline]
    pub fn from_index(index: Index) -> Self {
        Self(index)
    }

    /// The arena index behind this handle.
    #[inline]
    pub fn index(self) -> Index {
        self.0
    }

    /// Slot number, ignoring the generation.  Useful for compact logging.
    #[inline]
    pub fn slot(self) -> usize {
        self.0.into_raw_parts().0
    }

    /// Generation of the slot when this handle was issued.
    #[inline]
    pub fn generation(self) -> u64 {
        self.0.into_raw_parts().1
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "ModelId({slot}v{generation})")
    }
}

// ── Plain integer IDs ─────────────────────────────────────────────────────────

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Engine-side resource handed to an element during setup (a rigid
    /// body, a constraint, ...).  Issued sequentially by the `World`.
    pub struct BodyHandle(u32);
}
