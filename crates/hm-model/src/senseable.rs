//! The shared view sensors use to enumerate nodes and markers together.

use std::fmt;

use hm_core::{Taggable, Tags};

use crate::{Marker, ModelRef};

/// Something a sensor can observe: a model node or a marker.
///
/// Values borrow the tree they were collected from and are invalidated (by
/// the borrow checker) as soon as the tree is mutated.
#[derive(Clone, Copy, Debug)]
pub enum Senseable<'a> {
    Model(ModelRef<'a>),
    Marker(&'a Marker),
}

impl<'a> Senseable<'a> {
    /// `"Marker"` for markers, the element kind for model nodes.
    pub fn kind(&self) -> &'static str {
        match self {
            Senseable::Model(model) => model.kind(),
            Senseable::Marker(_) => "Marker",
        }
    }

    pub fn as_model(&self) -> Option<ModelRef<'a>> {
        match self {
            Senseable::Model(model) => Some(*model),
            Senseable::Marker(_) => None,
        }
    }

    pub fn as_marker(&self) -> Option<&'a Marker> {
        match self {
            Senseable::Model(_) => None,
            Senseable::Marker(marker) => Some(marker),
        }
    }

    /// What this senseable exposes in turn.  Markers expose nothing; model
    /// nodes expose their descendants and their own markers.
    pub fn senseable_descendants(&self) -> Vec<Senseable<'a>> {
        match self {
            Senseable::Model(model) => model.senseable_descendants(),
            Senseable::Marker(_) => Vec::new(),
        }
    }
}

impl Taggable for Senseable<'_> {
    fn tags(&self) -> &Tags {
        match self {
            Senseable::Model(model) => model.tags(),
            Senseable::Marker(marker) => &marker.tags,
        }
    }
}

impl PartialEq for Senseable<'_> {
    /// Identity, not payload: two markers are equal only if they are the
    /// same stored marker.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Senseable::Model(a), Senseable::Model(b)) => a == b,
            (Senseable::Marker(a), Senseable::Marker(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl fmt::Display for Senseable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Senseable::Model(model) => write!(f, "{} {}", model.kind(), model.id()),
            Senseable::Marker(marker) => {
                write!(f, "Marker #{} at {}", marker.node_number, marker.position)
            }
        }
    }
}
