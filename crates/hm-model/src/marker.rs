//! Markers: tagged points of interest attached to a model node.

use hm_core::{Taggable, Tags, Vec3};

/// A point of interest owned by a node.
///
/// Markers are plain values.  [`ModelTree::add_marker`][crate::ModelTree::add_marker]
/// takes ownership of the value it is given, so whatever copy the caller
/// keeps can change freely without affecting the stored marker.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marker {
    /// Position relative to the owning node.
    pub position: Vec3,
    /// RGB color for rendering, components in [0, 1].
    pub color: Vec3,
    /// Caller-chosen number used to tell markers apart in logs and sensors.
    pub node_number: u32,
    pub tags: Tags,
}

impl Marker {
    pub fn new(position: Vec3, color: Vec3, node_number: u32) -> Self {
        Self { position, color, node_number, tags: Tags::new() }
    }

    /// Builder-style tag assignment.
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }
}

impl Taggable for Marker {
    fn tags(&self) -> &Tags {
        &self.tags
    }
}
