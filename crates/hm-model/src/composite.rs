//! The payload-free container element.

use crate::Element;

/// An [`Element`] with no behaviour of its own.
///
/// A composite node only groups children: every lifecycle call is forwarded
/// to the subtree by the tree itself, so all hooks keep their no-op defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct Composite;

impl Element for Composite {
    fn kind(&self) -> &'static str {
        "Composite"
    }
}
