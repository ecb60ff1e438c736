//! The visitor half of the double-dispatch traversal protocol.

use std::collections::BTreeMap;

use tracing::trace;

use crate::ModelRef;

/// An inspection pass over a model subtree.
///
/// [`ModelTree::on_visit`][crate::ModelTree::on_visit] calls
/// [`render`][Self::render] once for every node in the subtree, receiver
/// first, then each child subtree in order.  A visitor that cares about the
/// concrete node type asks for it:
///
/// ```rust,ignore
/// impl ModelVisitor for DrawRods {
///     fn render(&mut self, model: ModelRef<'_>) {
///         if let Some(rod) = model.element::<Rod>() {
///             self.draw_line(rod.from, rod.to);
///         }
///     }
/// }
/// ```
///
/// Any `FnMut(ModelRef<'_>)` closure is a visitor too.
pub trait ModelVisitor {
    fn render(&mut self, model: ModelRef<'_>);
}

impl<F: FnMut(ModelRef<'_>)> ModelVisitor for F {
    fn render(&mut self, model: ModelRef<'_>) {
        self(model)
    }
}

// ── CountingVisitor ───────────────────────────────────────────────────────────

/// Counts visited nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountingVisitor {
    pub visits: usize,
}

impl ModelVisitor for CountingVisitor {
    fn render(&mut self, _model: ModelRef<'_>) {
        self.visits += 1;
    }
}

// ── StatsVisitor ──────────────────────────────────────────────────────────────

/// Aggregate statistics over a subtree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsVisitor {
    /// Node count per element kind, sorted by kind for stable output.
    pub nodes_by_kind: BTreeMap<&'static str, usize>,
    /// Markers owned by the visited nodes (all levels).
    pub markers: usize,
    /// Nodes without children.
    pub leaves: usize,
}

impl StatsVisitor {
    pub fn nodes(&self) -> usize {
        self.nodes_by_kind.values().sum()
    }
}

impl ModelVisitor for StatsVisitor {
    fn render(&mut self, model: ModelRef<'_>) {
        *self.nodes_by_kind.entry(model.kind()).or_default() += 1;
        self.markers += model.markers().len();
        if model.child_ids().is_empty() {
            self.leaves += 1;
        }
    }
}

// ── DumpVisitor ───────────────────────────────────────────────────────────────

/// One diagnostic line per node, also emitted at `trace` level.
///
/// Lines look like `ModelId(2v0) Rod children=0 markers=1 tags=[rod A]`.
#[derive(Clone, Debug, Default)]
pub struct DumpVisitor {
    pub lines: Vec<String>,
}

impl ModelVisitor for DumpVisitor {
    fn render(&mut self, model: ModelRef<'_>) {
        let line = format!(
            "{} {} children={} markers={} tags=[{}]",
            model.id(),
            model.kind(),
            model.child_ids().len(),
            model.markers().len(),
            model.tags(),
        );
        trace!("{line}");
        self.lines.push(line);
    }
}
