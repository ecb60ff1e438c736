//! `ModelTree`: arena-backed storage and traversal for model nodes.
//!
//! # Ownership
//!
//! The arena holds every node.  A node is either a *root* (owned by the
//! caller through the tree) or *attached* (owned by exactly one parent via
//! that parent's `children` list).  No node stores its parent.  Destroying a
//! node destroys its whole subtree; the handles of destroyed nodes go stale
//! and behave like absent nodes from then on.
//!
//! # Traversal order
//!
//! All traversals are depth-first pre-order with siblings in insertion
//! order: for each child, the child itself, then the child's own
//! descendants, then the next sibling.  `descendants`, `on_visit`, `setup`,
//! `step`, and `senseable_descendants` all follow it.

use std::fmt;

use generational_arena::Arena;
use hm_core::{ModelId, Taggable, Tags};
use rustc_hash::FxHashSet;
use tracing::{debug, instrument, trace};

use crate::element::AsAny;
use crate::{Composite, Element, Marker, ModelError, ModelResult, ModelVisitor, Senseable, World};

/// Indentation added per tree level in [`ModelRef::render`].
const INDENT: &str = "  ";

// ── Node slot ─────────────────────────────────────────────────────────────────

struct ModelSlot {
    element:  Box<dyn Element>,
    tags:     Tags,
    /// Exclusively owned children, in traversal order.
    children: Vec<ModelId>,
    markers:  Vec<Marker>,
    /// Whether some parent lists this node among its children.
    attached: bool,
}

// ── ModelTree ─────────────────────────────────────────────────────────────────

/// Owner of every model node and the only way to mutate them.
///
/// # Example
///
/// ```rust
/// use hm_model::{Composite, ModelTree};
///
/// let mut tree = ModelTree::new();
/// let root = tree.insert(Composite);
/// let a = tree.insert(Composite);
/// let b = tree.insert(Composite);
/// tree.add_child(root, a).unwrap();
/// tree.add_child(a, b).unwrap();
/// assert_eq!(tree.descendants(root).unwrap(), vec![a, b]);
/// assert!(tree.add_child(b, root).is_err()); // would close a cycle
/// ```
#[derive(Default)]
pub struct ModelTree {
    arena: Arena<ModelSlot>,
}

impl ModelTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self { arena: Arena::with_capacity(n) }
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Create an untagged root node carrying `element`.
    pub fn insert<E: Element>(&mut self, element: E) -> ModelId {
        self.insert_tagged(element, Tags::new())
    }

    /// Create a root node carrying `element` and `tags`.
    ///
    /// The node starts with no children and no markers.
    pub fn insert_tagged<E: Element>(&mut self, element: E, tags: Tags) -> ModelId {
        let kind = element.kind();
        let index = self.arena.insert(ModelSlot {
            element:  Box::new(element),
            tags,
            children: Vec::new(),
            markers:  Vec::new(),
            attached: false,
        });
        let id = ModelId::from_index(index);
        trace!(%id, kind, "model created");
        id
    }

    /// Create a tagged [`Composite`] root.
    pub fn insert_composite(&mut self, tags: Tags) -> ModelId {
        self.insert_tagged(Composite, tags)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Number of live nodes, attached or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// `true` if `id` names a live node.
    #[inline]
    pub fn contains(&self, id: ModelId) -> bool {
        self.arena.contains(id.index())
    }

    /// Read-only view of a node, or `None` if the handle is stale.
    pub fn get(&self, id: ModelId) -> Option<ModelRef<'_>> {
        self.arena
            .get(id.index())
            .map(|slot| ModelRef { tree: self, id, slot })
    }

    /// Like [`get`][Self::get] but reports a stale handle as an error.
    pub fn model(&self, id: ModelId) -> ModelResult<ModelRef<'_>> {
        self.get(id).ok_or(ModelError::UnknownModel(id))
    }

    /// `true` if `id` is a live node owned by some parent.
    pub fn is_attached(&self, id: ModelId) -> bool {
        self.arena.get(id.index()).is_some_and(|slot| slot.attached)
    }

    pub fn children(&self, id: ModelId) -> ModelResult<&[ModelId]> {
        Ok(&self.slot(id)?.children)
    }

    pub fn markers(&self, id: ModelId) -> ModelResult<&[Marker]> {
        Ok(&self.slot(id)?.markers)
    }

    pub fn tags(&self, id: ModelId) -> ModelResult<&Tags> {
        Ok(&self.slot(id)?.tags)
    }

    /// Borrow the concrete element of a node, if it is an `E`.
    pub fn element<E: Element>(&self, id: ModelId) -> Option<&E> {
        let element: &dyn Element = &*self.arena.get(id.index())?.element;
        element.as_any().downcast_ref::<E>()
    }

    /// Mutably borrow the concrete element of a node, if it is an `E`.
    pub fn element_mut<E: Element>(&mut self, id: ModelId) -> Option<&mut E> {
        let element: &mut dyn Element = &mut *self.arena.get_mut(id.index())?.element;
        element.as_any_mut().downcast_mut::<E>()
    }

    // ── Ownership mutation ────────────────────────────────────────────────

    /// Make `candidate` the last child of `parent`.
    ///
    /// Validated before anything changes:
    ///
    /// | Condition                                    | Error                 |
    /// |----------------------------------------------|-----------------------|
    /// | `parent` stale                               | `UnknownModel`        |
    /// | `candidate` is `None` or stale               | `NullChild`           |
    /// | `candidate == parent`                        | `SelfReference`       |
    /// | `candidate` already below `parent`           | `DuplicateDescendant` |
    /// | `parent` below `candidate`                   | `CyclicDescendant`    |
    /// | `candidate` owned by some other parent       | `AlreadyAttached`     |
    ///
    /// The duplicate check walks `parent`'s whole subtree, so this is
    /// O(subtree size).  Use it while assembling models, not per step.
    #[instrument(level = "trace", skip(self, candidate))]
    pub fn add_child(
        &mut self,
        parent:    ModelId,
        candidate: impl Into<Option<ModelId>>,
    ) -> ModelResult<()> {
        if !self.contains(parent) {
            return Err(ModelError::UnknownModel(parent));
        }
        let candidate = candidate.into();
        let child = match candidate {
            Some(c) if self.contains(c) => c,
            _ => return Err(ModelError::NullChild { parent, candidate }),
        };
        if child == parent {
            return Err(ModelError::SelfReference(parent));
        }
        if self.subtree(parent, false).contains(&child) {
            return Err(ModelError::DuplicateDescendant { parent, child });
        }
        if self.subtree(child, false).contains(&parent) {
            return Err(ModelError::CyclicDescendant { parent, child });
        }
        if self.is_attached(child) {
            return Err(ModelError::AlreadyAttached { child });
        }

        self.slot_mut(child)?.attached = true;
        self.slot_mut(parent)?.children.push(child);
        trace!(%parent, %child, "child attached");

        debug_assert!(self.invariant(parent));
        debug_assert!(self.children(parent).is_ok_and(|c| c.contains(&child)));
        Ok(())
    }

    /// Append a marker to a node.  The tree keeps its own copy.
    pub fn add_marker(&mut self, id: ModelId, marker: Marker) -> ModelResult<()> {
        self.slot_mut(id)?.markers.push(marker);
        Ok(())
    }

    /// Add a tag to a node.
    pub fn add_tag(&mut self, id: ModelId, tag: &str) -> ModelResult<()> {
        self.slot_mut(id)?.tags.insert(tag)?;
        Ok(())
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Run every element's setup hook, pre-order over the subtree at `id`.
    ///
    /// There is no guard against setting a subtree up twice; pairing
    /// `setup` with `teardown` is the caller's job.
    #[instrument(level = "debug", skip(self, world))]
    pub fn setup(&mut self, id: ModelId, world: &mut World) -> ModelResult<()> {
        self.slot(id)?;
        for node in self.subtree(id, true) {
            if let Some(slot) = self.arena.get_mut(node.index()) {
                slot.element.setup(world);
            }
        }
        debug_assert!(self.invariant(id));
        Ok(())
    }

    /// Advance every element in the subtree at `id` by `dt`, pre-order.
    ///
    /// `dt` must be strictly positive; otherwise the call fails before any
    /// element is stepped.
    pub fn step(&mut self, id: ModelId, dt: f64) -> ModelResult<()> {
        self.slot(id)?;
        // Written this way round so NaN is rejected too.
        if !(dt > 0.0) {
            return Err(ModelError::NonPositiveStep { dt });
        }
        for node in self.subtree(id, true) {
            if let Some(slot) = self.arena.get_mut(node.index()) {
                slot.element.step(dt);
            }
        }
        debug_assert!(self.invariant(id));
        Ok(())
    }

    /// Tear down and destroy every descendant of `id`, then clear its
    /// markers and run its own teardown hook.
    ///
    /// The node itself survives, empty and reusable.  Tearing down an
    /// already-empty node only re-runs its element's teardown hook.
    #[instrument(level = "debug", skip(self))]
    pub fn teardown(&mut self, id: ModelId) -> ModelResult<()> {
        self.slot(id)?;
        let before = self.arena.len();
        self.teardown_subtree(id);
        debug!(%id, destroyed = before - self.arena.len(), "subtree torn down");

        debug_assert!(self.invariant(id));
        debug_assert!(self.children(id).is_ok_and(|c| c.is_empty()));
        Ok(())
    }

    /// Tear down and destroy a root node together with its subtree.
    ///
    /// Attached nodes can't be removed on their own; tear their parent down
    /// instead.
    pub fn remove(&mut self, id: ModelId) -> ModelResult<()> {
        if self.slot(id)?.attached {
            return Err(ModelError::StillAttached(id));
        }
        self.teardown_subtree(id);
        self.arena.remove(id.index());
        debug!(%id, "root destroyed");
        Ok(())
    }

    /// Post-order teardown of the subtree at `id`.  Every descendant is
    /// destroyed right after its own teardown hook; `id` itself survives.
    ///
    /// Uses an explicit stack so that long chains don't exhaust the stack.
    fn teardown_subtree(&mut self, id: ModelId) {
        // (node, children already scheduled)
        let mut stack = vec![(id, false)];
        while let Some((node, expanded)) = stack.pop() {
            let Some(slot) = self.arena.get_mut(node.index()) else {
                continue;
            };
            if expanded {
                slot.markers.clear();
                slot.element.teardown();
                if node != id {
                    self.arena.remove(node.index());
                }
            } else {
                let children = std::mem::take(&mut slot.children);
                stack.push((node, true));
                stack.extend(children.into_iter().rev().map(|child| (child, false)));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Every strict descendant of `id` in traversal order.
    ///
    /// Recomputed on each call; nothing is cached between mutations.
    pub fn descendants(&self, id: ModelId) -> ModelResult<Vec<ModelId>> {
        self.slot(id)?;
        Ok(self.subtree(id, false))
    }

    /// Descendants of `id` followed by `id`'s own markers, as one list.
    ///
    /// Markers owned by the descendants are not included; each node exposes
    /// only its own.
    pub fn senseable_descendants(&self, id: ModelId) -> ModelResult<Vec<Senseable<'_>>> {
        Ok(self.model(id)?.senseable_descendants())
    }

    /// Descendants of `id` whose tags include every tag in `query`
    /// (space separated, e.g. `"rod A"`), in traversal order.
    pub fn find_tagged(&self, id: ModelId, query: &str) -> ModelResult<Vec<ModelId>> {
        let query: Tags = query.parse()?;
        let root = self.model(id)?;
        Ok(root
            .descendants()
            .into_iter()
            .filter(|node| node.has_all_tags(&query))
            .map(|node| node.id())
            .collect())
    }

    /// Visit `id` and its whole subtree with `visitor`.
    pub fn on_visit<V: ModelVisitor + ?Sized>(
        &self,
        id:      ModelId,
        visitor: &mut V,
    ) -> ModelResult<()> {
        self.model(id)?.on_visit(visitor);
        debug_assert!(self.invariant(id));
        Ok(())
    }

    /// Diagnostic dump of the subtree at `id`; see [`ModelRef::render`].
    pub fn render(&self, id: ModelId, prefix: &str) -> ModelResult<String> {
        Ok(self.model(id)?.render(prefix))
    }

    /// Structural invariant for the subtree at `id`: every child handle is
    /// live and no node is reachable twice.
    pub fn invariant(&self, id: ModelId) -> bool {
        let mut seen = FxHashSet::default();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                return false;
            }
            match self.arena.get(node.index()) {
                Some(slot) => stack.extend(slot.children.iter().copied()),
                None => return false,
            }
        }
        true
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn slot(&self, id: ModelId) -> ModelResult<&ModelSlot> {
        self.arena.get(id.index()).ok_or(ModelError::UnknownModel(id))
    }

    fn slot_mut(&mut self, id: ModelId) -> ModelResult<&mut ModelSlot> {
        self.arena.get_mut(id.index()).ok_or(ModelError::UnknownModel(id))
    }

    /// Pre-order walk of the subtree at `root`, with or without `root`.
    ///
    /// Iterative so that long chains don't exhaust the stack.
    fn subtree(&self, root: ModelId, include_root: bool) -> Vec<ModelId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if include_root || id != root {
                out.push(id);
            }
            if let Some(slot) = self.arena.get(id.index()) {
                stack.extend(slot.children.iter().rev().copied());
            }
        }
        out
    }
}

impl fmt::Debug for ModelTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roots = self.arena.iter().filter(|(_, slot)| !slot.attached).count();
        f.debug_struct("ModelTree")
            .field("nodes", &self.arena.len())
            .field("roots", &roots)
            .finish()
    }
}

// ── ModelRef ──────────────────────────────────────────────────────────────────

/// A read-only view of one node, borrowed from its [`ModelTree`].
///
/// This is what visitors receive.  It is `Copy`, so passing it around costs
/// nothing; it cannot outlive the borrow of the tree it came from.
#[derive(Clone, Copy)]
pub struct ModelRef<'a> {
    tree: &'a ModelTree,
    id:   ModelId,
    slot: &'a ModelSlot,
}

impl<'a> ModelRef<'a> {
    #[inline]
    pub fn id(&self) -> ModelId {
        self.id
    }

    /// The element's type label.
    #[inline]
    pub fn kind(&self) -> &'static str {
        self.slot.element.kind()
    }

    /// The concrete element, if it is an `E`.
    pub fn element<E: Element>(&self) -> Option<&'a E> {
        let element: &'a dyn Element = &*self.slot.element;
        element.as_any().downcast_ref::<E>()
    }

    #[inline]
    pub fn tags(&self) -> &'a Tags {
        &self.slot.tags
    }

    #[inline]
    pub fn markers(&self) -> &'a [Marker] {
        &self.slot.markers
    }

    #[inline]
    pub fn child_ids(&self) -> &'a [ModelId] {
        &self.slot.children
    }

    /// `true` if a parent owns this node.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.slot.attached
    }

    /// Direct children in order.
    pub fn children(&self) -> impl Iterator<Item = ModelRef<'a>> + 'a {
        let tree = self.tree;
        self.slot.children.iter().filter_map(move |&id| tree.get(id))
    }

    /// Every strict descendant in traversal order.
    pub fn descendants(&self) -> Vec<ModelRef<'a>> {
        self.tree
            .subtree(self.id, false)
            .into_iter()
            .filter_map(|id| self.tree.get(id))
            .collect()
    }

    /// Descendants, then this node's own markers.
    pub fn senseable_descendants(&self) -> Vec<Senseable<'a>> {
        let descendants = self.descendants();
        let markers = self.markers();
        let mut out = Vec::with_capacity(descendants.len() + markers.len());
        out.extend(descendants.iter().copied().map(Senseable::Model));
        out.extend(markers.iter().map(Senseable::Marker));
        debug!(
            id = %self.id,
            descendants = descendants.len(),
            markers = markers.len(),
            total = out.len(),
            "senseable descendants collected"
        );
        out
    }

    /// Render this node, then every child subtree in order.
    pub fn on_visit<V: ModelVisitor + ?Sized>(&self, visitor: &mut V) {
        let mut stack = vec![*self];
        while let Some(node) = stack.pop() {
            visitor.render(node);
            let first = stack.len();
            stack.extend(node.children());
            stack[first..].reverse();
        }
    }

    /// Indented multi-line dump of this subtree:
    ///
    /// ```text
    /// Composite(
    ///   Children:
    ///   Rod(
    ///     Children:
    ///     Tags: [rod A]
    ///   )
    ///   Tags: [spine]
    /// )
    /// ```
    pub fn render(&self, prefix: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_tree(prefix, &mut out);
        out
    }

    fn write_tree(&self, prefix: &str, out: &mut dyn fmt::Write) -> fmt::Result {
        let mut pad = prefix.to_owned();
        let mut stack = vec![RenderStep::Open(*self)];
        while let Some(step) = stack.pop() {
            match step {
                RenderStep::Open(node) => {
                    writeln!(out, "{pad}{}(", node.kind())?;
                    writeln!(out, "{pad}{INDENT}Children:")?;
                    pad.push_str(INDENT);
                    stack.push(RenderStep::Close(node));
                    let first = stack.len();
                    stack.extend(node.children().map(RenderStep::Open));
                    stack[first..].reverse();
                }
                RenderStep::Close(node) => {
                    writeln!(out, "{pad}Tags: [{}]", node.tags())?;
                    pad.truncate(pad.len() - INDENT.len());
                    write!(out, "{pad})")?;
                    if node.id != self.id {
                        writeln!(out)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Pending work for the iterative renderer.
enum RenderStep<'a> {
    Open(ModelRef<'a>),
    Close(ModelRef<'a>),
}

impl Taggable for ModelRef<'_> {
    fn tags(&self) -> &Tags {
        &self.slot.tags
    }
}

impl PartialEq for ModelRef<'_> {
    /// Two views are equal when they name the same node of the same tree.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl fmt::Debug for ModelRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("children", &self.slot.children.len())
            .field("markers", &self.slot.markers.len())
            .finish()
    }
}

impl fmt::Display for ModelRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree("", f)
    }
}
