//! Unit tests for hm-model.

use std::cell::RefCell;
use std::rc::Rc;

use hm_core::{BodyHandle, ModelId, Tags, Vec3};

use crate::{
    Composite, CountingVisitor, DumpVisitor, Element, Marker, ModelError, ModelRef, ModelTree,
    Senseable, StatsVisitor, World,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Shared record of lifecycle calls: `(label, hook)`.
type CallLog = Rc<RefCell<Vec<(&'static str, &'static str)>>>;

/// Leaf element that counts and logs every lifecycle call.
#[derive(Default)]
struct Recorder {
    label:     &'static str,
    log:       CallLog,
    setups:    u32,
    steps:     u32,
    teardowns: u32,
    last_dt:   Option<f64>,
    body:      Option<BodyHandle>,
}

impl Recorder {
    fn new(label: &'static str, log: &CallLog) -> Self {
        Self { label, log: Rc::clone(log), ..Self::default() }
    }
}

impl Element for Recorder {
    fn kind(&self) -> &'static str {
        "Recorder"
    }

    fn setup(&mut self, world: &mut World) {
        self.setups += 1;
        self.body = Some(world.acquire_body());
        self.log.borrow_mut().push((self.label, "setup"));
    }

    fn step(&mut self, dt: f64) {
        self.steps += 1;
        self.last_dt = Some(dt);
        self.log.borrow_mut().push((self.label, "step"));
    }

    fn teardown(&mut self) {
        self.teardowns += 1;
        self.body = None;
        self.log.borrow_mut().push((self.label, "teardown"));
    }
}

fn tags(s: &str) -> Tags {
    s.parse().unwrap()
}

fn marker(n: u32) -> Marker {
    Marker::new(Vec3::new(n as f64, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), n)
}

/// R → [C1 → [C1a, C1b], C2, C3 → [C3a]], all recorders.
struct Fixture {
    tree: ModelTree,
    log:  CallLog,
    r:    ModelId,
    c1:   ModelId,
    c1a:  ModelId,
    c1b:  ModelId,
    c2:   ModelId,
    c3:   ModelId,
    c3a:  ModelId,
}

impl Fixture {
    fn new() -> Self {
        let log = CallLog::default();
        let mut tree = ModelTree::new();
        let r = tree.insert(Recorder::new("R", &log));
        let c1 = tree.insert(Recorder::new("C1", &log));
        let c1a = tree.insert(Recorder::new("C1a", &log));
        let c1b = tree.insert(Recorder::new("C1b", &log));
        let c2 = tree.insert(Recorder::new("C2", &log));
        let c3 = tree.insert(Recorder::new("C3", &log));
        let c3a = tree.insert(Recorder::new("C3a", &log));
        // Attach bottom-up and top-down mixed: order must not matter.
        tree.add_child(r, c1).unwrap();
        tree.add_child(c1, c1a).unwrap();
        tree.add_child(c1, c1b).unwrap();
        tree.add_child(r, c2).unwrap();
        tree.add_child(c3, c3a).unwrap();
        tree.add_child(r, c3).unwrap();
        Self { tree, log, r, c1, c1a, c1b, c2, c3, c3a }
    }

    fn preorder(&self) -> Vec<ModelId> {
        vec![self.c1, self.c1a, self.c1b, self.c2, self.c3, self.c3a]
    }

    fn recorder(&self, id: ModelId) -> &Recorder {
        self.tree.element::<Recorder>(id).unwrap()
    }

    fn labels(&self, hook: &str) -> Vec<&'static str> {
        self.log
            .borrow()
            .iter()
            .filter(|(_, h)| *h == hook)
            .map(|(label, _)| *label)
            .collect()
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction_tests {
    use super::*;

    #[test]
    fn new_node_is_empty_root() {
        let mut tree = ModelTree::new();
        let id = tree.insert(Composite);
        let node = tree.get(id).unwrap();
        assert_eq!(node.kind(), "Composite");
        assert!(node.child_ids().is_empty());
        assert!(node.markers().is_empty());
        assert!(node.tags().is_empty());
        assert!(!node.is_attached());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn tagged_composite() {
        let mut tree = ModelTree::new();
        let id = tree.insert_composite(tags("spine segment"));
        assert_eq!(tree.tags(id).unwrap().to_string(), "spine segment");
        tree.add_tag(id, "front").unwrap();
        assert_eq!(tree.tags(id).unwrap().to_string(), "spine segment front");
        assert!(matches!(tree.add_tag(id, "bad tag"), Err(ModelError::Tag(_))));
    }

    #[test]
    fn element_downcast() {
        let log = CallLog::default();
        let mut tree = ModelTree::new();
        let recorder = tree.insert(Recorder::new("P", &log));
        let plain = tree.insert(Composite);
        assert_eq!(tree.element::<Recorder>(recorder).unwrap().label, "P");
        assert!(tree.element::<Composite>(recorder).is_none());
        assert!(tree.element::<Recorder>(plain).is_none());
        tree.element_mut::<Recorder>(recorder).unwrap().steps = 9;
        assert_eq!(tree.get(recorder).unwrap().element::<Recorder>().unwrap().steps, 9);
    }

    #[test]
    fn stale_handle_lookups() {
        let mut tree = ModelTree::new();
        let id = tree.insert(Composite);
        tree.remove(id).unwrap();
        assert!(!tree.contains(id));
        assert!(tree.get(id).is_none());
        assert_eq!(tree.children(id), Err(ModelError::UnknownModel(id)));
        assert_eq!(tree.descendants(id), Err(ModelError::UnknownModel(id)));
        assert!(tree.is_empty());
    }
}

// ── add_child ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod add_child_tests {
    use super::*;

    #[test]
    fn attaches_in_order() {
        let mut tree = ModelTree::new();
        let r = tree.insert(Composite);
        let a = tree.insert(Composite);
        let b = tree.insert(Composite);
        tree.add_child(r, a).unwrap();
        tree.add_child(r, b).unwrap();
        assert_eq!(tree.children(r).unwrap(), &[a, b]);
        assert!(tree.is_attached(a));
        assert!(!tree.is_attached(r));
    }

    #[test]
    fn null_child_rejected() {
        let mut tree = ModelTree::new();
        let r = tree.insert(Composite);
        let err = tree.add_child(r, None).unwrap_err();
        assert_eq!(err, ModelError::NullChild { parent: r, candidate: None });
        assert!(tree.children(r).unwrap().is_empty());
    }

    #[test]
    fn stale_child_is_null() {
        let mut tree = ModelTree::new();
        let r = tree.insert(Composite);
        let gone = tree.insert(Composite);
        tree.remove(gone).unwrap();
        let err = tree.add_child(r, gone).unwrap_err();
        assert_eq!(err, ModelError::NullChild { parent: r, candidate: Some(gone) });
    }

    #[test]
    fn self_reference_rejected_for_leaf_and_composite() {
        let log = CallLog::default();
        let mut tree = ModelTree::new();
        let leaf = tree.insert(Recorder::new("L", &log));
        let parent = tree.insert(Composite);
        let child = tree.insert(Composite);
        tree.add_child(parent, child).unwrap();
        assert_eq!(tree.add_child(leaf, leaf), Err(ModelError::SelfReference(leaf)));
        assert_eq!(tree.add_child(parent, parent), Err(ModelError::SelfReference(parent)));
        assert_eq!(tree.children(parent).unwrap(), &[child]);
    }

    #[test]
    fn direct_child_twice_is_duplicate() {
        let mut tree = ModelTree::new();
        let r = tree.insert(Composite);
        let a = tree.insert(Composite);
        tree.add_child(r, a).unwrap();
        let err = tree.add_child(r, a).unwrap_err();
        assert_eq!(err, ModelError::DuplicateDescendant { parent: r, child: a });
        assert_eq!(tree.children(r).unwrap(), &[a]);
    }

    #[test]
    fn grandchild_is_duplicate() {
        let f = Fixture::new();
        let mut tree = f.tree;
        let err = tree.add_child(f.r, f.c1a).unwrap_err();
        assert_eq!(err, ModelError::DuplicateDescendant { parent: f.r, child: f.c1a });
        assert!(err.is_duplicate_or_cycle());
    }

    #[test]
    fn ancestor_under_descendant_is_cycle() {
        let f = Fixture::new();
        let mut tree = f.tree;
        let before = tree.descendants(f.r).unwrap();
        for (parent, child) in [(f.c1a, f.r), (f.c1a, f.c1), (f.c3, f.r), (f.c1, f.r)] {
            let err = tree.add_child(parent, child).unwrap_err();
            assert_eq!(err, ModelError::CyclicDescendant { parent, child });
        }
        assert_eq!(tree.descendants(f.r).unwrap(), before);
        assert!(tree.invariant(f.r));
    }

    #[test]
    fn second_parent_rejected() {
        let f = Fixture::new();
        let mut tree = f.tree;
        let other = tree.insert(Composite);
        let err = tree.add_child(other, f.c2).unwrap_err();
        assert_eq!(err, ModelError::AlreadyAttached { child: f.c2 });
        assert!(tree.children(other).unwrap().is_empty());
        assert_eq!(tree.children(f.r).unwrap(), &[f.c1, f.c2, f.c3]);
    }

    #[test]
    fn unknown_parent() {
        let mut tree = ModelTree::new();
        let gone = tree.insert(Composite);
        let a = tree.insert(Composite);
        tree.remove(gone).unwrap();
        assert_eq!(tree.add_child(gone, a), Err(ModelError::UnknownModel(gone)));
        assert!(!tree.is_attached(a));
    }

    #[test]
    fn error_classification() {
        let id = {
            let mut tree = ModelTree::new();
            tree.insert(Composite)
        };
        assert!(!ModelError::UnknownModel(id).is_invalid_argument());
        assert!(ModelError::SelfReference(id).is_invalid_argument());
        assert!(ModelError::NonPositiveStep { dt: 0.0 }.is_invalid_argument());
        assert!(!ModelError::SelfReference(id).is_duplicate_or_cycle());
        assert!(ModelError::AlreadyAttached { child: id }.is_duplicate_or_cycle());
    }
}

// ── Descendants and visiting ──────────────────────────────────────────────────

#[cfg(test)]
mod traversal_tests {
    use super::*;

    #[test]
    fn descendants_in_preorder() {
        let f = Fixture::new();
        assert_eq!(f.tree.descendants(f.r).unwrap(), f.preorder());
        assert_eq!(f.tree.descendants(f.c1).unwrap(), vec![f.c1a, f.c1b]);
        assert!(f.tree.descendants(f.c2).unwrap().is_empty());
    }

    #[test]
    fn descendants_recomputed_after_mutation() {
        let mut f = Fixture::new();
        let late = f.tree.insert(Composite);
        f.tree.add_child(f.c1a, late).unwrap();
        let d = f.tree.descendants(f.r).unwrap();
        assert_eq!(d, vec![f.c1, f.c1a, late, f.c1b, f.c2, f.c3, f.c3a]);
    }

    #[test]
    fn visit_order_matches_descendants() {
        let f = Fixture::new();
        let mut seen = Vec::new();
        f.tree
            .on_visit(f.r, &mut |m: ModelRef<'_>| seen.push(m.id()))
            .unwrap();
        let mut expected = vec![f.r];
        expected.extend(f.preorder());
        assert_eq!(seen, expected);
    }

    #[test]
    fn counting_visitor_sees_every_node_once() {
        let f = Fixture::new();
        let mut counter = CountingVisitor::default();
        f.tree.on_visit(f.r, &mut counter).unwrap();
        assert_eq!(counter.visits, 7);

        let mut sub = CountingVisitor::default();
        f.tree.on_visit(f.c3, &mut sub).unwrap();
        assert_eq!(sub.visits, 2);
    }

    #[test]
    fn stats_visitor() {
        let mut f = Fixture::new();
        let box_node = f.tree.insert(Composite);
        f.tree.add_child(f.c2, box_node).unwrap();
        f.tree.add_marker(f.r, marker(1)).unwrap();
        f.tree.add_marker(f.c3a, marker(2)).unwrap();

        let mut stats = StatsVisitor::default();
        f.tree.on_visit(f.r, &mut stats).unwrap();
        assert_eq!(stats.nodes(), 8);
        assert_eq!(stats.nodes_by_kind.get("Recorder"), Some(&7));
        assert_eq!(stats.nodes_by_kind.get("Composite"), Some(&1));
        assert_eq!(stats.markers, 2);
        // C1a, C1b, the composite under C2, C3a.
        assert_eq!(stats.leaves, 4);
    }

    #[test]
    fn dump_visitor_lines() {
        let mut tree = ModelTree::new();
        let r = tree.insert_composite(tags("spine"));
        let a = tree.insert_composite(tags("rod A"));
        tree.add_child(r, a).unwrap();
        tree.add_marker(a, marker(0)).unwrap();

        let mut dump = DumpVisitor::default();
        tree.on_visit(r, &mut dump).unwrap();
        assert_eq!(dump.lines, vec![
            format!("{r} Composite children=1 markers=0 tags=[spine]"),
            format!("{a} Composite children=0 markers=1 tags=[rod A]"),
        ]);
    }

    #[test]
    fn visit_unknown_root_errors() {
        let mut tree = ModelTree::new();
        let gone = tree.insert(Composite);
        tree.remove(gone).unwrap();
        let mut counter = CountingVisitor::default();
        assert!(tree.on_visit(gone, &mut counter).is_err());
        assert_eq!(counter.visits, 0);
    }

    #[test]
    fn find_tagged_matches_all_query_tags() {
        let mut tree = ModelTree::new();
        let r = tree.insert_composite(tags("spine"));
        let a = tree.insert_composite(tags("rod A"));
        let b = tree.insert_composite(tags("rod B"));
        let c = tree.insert_composite(tags("cable A"));
        tree.add_child(r, a).unwrap();
        tree.add_child(a, c).unwrap();
        tree.add_child(r, b).unwrap();
        assert_eq!(tree.find_tagged(r, "rod").unwrap(), vec![a, b]);
        assert_eq!(tree.find_tagged(r, "A").unwrap(), vec![a, c]);
        assert_eq!(tree.find_tagged(r, "rod A").unwrap(), vec![a]);
        // The receiver is never part of its own result.
        assert!(tree.find_tagged(r, "spine").unwrap().is_empty());
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn setup_runs_preorder_once_per_node() {
        let mut f = Fixture::new();
        let mut world = World::default();
        f.tree.setup(f.r, &mut world).unwrap();
        assert_eq!(f.labels("setup"), vec!["R", "C1", "C1a", "C1b", "C2", "C3", "C3a"]);
        assert_eq!(world.bodies_issued(), 7);
        assert_eq!(f.recorder(f.r).body, Some(BodyHandle(0)));
        assert_eq!(f.recorder(f.c3a).body, Some(BodyHandle(6)));
    }

    #[test]
    fn double_setup_is_not_guarded() {
        let mut f = Fixture::new();
        let mut world = World::default();
        f.tree.setup(f.r, &mut world).unwrap();
        f.tree.setup(f.r, &mut world).unwrap();
        assert_eq!(f.recorder(f.c2).setups, 2);
        assert_eq!(world.bodies_issued(), 14);
    }

    #[test]
    fn step_reaches_every_node_once() {
        let mut f = Fixture::new();
        f.tree.step(f.r, 1.0).unwrap();
        assert_eq!(f.labels("step"), vec!["R", "C1", "C1a", "C1b", "C2", "C3", "C3a"]);
        for id in f.preorder() {
            assert_eq!(f.recorder(id).steps, 1);
            assert_eq!(f.recorder(id).last_dt, Some(1.0));
        }
        let mut counter = CountingVisitor::default();
        f.tree.on_visit(f.r, &mut counter).unwrap();
        assert_eq!(counter.visits as u32, f.log.borrow().len() as u32);
    }

    #[test]
    fn non_positive_step_rejected_without_side_effects() {
        let mut f = Fixture::new();
        f.tree.step(f.r, 0.25).unwrap();
        for dt in [0.0, -1.0, -0.5, f64::NAN] {
            let err = f.tree.step(f.r, dt).unwrap_err();
            assert!(matches!(err, ModelError::NonPositiveStep { .. }), "dt = {dt}");
        }
        assert_eq!(f.recorder(f.r).steps, 1);
        for id in f.preorder() {
            assert_eq!(f.recorder(id).steps, 1);
            assert_eq!(f.recorder(id).last_dt, Some(0.25));
        }
    }

    #[test]
    fn leaf_rejects_non_positive_step_too() {
        let log = CallLog::default();
        let mut tree = ModelTree::new();
        let leaf = tree.insert(Recorder::new("L", &log));
        assert!(tree.step(leaf, 0.0).is_err());
        assert!(tree.step(leaf, -1.0).is_err());
        assert!(tree.step(leaf, 1.0).is_ok());
        assert_eq!(tree.element::<Recorder>(leaf).unwrap().steps, 1);
    }

    #[test]
    fn step_subtree_only() {
        let mut f = Fixture::new();
        f.tree.step(f.c1, 0.1).unwrap();
        assert_eq!(f.labels("step"), vec!["C1", "C1a", "C1b"]);
        assert_eq!(f.recorder(f.r).steps, 0);
    }

    #[test]
    fn teardown_destroys_descendants_and_clears_markers() {
        let mut f = Fixture::new();
        f.tree.add_marker(f.r, marker(1)).unwrap();
        f.tree.add_marker(f.c1, marker(2)).unwrap();
        f.tree.teardown(f.r).unwrap();

        assert!(f.tree.descendants(f.r).unwrap().is_empty());
        assert!(f.tree.markers(f.r).unwrap().is_empty());
        assert_eq!(f.tree.len(), 1);
        for id in f.preorder() {
            assert!(!f.tree.contains(id), "{id} should be destroyed");
        }
        // Children are torn down (depth first) before the receiver.
        assert_eq!(
            f.labels("teardown"),
            vec!["C1a", "C1b", "C1", "C2", "C3a", "C3", "R"]
        );
    }

    #[test]
    fn teardown_is_idempotent() {
        let mut f = Fixture::new();
        f.tree.teardown(f.r).unwrap();
        f.tree.teardown(f.r).unwrap();
        assert!(f.tree.descendants(f.r).unwrap().is_empty());
        assert_eq!(f.tree.len(), 1);
        assert!(f.tree.invariant(f.r));
    }

    #[test]
    fn torn_down_node_is_reusable() {
        let mut f = Fixture::new();
        f.tree.teardown(f.r).unwrap();
        let fresh = f.tree.insert(Composite);
        f.tree.add_child(f.r, fresh).unwrap();
        assert_eq!(f.tree.descendants(f.r).unwrap(), vec![fresh]);
        // Old handles stay stale even if their slots are reused.
        assert!(!f.tree.contains(f.c1));
    }

    #[test]
    fn teardown_of_subtree_leaves_siblings() {
        let mut f = Fixture::new();
        f.tree.teardown(f.c1).unwrap();
        assert_eq!(f.tree.descendants(f.r).unwrap(), vec![f.c1, f.c2, f.c3, f.c3a]);
    }

    #[test]
    fn remove_root_and_refuse_attached() {
        let mut f = Fixture::new();
        assert_eq!(f.tree.remove(f.c1), Err(ModelError::StillAttached(f.c1)));
        f.tree.remove(f.r).unwrap();
        assert!(f.tree.is_empty());
    }
}

// ── Markers and senseables ────────────────────────────────────────────────────

#[cfg(test)]
mod marker_tests {
    use super::*;

    #[test]
    fn stored_marker_is_isolated_from_caller_copy() {
        let mut tree = ModelTree::new();
        let r = tree.insert(Composite);
        let mut m = marker(1).with_tags(tags("tip"));
        tree.add_marker(r, m.clone()).unwrap();
        m.position = Vec3::new(9.0, 9.0, 9.0);
        m.tags = tags("moved");

        let stored = &tree.markers(r).unwrap()[0];
        assert_eq!(stored.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(stored.tags.to_string(), "tip");
    }

    #[test]
    fn markers_keep_insertion_order() {
        let mut tree = ModelTree::new();
        let r = tree.insert(Composite);
        for n in [3, 1, 2] {
            tree.add_marker(r, marker(n)).unwrap();
        }
        let numbers: Vec<u32> = tree.markers(r).unwrap().iter().map(|m| m.node_number).collect();
        assert_eq!(numbers, vec![3, 1, 2]);
    }

    #[test]
    fn senseable_scenario() {
        // R → A → B; M1 on R; M2 on B.
        let mut tree = ModelTree::new();
        let r = tree.insert(Composite);
        let a = tree.insert(Composite);
        let b = tree.insert(Composite);
        tree.add_child(r, a).unwrap();
        tree.add_child(a, b).unwrap();
        tree.add_marker(r, marker(1)).unwrap();
        tree.add_marker(b, marker(2)).unwrap();

        assert_eq!(tree.descendants(r).unwrap(), vec![a, b]);

        let sensed = tree.senseable_descendants(r).unwrap();
        assert_eq!(sensed.len(), 3);
        assert_eq!(sensed[0].as_model().map(|m| m.id()), Some(a));
        assert_eq!(sensed[1].as_model().map(|m| m.id()), Some(b));
        assert_eq!(sensed[2].as_marker().map(|m| m.node_number), Some(1));
        assert_eq!(sensed[2].kind(), "Marker");

        // B's own marker is only visible through B.
        let from_b = sensed[1].senseable_descendants();
        assert_eq!(from_b.len(), 1);
        assert_eq!(from_b[0].as_marker().map(|m| m.node_number), Some(2));

        // Markers expose nothing further.
        assert!(sensed[2].senseable_descendants().is_empty());

        // R.addChild(A) again fails and leaves R's children alone.
        assert!(tree.add_child(r, a).unwrap_err().is_duplicate_or_cycle());
        assert_eq!(tree.children(r).unwrap(), &[a]);
    }

    #[test]
    fn senseables_are_taggable() {
        use hm_core::Taggable;

        let mut tree = ModelTree::new();
        let r = tree.insert(Composite);
        let a = tree.insert_composite(tags("rod"));
        tree.add_child(r, a).unwrap();
        tree.add_marker(r, marker(0).with_tags(tags("tip"))).unwrap();

        let sensed = tree.senseable_descendants(r).unwrap();
        assert!(sensed[0].has_tag("rod"));
        assert!(sensed[1].has_tag("tip"));
        assert!(matches!(sensed[1], Senseable::Marker(_)));
        assert_eq!(sensed[1].to_string(), "Marker #0 at (0.000, 0.000, 0.000)");
    }

    #[test]
    fn equal_markers_are_distinct_senseables() {
        let mut tree = ModelTree::new();
        let r = tree.insert(Composite);
        let a = tree.insert(Composite);
        tree.add_child(r, a).unwrap();
        tree.add_marker(r, marker(5)).unwrap();
        tree.add_marker(r, marker(5)).unwrap();

        let first = tree.senseable_descendants(r).unwrap();
        let second = tree.senseable_descendants(r).unwrap();
        assert_eq!(first, second);

        let markers = tree.markers(r).unwrap();
        assert_eq!(markers[0], markers[1]);
        assert_ne!(first[1], first[2]);
        assert_ne!(first[0], first[1]);
    }

    #[test]
    fn empty_node_senses_nothing() {
        let mut tree = ModelTree::new();
        let r = tree.insert(Composite);
        assert!(tree.senseable_descendants(r).unwrap().is_empty());
    }
}

// ── Textual representation ────────────────────────────────────────────────────

#[cfg(test)]
mod render_tests {
    use super::*;

    #[test]
    fn leaf_render() {
        let mut tree = ModelTree::new();
        let r = tree.insert_composite(tags("spine"));
        assert_eq!(
            tree.render(r, "").unwrap(),
            "Composite(\n  Children:\n  Tags: [spine]\n)"
        );
    }

    #[test]
    fn nested_render_indents_children() {
        let log = CallLog::default();
        let mut tree = ModelTree::new();
        let r = tree.insert_composite(tags("spine"));
        let a = tree.insert_tagged(Recorder::new("A", &log), tags("rod A"));
        tree.add_child(r, a).unwrap();

        let expected = "\
Composite(
  Children:
  Recorder(
    Children:
    Tags: [rod A]
  )
  Tags: [spine]
)";
        assert_eq!(tree.render(r, "").unwrap(), expected);
        assert_eq!(tree.get(r).unwrap().to_string(), expected);
    }

    #[test]
    fn prefix_applies_to_every_line() {
        let mut tree = ModelTree::new();
        let r = tree.insert(Composite);
        let dump = tree.render(r, "> ").unwrap();
        assert!(dump.lines().all(|line| line.starts_with("> ")));
    }
}

// ── Deep chains ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod deep_chain_tests {
    use super::*;

    const DEPTH: usize = 200_000;

    /// A single path of `depth` composites below `root`; returns `(root, tip)`.
    fn chain(tree: &mut ModelTree, depth: usize) -> (ModelId, ModelId) {
        let root = tree.insert(Composite);
        let mut tip = root;
        for _ in 0..depth {
            let next = tree.insert(Composite);
            tree.add_child(tip, next).unwrap();
            tip = next;
        }
        (root, tip)
    }

    #[test]
    fn descendants_of_deep_chain() {
        let mut tree = ModelTree::new();
        let (root, tip) = chain(&mut tree, DEPTH);
        let ids = tree.descendants(root).unwrap();
        assert_eq!(ids.len(), DEPTH);
        assert_eq!(ids.last(), Some(&tip));
    }

    #[test]
    fn visit_deep_chain() {
        let mut tree = ModelTree::new();
        let (root, tip) = chain(&mut tree, DEPTH);
        let mut counter = CountingVisitor::default();
        tree.on_visit(root, &mut counter).unwrap();
        assert_eq!(counter.visits, DEPTH + 1);

        let mut last = None;
        tree.on_visit(root, &mut |m: ModelRef<'_>| last = Some(m.id())).unwrap();
        assert_eq!(last, Some(tip));
    }

    #[test]
    fn teardown_deep_chain() {
        let log = CallLog::default();
        let mut tree = ModelTree::new();
        let root = tree.insert(Recorder::new("root", &log));
        let (mid, _) = chain(&mut tree, DEPTH);
        let leaf = tree.insert(Recorder::new("leaf", &log));
        let tip = *tree.descendants(mid).unwrap().last().unwrap();
        tree.add_child(tip, leaf).unwrap();
        tree.add_child(root, mid).unwrap();

        tree.teardown(root).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(*log.borrow(), vec![("leaf", "teardown"), ("root", "teardown")]);
    }

    #[test]
    fn remove_deep_chain() {
        let mut tree = ModelTree::new();
        let (root, tip) = chain(&mut tree, DEPTH);
        tree.remove(root).unwrap();
        assert!(tree.is_empty());
        assert!(!tree.contains(tip));
    }

    #[test]
    fn render_deep_chain() {
        let depth = 2_000;
        let mut tree = ModelTree::new();
        let (root, _) = chain(&mut tree, depth);
        let dump = tree.render(root, "").unwrap();

        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 4 * (depth + 1));
        assert_eq!(lines[0], "Composite(");
        let deepest = " ".repeat(2 * depth);
        assert_eq!(lines[2 * depth], format!("{deepest}Composite("));
        assert_eq!(lines.last(), Some(&")"));
        assert!(!dump.ends_with('\n'));
    }

    #[test]
    fn render_siblings_in_order() {
        let mut tree = ModelTree::new();
        let r = tree.insert(Composite);
        let a = tree.insert_composite(tags("a"));
        let b = tree.insert_composite(tags("b"));
        tree.add_child(r, a).unwrap();
        tree.add_child(r, b).unwrap();

        let expected = "\
Composite(
  Children:
  Composite(
    Children:
    Tags: [a]
  )
  Composite(
    Children:
    Tags: [b]
  )
  Tags: []
)";
        assert_eq!(tree.render(r, "").unwrap(), expected);
    }
}

// ── Randomised structure checks ───────────────────────────────────────────────

#[cfg(test)]
mod random_tree_tests {
    use std::collections::HashSet;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    /// Grow a tree of `n` nodes by attaching each new node under a random
    /// node already in the tree.
    fn random_tree(rng: &mut SmallRng, n: usize) -> (ModelTree, Vec<ModelId>) {
        let mut tree = ModelTree::with_capacity(n);
        let mut ids = vec![tree.insert(Composite)];
        for _ in 1..n {
            let parent = ids[rng.gen_range(0..ids.len())];
            let child = tree.insert(Composite);
            tree.add_child(parent, child).unwrap();
            ids.push(child);
        }
        (tree, ids)
    }

    #[test]
    fn every_node_listed_once() {
        let mut rng = SmallRng::seed_from_u64(7);
        for n in [1, 2, 10, 60] {
            let (tree, ids) = random_tree(&mut rng, n);
            let d = tree.descendants(ids[0]).unwrap();
            assert_eq!(d.len(), n - 1);
            let unique: HashSet<_> = d.iter().copied().collect();
            assert_eq!(unique.len(), d.len());
            assert!(tree.invariant(ids[0]));

            let mut counter = CountingVisitor::default();
            tree.on_visit(ids[0], &mut counter).unwrap();
            assert_eq!(counter.visits, n);
        }
    }

    #[test]
    fn no_ancestor_can_be_attached_below_its_descendant() {
        let mut rng = SmallRng::seed_from_u64(42);
        let (mut tree, ids) = random_tree(&mut rng, 40);
        let root = ids[0];
        let before = tree.descendants(root).unwrap();

        for &a in &ids {
            for b in tree.descendants(a).unwrap() {
                let err = tree.add_child(b, a).unwrap_err();
                assert!(err.is_duplicate_or_cycle(), "{a} under {b}: {err}");
                let err = tree.add_child(a, b).unwrap_err();
                assert!(err.is_duplicate_or_cycle(), "{b} under {a}: {err}");
            }
        }
        assert_eq!(tree.descendants(root).unwrap(), before);
        assert!(tree.invariant(root));
    }

    #[test]
    fn descendants_nest_contiguously() {
        // Pre-order: each node's descendants follow it as one contiguous run.
        let mut rng = SmallRng::seed_from_u64(3);
        let (tree, ids) = random_tree(&mut rng, 50);
        let all = tree.descendants(ids[0]).unwrap();
        for (pos, &id) in all.iter().enumerate() {
            let sub = tree.descendants(id).unwrap();
            assert_eq!(&all[pos + 1..pos + 1 + sub.len()], sub.as_slice());
        }
    }
}
