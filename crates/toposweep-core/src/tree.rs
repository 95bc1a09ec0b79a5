//! The merge tree: critical-point nodes, their arcs, and the structural
//! operations the sweep and the simplification passes need.
//!
//! # Shape
//!
//! Nodes form a forest linked rootward by `down` pointers. A node's children
//! are reached through its `up` pointer plus a circular singly-linked sibling
//! ring (`next`): following `next` from any child of a node eventually
//! returns to that child. The ring replaces a per-node child vector; its
//! remove-edge logic must keep the parent's `up` pointer on a surviving
//! child.
//!
//! Each node owns exactly one [`Arc`]: the ordered run of vertices the sweep
//! assigned to it, head first. Node ids are handed out in creation order,
//! which for sweep-created nodes equals sort order of the critical vertex;
//! the representative bookkeeping and feature extraction lean on that.
use fxhash::FxHashSet;

use crate::field::ScalarField;
use crate::types::{FunctionType, GlobalIndex, NodeId};

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A critical point of the scanned field.
#[derive(Debug, Clone)]
pub struct Node {
    /// Global index of the vertex this node was created at.
    index: GlobalIndex,
    /// Rootward link; `None` marks a root.
    down: Option<NodeId>,
    /// One child; the rest hang off that child's sibling ring. `None` marks
    /// a leaf.
    up: Option<NodeId>,
    /// Next sibling in the circular ring; points at itself when unlinked.
    next: NodeId,
    /// Id of the node holding the most extreme value in this node's subtree.
    rep: NodeId,
    /// Metric value attached by a [`crate::metric::Metric`] evaluation.
    metric: FunctionType,
}

impl Node {
    /// Global vertex index of the critical point.
    pub fn index(&self) -> GlobalIndex {
        self.index
    }

    /// The rootward neighbor, or `None` for a root.
    pub fn down(&self) -> Option<NodeId> {
        self.down
    }

    /// One leafward neighbor, or `None` for a leaf.
    pub fn up(&self) -> Option<NodeId> {
        self.up
    }

    /// The next sibling in the ring.
    pub fn next(&self) -> NodeId {
        self.next
    }

    /// The subtree representative.
    pub fn rep(&self) -> NodeId {
        self.rep
    }

    /// The attached metric value.
    pub fn metric(&self) -> FunctionType {
        self.metric
    }
}

// ---------------------------------------------------------------------------
// Arc
// ---------------------------------------------------------------------------

/// The run of vertices owned by one node, in sweep order.
///
/// The head vertex is the node's own critical vertex; an augmented sweep
/// appends every further vertex it assigns to the node's component.
#[derive(Debug, Clone)]
pub struct Arc {
    vertices: Vec<GlobalIndex>,
}

impl Arc {
    fn new(head: GlobalIndex) -> Self {
        Self {
            vertices: vec![head],
        }
    }

    /// Number of vertices on this arc, head included.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// An arc always carries at least its head.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertices in sweep order, head first.
    pub fn vertices(&self) -> &[GlobalIndex] {
        &self.vertices
    }

    /// The head vertex.
    pub fn head(&self) -> GlobalIndex {
        self.vertices[0]
    }
}

// ---------------------------------------------------------------------------
// MergeTree
// ---------------------------------------------------------------------------

/// A merge (or split) tree with one arc per node.
#[derive(Debug, Clone, Default)]
pub struct MergeTree {
    nodes: Vec<Node>,
    arcs: Vec<Arc>,
    /// The least swept value w.r.t. the sweep order (the global floor).
    minimum: Option<FunctionType>,
    /// The value of the first swept vertex (the global ceiling).
    maximum: Option<FunctionType>,
}

impl MergeTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes (equals the number of arcs).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` for a tree with no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The i'th node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The arc owned by the i'th node.
    pub fn arc(&self, id: NodeId) -> &Arc {
        &self.arcs[id.index()]
    }

    /// All node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Ids of all roots (nodes without a `down` link).
    pub fn roots(&self) -> impl Iterator<Item = NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.down.is_none())
            .map(|(i, _)| NodeId::new(i))
    }

    /// The global floor recorded by the sweep, if one ran.
    pub fn minimum(&self) -> Option<FunctionType> {
        self.minimum
    }

    /// The global ceiling recorded by the sweep, if one ran.
    pub fn maximum(&self) -> Option<FunctionType> {
        self.maximum
    }

    pub(crate) fn set_minimum(&mut self, value: FunctionType) {
        self.minimum = Some(value);
    }

    pub(crate) fn set_maximum(&mut self, value: FunctionType) {
        self.maximum = Some(value);
    }

    /// Overwrites the metric value of a node.
    pub fn set_metric(&mut self, id: NodeId, value: FunctionType) {
        self.nodes[id.index()].metric = value;
    }

    pub(crate) fn set_rep(&mut self, id: NodeId, rep: NodeId) {
        self.nodes[id.index()].rep = rep;
    }

    /// Appends a new node for the critical vertex `vertex`, together with its
    /// arc, and returns the new node's id.
    ///
    /// The node starts unlinked (`down = up = None`, `next` on itself) with
    /// its representative set to itself.
    pub fn add_critical_point(&mut self, vertex: GlobalIndex) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            index: vertex,
            down: None,
            up: None,
            next: id,
            rep: id,
            metric: 0.0,
        });
        self.arcs.push(Arc::new(vertex));
        id
    }

    /// Links `down` as the rootward neighbor of `up`.
    ///
    /// If `down` already has a child, `up` is spliced into that child's
    /// sibling ring; otherwise `up` becomes `down`'s first child. `up` must
    /// not already have a rootward link.
    pub fn add_edge(&mut self, up: NodeId, down: NodeId) {
        assert!(
            self.nodes[up.index()].down.is_none(),
            "add_edge: node {up} already has a rootward link"
        );

        self.nodes[up.index()].down = Some(down);

        match self.nodes[down.index()].up {
            None => self.nodes[down.index()].up = Some(up),
            Some(first) => {
                self.nodes[up.index()].next = self.nodes[first.index()].next;
                self.nodes[first.index()].next = up;
            }
        }
    }

    /// Unlinks the edge between `up` and its rootward neighbor `down`.
    ///
    /// When `up` has siblings it is removed from the ring and `down`'s `up`
    /// pointer is moved onto a surviving child; otherwise `down` becomes a
    /// leafward dead end again.
    pub fn remove_edge(&mut self, up: NodeId, down: NodeId) {
        debug_assert_eq!(
            self.nodes[up.index()].down,
            Some(down),
            "remove_edge: {up} is not linked to {down}"
        );

        let ring_next = self.nodes[up.index()].next;
        if ring_next != up {
            self.nodes[down.index()].up = Some(ring_next);

            let mut prev = up;
            while self.nodes[prev.index()].next != up {
                prev = self.nodes[prev.index()].next;
            }
            self.nodes[prev.index()].next = ring_next;
            self.nodes[up.index()].next = up;
        } else {
            self.nodes[down.index()].up = None;
        }

        self.nodes[up.index()].down = None;
    }

    /// Appends a swept vertex to the arc owned by `label`.
    pub fn add_vertex(&mut self, v: GlobalIndex, label: NodeId) {
        self.arcs[label.index()].vertices.push(v);
    }

    /// The children of `id`: its `up` node followed by the rest of the
    /// sibling ring.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        let first = self.nodes[id.index()].up;
        let mut cursor = first;
        std::iter::from_fn(move || {
            let child = cursor?;
            let next = self.nodes[child.index()].next;
            cursor = match first {
                Some(f) if next != f => Some(next),
                Some(_) | None => None,
            };
            Some(child)
        })
    }

    /// The span of the arc below `id`: the absolute value difference between
    /// the node and its rootward neighbor, or zero for a root.
    pub fn arc_length(&self, field: &ScalarField, id: NodeId) -> FunctionType {
        let node = &self.nodes[id.index()];
        match node.down {
            None => 0.0,
            Some(down) => {
                (field.value(node.index) - field.value(self.nodes[down.index()].index)).abs()
            }
        }
    }

    /// Splits the arc of `a` at position `pos`: the vertex at `pos` becomes a
    /// new critical node between `a` and `a`'s former rootward neighbor, and
    /// the arc tail moves onto it. Returns the new node's id.
    ///
    /// `pos` must leave at least the head on the original arc.
    pub fn split_arc(&mut self, a: NodeId, pos: usize) -> NodeId {
        let len = self.arcs[a.index()].len();
        assert!(pos >= 1 && pos < len, "split position {pos} outside arc of {len} vertices");

        let head = self.arcs[a.index()].vertices[pos];
        let tail: Vec<GlobalIndex> = self.arcs[a.index()].vertices[pos + 1..].to_vec();

        let label = self.add_critical_point(head);
        self.arcs[label.index()].vertices.extend(tail);
        self.arcs[a.index()].vertices.truncate(pos);

        let down = self.nodes[a.index()].down;
        if let Some(d) = down {
            self.remove_edge(a, d);
        }
        self.add_edge(a, label);
        if let Some(d) = down {
            self.add_edge(label, d);
        }

        // The new node sits on a's rootward path, so its subtree has the same
        // extremum.
        let rep = self.nodes[a.index()].rep;
        self.nodes[label.index()].rep = rep;

        label
    }

    /// Splits arcs in half until none holds more than `n` vertices.
    pub fn split_by_size(&mut self, n: usize) {
        assert!(n >= 1, "split size must be at least 1");

        let mut i = 0;
        while i < self.arcs.len() {
            if self.arcs[i].len() > n {
                let pos = self.arcs[i].len() / 2;
                self.split_arc(NodeId::new(i), pos);
            } else {
                i += 1;
            }
        }
    }

    /// Splits every arc whose value span exceeds `limit`.
    ///
    /// The split lands on the first arc vertex that is more than half the
    /// span away from the head; when no vertex reaches that far, the last arc
    /// vertex is taken. Re-examines each arc until its span is within the
    /// limit.
    pub fn split_by_length(&mut self, field: &ScalarField, limit: FunctionType) {
        assert!(limit > 0.0, "split length must be positive");

        let mut i = 0;
        while i < self.arcs.len() {
            let id = NodeId::new(i);
            let span = self.arc_length(field, id);
            if self.arcs[i].len() > 1 && span > limit {
                let half = span / 2.0;
                let head_value = field.value(self.arcs[i].vertices[0]);
                let vertices = &self.arcs[i].vertices;
                let pos = (1..vertices.len())
                    .find(|&k| (head_value - field.value(vertices[k])).abs() > half)
                    .unwrap_or(vertices.len() - 1);
                self.split_arc(id, pos);
            } else {
                i += 1;
            }
        }
    }

    /// Collects every vertex of the feature rooted at `label`: the node's own
    /// arc plus, depth-first, the arcs of everything leafward of it.
    pub fn construct_feature(&self, label: NodeId) -> Vec<GlobalIndex> {
        let mut feature = Vec::new();
        let mut stack = vec![label];
        while let Some(id) = stack.pop() {
            feature.extend_from_slice(&self.arcs[id.index()].vertices);
            stack.extend(self.children(id));
        }
        feature
    }

    /// Propagates metric values leafward: starting from every root, a child
    /// whose metric is below its parent's is raised to match.
    ///
    /// Afterwards metrics are monotone non-increasing along every `down`
    /// edge, so thresholding on the metric yields nested regions.
    pub fn inflate(&mut self) {
        let roots: Vec<NodeId> = self.roots().collect();
        let mut front = Vec::new();
        for root in roots {
            front.push(root);
            while let Some(top) = front.pop() {
                let parent_metric = self.nodes[top.index()].metric;
                let children: Vec<NodeId> = self.children(top).collect();
                for child in children {
                    if self.nodes[child.index()].metric < parent_metric {
                        self.nodes[child.index()].metric = parent_metric;
                    }
                    front.push(child);
                }
            }
        }
    }

    /// The inverse of [`MergeTree::inflate`]: lowers every interior node's
    /// metric to its highest-metric child, processing children first.
    pub fn deflate(&mut self) {
        let roots: Vec<NodeId> = self.roots().collect();
        let mut expanded: FxHashSet<NodeId> = FxHashSet::default();
        let mut front = Vec::new();
        for root in roots {
            front.push(root);
            while let Some(&top) = front.last() {
                let children: Vec<NodeId> = self.children(top).collect();
                if children.is_empty() {
                    front.pop();
                } else if expanded.insert(top) {
                    front.extend(children);
                } else {
                    let best = children
                        .iter()
                        .map(|c| self.nodes[c.index()].metric)
                        .fold(FunctionType::NEG_INFINITY, FunctionType::max);
                    if self.nodes[top.index()].metric > best {
                        self.nodes[top.index()].metric = best;
                    }
                    front.pop();
                }
            }
        }
    }

    /// Gives every root whose arc carries more than its head an explicit
    /// terminal node at the arc's last vertex.
    ///
    /// The topology-file export wants the rootward end of every trunk to be a
    /// real node; the sweep leaves it implicit in the arc. New nodes inherit
    /// the root's representative.
    pub fn materialize_root_minima(&mut self) {
        let mut i = 0;
        while i < self.nodes.len() {
            let id = NodeId::new(i);
            if self.arcs[i].len() > 1 && self.nodes[i].down.is_none() {
                let tail = self.arcs[i].vertices[self.arcs[i].len() - 1];
                let label = self.add_critical_point(tail);
                self.add_edge(id, label);
                self.arcs[i].vertices.pop();
                let rep = self.nodes[i].rep;
                self.nodes[label.index()].rep = rep;
            }
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::field::Dims;

    fn field_1d(values: &[f32]) -> ScalarField {
        ScalarField::new(Dims::new(values.len(), 1, 1), values.to_vec()).expect("valid field")
    }

    /// Builds a three-node chain `leaf -> mid -> root` with arcs of one
    /// vertex each.
    fn chain() -> (MergeTree, NodeId, NodeId, NodeId) {
        let mut tree = MergeTree::new();
        let leaf = tree.add_critical_point(0);
        let mid = tree.add_critical_point(1);
        let root = tree.add_critical_point(2);
        tree.add_edge(leaf, mid);
        tree.add_edge(mid, root);
        (tree, leaf, mid, root)
    }

    #[test]
    fn add_critical_point_starts_unlinked() {
        let mut tree = MergeTree::new();
        let id = tree.add_critical_point(7);
        let node = tree.node(id);
        assert_eq!(node.index(), 7);
        assert_eq!(node.down(), None);
        assert_eq!(node.up(), None);
        assert_eq!(node.next(), id, "a fresh node's ring is just itself");
        assert_eq!(node.rep(), id);
        assert_eq!(tree.arc(id).vertices(), &[7]);
    }

    #[test]
    fn add_edge_links_first_child_directly() {
        let (tree, leaf, mid, _) = chain();
        assert_eq!(tree.node(leaf).down(), Some(mid));
        assert_eq!(tree.node(mid).up(), Some(leaf));
        assert_eq!(tree.node(leaf).next(), leaf);
    }

    #[test]
    fn add_edge_splices_second_child_into_ring() {
        let mut tree = MergeTree::new();
        let a = tree.add_critical_point(0);
        let b = tree.add_critical_point(1);
        let parent = tree.add_critical_point(2);
        tree.add_edge(a, parent);
        tree.add_edge(b, parent);

        assert_eq!(tree.node(parent).up(), Some(a));
        // Ring: a -> b -> a.
        assert_eq!(tree.node(a).next(), b);
        assert_eq!(tree.node(b).next(), a);
        let children: Vec<NodeId> = tree.children(parent).collect();
        assert_eq!(children, vec![a, b]);
    }

    #[test]
    #[should_panic(expected = "already has a rootward link")]
    fn add_edge_rejects_occupied_down_slot() {
        let mut tree = MergeTree::new();
        let a = tree.add_critical_point(0);
        let b = tree.add_critical_point(1);
        let c = tree.add_critical_point(2);
        tree.add_edge(a, b);
        tree.add_edge(a, c);
    }

    #[test]
    fn remove_edge_clears_single_child() {
        let (mut tree, leaf, mid, _) = chain();
        tree.remove_edge(leaf, mid);
        assert_eq!(tree.node(leaf).down(), None);
        assert_eq!(tree.node(mid).up(), None);
    }

    #[test]
    fn remove_edge_keeps_surviving_sibling() {
        let mut tree = MergeTree::new();
        let a = tree.add_critical_point(0);
        let b = tree.add_critical_point(1);
        let c = tree.add_critical_point(2);
        let parent = tree.add_critical_point(3);
        tree.add_edge(a, parent);
        tree.add_edge(b, parent);
        tree.add_edge(c, parent);

        tree.remove_edge(a, parent);

        let up = tree.node(parent).up().expect("children remain");
        let children: Vec<NodeId> = tree.children(parent).collect();
        assert_eq!(children.len(), 2);
        assert!(children.contains(&b) && children.contains(&c));
        assert!(children.contains(&up));
        assert_eq!(tree.node(a).next(), a, "removed child leaves the ring");
        assert_eq!(tree.node(a).down(), None);
    }

    #[test]
    fn split_arc_moves_tail_and_rewires() {
        let mut tree = MergeTree::new();
        let a = tree.add_critical_point(4);
        for v in [3, 2, 1, 0] {
            tree.add_vertex(v, a);
        }
        let root = tree.add_critical_point(9);
        tree.add_edge(a, root);

        let new = tree.split_arc(a, 2);

        assert_eq!(tree.arc(a).vertices(), &[4, 3]);
        assert_eq!(tree.arc(new).vertices(), &[2, 1, 0]);
        assert_eq!(tree.node(new).index(), 2);
        assert_eq!(tree.node(a).down(), Some(new));
        assert_eq!(tree.node(new).down(), Some(root));
        assert_eq!(tree.node(new).rep(), tree.node(a).rep());
    }

    #[test]
    fn split_arc_of_a_root() {
        let mut tree = MergeTree::new();
        let a = tree.add_critical_point(5);
        for v in [4, 3] {
            tree.add_vertex(v, a);
        }
        let new = tree.split_arc(a, 1);
        assert_eq!(tree.arc(a).vertices(), &[5]);
        assert_eq!(tree.arc(new).vertices(), &[4, 3]);
        assert_eq!(tree.node(a).down(), Some(new));
        assert_eq!(tree.node(new).down(), None);
    }

    #[test]
    fn split_by_size_reaches_fixed_point() {
        let mut tree = MergeTree::new();
        let a = tree.add_critical_point(8);
        for v in [7, 6, 5, 4, 3, 2, 1, 0] {
            tree.add_vertex(v, a);
        }
        tree.split_by_size(2);
        for id in tree.node_ids() {
            assert!(
                tree.arc(id).len() <= 2,
                "arc {id} still has {} vertices",
                tree.arc(id).len()
            );
        }
        // No vertex is lost or duplicated.
        let mut all: Vec<GlobalIndex> = tree
            .node_ids()
            .flat_map(|id| tree.arc(id).vertices().to_vec())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..=8).collect::<Vec<_>>());
    }

    #[test]
    fn split_by_length_splits_near_the_half_span() {
        let field = field_1d(&[8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        let mut tree = MergeTree::new();
        let a = tree.add_critical_point(0);
        for v in 1..=6 {
            tree.add_vertex(v, a);
        }
        let root = tree.add_critical_point(7);
        tree.add_edge(a, root);
        // Span is |8 - 1| = 7; the first vertex more than 3.5 below the head
        // is vertex 4 (value 4).
        tree.split_by_length(&field, 5.0);

        let mid = tree.node(a).down().expect("a gained a rootward link");
        assert_eq!(tree.node(mid).index(), 4);
        assert_eq!(tree.arc(a).vertices(), &[0, 1, 2, 3]);
        assert_eq!(tree.arc(mid).vertices(), &[4, 5, 6]);
        // Both halves now span 3.5 or less, so the pass stopped.
        assert!(tree.arc_length(&field, a) <= 5.0);
        assert!(tree.arc_length(&field, mid) <= 5.0);
    }

    #[test]
    fn arc_length_of_root_is_zero() {
        let field = field_1d(&[3.0, 1.0]);
        let mut tree = MergeTree::new();
        let a = tree.add_critical_point(0);
        assert_eq!(tree.arc_length(&field, a), 0.0);
        let b = tree.add_critical_point(1);
        tree.add_edge(a, b);
        assert_eq!(tree.arc_length(&field, a), 2.0);
    }

    #[test]
    fn construct_feature_collects_subtree_vertices() {
        let mut tree = MergeTree::new();
        let a = tree.add_critical_point(0);
        let b = tree.add_critical_point(1);
        let saddle = tree.add_critical_point(2);
        tree.add_vertex(3, saddle);
        tree.add_edge(a, saddle);
        tree.add_edge(b, saddle);

        let mut feature = tree.construct_feature(saddle);
        feature.sort_unstable();
        assert_eq!(feature, vec![0, 1, 2, 3]);

        assert_eq!(tree.construct_feature(a), vec![0]);
    }

    #[test]
    fn inflate_raises_children_to_parent_level() {
        let (mut tree, leaf, mid, root) = chain();
        tree.set_metric(root, 5.0);
        tree.set_metric(mid, 1.0);
        tree.set_metric(leaf, 3.0);

        tree.inflate();

        assert_eq!(tree.node(root).metric(), 5.0);
        assert_eq!(tree.node(mid).metric(), 5.0);
        assert_eq!(tree.node(leaf).metric(), 5.0);
    }

    #[test]
    fn inflate_is_idempotent() {
        let (mut tree, leaf, mid, root) = chain();
        tree.set_metric(root, 2.0);
        tree.set_metric(mid, 4.0);
        tree.set_metric(leaf, 1.0);

        tree.inflate();
        let after_once: Vec<f32> = tree.node_ids().map(|id| tree.node(id).metric()).collect();
        tree.inflate();
        let after_twice: Vec<f32> = tree.node_ids().map(|id| tree.node(id).metric()).collect();
        assert_eq!(after_once, after_twice);
    }

    #[test]
    fn deflate_lowers_parent_to_best_child() {
        let mut tree = MergeTree::new();
        let a = tree.add_critical_point(0);
        let b = tree.add_critical_point(1);
        let parent = tree.add_critical_point(2);
        tree.add_edge(a, parent);
        tree.add_edge(b, parent);
        tree.set_metric(a, 2.0);
        tree.set_metric(b, 3.0);
        tree.set_metric(parent, 9.0);

        tree.deflate();

        assert_eq!(tree.node(parent).metric(), 3.0);
        assert_eq!(tree.node(a).metric(), 2.0);
        assert_eq!(tree.node(b).metric(), 3.0);
    }

    #[test]
    fn deflate_processes_children_first() {
        let (mut tree, leaf, mid, root) = chain();
        tree.set_metric(leaf, 1.0);
        tree.set_metric(mid, 8.0);
        tree.set_metric(root, 9.0);

        tree.deflate();

        // mid drops to leaf's 1.0 before root is compared against it.
        assert_eq!(tree.node(mid).metric(), 1.0);
        assert_eq!(tree.node(root).metric(), 1.0);
    }

    #[test]
    fn materialize_root_minima_adds_terminal_nodes() {
        let mut tree = MergeTree::new();
        let a = tree.add_critical_point(4);
        for v in [3, 2] {
            tree.add_vertex(v, a);
        }
        tree.materialize_root_minima();

        assert_eq!(tree.len(), 2);
        let new = tree.node(a).down().expect("root gained a terminal node");
        assert_eq!(tree.node(new).index(), 2);
        assert_eq!(tree.arc(a).vertices(), &[4, 3]);
        assert_eq!(tree.arc(new).vertices(), &[2]);
        assert_eq!(tree.node(new).rep(), tree.node(a).rep());
    }

    #[test]
    fn materialize_root_minima_skips_bare_roots() {
        let mut tree = MergeTree::new();
        tree.add_critical_point(0);
        tree.materialize_root_minima();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn roots_reports_unlinked_nodes() {
        let (tree, leaf, mid, root) = chain();
        let roots: Vec<NodeId> = tree.roots().collect();
        assert_eq!(roots, vec![root]);
        assert_ne!(roots[0], leaf);
        assert_ne!(roots[0], mid);
    }
}
