//! Union-Find over sparse, externally supplied labels.
//!
//! Unlike a dense disjoint-set over `[0, n)`, labels here are arbitrary ids
//! handed in by the caller (merge-tree node ids during a sweep, vertex ids
//! during an inline threshold pass). A slot vector holds the parent links and
//! an `FxHashMap` maps each label to its slot.
//!
//! There is no union-by-rank: the sweep dictates the merge direction
//! outright. `merge(from, to)` always makes `to` the survivor, and sweep
//! callers pass the label created later in sort order as `to`, which is what
//! keeps representative bookkeeping on the tree consistent.
use std::hash::Hash;

use fxhash::FxHashMap;

/// A disjoint-set structure over sparse labels with path compression.
#[derive(Debug, Clone)]
pub struct UnionFind<L> {
    /// Parent label of the i'th slot; a root points at itself.
    parents: Vec<L>,
    /// Label to slot index.
    slots: FxHashMap<L, usize>,
}

impl<L: Copy + Eq + Hash> UnionFind<L> {
    /// Creates an empty structure.
    pub fn new() -> Self {
        Self {
            parents: Vec::new(),
            slots: FxHashMap::default(),
        }
    }

    /// Registers a new label as its own singleton set.
    ///
    /// Adding a label twice is a caller logic error.
    pub fn add(&mut self, label: L) {
        let prev = self.slots.insert(label, self.parents.len());
        assert!(prev.is_none(), "union-find label added twice");
        self.parents.push(label);
    }

    /// Returns `true` if `label` has been added.
    pub fn contains(&self, label: L) -> bool {
        self.slots.contains_key(&label)
    }

    /// Returns the current representative of `label`'s set.
    ///
    /// Every label on the walked path is re-pointed directly at the root, so
    /// repeated lookups are amortised near-constant. Asking for an unknown
    /// label is a caller logic error.
    pub fn find(&mut self, label: L) -> L {
        let mut root = label;
        loop {
            let parent = self.parents[self.slot(root)];
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut cursor = label;
        while cursor != root {
            let slot = self.slot(cursor);
            cursor = self.parents[slot];
            self.parents[slot] = root;
        }
        root
    }

    /// Merges the set of `from` into `to`: after the call, `find(from)`
    /// resolves to `to`'s representative.
    ///
    /// The survivor is always `to`. Callers that rely on the newest-label
    /// discipline (the sweep does) must pass the later-created label as `to`.
    /// Both labels must be known and distinct.
    pub fn merge(&mut self, from: L, to: L) {
        assert!(from != to, "union-find merge of a label with itself");
        debug_assert!(self.contains(to), "union-find merge target is unknown");
        let slot = self.slot(from);
        self.parents[slot] = to;
    }

    /// Number of labels added so far.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns `true` if no label has been added.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    fn slot(&self, label: L) -> usize {
        match self.slots.get(&label) {
            Some(&slot) => slot,
            None => unknown_label(),
        }
    }
}

#[cold]
#[allow(clippy::panic)]
fn unknown_label() -> ! {
    panic!("union-find asked about a label that was never added")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::types::NodeId;

    #[test]
    fn added_label_is_its_own_representative() {
        let mut uf = UnionFind::new();
        for i in 0..5usize {
            uf.add(i);
        }
        for i in 0..5usize {
            assert_eq!(uf.find(i), i, "label {i} should be its own representative");
        }
    }

    #[test]
    fn merge_routes_find_to_survivor() {
        let mut uf = UnionFind::new();
        uf.add(0usize);
        uf.add(1);
        uf.merge(0, 1);
        assert_eq!(uf.find(0), 1, "the newer label must survive");
        assert_eq!(uf.find(1), 1);
    }

    #[test]
    fn merge_chain_resolves_to_latest() {
        let mut uf = UnionFind::new();
        for i in 0..4usize {
            uf.add(i);
        }
        uf.merge(0, 1);
        uf.merge(1, 2);
        uf.merge(2, 3);
        for i in 0..4usize {
            assert_eq!(uf.find(i), 3, "label {i} should resolve to the newest");
        }
    }

    #[test]
    fn merge_does_not_affect_other_sets() {
        let mut uf = UnionFind::new();
        for i in 0..4usize {
            uf.add(i);
        }
        uf.merge(0, 1);
        assert_eq!(uf.find(2), 2);
        assert_eq!(uf.find(3), 3);
    }

    #[test]
    fn path_compression_shortcuts_chains() {
        let mut uf = UnionFind::new();
        for i in 0..5usize {
            uf.add(i);
        }
        uf.merge(0, 1);
        uf.merge(1, 2);
        uf.merge(2, 3);
        uf.merge(3, 4);
        assert_eq!(uf.find(0), 4);
        // After compression every label points directly at the root.
        for i in 0..5usize {
            assert_eq!(uf.parents[i], 4, "slot {i} should be compressed");
        }
    }

    #[test]
    fn sparse_labels_are_supported() {
        let mut uf = UnionFind::new();
        uf.add(1000usize);
        uf.add(7);
        uf.add(423);
        uf.merge(1000, 7);
        assert_eq!(uf.find(1000), 7);
        assert_eq!(uf.find(423), 423);
    }

    #[test]
    fn works_over_node_ids() {
        let mut uf = UnionFind::new();
        let a = NodeId::new(0);
        let b = NodeId::new(1);
        uf.add(a);
        uf.add(b);
        uf.merge(a, b);
        assert_eq!(uf.find(a), b);
    }

    #[test]
    fn len_and_is_empty() {
        let mut uf: UnionFind<usize> = UnionFind::new();
        assert!(uf.is_empty());
        uf.add(9);
        assert_eq!(uf.len(), 1);
        assert!(!uf.is_empty());
    }

    #[test]
    #[should_panic(expected = "added twice")]
    fn double_add_is_rejected() {
        let mut uf = UnionFind::new();
        uf.add(3usize);
        uf.add(3);
    }

    #[test]
    fn contains_reports_known_labels() {
        let mut uf = UnionFind::new();
        uf.add(11usize);
        assert!(uf.contains(11));
        assert!(!uf.contains(12));
    }
}
