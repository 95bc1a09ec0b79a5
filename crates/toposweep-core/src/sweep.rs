//! The sorted sweep: one descending (or ascending) pass over the screened
//! vertices that builds the merge tree, labels every vertex with its arc, and
//! tracks subtree representatives.
//!
//! # How a vertex is processed
//!
//! Every previously visited neighbor is, by construction, more extreme than
//! the current vertex `v`. Resolving a neighbor's label through the
//! union-find gives the component it currently belongs to:
//!
//! * the first component seen: `v` adopts its label;
//! * a second, different component: `v` is a saddle. The first collision
//!   creates the saddle node once and re-homes `v`'s component onto it;
//!   every further component contributes one more inbound edge and one
//!   union. Representatives ride along: the saddle keeps the id-smallest
//!   (most extreme) representative of everything it joined;
//! * no labeled neighbor at all: `v` is an extremum and starts a component.
//!
//! Labels created later in the sweep always survive a union, so a resolved
//! label is simultaneously the newest node of its component.
use fxhash::FxHashMap;

use crate::field::ScalarField;
use crate::metric::relevance_value;
use crate::neighborhood::Neighborhood;
use crate::tree::MergeTree;
use crate::types::{FunctionType, GlobalIndex, NodeId, TreeKind, VertexLabel};
use crate::union_find::UnionFind;

/// Screens vertices against `threshold` and returns them in sweep order,
/// together with the global floor of the whole field (the least value w.r.t.
/// the sweep order, screened or not).
fn screen_and_sort(
    field: &ScalarField,
    kind: TreeKind,
    threshold: FunctionType,
) -> (Vec<GlobalIndex>, FunctionType) {
    let values = field.values();
    let mut floor = values[0];
    let mut order = Vec::new();
    for (v, &value) in values.iter().enumerate() {
        if kind.precedes(value, threshold) {
            order.push(v);
        }
        if kind.precedes(floor, value) {
            floor = value;
        }
    }
    order.sort_unstable_by(|&a, &b| kind.sweep_cmp(values[a], values[b]).then_with(|| a.cmp(&b)));
    (order, floor)
}

/// Runs the sorted sweep over `field`, populating `tree` and `labels`.
///
/// `labels` must be exactly one entry per vertex; the driver resets it to
/// unlabeled before sweeping. On return every vertex that passed the
/// threshold is labeled with the node owning its arc, and in `augmented` mode
/// the arcs enumerate their vertices in sweep order. A sweep in which no
/// vertex passes the threshold leaves the tree empty and every label `None`;
/// that is not an error.
///
/// Returns the number of vertices swept.
pub fn sorted_sweep<N: Neighborhood>(
    field: &ScalarField,
    kind: TreeKind,
    neighborhood: &N,
    threshold: FunctionType,
    augmented: bool,
    tree: &mut MergeTree,
    labels: &mut [VertexLabel],
) -> usize {
    assert_eq!(
        labels.len(),
        field.len(),
        "label array length must equal the vertex count"
    );
    assert!(tree.is_empty(), "the sweep needs a fresh tree");

    labels.fill(None);
    if field.is_empty() {
        return 0;
    }

    let (order, floor) = screen_and_sort(field, kind, threshold);
    if order.is_empty() {
        return 0;
    }

    tree.set_maximum(field.value(order[0]));
    tree.set_minimum(floor);

    let mut uf: UnionFind<NodeId> = UnionFind::new();

    for &v in &order {
        for w in neighborhood.neighbors_of(v) {
            // Only previously visited neighbors carry a label.
            let Some(neighbor_label) = labels[w] else {
                continue;
            };
            let active = uf.find(neighbor_label);

            match labels[v] {
                None => {
                    // First component: pass its label on.
                    labels[v] = Some(active);
                }
                Some(current) if active != current => {
                    // A second component: v is a saddle.
                    let mut current = current;
                    if tree.node(current).index() != v {
                        // First collision at v: create the saddle node and
                        // re-home the current component onto it.
                        let saddle = tree.add_critical_point(v);
                        tree.add_edge(current, saddle);
                        let rep = tree.node(current).rep();
                        tree.set_rep(saddle, rep);
                        uf.add(saddle);
                        uf.merge(current, saddle);
                        labels[v] = Some(saddle);
                        current = saddle;
                    }

                    // Attach the newly arrived component.
                    tree.add_edge(active, current);
                    // Ids are handed out in sort order, so the smaller rep id
                    // is the higher extremum and wins.
                    if tree.node(active).rep() < tree.node(current).rep() {
                        let rep = tree.node(active).rep();
                        tree.set_rep(current, rep);
                    }
                    uf.merge(active, current);
                }
                Some(_) => {
                    // Same component reaching v along another path.
                }
            }
        }

        let label = match labels[v] {
            Some(label) => label,
            None => {
                // No more-extreme neighbor: v is a leaf extremum.
                let leaf = tree.add_critical_point(v);
                uf.add(leaf);
                labels[v] = Some(leaf);
                leaf
            }
        };

        // The arc head is stored by add_critical_point; only pass-through
        // vertices are appended here.
        if augmented && tree.node(label).index() != v {
            tree.add_vertex(v, label);
        }
    }

    order.len()
}

/// Computes per-vertex relevance thresholds in a single sweep, without
/// materialising a tree.
///
/// The same screening, sorting, and saddle logic as [`sorted_sweep`], but
/// labels are vertex ids and the only state carried per component is the most
/// extreme value seen in its subtree. Each swept vertex's relevance against
/// that running extremum is written to `out`; vertices that fail the
/// threshold keep the fill value `0.0`.
///
/// Returns the number of vertices swept.
pub fn local_threshold_sweep<N: Neighborhood>(
    field: &ScalarField,
    kind: TreeKind,
    neighborhood: &N,
    threshold: FunctionType,
    out: &mut [FunctionType],
) -> usize {
    assert_eq!(
        out.len(),
        field.len(),
        "output array length must equal the vertex count"
    );

    out.fill(0.0);
    if field.is_empty() {
        return 0;
    }

    let (order, floor) = screen_and_sort(field, kind, threshold);

    let mut labels: Vec<Option<GlobalIndex>> = vec![None; field.len()];
    let mut uf: UnionFind<GlobalIndex> = UnionFind::new();
    // The most extreme value seen so far in each active component's subtree.
    let mut local_extrema: FxHashMap<GlobalIndex, FunctionType> = FxHashMap::default();

    for &v in &order {
        for w in neighborhood.neighbors_of(v) {
            let Some(neighbor_label) = labels[w] else {
                continue;
            };
            let active = uf.find(neighbor_label);

            match labels[v] {
                None => {
                    labels[v] = Some(active);
                }
                Some(current) if active != current => {
                    if current != v {
                        // First collision: v itself becomes the label.
                        uf.add(v);
                        local_extrema.insert(v, field.value(v));
                        uf.merge(current, v);
                        let carried = local_extrema[&current];
                        if kind.precedes(carried, local_extrema[&v]) {
                            local_extrema.insert(v, carried);
                        }
                        labels[v] = Some(v);
                    }

                    let carried = local_extrema[&active];
                    if kind.precedes(carried, local_extrema[&v]) {
                        local_extrema.insert(v, carried);
                    }
                    uf.merge(active, v);
                }
                Some(_) => {}
            }
        }

        let label = match labels[v] {
            Some(label) => label,
            None => {
                uf.add(v);
                local_extrema.insert(v, field.value(v));
                labels[v] = Some(v);
                v
            }
        };

        let extremum = local_extrema[&label];
        out[v] = relevance_value(extremum, field.value(v), floor);
    }

    order.len()
}
