//! Per-vertex metrics evaluated against a swept tree.
//!
//! A [`Metric`] turns the sweep's output into the per-voxel volume the tools
//! emit. Metrics that only need a vertex's component are evaluated pointwise
//! through [`Metric::eval`]; metrics that need whole arcs declare
//! [`Metric::explicit_arcs`] and are evaluated in bulk over the tree's nodes
//! through [`Metric::eval_tree`].
use crate::field::ScalarField;
use crate::tree::MergeTree;
use crate::types::{FunctionType, GlobalIndex, VertexLabel};

/// Relevance of `value` inside a component peaking at `extremum`, against the
/// global `floor`.
///
/// `1` at the extremum, falling to `0` at the floor. A component whose
/// extremum coincides with the floor is degenerate (a constant field); every
/// vertex in it is its own extremum, so the relevance is `1`.
pub(crate) fn relevance_value(
    extremum: FunctionType,
    value: FunctionType,
    floor: FunctionType,
) -> FunctionType {
    let denominator = (extremum - floor).abs();
    if denominator == 0.0 {
        1.0
    } else {
        1.0 - (extremum - value).abs() / denominator
    }
}

/// A per-vertex metric over a swept field.
pub trait Metric {
    /// Whether the metric needs augmented arcs (and hence bulk evaluation).
    fn explicit_arcs(&self) -> bool {
        false
    }

    /// The value written for vertices the sweep never labeled.
    fn fill_value(&self) -> FunctionType {
        0.0
    }

    /// Evaluates the metric at vertex `v` carrying `label`.
    fn eval(
        &self,
        field: &ScalarField,
        tree: &MergeTree,
        v: GlobalIndex,
        label: VertexLabel,
    ) -> FunctionType;

    /// Evaluates the metric for every node of the tree, storing the result on
    /// the nodes.
    ///
    /// The default evaluates pointwise at each node's critical vertex;
    /// arc-based metrics override this.
    fn eval_tree(&self, field: &ScalarField, tree: &mut MergeTree) {
        let metrics: Vec<(crate::types::NodeId, FunctionType)> = tree
            .node_ids()
            .map(|id| (id, self.eval(field, tree, tree.node(id).index(), Some(id))))
            .collect();
        for (id, metric) in metrics {
            tree.set_metric(id, metric);
        }
    }
}

// ---------------------------------------------------------------------------
// Threshold
// ---------------------------------------------------------------------------

/// The identity metric: a vertex's own function value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Threshold;

impl Metric for Threshold {
    fn eval(
        &self,
        field: &ScalarField,
        _tree: &MergeTree,
        v: GlobalIndex,
        _label: VertexLabel,
    ) -> FunctionType {
        field.value(v)
    }
}

// ---------------------------------------------------------------------------
// Relevance
// ---------------------------------------------------------------------------

/// Normalized closeness of a vertex to its subtree's extremum.
///
/// For a vertex labeled `l`, the extremum is the value at the representative
/// of `l`'s component and the scale is the distance from that extremum to the
/// global floor recorded on the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relevance;

impl Metric for Relevance {
    fn eval(
        &self,
        field: &ScalarField,
        tree: &MergeTree,
        v: GlobalIndex,
        label: VertexLabel,
    ) -> FunctionType {
        let Some(label) = label else {
            return self.fill_value();
        };
        let Some(floor) = tree.minimum() else {
            return self.fill_value();
        };
        let rep = tree.node(label).rep();
        let extremum = field.value(tree.node(rep).index());
        relevance_value(extremum, field.value(v), floor)
    }
}

// ---------------------------------------------------------------------------
// RSquared
// ---------------------------------------------------------------------------

/// Coefficient of determination of a straight-line fit through each arc's
/// value profile.
///
/// Measures how ramp-like a feature's descent is: an arc whose values fall
/// linearly with sweep rank scores `1`, a flat-then-cliff profile scores
/// lower. Needs augmented arcs, so it is evaluated in bulk per tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct RSquared;

impl RSquared {
    /// R-squared of the least-squares line through `(rank, value)`.
    ///
    /// Arcs with fewer than three vertices, and constant arcs, fit trivially
    /// and score `1`.
    fn r_squared(values: &[FunctionType]) -> FunctionType {
        let n = values.len();
        if n < 3 {
            return 1.0;
        }

        let count = n as f64;
        let mean_x = (count - 1.0) / 2.0;
        let mean_y = values.iter().map(|&v| f64::from(v)).sum::<f64>() / count;

        let mut sxx = 0.0f64;
        let mut sxy = 0.0f64;
        let mut syy = 0.0f64;
        for (k, &value) in values.iter().enumerate() {
            let dx = k as f64 - mean_x;
            let dy = f64::from(value) - mean_y;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }

        if syy == 0.0 {
            return 1.0;
        }
        ((sxy * sxy) / (sxx * syy)) as FunctionType
    }
}

impl Metric for RSquared {
    fn explicit_arcs(&self) -> bool {
        true
    }

    fn eval(
        &self,
        _field: &ScalarField,
        tree: &MergeTree,
        _v: GlobalIndex,
        label: VertexLabel,
    ) -> FunctionType {
        // Bulk evaluation has already stored the per-node value.
        label.map_or_else(|| self.fill_value(), |l| tree.node(l).metric())
    }

    fn eval_tree(&self, field: &ScalarField, tree: &mut MergeTree) {
        let node_ids: Vec<_> = tree.node_ids().collect();
        for id in node_ids {
            let values: Vec<FunctionType> = tree
                .arc(id)
                .vertices()
                .iter()
                .map(|&v| field.value(v))
                .collect();
            tree.set_metric(id, Self::r_squared(&values));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::field::Dims;
    use crate::neighborhood::{Connectivity, GridNeighborhood};
    use crate::sweep::sorted_sweep;
    use crate::types::TreeKind;

    fn swept_line(values: &[f32]) -> (ScalarField, MergeTree, Vec<VertexLabel>) {
        let dims = Dims::new(values.len(), 1, 1);
        let field = ScalarField::new(dims, values.to_vec()).expect("valid field");
        let neighborhood = GridNeighborhood::new(dims, Connectivity::TwentySix);
        let mut tree = MergeTree::new();
        let mut labels = vec![None; field.len()];
        sorted_sweep(
            &field,
            TreeKind::Merge,
            &neighborhood,
            0.0,
            true,
            &mut tree,
            &mut labels,
        );
        (field, tree, labels)
    }

    #[test]
    fn relevance_value_is_normalized() {
        assert_eq!(relevance_value(5.0, 5.0, 1.0), 1.0);
        assert_eq!(relevance_value(5.0, 1.0, 1.0), 0.0);
        assert!((relevance_value(5.0, 3.0, 1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn relevance_value_degenerate_component_is_one() {
        assert_eq!(relevance_value(2.0, 2.0, 2.0), 1.0);
    }

    #[test]
    fn threshold_metric_is_identity() {
        let (field, tree, labels) = swept_line(&[1.0, 4.0, 2.0]);
        let metric = Threshold;
        for v in 0..field.len() {
            assert_eq!(metric.eval(&field, &tree, v, labels[v]), field.value(v));
        }
    }

    #[test]
    fn relevance_on_ramp() {
        let (field, tree, labels) = swept_line(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let metric = Relevance;
        let expected = [0.0, 0.25, 0.5, 0.75, 1.0];
        for (v, &want) in expected.iter().enumerate() {
            let got = metric.eval(&field, &tree, v, labels[v]);
            assert!((got - want).abs() < 1e-6, "vertex {v}: got {got}, want {want}");
        }
    }

    #[test]
    fn relevance_of_unlabeled_vertex_is_fill() {
        let (field, tree, _) = swept_line(&[1.0, 2.0, 3.0]);
        let metric = Relevance;
        assert_eq!(metric.eval(&field, &tree, 0, None), metric.fill_value());
    }

    #[test]
    fn default_eval_tree_stores_node_values() {
        let (field, mut tree, _) = swept_line(&[3.0, 1.0, 4.0]);
        let metric = Threshold;
        metric.eval_tree(&field, &mut tree);
        for id in tree.node_ids() {
            assert_eq!(
                tree.node(id).metric(),
                field.value(tree.node(id).index()),
                "node {id}"
            );
        }
    }

    #[test]
    fn r_squared_of_linear_profile_is_one() {
        let r2 = RSquared::r_squared(&[5.0, 4.0, 3.0, 2.0, 1.0]);
        assert!((r2 - 1.0).abs() < 1e-6, "got {r2}");
    }

    #[test]
    fn r_squared_of_cliff_profile_is_below_one() {
        let r2 = RSquared::r_squared(&[5.0, 5.0, 5.0, 5.0, 0.0]);
        assert!(r2 < 0.7, "got {r2}");
    }

    #[test]
    fn r_squared_short_and_constant_arcs_are_one() {
        assert_eq!(RSquared::r_squared(&[2.0]), 1.0);
        assert_eq!(RSquared::r_squared(&[2.0, 1.0]), 1.0);
        assert_eq!(RSquared::r_squared(&[2.0, 2.0, 2.0]), 1.0);
    }

    #[test]
    fn r_squared_needs_explicit_arcs() {
        assert!(RSquared.explicit_arcs());
        assert!(!Relevance.explicit_arcs());
        assert!(!Threshold.explicit_arcs());
    }

    #[test]
    fn r_squared_eval_tree_scores_each_arc() {
        let (field, mut tree, labels) = swept_line(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let metric = RSquared;
        metric.eval_tree(&field, &mut tree);
        let root = labels[0].expect("labeled");
        assert!((tree.node(root).metric() - 1.0).abs() < 1e-6);
        // Pointwise eval reads the stored node value back.
        assert_eq!(metric.eval(&field, &tree, 0, labels[0]), tree.node(root).metric());
    }
}
