//! Feature-family and segmentation documents: the serializable form of a
//! simplification hierarchy.
//!
//! A *family* records, per tree node, the metric interval over which the
//! feature lives, its rootward link, and the sweep direction, together with
//! an aggregated per-feature vertex count. A *segmentation* records the raw
//! per-arc vertex lists plus a domain descriptor. Both are plain serde
//! structures; the CLI decides where and how they are written.
use std::fmt;

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::field::Dims;
use crate::tree::MergeTree;
use crate::types::{FunctionType, NodeId, TreeKind};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when exporting tree documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyError {
    /// The tree has no nodes (nothing passed the sweep threshold), so there
    /// is no function range to record.
    EmptyTree,
}

impl fmt::Display for FamilyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTree => write!(f, "cannot export an empty tree"),
        }
    }
}

impl std::error::Error for FamilyError {}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// One feature of a simplification sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// The metric interval `[low, high]` over which the feature is alive.
    pub life: [FunctionType; 2],
    /// Raw id of the rootward node, or `None` for a root.
    pub down: Option<u32>,
    /// Sweep direction: 0 for a merge tree, 1 for a split tree.
    pub direction: u8,
}

/// The aggregated per-feature statistic carried next to the simplification
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedStatistic {
    /// Name of the statistic.
    pub stat: String,
    /// Aggregated over each feature's subtree.
    pub aggregated: bool,
    /// One value per feature, in node order.
    pub values: Vec<u64>,
}

/// The hierarchical simplification sequence of one swept tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    /// Function range of the swept field: `[floor, ceiling]` w.r.t. the
    /// sweep order.
    pub range: [FunctionType; 2],
    /// Name of the metric the lifetimes were computed with.
    pub metric: String,
    /// Aggregate `[low, high]` over all feature lifetimes.
    pub metric_range: [FunctionType; 2],
    /// One record per tree node, in node order.
    pub features: Vec<FeatureRecord>,
    /// Accumulated vertex counts per feature.
    pub statistic: AggregatedStatistic,
}

/// The per-arc vertex lists of one swept tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    /// Function range of the swept field.
    pub range: [FunctionType; 2],
    /// Kind of domain the vertex indices address.
    pub domain_type: String,
    /// Domain descriptor; for regular grids `"3 W H D"`.
    pub domain: String,
    /// One vertex-index list per arc, in node order.
    pub segments: Vec<Vec<u64>>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Per-node vertex counts, accumulated leafward-to-rootward: every node's
/// count covers its own arc plus all arcs above it.
pub fn accumulated_vertex_counts(tree: &MergeTree) -> Vec<u64> {
    let mut counts: Vec<u64> = tree
        .node_ids()
        .map(|id| tree.arc(id).len() as u64)
        .collect();

    let roots: Vec<NodeId> = tree.roots().collect();
    let mut expanded: FxHashSet<NodeId> = FxHashSet::default();
    let mut front = Vec::new();
    for root in roots {
        front.push(root);
        while let Some(&top) = front.last() {
            let children: Vec<NodeId> = tree.children(top).collect();
            if children.is_empty() {
                front.pop();
            } else if expanded.insert(top) {
                front.extend(children);
            } else {
                let gathered: u64 = children.iter().map(|c| counts[c.index()]).sum();
                counts[top.index()] += gathered;
                front.pop();
            }
        }
    }
    counts
}

/// Assembles the simplification family of a swept, metric-evaluated tree.
///
/// Each node contributes a lifetime spanning its own metric value and its
/// rootward neighbor's (roots span a single point). The metric must already
/// be stored on the nodes.
///
/// # Errors
///
/// Returns [`FamilyError::EmptyTree`] when the tree holds no nodes or no
/// recorded range.
pub fn build_family(
    tree: &MergeTree,
    kind: TreeKind,
    metric_name: &str,
) -> Result<Family, FamilyError> {
    let (Some(minimum), Some(maximum)) = (tree.minimum(), tree.maximum()) else {
        return Err(FamilyError::EmptyTree);
    };
    if tree.is_empty() {
        return Err(FamilyError::EmptyTree);
    }

    let mut low = FunctionType::INFINITY;
    let mut high = FunctionType::NEG_INFINITY;
    let mut features = Vec::with_capacity(tree.len());

    for id in tree.node_ids() {
        let node = tree.node(id);
        let own = node.metric();
        let rootward = match node.down() {
            None => own,
            Some(down) => tree.node(down).metric(),
        };
        let life = if rootward <= own {
            [rootward, own]
        } else {
            [own, rootward]
        };

        low = low.min(life[0]);
        high = high.max(life[1]);

        features.push(FeatureRecord {
            life,
            down: node.down().map(NodeId::raw),
            direction: kind.direction(),
        });
    }

    Ok(Family {
        range: [minimum, maximum],
        metric: metric_name.to_owned(),
        metric_range: [low, high],
        features,
        statistic: AggregatedStatistic {
            stat: "vertexCount".to_owned(),
            aggregated: true,
            values: accumulated_vertex_counts(tree),
        },
    })
}

/// Assembles the per-arc segmentation of a swept tree over a regular grid.
///
/// # Errors
///
/// Returns [`FamilyError::EmptyTree`] when the tree holds no nodes or no
/// recorded range.
pub fn build_segmentation(tree: &MergeTree, dims: Dims) -> Result<Segmentation, FamilyError> {
    let (Some(minimum), Some(maximum)) = (tree.minimum(), tree.maximum()) else {
        return Err(FamilyError::EmptyTree);
    };
    if tree.is_empty() {
        return Err(FamilyError::EmptyTree);
    }

    let segments = tree
        .node_ids()
        .map(|id| {
            tree.arc(id)
                .vertices()
                .iter()
                .map(|&v| v as u64)
                .collect()
        })
        .collect();

    Ok(Segmentation {
        range: [minimum, maximum],
        domain_type: "regular_grid".to_owned(),
        domain: format!("3 {} {} {}", dims.w, dims.h, dims.d),
        segments,
    })
}
