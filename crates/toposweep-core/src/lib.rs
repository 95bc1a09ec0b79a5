#![deny(clippy::print_stdout, clippy::print_stderr)]
//! Merge-tree construction and adaptive thresholding for scalar volumes.
//!
//! The crate turns a scalar field on a regular 3-D grid into a topological
//! summary: a merge (or split) tree, a per-vertex arc labeling, and derived
//! per-voxel metric volumes. The central piece is the sorted sweep in
//! [`sweep`]; [`tree`], [`union_find`], and [`neighborhood`] are its working
//! parts, [`metric`] and [`family`] consume its output.

pub mod family;
pub mod field;
pub mod metric;
pub mod neighborhood;
pub mod sweep;
pub mod tree;
pub mod types;
pub mod union_find;

pub use family::{
    AggregatedStatistic, Family, FamilyError, FeatureRecord, Segmentation,
    accumulated_vertex_counts, build_family, build_segmentation,
};
pub use field::{Dims, FieldError, ScalarField};
pub use metric::{Metric, RSquared, Relevance, Threshold};
pub use neighborhood::{Connectivity, GridNeighborhood, MeshNeighborhood, Neighborhood};
pub use sweep::{local_threshold_sweep, sorted_sweep};
pub use tree::{Arc, MergeTree, Node};
pub use types::{FunctionType, GlobalIndex, NodeId, TreeKind, VertexLabel};
pub use union_find::UnionFind;

/// Returns the current version of the toposweep-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn version_is_semver() {
        let v = version();
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "version should have 3 parts: {v}");
        for part in parts {
            part.parse::<u32>().expect("each part should be a number");
        }
    }
}
