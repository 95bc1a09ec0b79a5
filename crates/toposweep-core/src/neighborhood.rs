//! Mesh adjacency sources for the sweep.
//!
//! The sweep is polymorphic over [`Neighborhood`]: anything that can produce
//! the adjacent vertex indices of a vertex. Two implementations are provided:
//! [`GridNeighborhood`] for full regular grids (6- or 26-connected) and
//! [`MeshNeighborhood`] for unstructured meshes given by their point-to-cell
//! incidence.
use std::collections::BTreeSet;

use crate::field::Dims;
use crate::types::GlobalIndex;

/// A source of vertex adjacency.
///
/// `neighbors_of` must yield a finite, single-pass sequence and must be
/// restartable: calling it again with the same vertex yields the same
/// sequence. Passing an out-of-range vertex is a caller logic error.
pub trait Neighborhood {
    /// The neighbors of vertex `v`, each in `[0, vertex_count)`.
    fn neighbors_of(&self, v: GlobalIndex) -> impl Iterator<Item = GlobalIndex>;
}

// ---------------------------------------------------------------------------
// GridNeighborhood
// ---------------------------------------------------------------------------

/// Grid connectivity: face-adjacent only, or the full 3x3x3 stencil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// The 6 face neighbors.
    Six,
    /// All 26 vertices of the surrounding 3x3x3 block.
    TwentySix,
}

/// The 6 face-adjacent offsets.
const OFFSETS_6: [(i64, i64, i64); 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// All 26 offsets of the 3x3x3 stencil, z-major, skipping the origin.
const OFFSETS_26: [(i64, i64, i64); 26] = [
    (-1, -1, -1),
    (0, -1, -1),
    (1, -1, -1),
    (-1, 0, -1),
    (0, 0, -1),
    (1, 0, -1),
    (-1, 1, -1),
    (0, 1, -1),
    (1, 1, -1),
    (-1, -1, 0),
    (0, -1, 0),
    (1, -1, 0),
    (-1, 0, 0),
    (1, 0, 0),
    (-1, 1, 0),
    (0, 1, 0),
    (1, 1, 0),
    (-1, -1, 1),
    (0, -1, 1),
    (1, -1, 1),
    (-1, 0, 1),
    (0, 0, 1),
    (1, 0, 1),
    (-1, 1, 1),
    (0, 1, 1),
    (1, 1, 1),
];

/// Full regular-grid adjacency from a fixed offset table with in-bounds
/// filtering.
#[derive(Debug, Clone)]
pub struct GridNeighborhood {
    dims: Dims,
    offsets: &'static [(i64, i64, i64)],
}

impl GridNeighborhood {
    /// Builds the neighborhood for a grid of the given dimensions.
    pub fn new(dims: Dims, connectivity: Connectivity) -> Self {
        let offsets: &'static [(i64, i64, i64)] = match connectivity {
            Connectivity::Six => &OFFSETS_6,
            Connectivity::TwentySix => &OFFSETS_26,
        };
        Self { dims, offsets }
    }
}

impl Neighborhood for GridNeighborhood {
    fn neighbors_of(&self, v: GlobalIndex) -> impl Iterator<Item = GlobalIndex> {
        let dims = self.dims;
        let (x, y, z) = dims.coords(v);
        let (x, y, z) = (x as i64, y as i64, z as i64);
        self.offsets.iter().filter_map(move |&(dx, dy, dz)| {
            let (nx, ny, nz) = (x + dx, y + dy, z + dz);
            let inside = nx >= 0
                && (nx as usize) < dims.w
                && ny >= 0
                && (ny as usize) < dims.h
                && nz >= 0
                && (nz as usize) < dims.d;
            inside.then(|| dims.index(nx as usize, ny as usize, nz as usize))
        })
    }
}

// ---------------------------------------------------------------------------
// MeshNeighborhood
// ---------------------------------------------------------------------------

/// Unstructured-mesh adjacency: two vertices are neighbors when they share a
/// cell.
///
/// The co-cell relation is flattened into a CSR adjacency at construction
/// time, so `neighbors_of` is an allocation-free slice walk and every
/// neighbor appears exactly once regardless of how many cells the pair
/// shares.
#[derive(Debug, Clone)]
pub struct MeshNeighborhood {
    /// CSR row offsets, one entry per point plus a terminator.
    offsets: Vec<usize>,
    /// Concatenated neighbor lists, sorted within each row.
    neighbors: Vec<GlobalIndex>,
}

impl MeshNeighborhood {
    /// Builds the adjacency for `point_count` points from cell-to-point
    /// relations.
    ///
    /// Cell vertex indices must lie in `[0, point_count)`; violations are
    /// caller logic errors.
    pub fn from_cells(point_count: usize, cells: &[Vec<GlobalIndex>]) -> Self {
        let mut adjacency: Vec<BTreeSet<GlobalIndex>> = vec![BTreeSet::new(); point_count];
        for cell in cells {
            for &v in cell {
                assert!(v < point_count, "cell vertex {v} outside point range");
                for &w in cell {
                    if w != v {
                        adjacency[v].insert(w);
                    }
                }
            }
        }

        let mut offsets = Vec::with_capacity(point_count + 1);
        let mut neighbors = Vec::new();
        offsets.push(0);
        for row in &adjacency {
            neighbors.extend(row.iter().copied());
            offsets.push(neighbors.len());
        }
        Self { offsets, neighbors }
    }

    /// Number of points the adjacency covers.
    pub fn point_count(&self) -> usize {
        self.offsets.len() - 1
    }
}

impl Neighborhood for MeshNeighborhood {
    fn neighbors_of(&self, v: GlobalIndex) -> impl Iterator<Item = GlobalIndex> {
        assert!(v < self.point_count(), "vertex {v} outside point range");
        self.neighbors[self.offsets[v]..self.offsets[v + 1]]
            .iter()
            .copied()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn collect<N: Neighborhood>(n: &N, v: GlobalIndex) -> Vec<GlobalIndex> {
        let mut out: Vec<_> = n.neighbors_of(v).collect();
        out.sort_unstable();
        out
    }

    #[test]
    fn grid_center_has_26_neighbors() {
        let n = GridNeighborhood::new(Dims::new(3, 3, 3), Connectivity::TwentySix);
        let center = Dims::new(3, 3, 3).index(1, 1, 1);
        assert_eq!(n.neighbors_of(center).count(), 26);
    }

    #[test]
    fn grid_corner_has_7_neighbors() {
        let n = GridNeighborhood::new(Dims::new(3, 3, 3), Connectivity::TwentySix);
        assert_eq!(n.neighbors_of(0).count(), 7);
    }

    #[test]
    fn grid_six_connected_center() {
        let dims = Dims::new(3, 3, 3);
        let n = GridNeighborhood::new(dims, Connectivity::Six);
        let center = dims.index(1, 1, 1);
        let got = collect(&n, center);
        let expected = {
            let mut v = vec![
                dims.index(0, 1, 1),
                dims.index(2, 1, 1),
                dims.index(1, 0, 1),
                dims.index(1, 2, 1),
                dims.index(1, 1, 0),
                dims.index(1, 1, 2),
            ];
            v.sort_unstable();
            v
        };
        assert_eq!(got, expected);
    }

    #[test]
    fn grid_degenerate_line() {
        // A 5x1x1 line: interior vertices have two neighbors, ends have one.
        let n = GridNeighborhood::new(Dims::new(5, 1, 1), Connectivity::TwentySix);
        assert_eq!(collect(&n, 0), vec![1]);
        assert_eq!(collect(&n, 2), vec![1, 3]);
        assert_eq!(collect(&n, 4), vec![3]);
    }

    #[test]
    fn grid_is_restartable() {
        let n = GridNeighborhood::new(Dims::new(3, 3, 1), Connectivity::TwentySix);
        assert_eq!(collect(&n, 4), collect(&n, 4));
    }

    #[test]
    fn mesh_neighbors_are_co_cell_vertices() {
        // Two triangles sharing the edge (1, 2).
        let mesh = MeshNeighborhood::from_cells(4, &[vec![0, 1, 2], vec![1, 2, 3]]);
        assert_eq!(collect(&mesh, 0), vec![1, 2]);
        assert_eq!(collect(&mesh, 1), vec![0, 2, 3]);
        assert_eq!(collect(&mesh, 2), vec![0, 1, 3]);
        assert_eq!(collect(&mesh, 3), vec![1, 2]);
    }

    #[test]
    fn mesh_deduplicates_shared_cells() {
        // Vertices 0 and 1 share two cells; 1 must still appear once.
        let mesh = MeshNeighborhood::from_cells(3, &[vec![0, 1], vec![0, 1, 2]]);
        assert_eq!(collect(&mesh, 0), vec![1, 2]);
    }

    #[test]
    fn mesh_isolated_point_has_no_neighbors() {
        let mesh = MeshNeighborhood::from_cells(3, &[vec![0, 1]]);
        assert_eq!(mesh.neighbors_of(2).count(), 0);
    }
}
