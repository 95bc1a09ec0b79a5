//! Volume dimensions and the immutable scalar field a sweep reads from.
use std::fmt;

use crate::types::{FunctionType, GlobalIndex};

// ---------------------------------------------------------------------------
// Dims
// ---------------------------------------------------------------------------

/// Dimensions of a regular 3-D grid.
///
/// Vertices are addressed by a flat [`GlobalIndex`] in row-major order:
/// `v = z * w * h + y * w + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    /// Extent along x (fastest-varying axis).
    pub w: usize,
    /// Extent along y.
    pub h: usize,
    /// Extent along z (slowest-varying axis).
    pub d: usize,
}

impl Dims {
    /// Creates a new dimension triple.
    pub fn new(w: usize, h: usize, d: usize) -> Self {
        Self { w, h, d }
    }

    /// Total vertex count `w * h * d`, or `None` if the product overflows.
    pub fn vertex_count(&self) -> Option<usize> {
        self.w.checked_mul(self.h)?.checked_mul(self.d)
    }

    /// Vertex count of one z-plane, or `None` on overflow.
    pub fn plane_len(&self) -> Option<usize> {
        self.w.checked_mul(self.h)
    }

    /// Decomposes a flat vertex index into `(x, y, z)` coordinates.
    ///
    /// Out-of-range `v` is a caller logic error; the result would address a
    /// vertex outside the grid.
    pub fn coords(&self, v: GlobalIndex) -> (usize, usize, usize) {
        debug_assert!(self.w > 0 && self.h > 0, "degenerate grid dimensions");
        (v % self.w, (v / self.w) % self.h, v / (self.w * self.h))
    }

    /// Composes `(x, y, z)` coordinates into a flat vertex index.
    pub fn index(&self, x: usize, y: usize, z: usize) -> GlobalIndex {
        debug_assert!(x < self.w && y < self.h && z < self.d, "coordinates outside grid");
        z * self.w * self.h + y * self.w + x
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.w, self.h, self.d)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when constructing a [`ScalarField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The dimension product `w * h * d` overflows `usize`.
    DimensionOverflow {
        /// The offending dimensions.
        dims: Dims,
    },
    /// The sample vector length does not equal the dimension product.
    LengthMismatch {
        /// Expected sample count (`w * h * d`).
        expected: usize,
        /// Actual sample count supplied.
        got: usize,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionOverflow { dims } => {
                write!(f, "volume dimensions {dims} overflow the addressable index range")
            }
            Self::LengthMismatch { expected, got } => {
                write!(f, "volume holds {got} samples but dimensions require {expected}")
            }
        }
    }
}

impl std::error::Error for FieldError {}

// ---------------------------------------------------------------------------
// ScalarField
// ---------------------------------------------------------------------------

/// A scalar field sampled on a regular grid, immutable for the lifetime of a
/// sweep.
///
/// The field owns its samples; every sweep and metric borrows it. This is the
/// explicit replacement for process-wide data pointers: any operation whose
/// result depends on sample values takes the field as a parameter.
#[derive(Debug, Clone)]
pub struct ScalarField {
    dims: Dims,
    data: Vec<FunctionType>,
}

impl ScalarField {
    /// Wraps a flat sample vector with its grid dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DimensionOverflow`] if `w * h * d` overflows and
    /// [`FieldError::LengthMismatch`] if `data.len()` differs from the
    /// dimension product.
    pub fn new(dims: Dims, data: Vec<FunctionType>) -> Result<Self, FieldError> {
        let expected = dims
            .vertex_count()
            .ok_or(FieldError::DimensionOverflow { dims })?;
        if data.len() != expected {
            return Err(FieldError::LengthMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { dims, data })
    }

    /// The grid dimensions.
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Total number of vertices.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` for a zero-vertex field.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The sample at vertex `v`. Out-of-range `v` is a caller logic error and
    /// panics via the slice index.
    pub fn value(&self, v: GlobalIndex) -> FunctionType {
        self.data[v]
    }

    /// All samples in flat row-major order.
    pub fn values(&self) -> &[FunctionType] {
        &self.data
    }
}
