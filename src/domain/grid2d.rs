use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::domain::field::FieldFunction;
use crate::error::GridError;

// Absorbs rounding in (extent / step) so that e.g. 2.0 / 0.1 yields 20 divisions.
const DIVISION_ROUNDING: f64 = 1e-9;

/// Largest grid accepted by [`Grid2D::new`], counted in nodes.
pub const MAX_NODES: usize = 1 << 26;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain2D {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSize2D(pub f64, pub f64); // hx, hy

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions2D(pub usize, pub usize); // m (nodes along x), n (nodes along y)

impl Domain2D {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, GridError> {
        let domain = Self { x_min, x_max, y_min, y_max };
        domain.validate()?;
        Ok(domain)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(GridError::InvalidDomain(format!(
                "bounds must be finite, got {:?}",
                bounds
            )));
        }
        if self.x_max <= self.x_min {
            return Err(GridError::InvalidDomain(format!(
                "x_max ({}) must be greater than x_min ({})",
                self.x_max, self.x_min
            )));
        }
        if self.y_max <= self.y_min {
            return Err(GridError::InvalidDomain(format!(
                "y_max ({}) must be greater than y_min ({})",
                self.y_max, self.y_min
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

impl StepSize2D {
    /// Uniform step `2^-p` in both directions.
    pub fn from_exponent(p: i32) -> Self {
        let h = 2f64.powi(-p);
        Self(h, h)
    }
}

/// Node-centred uniform grid over a rectangular domain.
///
/// Nodes are numbered `ij = i + j * m`, so a solution vector reshapes
/// column-major into an `m x n` [`DMatrix`] with entry `(i, j)`.
///
/// ```text
///  j=n-1  T---T---T---T---T
///         |   |   |   |   |
///         L---+---+---+---R
///         |   |   |   |   |
///         L---+---+---+---R
///         |   |   |   |   |
///  j=0    B---B---B---B---B     corners belong to L / R
///        i=0             i=m-1
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid2D {
    pub domain: Domain2D,
    pub step: StepSize2D,
    pub dimensions: GridDimensions2D,
}

impl Grid2D {
    /// Builds the grid with `floor(extent / step) + 1` nodes per direction.
    ///
    /// The quotient gets a `1e-9` tolerance before truncation, so a step that
    /// divides the extent up to rounding (`0.1` into `2.0`) keeps its last node.
    /// Grids above [`MAX_NODES`] are rejected as an invalid step size.
    pub fn new(domain: Domain2D, step: StepSize2D) -> Result<Self, GridError> {
        domain.validate()?;
        let StepSize2D(hx, hy) = step;
        if !(hx.is_finite() && hx > 0.0) || !(hy.is_finite() && hy > 0.0) {
            return Err(GridError::InvalidStepSize(format!(
                "hx and hy must be finite and strictly positive, got ({}, {})",
                hx, hy
            )));
        }

        let too_large = || {
            GridError::InvalidStepSize(format!(
                "step ({}, {}) gives more than {} nodes on a {} x {} domain",
                hx,
                hy,
                MAX_NODES,
                domain.width(),
                domain.height()
            ))
        };
        let m = node_count(domain.width(), hx).ok_or_else(too_large)?;
        let n = node_count(domain.height(), hy).ok_or_else(too_large)?;
        m.checked_mul(n)
            .filter(|&size| size <= MAX_NODES)
            .ok_or_else(too_large)?;

        Ok(Self {
            domain,
            step,
            dimensions: GridDimensions2D(m, n),
        })
    }

    pub fn m(&self) -> usize {
        self.dimensions.0
    }

    pub fn n(&self) -> usize {
        self.dimensions.1
    }

    /// Number of unknowns, `m * n`.
    pub fn size(&self) -> usize {
        self.m() * self.n()
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.m() && j < self.n());
        i + j * self.m()
    }

    #[inline]
    pub fn ij_from_index(&self, ij: usize) -> (usize, usize) {
        debug_assert!(ij < self.size());
        (ij % self.m(), ij / self.m())
    }

    #[inline]
    pub fn coordinate(&self, i: usize, j: usize) -> (f64, f64) {
        let StepSize2D(hx, hy) = self.step;
        (
            self.domain.x_min + i as f64 * hx,
            self.domain.y_min + j as f64 * hy,
        )
    }

    pub fn x_coordinates(&self) -> Vec<f64> {
        (0..self.m()).map(|i| self.coordinate(i, 0).0).collect()
    }

    pub fn y_coordinates(&self) -> Vec<f64> {
        (0..self.n()).map(|j| self.coordinate(0, j).1).collect()
    }

    /// Evaluates `field` at every node, returning an `m x n` matrix.
    pub fn sample(&self, field: &dyn FieldFunction) -> DMatrix<f64> {
        DMatrix::from_fn(self.m(), self.n(), |i, j| {
            let (x, y) = self.coordinate(i, j);
            field.value(x, y)
        })
    }

    /// Reshapes a solution vector of length `m * n` into the `m x n` grid.
    pub fn reshape(&self, values: &[f64]) -> Result<DMatrix<f64>, GridError> {
        if values.len() != self.size() {
            return Err(GridError::ShapeMismatch(format!(
                "vector of length {} does not fit a {} x {} grid",
                values.len(),
                self.m(),
                self.n()
            )));
        }
        Ok(DMatrix::from_column_slice(self.m(), self.n(), values))
    }
}

/// Nodes along one direction, `None` once the count leaves `1..=MAX_NODES`.
fn node_count(extent: f64, step: f64) -> Option<usize> {
    let divisions = (extent / step + DIVISION_ROUNDING).floor();
    if !divisions.is_finite() || divisions >= MAX_NODES as f64 {
        return None;
    }
    (divisions as usize).checked_add(1)
}
