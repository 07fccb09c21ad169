use serde::{Deserialize, Serialize};

use crate::domain::grid2d::{Grid2D, StepSize2D};
use crate::domain::problem::EllipticProblem;

/// Coefficients of one matrix row, as `(column, value)` pairs, plus its
/// right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct StencilRow {
    pub entries: Vec<(usize, f64)>,
    pub rhs: f64,
}

impl StencilRow {
    pub fn identity(row: usize, value: f64) -> Self {
        Self {
            entries: vec![(row, 1.0)],
            rhs: value,
        }
    }

    pub fn coefficient(&self, column: usize) -> Option<f64> {
        self.entries
            .iter()
            .rev()
            .find(|(c, _)| *c == column)
            .map(|&(_, v)| v)
    }
}

/// Row contribution for an interior node. Callers guarantee
/// `0 < i < m - 1` and `0 < j < n - 1`.
pub trait InteriorStencil: Send + Sync {
    fn interior_row(&self, grid: &Grid2D, i: usize, j: usize, problem: &EllipticProblem) -> StencilRow;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discretization {
    FiniteDifference,
    FiniteElement,
}

impl Discretization {
    pub fn stencil(&self) -> &'static dyn InteriorStencil {
        match self {
            Discretization::FiniteDifference => &FiniteDifference,
            Discretization::FiniteElement => &FiniteElement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Discretization::FiniteDifference => "finite difference",
            Discretization::FiniteElement => "finite element",
        }
    }
}

impl std::fmt::Display for Discretization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Five-point stencil for `∇²u + r u = f`:
///
/// ```text
///               1/hy²
///   1/hx²  -2(1/hx² + 1/hy²) + r   1/hx²
///               1/hy²
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FiniteDifference;

impl InteriorStencil for FiniteDifference {
    fn interior_row(&self, grid: &Grid2D, i: usize, j: usize, problem: &EllipticProblem) -> StencilRow {
        let StepSize2D(hx, hy) = grid.step;
        let (x, y) = grid.coordinate(i, j);
        let inv_hx2 = 1.0 / (hx * hx);
        let inv_hy2 = 1.0 / (hy * hy);

        let entries = vec![
            (grid.index(i, j), -2.0 * (inv_hx2 + inv_hy2) + problem.reaction_at(x, y)),
            (grid.index(i, j - 1), inv_hy2), // down
            (grid.index(i, j + 1), inv_hy2), // up
            (grid.index(i - 1, j), inv_hx2), // left
            (grid.index(i + 1, j), inv_hx2), // right
        ];

        StencilRow {
            entries,
            rhs: problem.forcing_at(x, y),
        }
    }
}

/// Centroids of the six triangles sharing a node, in units of `(hx, hy)`.
/// Each grid cell is split along its lower-left to upper-right diagonal.
///
/// ```text
///        +-------+-------+
///        |     / | 1   / |
///        |   /   |   /   |
///        | /   2 | /  0  |
///        +-------X-------+
///        | 3   / | 5   / |
///        |   /   |   /   |
///        | /  4  | /     |
///        +-------+-------+
/// ```
pub const BARYCENTER_OFFSETS: [(f64, f64); 6] = [
    (2.0 / 3.0, 1.0 / 3.0),
    (1.0 / 3.0, 2.0 / 3.0),
    (-1.0 / 3.0, 1.0 / 3.0),
    (-2.0 / 3.0, -1.0 / 3.0),
    (-1.0 / 3.0, -2.0 / 3.0),
    (1.0 / 3.0, -1.0 / 3.0),
];

/// Linear triangular elements on the diagonally split grid.
///
/// The row is the negated stiffness row minus a mass term that samples `r` at
/// the barycenters of the triangles adjacent to each node pair. The coupled
/// nodes are self, up, up-right, down, down-left, left and right.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiniteElement;

impl FiniteElement {
    pub fn barycenters(x: f64, y: f64, hx: f64, hy: f64) -> [(f64, f64); 6] {
        BARYCENTER_OFFSETS.map(|(ox, oy)| (x + ox * hx, y + oy * hy))
    }
}

impl InteriorStencil for FiniteElement {
    fn interior_row(&self, grid: &Grid2D, i: usize, j: usize, problem: &EllipticProblem) -> StencilRow {
        let StepSize2D(hx, hy) = grid.step;
        let (x, y) = grid.coordinate(i, j);
        let centers = Self::barycenters(x, y, hx, hy);

        let r = centers.map(|(bx, by)| problem.reaction_at(bx, by));
        let r_sum: f64 = r.iter().sum();
        let area = hx * hy / 2.0;

        let entries = vec![
            (grid.index(i, j), 2.0 * (hx * hx + hy * hy) / (hx * hy) - r_sum * area / 9.0),
            (grid.index(i, j - 1), -hx / hy - (r[4] + r[5]) * area / 9.0),
            (grid.index(i - 1, j - 1), -(r[3] + r[4]) * area / 9.0),
            (grid.index(i, j + 1), -hx / hy - (r[1] + r[2]) * area / 9.0),
            (grid.index(i + 1, j + 1), -(r[0] + r[1]) * area / 9.0),
            (grid.index(i - 1, j), -hy / hx - (r[2] + r[3]) * area / 9.0),
            (grid.index(i + 1, j), -hy / hx - (r[5] + r[0]) * area / 9.0),
        ];

        // Each barycenter carries basis value 1/3 over a triangle of `area`.
        let f_sum: f64 = centers.iter().map(|&(bx, by)| problem.forcing_at(bx, by)).sum();

        StencilRow {
            entries,
            rhs: -f_sum * area / 3.0,
        }
    }
}
