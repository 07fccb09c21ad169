use crate::domain::field::EdgeFunction;
use crate::domain::grid2d::Grid2D;
use crate::numerical::stencil::StencilRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundarySide {
    Left,
    Right,
    Bottom,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    Boundary(BoundarySide),
    Interior,
}

/// Classifies node `(i, j)`. Left and right take precedence over bottom and
/// top, so the four corners are always `Left` or `Right`.
pub fn classify(grid: &Grid2D, i: usize, j: usize) -> PointKind {
    if i == 0 {
        PointKind::Boundary(BoundarySide::Left)
    } else if i == grid.m() - 1 {
        PointKind::Boundary(BoundarySide::Right)
    } else if j == 0 {
        PointKind::Boundary(BoundarySide::Bottom)
    } else if j == grid.n() - 1 {
        PointKind::Boundary(BoundarySide::Top)
    } else {
        PointKind::Interior
    }
}

/// Dirichlet data on the four edges of the rectangle.
pub struct BoundaryConditions2D {
    pub top: Box<dyn EdgeFunction>,    // u(x, y_max)
    pub bottom: Box<dyn EdgeFunction>, // u(x, y_min)
    pub left: Box<dyn EdgeFunction>,   // u(x_min, y)
    pub right: Box<dyn EdgeFunction>,  // u(x_max, y)
}

impl BoundaryConditions2D {
    pub fn new(
        top: impl EdgeFunction + 'static,
        bottom: impl EdgeFunction + 'static,
        left: impl EdgeFunction + 'static,
        right: impl EdgeFunction + 'static,
    ) -> Self {
        Self {
            top: Box::new(top),
            bottom: Box::new(bottom),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Prescribed value on `side` at the physical point `(x, y)`.
    pub fn value(&self, side: BoundarySide, x: f64, y: f64) -> f64 {
        match side {
            BoundarySide::Left => self.left.value(y),
            BoundarySide::Right => self.right.value(y),
            BoundarySide::Bottom => self.bottom.value(x),
            BoundarySide::Top => self.top.value(x),
        }
    }

    /// Identity row `u_ij = g(x, y)` for a boundary node.
    pub fn dirichlet_row(&self, grid: &Grid2D, i: usize, j: usize, side: BoundarySide) -> StencilRow {
        let (x, y) = grid.coordinate(i, j);
        StencilRow::identity(grid.index(i, j), self.value(side, x, y))
    }
}

impl std::fmt::Debug for BoundaryConditions2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryConditions2D").finish_non_exhaustive()
    }
}
