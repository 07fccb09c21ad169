//! Ready-made problem data.
//!
//! The benchmark problem has the exact solution `u = x² + y²`. Every function
//! here is a small immutable struct so the constants it depends on stay
//! visible instead of being captured from surrounding scope.

use crate::boundary::bc2d::BoundaryConditions2D;
use crate::domain::field::{EdgeFunction, FieldFunction};
use crate::domain::grid2d::Domain2D;
use crate::domain::problem::EllipticProblem;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl FieldFunction for Constant {
    fn value(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }
}

/// `t² + offset`: the trace of `x² + y²` on an edge where the other
/// coordinate is fixed at `sqrt(offset)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftedSquare {
    pub offset: f64,
}

impl EdgeFunction for ShiftedSquare {
    fn value(&self, t: f64) -> f64 {
        t * t + self.offset
    }
}

/// `x² + y²`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RadiusSquared;

impl FieldFunction for RadiusSquared {
    fn value(&self, x: f64, y: f64) -> f64 {
        x * x + y * y
    }
}

/// `1 / (x² + y²)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InverseRadiusSquared;

impl FieldFunction for InverseRadiusSquared {
    fn value(&self, x: f64, y: f64) -> f64 {
        1.0 / (x * x + y * y)
    }
}

/// Forcing that makes `x² + y²` solve `∇²u + r u = f` for the given `r`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialForcing<R> {
    pub reaction: R,
}

impl<R: FieldFunction> FieldFunction for RadialForcing<R> {
    fn value(&self, x: f64, y: f64) -> f64 {
        4.0 + self.reaction.value(x, y) * RadiusSquared.value(x, y)
    }
}

/// Edges of `x² + y²` on `domain`.
pub fn radial_boundary(domain: &Domain2D) -> BoundaryConditions2D {
    BoundaryConditions2D::new(
        ShiftedSquare { offset: domain.y_max * domain.y_max },
        ShiftedSquare { offset: domain.y_min * domain.y_min },
        ShiftedSquare { offset: domain.x_min * domain.x_min },
        ShiftedSquare { offset: domain.x_max * domain.x_max },
    )
}

/// Manufactured problem with exact solution `x² + y²` for any reaction term.
pub fn radial_problem<R>(domain: &Domain2D, reaction: R) -> EllipticProblem
where
    R: FieldFunction + Clone + 'static,
{
    EllipticProblem::new(
        radial_boundary(domain),
        reaction.clone(),
        RadialForcing { reaction },
    )
}

/// `[3, 5] x [1, 2]`
pub fn benchmark_domain() -> Domain2D {
    Domain2D {
        x_min: 3.0,
        x_max: 5.0,
        y_min: 1.0,
        y_max: 2.0,
    }
}

/// The benchmark problem on [`benchmark_domain`]: `r = 1 / (x² + y²)`,
/// `f = 5`, with edges `x² + 4`, `x² + 1`, `y² + 9` and `y² + 25`.
pub fn benchmark_problem() -> EllipticProblem {
    EllipticProblem::new(
        BoundaryConditions2D::new(
            ShiftedSquare { offset: 4.0 },
            ShiftedSquare { offset: 1.0 },
            ShiftedSquare { offset: 9.0 },
            ShiftedSquare { offset: 25.0 },
        ),
        InverseRadiusSquared,
        Constant(5.0),
    )
}
