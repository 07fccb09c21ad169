use crate::boundary::bc2d::BoundaryConditions2D;
use crate::domain::field::FieldFunction;

/// Dirichlet problem `∇²u + r(x, y) u = f(x, y)` on a rectangle.
pub struct EllipticProblem {
    pub boundary: BoundaryConditions2D,
    pub reaction: Box<dyn FieldFunction>,
    pub forcing: Box<dyn FieldFunction>,
}

impl EllipticProblem {
    pub fn new(
        boundary: BoundaryConditions2D,
        reaction: impl FieldFunction + 'static,
        forcing: impl FieldFunction + 'static,
    ) -> Self {
        Self {
            boundary,
            reaction: Box::new(reaction),
            forcing: Box::new(forcing),
        }
    }

    pub fn reaction_at(&self, x: f64, y: f64) -> f64 {
        self.reaction.value(x, y)
    }

    pub fn forcing_at(&self, x: f64, y: f64) -> f64 {
        self.forcing.value(x, y)
    }
}

impl std::fmt::Debug for EllipticProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EllipticProblem")
            .field("boundary", &self.boundary)
            .finish_non_exhaustive()
    }
}
