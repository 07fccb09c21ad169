/// A scalar function of one coordinate, used along a domain edge.
///
/// Top and bottom edges are evaluated at `x`, left and right edges at `y`.
pub trait EdgeFunction: Send + Sync {
    fn value(&self, t: f64) -> f64;
}

/// A scalar function over the plane, used for the reaction term `r(x, y)`,
/// the forcing term `f(x, y)` and analytic reference solutions.
pub trait FieldFunction: Send + Sync {
    fn value(&self, x: f64, y: f64) -> f64;
}

impl<F> EdgeFunction for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn value(&self, t: f64) -> f64 {
        self(t)
    }
}

impl<F> FieldFunction for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn value(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}
