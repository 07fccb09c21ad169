pub mod benchmark;
pub mod sparse;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::grid2d::{Domain2D, Grid2D, StepSize2D};
use crate::domain::problem::EllipticProblem;
use crate::error::SolverError;
use crate::numerical::assembly::assemble_system;
use crate::numerical::stencil::Discretization;
use crate::solver::sparse::{solve_sparse_direct, LuOptions};

/// Nodal values of one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub grid: Grid2D,
    pub values: DVector<f64>,
}

impl Solution {
    /// Values as an `m x n` matrix, entry `(i, j)` at node `(i, j)`.
    pub fn to_grid(&self) -> DMatrix<f64> {
        DMatrix::from_column_slice(self.grid.m(), self.grid.n(), self.values.as_slice())
    }

    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.values[self.grid.index(i, j)]
    }
}

/// One discretization on one grid: assemble, then solve directly.
#[derive(Debug, Clone)]
pub struct EllipticSolver {
    pub grid: Grid2D,
    pub method: Discretization,
    pub lu: LuOptions,
}

impl EllipticSolver {
    pub fn new(domain: Domain2D, step: StepSize2D, method: Discretization) -> Result<Self, SolverError> {
        let grid = Grid2D::new(domain, step)?;
        Ok(Self {
            grid,
            method,
            lu: LuOptions::default(),
        })
    }

    pub fn with_lu_options(mut self, lu: LuOptions) -> Self {
        self.lu = lu;
        self
    }

    pub fn solve(&self, problem: &EllipticProblem) -> Result<Solution, SolverError> {
        let system = assemble_system(&self.grid, problem, self.method)?;
        let values = solve_sparse_direct(&system, &self.lu)?;
        debug!(method = %self.method, unknowns = values.len(), "Solve finished");
        Ok(Solution {
            grid: self.grid,
            values,
        })
    }
}
