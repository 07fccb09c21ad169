use std::time::{Duration, Instant};

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::domain::field::FieldFunction;
use crate::domain::grid2d::{Domain2D, StepSize2D};
use crate::domain::problem::EllipticProblem;
use crate::error::SolverError;
use crate::numerical::stencil::Discretization;
use crate::solver::sparse::LuOptions;
use crate::solver::EllipticSolver;

/// What a sweep does when a step size fails to solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Stop the sweep and return the error.
    #[default]
    Abort,
    /// Log the error and continue with the next step size.
    Skip,
}

/// Accuracy and timing for one step size. Field names follow the columns of
/// the benchmark table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Step exponent, step size `2^-p`.
    pub p: i32,
    /// Mean wall-clock seconds per assemble + solve.
    pub t_avg: f64,
    /// hx
    pub h: f64,
    /// hy
    pub k: f64,
    pub num_trials: usize,
    /// Mean of `numeric - exact`.
    pub error_avg: f64,
    /// Mean of `|numeric - exact|`.
    pub error_abs_mean: f64,
}

/// Everything produced for one step size. The grids are `m x n` with entry
/// `(i, j)` at node `(x[i], y[j])`.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub record: ErrorRecord,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Trial-averaged numerical solution.
    pub solution: DMatrix<f64>,
    /// `solution - exact`
    pub error: DMatrix<f64>,
    pub abs_error: DMatrix<f64>,
}

/// Repeats a solve over a sweep of step sizes and compares the trial-averaged
/// result against an exact solution.
pub struct ErrorBenchmark<'a> {
    pub domain: Domain2D,
    pub problem: &'a EllipticProblem,
    pub reference: &'a dyn FieldFunction,
    pub method: Discretization,
    pub num_trials: usize,
    pub lu: LuOptions,
    pub on_failure: FailurePolicy,
}

impl<'a> ErrorBenchmark<'a> {
    pub fn new(
        domain: Domain2D,
        problem: &'a EllipticProblem,
        reference: &'a dyn FieldFunction,
        method: Discretization,
        num_trials: usize,
    ) -> Result<Self, SolverError> {
        domain.validate()?;
        if num_trials == 0 {
            return Err(SolverError::Configuration(
                "number of trials must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            domain,
            problem,
            reference,
            method,
            num_trials,
            lu: LuOptions::default(),
            on_failure: FailurePolicy::default(),
        })
    }

    pub fn with_lu_options(mut self, lu: LuOptions) -> Self {
        self.lu = lu;
        self
    }

    pub fn with_failure_policy(mut self, on_failure: FailurePolicy) -> Self {
        self.on_failure = on_failure;
        self
    }

    /// Runs every exponent in order. Results keep the input order; with
    /// [`FailurePolicy::Skip`] failed exponents are left out.
    pub fn run(&self, exponents: &[i32]) -> Result<Vec<StepResult>, SolverError> {
        let _sweep_span = info_span!("error_sweep", method = %self.method, steps = exponents.len()).entered();
        info!("Starting {} sweep over {} step sizes", self.method, exponents.len());

        let mut results = Vec::with_capacity(exponents.len());
        for &p in exponents {
            match self.run_step(p) {
                Ok(result) => results.push(result),
                Err(e) => match self.on_failure {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Skip => {
                        warn!(p, error = %e, "Step size failed, skipping");
                    }
                },
            }
        }
        Ok(results)
    }

    /// Solves `num_trials` times with step `2^-p` and measures the error of
    /// the averaged solution.
    pub fn run_step(&self, p: i32) -> Result<StepResult, SolverError> {
        let _step_span = info_span!("step_size", p).entered();

        let step = StepSize2D::from_exponent(p);
        let solver = EllipticSolver::new(self.domain, step, self.method)?.with_lu_options(self.lu);
        let grid = solver.grid;

        let mut sum = DVector::<f64>::zeros(grid.size());
        let mut elapsed = Duration::ZERO;
        for _ in 0..self.num_trials {
            let start = Instant::now();
            let solution = solver.solve(self.problem)?;
            elapsed += start.elapsed();
            sum += solution.values;
        }
        let t_avg = elapsed.as_secs_f64() / self.num_trials as f64;
        let mean = sum / self.num_trials as f64;

        let solution = grid.reshape(mean.as_slice())?;
        let exact = grid.sample(self.reference);
        let error = &solution - &exact;
        let abs_error = error.abs();

        let StepSize2D(hx, hy) = step;
        let record = ErrorRecord {
            p,
            t_avg,
            h: hx,
            k: hy,
            num_trials: self.num_trials,
            error_avg: error.mean(),
            error_abs_mean: abs_error.mean(),
        };

        info!(
            "p = {}: h = {}, k = {}, t_avg = {:.6}s, average error = {:.6e}, average absolute error = {:.6e} ({} trials)",
            p, hx, hy, t_avg, record.error_avg, record.error_abs_mean, self.num_trials
        );

        Ok(StepResult {
            record,
            x: grid.x_coordinates(),
            y: grid.y_coordinates(),
            solution,
            error,
            abs_error,
        })
    }
}

pub fn records(results: &[StepResult]) -> Vec<ErrorRecord> {
    results.iter().map(|r| r.record.clone()).collect()
}
