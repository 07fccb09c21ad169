use nalgebra::DVector;
use rsparse::lusol;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SolverError;
use crate::numerical::assembly::LinearSystem;

/// Fill-reducing ordering applied before the LU factorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ordering {
    Natural,
    /// Approximate minimum degree on `A + A'`.
    AmdSymmetric,
    /// Approximate minimum degree on `S' S`, with dense rows dropped.
    AmdRows,
    /// Approximate minimum degree on `A' A`.
    AmdNormal,
}

impl Ordering {
    fn code(&self) -> i8 {
        match self {
            Ordering::Natural => 0,
            Ordering::AmdSymmetric => 1,
            Ordering::AmdRows => 2,
            Ordering::AmdNormal => 3,
        }
    }
}

/// Settings for the direct sparse LU solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LuOptions {
    pub ordering: Ordering,
    /// Threshold partial pivoting: 1.0 is classic partial pivoting, smaller
    /// values prefer the diagonal.
    pub pivot_tolerance: f64,
}

impl Default for LuOptions {
    fn default() -> Self {
        Self {
            ordering: Ordering::AmdSymmetric,
            pivot_tolerance: 1.0,
        }
    }
}

/// Solves `A u = b` with a general (non-symmetric) sparse LU factorization.
pub fn solve_sparse_direct(system: &LinearSystem, options: &LuOptions) -> Result<DVector<f64>, SolverError> {
    let n = system.size();
    if system.matrix.m != n || system.matrix.n != n {
        return Err(SolverError::DimensionMismatch(format!(
            "matrix is {}x{} but right-hand side has length {}",
            system.matrix.m, system.matrix.n, n
        )));
    }
    if n == 0 {
        return Ok(DVector::zeros(0));
    }
    if !(options.pivot_tolerance > 0.0 && options.pivot_tolerance <= 1.0) {
        return Err(SolverError::Configuration(format!(
            "pivot tolerance must lie in (0, 1], got {}",
            options.pivot_tolerance
        )));
    }

    check_finite(system)?;
    check_structure(system)?;

    let mut u: Vec<f64> = system.rhs.iter().copied().collect();
    if let Err(error) = lusol(&system.matrix, &mut u, options.ordering.code(), options.pivot_tolerance) {
        return Err(SolverError::SingularSystem(format!(
            "sparse LU factorization failed: {}",
            error
        )));
    }

    if let Some(k) = u.iter().position(|v| !v.is_finite()) {
        return Err(SolverError::SingularSystem(format!(
            "solution entry {} is not finite ({})",
            k, u[k]
        )));
    }

    debug!(n, nnz = system.nnz(), "Sparse LU solve finished");
    Ok(DVector::from_vec(u))
}

fn check_finite(system: &LinearSystem) -> Result<(), SolverError> {
    if let Some(k) = system.matrix.x.iter().position(|v| !v.is_finite()) {
        return Err(SolverError::NonFinite(format!(
            "matrix entry ({}, {}) is {}",
            system.matrix.i[k],
            system.matrix.p.partition_point(|&p| p as usize <= k) - 1,
            system.matrix.x[k]
        )));
    }
    if let Some(row) = system.rhs.iter().position(|v| !v.is_finite()) {
        return Err(SolverError::NonFinite(format!(
            "right-hand side entry {} is {}",
            row, system.rhs[row]
        )));
    }
    Ok(())
}

/// Rejects matrices with an empty row or column, which no pivot order can
/// factorize.
fn check_structure(system: &LinearSystem) -> Result<(), SolverError> {
    let n = system.size();
    let mut row_filled = vec![false; n];
    for col in 0..n {
        let (start, end) = (system.matrix.p[col] as usize, system.matrix.p[col + 1] as usize);
        let mut col_filled = false;
        for k in start..end {
            if system.matrix.x[k] != 0.0 {
                row_filled[system.matrix.i[k]] = true;
                col_filled = true;
            }
        }
        if !col_filled {
            return Err(SolverError::SingularSystem(format!("column {} is empty", col)));
        }
    }
    if let Some(row) = row_filled.iter().position(|&filled| !filled) {
        return Err(SolverError::SingularSystem(format!("row {} is empty", row)));
    }
    Ok(())
}
