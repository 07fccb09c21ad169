use nalgebra::{DMatrix, DVector};
use rsparse::data::{Sprs, Trpl};
use tracing::debug;

use crate::boundary::bc2d::{classify, PointKind};
use crate::domain::grid2d::Grid2D;
use crate::domain::problem::EllipticProblem;
use crate::error::SolverError;
use crate::numerical::stencil::{Discretization, StencilRow};

/// Collects `(row, col, value)` triplets during assembly.
///
/// A later write to the same `(row, col)` replaces the earlier one when the
/// triplets are compacted.
#[derive(Debug, Clone)]
pub struct TripletBuilder {
    size: usize,
    triplets: Vec<(usize, usize, f64)>,
}

impl TripletBuilder {
    pub fn new(size: usize) -> Self {
        Self::with_capacity(size, 0)
    }

    pub fn with_capacity(size: usize, capacity: usize) -> Self {
        Self {
            size,
            triplets: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.size && col < self.size);
        self.triplets.push((row, col, value));
    }

    pub fn push_row(&mut self, row: usize, stencil: &StencilRow) {
        for &(col, value) in &stencil.entries {
            self.push(row, col, value);
        }
    }

    pub fn len(&self) -> usize {
        self.triplets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triplets.is_empty()
    }

    /// Sorts column-major and drops overwritten duplicates, keeping the last write.
    fn into_unique_triplets(mut self) -> Vec<(usize, usize, f64)> {
        // stable sort keeps insertion order among equal (col, row) keys
        self.triplets.sort_by_key(|&(row, col, _)| (col, row));
        let mut unique: Vec<(usize, usize, f64)> = Vec::with_capacity(self.triplets.len());
        for (row, col, value) in self.triplets {
            match unique.last_mut() {
                Some(last) if last.0 == row && last.1 == col => last.2 = value,
                _ => unique.push((row, col, value)),
            }
        }
        unique
    }

    /// Compacts the triplets into a compressed sparse column matrix.
    pub fn into_csc(self) -> Result<Sprs<f64>, SolverError> {
        let size = self.size;
        if size == 0 {
            return Ok(Sprs::<f64> { m: 0, n: 0, nzmax: 0, p: vec![0], i: vec![], x: vec![] });
        }

        let unique = self.into_unique_triplets();
        let mut trpl_mat = Trpl::<f64> {
            m: size,
            n: size,
            p: Vec::with_capacity(unique.len()), // column index per triplet
            i: Vec::with_capacity(unique.len()), // row index per triplet
            x: Vec::with_capacity(unique.len()),
        };
        for &(row, col, value) in &unique {
            trpl_mat.i.push(row);
            trpl_mat.p.push(col as isize);
            trpl_mat.x.push(value);
        }

        let mut sprs_mat = Sprs::<f64>::new();
        sprs_mat.from_trpl(&trpl_mat);

        if sprs_mat.m != size || sprs_mat.n != size || sprs_mat.p.len() != size + 1 {
            return Err(SolverError::DimensionMismatch(format!(
                "compressed matrix is {}x{} with {} column pointers, expected {}x{}",
                sprs_mat.m,
                sprs_mat.n,
                sprs_mat.p.len(),
                size,
                size
            )));
        }
        let nnz = sprs_mat.p[size] as usize;
        if nnz != unique.len() {
            return Err(SolverError::DimensionMismatch(format!(
                "compressed matrix holds {} entries, expected {}",
                nnz,
                unique.len()
            )));
        }

        Ok(sprs_mat)
    }
}

/// Assembled `A u = b`, with `A` in compressed sparse column form.
#[derive(Debug)]
pub struct LinearSystem {
    pub matrix: Sprs<f64>,
    pub rhs: DVector<f64>,
}

impl LinearSystem {
    pub fn size(&self) -> usize {
        self.rhs.len()
    }

    pub fn nnz(&self) -> usize {
        self.matrix.p.last().map_or(0, |&p| p as usize)
    }

    /// Stored value at `(row, col)`, zero when the entry is not stored.
    pub fn coefficient(&self, row: usize, col: usize) -> f64 {
        self.column(col)
            .find(|&(r, _)| r == row)
            .map_or(0.0, |(_, v)| v)
    }

    /// Stored `(col, value)` pairs of one row, ordered by column.
    pub fn row_entries(&self, row: usize) -> Vec<(usize, f64)> {
        (0..self.matrix.n)
            .filter_map(|col| self.column(col).find(|&(r, _)| r == row).map(|(_, v)| (col, v)))
            .collect()
    }

    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::<f64>::zeros(self.matrix.m, self.matrix.n);
        for col in 0..self.matrix.n {
            for (row, value) in self.column(col) {
                dense[(row, col)] = value;
            }
        }
        dense
    }

    fn column(&self, col: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let start = self.matrix.p[col] as usize;
        let end = self.matrix.p[col + 1] as usize;
        (start..end).map(move |k| (self.matrix.i[k], self.matrix.x[k]))
    }
}

/// Builds the full system for `problem` on `grid`: identity rows on the
/// boundary, one stencil for every interior node.
pub fn assemble_system(
    grid: &Grid2D,
    problem: &EllipticProblem,
    method: Discretization,
) -> Result<LinearSystem, SolverError> {
    let size = grid.size();
    let stencil = method.stencil();
    let capacity = size.checked_mul(7).ok_or_else(|| {
        SolverError::Configuration(format!("{} unknowns overflow the triplet buffer", size))
    })?;
    let mut triplets = TripletBuilder::with_capacity(size, capacity);
    let mut rhs = DVector::<f64>::zeros(size);

    for i in 0..grid.m() {
        for j in 0..grid.n() {
            let ij = grid.index(i, j);
            let row = match classify(grid, i, j) {
                PointKind::Boundary(side) => problem.boundary.dirichlet_row(grid, i, j, side),
                PointKind::Interior => stencil.interior_row(grid, i, j, problem),
            };
            triplets.push_row(ij, &row);
            rhs[ij] = row.rhs;
        }
    }

    debug!(
        method = %method,
        m = grid.m(),
        n = grid.n(),
        triplets = triplets.len(),
        "Assembled sparse system"
    );

    Ok(LinearSystem {
        matrix: triplets.into_csc()?,
        rhs,
    })
}
