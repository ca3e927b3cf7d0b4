//! Linear algebra helpers for the equilibrium solve

use nalgebra::{DMatrix, DVector};

use crate::error::{LoadsError, LoadsResult};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;

/// Minimum-norm least squares solution of `a * x = b`.
///
/// Uses the SVD pseudo-inverse, so for an under-determined system the
/// returned `x` is the solution with the smallest Euclidean norm. Singular
/// values below `max(sv) * max(m, n) * EPSILON` are treated as zero, the same
/// cutoff LAPACK-style `lstsq` uses by default.
pub fn min_norm_solve(a: &Mat, b: &Vec) -> LoadsResult<Vec> {
    if a.nrows() != b.len() {
        return Err(LoadsError::Solver(format!(
            "right-hand side has {} rows, matrix has {}",
            b.len(),
            a.nrows()
        )));
    }
    if a.ncols() == 0 {
        return Ok(Vec::zeros(0));
    }

    let svd = a.clone().svd(true, true);
    let cutoff = svd.singular_values.max() * a.nrows().max(a.ncols()) as f64 * f64::EPSILON;
    svd.solve(b, cutoff).map_err(|e| LoadsError::Solver(e.to_string()))
}
