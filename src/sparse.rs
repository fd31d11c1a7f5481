//! Sparse matrix utilities.
//!
//! Helpers for building the CSC matrices Clarabel consumes.

use nalgebra::DMatrix;
use nalgebra_sparse::{CooMatrix, CscMatrix};

/// Create a CSC matrix from (row, col, value) triplets.
///
/// Duplicates are summed together; out-of-range entries are ignored.
pub fn csc_from_triplets(
    nrows: usize,
    ncols: usize,
    triplets: &[(usize, usize, f64)],
) -> CscMatrix<f64> {
    if triplets.is_empty() {
        return CscMatrix::zeros(nrows, ncols);
    }

    let mut coo = CooMatrix::new(nrows, ncols);
    for &(row, col, val) in triplets {
        if row < nrows && col < ncols {
            coo.push(row, col, val);
        }
    }

    CscMatrix::from(&coo)
}

/// Extract the upper triangle of a square dense matrix as CSC.
///
/// Clarabel expects the quadratic cost P as its upper triangle only.
pub fn upper_triangle_csc(dense: &DMatrix<f64>) -> CscMatrix<f64> {
    let mut triplets = Vec::new();

    for j in 0..dense.ncols() {
        for i in 0..=j {
            let v = dense[(i, j)];
            if v.abs() > 1e-15 {
                triplets.push((i, j, v));
            }
        }
    }

    csc_from_triplets(dense.nrows(), dense.ncols(), &triplets)
}
