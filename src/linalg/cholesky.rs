//! Rank-revealing Cholesky factorization of positive semidefinite matrices.

use crate::core::error::{Result, SplitError};
use nalgebra::DMatrix;

/// `A ~= F F^T` with `F` of size `n x rank`, rows in the original order.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotedCholesky {
    /// Factor, one row per row of `A`
    pub factor: DMatrix<f64>,
    /// Rows in the order they were pivoted
    pub pivots: Vec<usize>,
    /// Numerical rank
    pub rank: usize,
}

/// Symmetric part `(A + A^T) / 2`.
pub fn symmetrize(a: &DMatrix<f64>) -> DMatrix<f64> {
    (a + a.transpose()) * 0.5
}

/// Outer-product Cholesky with diagonal pivoting.
///
/// At every step the row with the largest residual diagonal is pivoted; the
/// factorization stops once that diagonal falls below
/// `tolerance * max_i A[i, i]`. Slightly indefinite inputs (round-off from an
/// iterative solver) are therefore handled by truncation.
pub fn pivoted_cholesky(a: &DMatrix<f64>, tolerance: f64) -> Result<PivotedCholesky> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(SplitError::dimension_mismatch(
            format!("square matrix of size {}", n),
            format!("{}x{}", n, a.ncols()),
        ));
    }
    if a.iter().any(|x| !x.is_finite()) {
        return Err(SplitError::numerical("Cholesky input has non-finite entries"));
    }

    let a = symmetrize(a);
    let mut residual: Vec<f64> = (0..n).map(|i| a[(i, i)]).collect();
    let max_diagonal = residual.iter().copied().fold(0.0, f64::max);
    let threshold = tolerance * max_diagonal;

    let mut l = DMatrix::<f64>::zeros(n, n);
    let mut pivoted = vec![false; n];
    let mut pivots = Vec::with_capacity(n);

    for k in 0..n {
        let Some(p) = (0..n)
            .filter(|&i| !pivoted[i])
            .max_by(|&i, &j| residual[i].total_cmp(&residual[j]).then(j.cmp(&i)))
        else {
            break;
        };
        if !(residual[p] > threshold) || residual[p] <= 0.0 {
            break;
        }

        let diagonal = residual[p].sqrt();
        l[(p, k)] = diagonal;
        pivoted[p] = true;
        pivots.push(p);

        for i in 0..n {
            if pivoted[i] {
                continue;
            }
            let mut s = a[(i, p)];
            for j in 0..k {
                s -= l[(i, j)] * l[(p, j)];
            }
            let value = s / diagonal;
            l[(i, k)] = value;
            residual[i] -= value * value;
        }
        residual[p] = 0.0;
    }

    let rank = pivots.len();
    let factor = l.columns(0, rank).into_owned();
    if factor.iter().any(|x| !x.is_finite()) {
        return Err(SplitError::numerical("Cholesky factor has non-finite entries"));
    }

    Ok(PivotedCholesky {
        factor,
        pivots,
        rank,
    })
}
