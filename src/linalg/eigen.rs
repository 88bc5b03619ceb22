//! Principal axis of a symmetric matrix.

use nalgebra::{DMatrix, DVector, SymmetricEigen};

const EIGEN_MAX_ITERATIONS: usize = 10_000;

/// Unit eigenvector of the eigenvalue with the largest magnitude, or `None`
/// when the decomposition does not converge or the input is not finite.
pub fn principal_eigenvector(m: &DMatrix<f64>) -> Option<DVector<f64>> {
    if m.is_empty() || !m.is_square() || m.iter().any(|x| !x.is_finite()) {
        return None;
    }
    let eigen = SymmetricEigen::try_new(m.clone(), f64::EPSILON, EIGEN_MAX_ITERATIONS)?;
    let index = (0..eigen.eigenvalues.len()).max_by(|&i, &j| {
        eigen.eigenvalues[i]
            .abs()
            .total_cmp(&eigen.eigenvalues[j].abs())
            .then(j.cmp(&i))
    })?;
    Some(eigen.eigenvectors.column(index).into_owned())
}
