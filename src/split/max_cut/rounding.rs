//! Random-hyperplane rounding of a factored relaxation.

use crate::core::utils::Random;
use nalgebra::{DMatrix, DVector};

/// Side assignment (`true` is left) from one random hyperplane.
///
/// Row `i` of `factor` is the vector of value `i`; values with a positive
/// projection on a standard normal direction go left. If every value lands
/// on the same side, the one closest to the hyperplane is moved across.
pub fn hyperplane_rounding(factor: &DMatrix<f64>, rng: &mut Random) -> Vec<bool> {
    let n = factor.nrows();
    let direction = DVector::from_vec(rng.gaussian_vector(factor.ncols()));
    let projections = factor * &direction;
    let mut sides: Vec<bool> = projections.iter().map(|&p| p > 0.0).collect();

    if n >= 2 && (sides.iter().all(|&s| s) || sides.iter().all(|&s| !s)) {
        let closest = (0..n)
            .min_by(|&i, &j| {
                projections[i]
                    .abs()
                    .total_cmp(&projections[j].abs())
                    .then(i.cmp(&j))
            })
            .unwrap_or(0);
        sides[closest] = !sides[closest];
    }
    sides
}
