//! Pseudo-inverse with an escalating tolerance ladder.

use nalgebra::{DMatrix, SVD};

/// Multiple of `max(rows, cols) * f64::EPSILON` below which a relative
/// singular value is round-off.
const ROUND_OFF_FACTOR: f64 = 100.0;

/// Outcome of [`pseudo_inverse`].
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoInverse {
    /// A Moore-Penrose inverse was obtained at `tolerance`; `rank` singular
    /// values were kept.
    Solved {
        matrix: DMatrix<f64>,
        rank: usize,
        tolerance: f64,
    },
    /// Every tolerance of the ladder failed.
    Unsolvable,
}

impl PseudoInverse {
    /// Rank of the inverted matrix, if solved.
    pub fn rank(&self) -> Option<usize> {
        match self {
            PseudoInverse::Solved { rank, .. } => Some(*rank),
            PseudoInverse::Unsolvable => None,
        }
    }
}

/// Pseudo-inverts `m`, trying each relative tolerance of `tolerances` in
/// order until the SVD converges and the result satisfies `A A+ A = A`.
/// Tolerances outside `[0, 1)` would discard the whole spectrum and are
/// skipped.
///
/// Singular values at or below `tolerance * sigma_max` are treated as zero,
/// with `tolerance` never below `100 * max(rows, cols) * f64::EPSILON`.
pub fn pseudo_inverse(m: &DMatrix<f64>, tolerances: &[f64]) -> PseudoInverse {
    if m.iter().any(|x| !x.is_finite()) {
        log::debug!("pseudo-inverse of a matrix with non-finite entries");
        return PseudoInverse::Unsolvable;
    }
    if m.is_empty() {
        return PseudoInverse::Solved {
            matrix: DMatrix::zeros(m.ncols(), m.nrows()),
            rank: 0,
            tolerance: tolerances.first().copied().unwrap_or(0.0),
        };
    }

    let max_iterations = 100 * (m.nrows().max(m.ncols()) + 1);
    let scale = m.norm();
    // round-off singular values never count towards the rank
    let rank_floor = ROUND_OFF_FACTOR * m.nrows().max(m.ncols()) as f64 * f64::EPSILON;

    for &tolerance in tolerances {
        if !(0.0..1.0).contains(&tolerance) {
            log::debug!("pseudo-inverse tolerance {:e} outside [0, 1), skipped", tolerance);
            continue;
        }
        let Some(svd) = SVD::try_new(m.clone(), true, true, f64::EPSILON.max(tolerance), max_iterations)
        else {
            log::debug!("SVD did not converge at tolerance {:e}", tolerance);
            continue;
        };

        let sigma_max = svd.singular_values.iter().copied().fold(0.0, f64::max);
        let cutoff = tolerance.max(rank_floor) * sigma_max;
        let rank = svd.singular_values.iter().filter(|&&s| s > cutoff).count();

        let matrix = match svd.pseudo_inverse(cutoff) {
            Ok(matrix) => matrix,
            Err(e) => {
                log::debug!("pseudo-inverse failed at tolerance {:e}: {}", tolerance, e);
                continue;
            }
        };
        if matrix.iter().any(|x| !x.is_finite()) {
            continue;
        }

        if scale > 0.0 {
            let residual = (m * &matrix * m - m).norm();
            if residual > scale * tolerance.sqrt().max(1e-6) {
                log::debug!(
                    "pseudo-inverse residual {:e} too large at tolerance {:e}",
                    residual,
                    tolerance
                );
                continue;
            }
        }

        return PseudoInverse::Solved {
            matrix,
            rank,
            tolerance,
        };
    }

    PseudoInverse::Unsolvable
}
