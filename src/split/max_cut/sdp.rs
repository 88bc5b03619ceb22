//! Semidefinite relaxation of Max-Cut.
//!
//! The relaxation minimizes `trace(W X) / 4` over symmetric positive
//! semidefinite `X` with unit diagonal. Any [`SdpSolver`] returning such a
//! matrix can be plugged into the pipeline; the default is the low-rank
//! mixing method, which keeps `X = V V^T` with unit-norm rows and sweeps
//! block-coordinate updates over the rows.

use crate::config::CriterionConfig;
use crate::core::constants::SDP_STALL_SWEEPS;
use crate::core::error::{Result, SplitError};
use crate::core::utils::Random;
use nalgebra::DMatrix;
use std::fmt::Debug;

/// Solver of the Max-Cut semidefinite relaxation.
pub trait SdpSolver: Send + Sync + Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns `X` (symmetric, PSD within tolerance, unit diagonal)
    /// approximately minimizing `trace(W X)`.
    ///
    /// Numerical breakdown must be reported as an error, never as a
    /// fallback matrix.
    fn solve(&self, weights: &DMatrix<f64>, rng: &mut Random, config: &CriterionConfig) -> Result<DMatrix<f64>>;
}

/// Low-rank coordinate descent (the "mixing method").
///
/// Rank `ceil(sqrt(2n)) + 1` is enough for the relaxation's optimum to be
/// reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixingMethodSolver;

impl MixingMethodSolver {
    fn rank_for(n: usize) -> usize {
        let rank = ((2 * n) as f64).sqrt().ceil() as usize + 1;
        rank.min(n).max(1)
    }

    /// `sum_{i != j} w_ij <v_i, v_j>`
    fn objective(weights: &DMatrix<f64>, v: &DMatrix<f64>) -> f64 {
        let gram = v * v.transpose();
        let mut total = 0.0;
        for i in 0..weights.nrows() {
            for j in 0..weights.ncols() {
                if i != j {
                    total += weights[(i, j)] * gram[(i, j)];
                }
            }
        }
        total
    }
}

impl SdpSolver for MixingMethodSolver {
    fn name(&self) -> &'static str {
        "mixing_method"
    }

    fn solve(&self, weights: &DMatrix<f64>, rng: &mut Random, config: &CriterionConfig) -> Result<DMatrix<f64>> {
        let n = weights.nrows();
        if weights.ncols() != n {
            return Err(SplitError::dimension_mismatch(
                format!("square weight matrix of size {}", n),
                format!("{}x{}", n, weights.ncols()),
            ));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(SplitError::numerical("weight matrix has non-finite entries"));
        }
        if n == 0 {
            return Ok(DMatrix::zeros(0, 0));
        }

        let rank = Self::rank_for(n);
        let mut v = DMatrix::<f64>::zeros(n, rank);
        for i in 0..n {
            let u = rng.unit_vector(rank);
            for (k, x) in u.into_iter().enumerate() {
                v[(i, k)] = x;
            }
        }

        let mut previous = Self::objective(weights, &v);
        let mut best = previous;
        let mut stalled = 0usize;
        let mut sweeps = 0usize;
        let mut gradient = vec![0.0; rank];

        while sweeps < config.sdp_max_iterations {
            sweeps += 1;
            for i in 0..n {
                gradient.iter_mut().for_each(|g| *g = 0.0);
                for j in 0..n {
                    let w = weights[(i, j)];
                    if j == i || w == 0.0 {
                        continue;
                    }
                    for (k, g) in gradient.iter_mut().enumerate() {
                        *g += w * v[(j, k)];
                    }
                }
                let norm = gradient.iter().map(|g| g * g).sum::<f64>().sqrt();
                if norm > f64::MIN_POSITIVE {
                    for (k, g) in gradient.iter().enumerate() {
                        v[(i, k)] = -g / norm;
                    }
                }
            }

            let current = Self::objective(weights, &v);
            if !current.is_finite() {
                return Err(SplitError::numerical(format!(
                    "relaxation objective became non-finite after {} sweeps",
                    sweeps
                )));
            }

            let scale = current.abs().max(1.0);
            if (previous - current).abs() <= config.sdp_tolerance * scale {
                break;
            }
            if current < best - config.sdp_tolerance * scale {
                best = current;
                stalled = 0;
            } else {
                stalled += 1;
                if stalled >= SDP_STALL_SWEEPS {
                    break;
                }
            }
            previous = current;
        }

        if sweeps >= config.sdp_max_iterations {
            log::debug!("mixing method hit the sweep budget ({} sweeps, n = {})", sweeps, n);
        } else {
            log::trace!("mixing method converged in {} sweeps (n = {})", sweeps, n);
        }

        let x = &v * v.transpose();
        if x.iter().any(|e| !e.is_finite()) {
            return Err(SplitError::numerical("relaxation solution has non-finite entries"));
        }
        Ok(x)
    }
}
