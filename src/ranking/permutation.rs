//! Conditional-inference linear statistic under the permutation null.
//!
//! With `h = n_k / N` the class frequencies and `V = diag(h) - h h^T` the
//! covariance of a one-hot class indicator, random reassignment of the
//! classes to the samples gives:
//!
//! - nominal attribute, `T[v*c + k] = n_vk`:
//!   `E[T] = w ⊗ h` and
//!   `Cov[T] = N/(N-1) (diag(w) ⊗ V) - 1/(N-1) (w w^T ⊗ V)`
//! - numeric attribute, `T[k] = sum_i x_i [y_i = k]`:
//!   `E[T] = (sum x) h` and `Cov[T] = (N sum x^2 - (sum x)^2) / (N-1) V`
//!
//! The quadratic form `Q = (T - E)^T Cov^+ (T - E)` is referred to a
//! chi-square law with as many degrees of freedom as the numerical rank of
//! the covariance.

use super::TestStatistic;
use crate::core::types::ClassIndex;
use crate::linalg::{pseudo_inverse, PseudoInverse};
use crate::node::CompactTable;
use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// `P[X <= statistic]` for `X ~ chi2(degrees_of_freedom)`; zero without
/// degrees of freedom.
pub fn chi_square_cdf(statistic: f64, degrees_of_freedom: usize) -> f64 {
    if degrees_of_freedom == 0 {
        return 0.0;
    }
    ChiSquared::new(degrees_of_freedom as f64)
        .ok()
        .map_or(0.0, |law| law.cdf(statistic.max(0.0)))
}

/// `diag(h) - h h^T`
fn indicator_covariance(frequencies: &DVector<f64>) -> DMatrix<f64> {
    DMatrix::from_diagonal(frequencies) - frequencies * frequencies.transpose()
}

/// `None` when the covariance could not be pseudo-inverted.
fn quadratic_form(deviation: &DVector<f64>, covariance: &DMatrix<f64>, tolerances: &[f64]) -> Option<TestStatistic> {
    match pseudo_inverse(covariance, tolerances) {
        PseudoInverse::Solved { matrix, rank, .. } => {
            if rank == 0 {
                return Some(TestStatistic::no_power());
            }
            let statistic = deviation.dot(&(&matrix * deviation)).max(0.0);
            Some(TestStatistic {
                statistic,
                degrees_of_freedom: rank,
                score: chi_square_cdf(statistic, rank),
            })
        }
        PseudoInverse::Unsolvable => None,
    }
}

/// Linear statistic of a nominal attribute.
///
/// Tables with fewer than two rows or columns, or a single sample, carry no
/// evidence and score zero.
pub fn nominal_statistic(table: &CompactTable, tolerances: &[f64]) -> Option<TestStatistic> {
    let (r, c) = (table.num_values(), table.num_classes());
    let n = table.total();
    if r < 2 || c < 2 || n <= 1.0 {
        return Some(TestStatistic::no_power());
    }

    let frequencies = DVector::from_iterator(c, table.class_totals().iter().map(|&t| t / n));
    let v = indicator_covariance(&frequencies);
    let w = DVector::from_iterator(r, table.value_totals().iter().copied());

    let expected = w.kronecker(&frequencies);
    let observed = DVector::from_iterator(r * c, table.counts().iter().copied());
    let covariance = DMatrix::from_diagonal(&w).kronecker(&v) * (n / (n - 1.0))
        - (&w * w.transpose()).kronecker(&v) / (n - 1.0);

    quadratic_form(&(observed - expected), &covariance, tolerances)
}

/// Linear statistic of a numeric attribute from its `(value, class)` pairs.
///
/// Classes absent from `pairs` are dropped first; a constant attribute has a
/// null covariance and scores zero.
pub fn numeric_statistic(pairs: &[(f64, ClassIndex)], num_classes: usize, tolerances: &[f64]) -> Option<TestStatistic> {
    let mut class_counts = vec![0.0; num_classes];
    for &(_, class) in pairs {
        if let Some(count) = class_counts.get_mut(class) {
            *count += 1.0;
        }
    }
    let seen: Vec<ClassIndex> = (0..num_classes).filter(|&k| class_counts[k] > 0.0).collect();
    let n = pairs.len() as f64;
    if seen.len() < 2 || n <= 1.0 {
        return Some(TestStatistic::no_power());
    }
    let mut column = vec![usize::MAX; num_classes];
    for (j, &k) in seen.iter().enumerate() {
        column[k] = j;
    }

    let c = seen.len();
    let mut observed = DVector::<f64>::zeros(c);
    let (mut sum, mut sum_squares) = (0.0, 0.0);
    for &(x, class) in pairs {
        sum += x;
        sum_squares += x * x;
        if let Some(&j) = column.get(class) {
            observed[j] += x;
        }
    }

    let frequencies = DVector::from_iterator(c, seen.iter().map(|&k| class_counts[k] / n));
    // NaN from an overflowed sum must reach the pseudo-inverse, not clamp to zero
    let spread = (n * sum_squares - sum * sum) / (n - 1.0);
    let spread = if spread < 0.0 { 0.0 } else { spread };
    let covariance = indicator_covariance(&frequencies) * spread;
    let expected = &frequencies * sum;

    quadratic_form(&(observed - expected), &covariance, tolerances)
}
