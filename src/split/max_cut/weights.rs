//! Edge weights of the value graph.
//!
//! Each non-empty value of the attribute is a vertex; the weight of an edge
//! grows with how differently the two values distribute over the classes.

use crate::node::CompactTable;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How dissimilarity between two values is turned into an edge weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightLaw {
    /// Number of sample pairs, one from each value, with different classes
    SquaredGini,
    /// Pearson chi-square of the two values' `2 x C` sub-table
    ChiSquare,
}

impl fmt::Display for WeightLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightLaw::SquaredGini => write!(f, "squared_gini"),
            WeightLaw::ChiSquare => write!(f, "chi_square"),
        }
    }
}

/// Symmetric weight matrix with zero diagonal over the rows of `table`.
pub fn build_weights(table: &CompactTable, law: WeightLaw) -> DMatrix<f64> {
    let n = table.num_values();
    let mut weights = DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let w = match law {
                WeightLaw::SquaredGini => squared_gini_weight(table, i, j),
                WeightLaw::ChiSquare => chi_square_weight(table, i, j),
            };
            weights[(i, j)] = w;
            weights[(j, i)] = w;
        }
    }
    if law == WeightLaw::ChiSquare && n > 2 {
        weights /= (n - 1) as f64;
    }
    weights
}

/// `sum_c n_ic (N_j - n_jc)`, which equals its mirror `sum_c n_jc (N_i - n_ic)`.
fn squared_gini_weight(table: &CompactTable, i: usize, j: usize) -> f64 {
    let total_j = table.value_totals()[j];
    table
        .row(i)
        .iter()
        .zip(table.row(j).iter())
        .map(|(&n_ic, &n_jc)| n_ic * (total_j - n_jc))
        .sum()
}

fn chi_square_weight(table: &CompactTable, i: usize, j: usize) -> f64 {
    let totals = table.value_totals();
    let pooled_total = totals[i] + totals[j];
    if pooled_total <= 0.0 {
        return 0.0;
    }
    let mut statistic = 0.0;
    for (&n_ic, &n_jc) in table.row(i).iter().zip(table.row(j).iter()) {
        let pooled = (n_ic + n_jc) / pooled_total;
        for (observed, total) in [(n_ic, totals[i]), (n_jc, totals[j])] {
            let expected = total * pooled;
            if expected == 0.0 {
                continue;
            }
            statistic += (observed - expected).powi(2) / expected;
        }
    }
    statistic
}
