//! Optimal binary partition of nominal values when only two classes occur.
//!
//! Sorting the values by the frequency of the second class and cutting the
//! sorted list is enough: for any concave impurity, some prefix of that order
//! is an optimal left side. The scan keeps incremental tallies, so the whole
//! search is one sort plus a linear pass.

use crate::core::error::{Result, SplitError};
use crate::split::impurity::{ClassTally, Scorer};
use ndarray::ArrayView2;

/// Optimal partition found by the two-class trick.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoClassSolution {
    /// Rows sent left, ascending
    pub left: Vec<usize>,
    /// Rows sent right (including rows without samples), ascending
    pub right: Vec<usize>,
    /// Objective value of the partition under the scorer
    pub objective_value: f64,
}

/// Result of the two-class trick.
#[derive(Debug, Clone, PartialEq)]
pub enum TwoClassOutcome {
    /// Fewer than two classes or fewer than two non-empty rows
    Degenerate,
    /// Best partition
    Solved(TwoClassSolution),
}

impl TwoClassOutcome {
    /// The solution, if any.
    pub fn solution(self) -> Option<TwoClassSolution> {
        match self {
            TwoClassOutcome::Degenerate => None,
            TwoClassOutcome::Solved(solution) => Some(solution),
        }
    }
}

/// Runs the two-class trick on a `rows x classes` table in which at most two
/// columns have samples.
pub fn two_class_trick(counts: ArrayView2<'_, f64>, scorer: &Scorer) -> Result<TwoClassOutcome> {
    let populated: Vec<usize> = (0..counts.ncols())
        .filter(|&c| counts.column(c).sum() > 0.0)
        .collect();
    if populated.len() > 2 {
        return Err(SplitError::invalid_parameter(
            "counts",
            format!("{} populated classes", populated.len()),
            "the two-class trick needs at most two classes with samples",
        ));
    }
    if populated.len() < 2 {
        return Ok(TwoClassOutcome::Degenerate);
    }
    let (first, second) = (populated[0], populated[1]);

    let mut rows: Vec<(usize, f64, f64)> = (0..counts.nrows())
        .map(|r| (r, counts[[r, first]], counts[[r, second]]))
        .filter(|&(_, a, b)| a + b > 0.0)
        .collect();
    if rows.len() < 2 {
        return Ok(TwoClassOutcome::Degenerate);
    }

    // ascending frequency of the second class, ties by row index
    rows.sort_by(|x, y| {
        let fx = x.2 / (x.1 + x.2);
        let fy = y.2 / (y.1 + y.2);
        fx.total_cmp(&fy).then(x.0.cmp(&y.0))
    });

    let impurity = scorer.impurity();
    let policy = scorer.policy();
    let mut left = ClassTally::new(impurity, 2);
    let mut right = ClassTally::new(impurity, 2);
    for &(_, a, b) in &rows {
        right.add(0, a);
        right.add(1, b);
    }
    let parent_impurity = right.impurity();

    let mut best: Option<(usize, f64)> = None;
    for (k, &(_, a, b)) in rows.iter().enumerate().take(rows.len() - 1) {
        left.add(0, a);
        left.add(1, b);
        right.add(0, -a);
        right.add(1, -b);

        if let Some(value) = scorer.score(parent_impurity, &left, &right) {
            let improves = match best {
                None => true,
                Some((_, incumbent)) => policy.prefers(value, incumbent),
            };
            if improves {
                best = Some((k, value));
            }
        }
    }

    let Some((cut, objective_value)) = best else {
        return Ok(TwoClassOutcome::Degenerate);
    };

    let mut left_rows: Vec<usize> = rows[..=cut].iter().map(|r| r.0).collect();
    left_rows.sort_unstable();
    let right_rows = (0..counts.nrows())
        .filter(|r| left_rows.binary_search(r).is_err())
        .collect();

    Ok(TwoClassOutcome::Solved(TwoClassSolution {
        left: left_rows,
        right: right_rows,
        objective_value,
    }))
}
