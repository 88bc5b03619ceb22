//! Pearson chi-square test of independence, used instead of the exact
//! linear statistic when a node carries a large contingency table.

use super::permutation::chi_square_cdf;
use super::TestStatistic;
use crate::node::CompactTable;

/// Pearson statistic of `table` with `(r - 1)(c - 1)` degrees of freedom.
///
/// Compact tables have no empty row or column, so every expected count is
/// positive; tables with fewer than two rows or columns score zero.
pub fn pearson(table: &CompactTable) -> TestStatistic {
    let (r, c) = (table.num_values(), table.num_classes());
    let n = table.total();
    if r < 2 || c < 2 || n <= 0.0 {
        return TestStatistic::no_power();
    }

    let value_totals = table.value_totals();
    let class_totals = table.class_totals();
    let mut statistic = 0.0;
    for ((v, k), &observed) in table.counts().indexed_iter() {
        let expected = value_totals[v] * class_totals[k] / n;
        if expected > 0.0 {
            let d = observed - expected;
            statistic += d * d / expected;
        }
    }

    let degrees_of_freedom = (r - 1) * (c - 1);
    TestStatistic {
        statistic,
        degrees_of_freedom,
        score: chi_square_cdf(statistic, degrees_of_freedom),
    }
}
