//! Principal-component ordering of values with an extended cut scan.
//!
//! Values whose class-probability vectors coincide (within a tolerance) are
//! merged into groups. Groups are ordered along the principal axis of the
//! weighted covariance of their probability vectors, and two families of
//! cuts over that order are scored: prefixes, and prefixes whose last
//! element is exchanged with one element of the suffix.

use crate::core::error::Result;
use crate::core::traits::{FinderContext, SplitFinder};
use crate::linalg::principal_eigenvector;
use crate::node::CompactTable;
use crate::split::impurity::ClassTally;
use crate::split::info::ScoredPartition;
use nalgebra::{DMatrix, DVector};

/// Rows of a compact table sharing one class-probability vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueGroup {
    /// Member rows, ascending
    pub rows: Vec<usize>,
    /// Summed class counts
    pub counts: Vec<f64>,
    /// Number of samples
    pub total: f64,
    /// Class probabilities of the first member
    pub probabilities: Vec<f64>,
}

/// Merges rows with equal class-probability vectors.
///
/// Rows are sorted lexicographically by probability vector and each row
/// joins the current group when every coordinate is within `tolerance` of
/// the group's representative. Empty rows are skipped.
pub fn group_values(table: &CompactTable, tolerance: f64) -> Vec<ValueGroup> {
    let num_classes = table.num_classes();
    let mut rows: Vec<(usize, Vec<f64>)> = (0..table.num_values())
        .filter(|&r| table.value_totals()[r] > 0.0)
        .map(|r| {
            let total = table.value_totals()[r];
            (r, table.row(r).iter().map(|&n| n / total).collect())
        })
        .collect();
    rows.sort_by(|a, b| {
        a.1.iter()
            .zip(&b.1)
            .map(|(x, y)| x.total_cmp(y))
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    let mut groups: Vec<ValueGroup> = Vec::new();
    for (row, probabilities) in rows {
        let joins = groups.last().is_some_and(|g| {
            g.probabilities
                .iter()
                .zip(&probabilities)
                .all(|(a, b)| (a - b).abs() <= tolerance)
        });
        if !joins {
            groups.push(ValueGroup {
                rows: Vec::new(),
                counts: vec![0.0; num_classes],
                total: 0.0,
                probabilities,
            });
        }
        if let Some(group) = groups.last_mut() {
            group.rows.push(row);
            for (acc, &n) in group.counts.iter_mut().zip(table.row(row).iter()) {
                *acc += n;
            }
            group.total += table.value_totals()[row];
        }
    }
    for group in &mut groups {
        group.rows.sort_unstable();
    }
    groups
}

/// Orders groups by their projection on the principal axis of
/// `sum_g n_g (p_g - p) (p_g - p)^T / N`, ties by position.
///
/// When the decomposition fails, groups are ordered by the probability of
/// the most frequent class instead.
pub fn principal_order(groups: &[ValueGroup]) -> Vec<usize> {
    let num_classes = groups.first().map_or(0, |g| g.probabilities.len());
    let total: f64 = groups.iter().map(|g| g.total).sum();
    let mut order: Vec<usize> = (0..groups.len()).collect();
    if num_classes == 0 || total <= 0.0 {
        return order;
    }

    let mut mean = DVector::<f64>::zeros(num_classes);
    for g in groups {
        for (c, &n) in g.counts.iter().enumerate() {
            mean[c] += n / total;
        }
    }
    let mut covariance = DMatrix::<f64>::zeros(num_classes, num_classes);
    for g in groups {
        let deviation = DVector::from_column_slice(&g.probabilities) - &mean;
        covariance += (&deviation * deviation.transpose()) * (g.total / total);
    }

    let keys: Vec<f64> = match principal_eigenvector(&covariance) {
        Some(axis) => groups
            .iter()
            .map(|g| DVector::from_column_slice(&g.probabilities).dot(&axis))
            .collect(),
        None => {
            log::warn!("principal axis unavailable, ordering groups by the majority class");
            let majority = (0..num_classes)
                .max_by(|&a, &b| mean[a].total_cmp(&mean[b]).then(b.cmp(&a)))
                .unwrap_or(0);
            groups.iter().map(|g| g.probabilities[majority]).collect()
        }
    };
    order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]).then(a.cmp(&b)));
    order
}

/// PC-ext split finder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PcExtFinder;

impl PcExtFinder {
    fn rows_of(groups: &[ValueGroup], members: impl Iterator<Item = usize>) -> Vec<usize> {
        let mut rows: Vec<usize> = members.flat_map(|g| groups[g].rows.iter().copied()).collect();
        rows.sort_unstable();
        rows
    }
}

impl SplitFinder for PcExtFinder {
    fn name(&self) -> &'static str {
        "pc_ext"
    }

    fn find_split(&self, ctx: &FinderContext<'_>, table: &CompactTable) -> Result<Option<ScoredPartition>> {
        let num_rows = table.num_values();
        if num_rows < 2 || table.num_classes() < 2 {
            return Ok(None);
        }

        let groups = group_values(table, ctx.config.probability_tolerance);
        if groups.len() < 2 {
            // all values look alike: first value against the rest
            let left = vec![0];
            let right: Vec<usize> = (1..num_rows).collect();
            let value = ctx
                .scorer
                .score_counts(&table.side_counts(&left), &table.side_counts(&right));
            return Ok(value.map(|criterion_value| ScoredPartition {
                left,
                right,
                criterion_value,
            }));
        }

        let order = principal_order(&groups);
        let impurity = ctx.scorer.impurity();
        let policy = ctx.scorer.policy();
        let parent = ClassTally::from_counts(impurity, &table.class_totals().to_vec());
        let parent_impurity = parent.impurity();

        // (prefix length, exchanged suffix position) of the best cut
        let mut best: Option<(usize, Option<usize>, f64)> = None;
        let mut consider = |k: usize, exchanged: Option<usize>, left: &ClassTally| {
            let mut right = parent.clone();
            right.remove_row(left.counts());
            if let Some(value) = ctx.scorer.score(parent_impurity, left, &right) {
                if best.map_or(true, |(_, _, incumbent)| policy.prefers(value, incumbent)) {
                    best = Some((k, exchanged, value));
                }
            }
        };

        let g = order.len();
        let mut prefix = ClassTally::new(impurity, table.num_classes());
        for k in 1..g {
            // prefix without its last element
            let base = prefix.clone();
            prefix.add_row(&groups[order[k - 1]].counts);
            consider(k, None, &prefix);

            for m in k..g {
                let mut exchanged = base.clone();
                exchanged.add_row(&groups[order[m]].counts);
                consider(k, Some(m), &exchanged);
            }
        }

        let Some((k, exchanged, criterion_value)) = best else {
            return Ok(None);
        };
        let left_groups: Vec<usize> = match exchanged {
            None => order[..k].to_vec(),
            Some(m) => order[..k - 1].iter().copied().chain([order[m]]).collect(),
        };
        let left = Self::rows_of(&groups, left_groups.into_iter());
        Ok(Some(ScoredPartition::from_left(left, num_rows, criterion_value)))
    }
}
