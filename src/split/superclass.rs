//! Finders that reduce a multi-class table to two superclasses.
//!
//! Each finder proposes bipartitions of the classes. For every proposal the
//! table is collapsed to two columns and solved exactly with the two-class
//! trick; the resulting value partition is then scored against the full
//! class distribution and the best one across proposals is kept.

use crate::core::error::Result;
use crate::core::traits::{FinderContext, SplitFinder};
use crate::node::CompactTable;
use crate::split::info::ScoredPartition;
use crate::split::two_class::two_class_trick;
use ndarray::Array2;
use std::collections::BTreeSet;

/// Collapses the classes of `table` into two columns. `in_second[c]` puts
/// class `c` in the second superclass.
pub fn collapse(table: &CompactTable, in_second: &[bool]) -> Array2<f64> {
    let mut collapsed = Array2::<f64>::zeros((table.num_values(), 2));
    for (v, row) in table.counts().outer_iter().enumerate() {
        for (c, &count) in row.iter().enumerate() {
            let column = usize::from(in_second[c]);
            collapsed[[v, column]] += count;
        }
    }
    collapsed
}

/// Solves every superclass proposal and keeps the best value partition under
/// the full multi-class criterion. Ties keep the earliest proposal.
pub fn best_over_superclasses<I>(
    ctx: &FinderContext<'_>,
    table: &CompactTable,
    proposals: I,
) -> Result<Option<ScoredPartition>>
where
    I: IntoIterator<Item = Vec<bool>>,
{
    let policy = ctx.scorer.policy();
    let mut best: Option<ScoredPartition> = None;
    let mut evaluated = 0usize;

    for in_second in proposals {
        evaluated += 1;
        let collapsed = collapse(table, &in_second);
        let Some(solution) = two_class_trick(collapsed.view(), &ctx.scorer)?.solution() else {
            continue;
        };
        let left_counts = table.side_counts(&solution.left);
        let right_counts = table.side_counts(&solution.right);
        let Some(value) = ctx.scorer.score_counts(&left_counts, &right_counts) else {
            continue;
        };
        let improves = best
            .as_ref()
            .map_or(true, |b| policy.prefers(value, b.criterion_value));
        if improves {
            best = Some(ScoredPartition {
                left: solution.left,
                right: solution.right,
                criterion_value: value,
            });
        }
    }

    log::trace!(
        "attribute {}: {} superclass proposals evaluated",
        ctx.attribute,
        evaluated
    );
    Ok(best)
}

/// Index of the class with the most samples, lowest index on ties.
fn largest_class(table: &CompactTable) -> Option<usize> {
    let totals = table.class_totals();
    (0..totals.len()).fold(None, |best, c| match best {
        Some(b) if totals[b] >= totals[c] => Some(b),
        _ => Some(c),
    })
}

fn largest_class_proposal(table: &CompactTable) -> Option<Vec<bool>> {
    let largest = largest_class(table)?;
    Some((0..table.num_classes()).map(|c| c == largest).collect())
}

/// Exhaustive search over all `2^(C-1) - 1` superclass bipartitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoingFinder;

impl SplitFinder for TwoingFinder {
    fn name(&self) -> &'static str {
        "twoing"
    }

    fn find_split(&self, ctx: &FinderContext<'_>, table: &CompactTable) -> Result<Option<ScoredPartition>> {
        let num_classes = table.num_classes();
        if num_classes < 2 || table.num_values() < 2 {
            return Ok(None);
        }
        let max = ctx.config.max_superclass_classes;
        if num_classes > max {
            log::warn!(
                "attribute {}: {} classes exceed the twoing limit of {}, attribute skipped",
                ctx.attribute,
                num_classes,
                max
            );
            return Ok(None);
        }

        // the last class always sits in the second superclass
        let last = num_classes - 1;
        let proposals = (1usize..(1 << last)).map(move |mask| {
            (0..num_classes)
                .map(|c| c == last || mask & (1 << c) == 0)
                .collect::<Vec<bool>>()
        });
        best_over_superclasses(ctx, table, proposals)
    }
}

/// The most frequent class against all the others.
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestClassAloneFinder;

impl SplitFinder for LargestClassAloneFinder {
    fn name(&self) -> &'static str {
        "largest_class_alone"
    }

    fn find_split(&self, ctx: &FinderContext<'_>, table: &CompactTable) -> Result<Option<ScoredPartition>> {
        if table.num_classes() < 2 || table.num_values() < 2 {
            return Ok(None);
        }
        best_over_superclasses(ctx, table, largest_class_proposal(table))
    }
}

/// One proposal per value: the classes over-represented among its samples.
///
/// Value `v` proposes `{c : p(c | v) > p(c)}` against the rest, i.e. the
/// vertex of the class-probability hypercube it lies closest to. Duplicate
/// and trivial proposals are dropped; when no value yields a proper
/// bipartition the largest class is put alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct HypercubeCoverFinder;

impl HypercubeCoverFinder {
    /// Distinct non-trivial proposals, in order of first appearance.
    pub fn proposals(table: &CompactTable) -> Vec<Vec<bool>> {
        let total = table.total();
        if total <= 0.0 {
            return Vec::new();
        }
        let class_totals = table.class_totals();
        let value_totals = table.value_totals();
        let mut seen = BTreeSet::new();
        let mut proposals = Vec::new();

        for (v, row) in table.counts().outer_iter().enumerate() {
            let n_v = value_totals[v];
            if n_v <= 0.0 {
                continue;
            }
            let over: Vec<bool> = row
                .iter()
                .zip(class_totals.iter())
                .map(|(&n_vc, &n_c)| n_vc / n_v > n_c / total)
                .collect();
            let size = over.iter().filter(|&&b| b).count();
            if size == 0 || size == over.len() {
                continue;
            }
            if seen.insert(over.clone()) {
                proposals.push(over);
            }
        }
        proposals
    }
}

impl SplitFinder for HypercubeCoverFinder {
    fn name(&self) -> &'static str {
        "hypercube_cover"
    }

    fn find_split(&self, ctx: &FinderContext<'_>, table: &CompactTable) -> Result<Option<ScoredPartition>> {
        if table.num_classes() < 2 || table.num_values() < 2 {
            return Ok(None);
        }
        let mut proposals = Self::proposals(table);
        if proposals.is_empty() {
            proposals.extend(largest_class_proposal(table));
        }
        best_over_superclasses(ctx, table, proposals)
    }
}
