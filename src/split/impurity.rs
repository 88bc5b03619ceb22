//! Node impurity measures and the incremental class tallies used by the
//! linear scans.
//!
//! Both measures are written in terms of a per-side sufficient statistic so a
//! scan can move samples (or whole attribute values) between the two sides and
//! re-evaluate in O(1) per touched class:
//!
//! ```text
//! Gini:    I = 1 - S / n^2          with S = sum_c n_c^2
//! Entropy: I = log2(n) - S / n      with S = sum_c n_c log2(n_c)
//! ```

use crate::core::types::{Objective, SelectionPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parent impurity below which a node is considered pure.
const PURE_NODE_IMPURITY: f64 = 1e-12;

/// Impurity measure of a class distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impurity {
    /// Gini index, `1 - sum p_c^2`
    Gini,
    /// Shannon entropy in bits, `-sum p_c log2 p_c`
    Entropy,
}

impl Impurity {
    /// Contribution of one class count to the sufficient statistic.
    #[inline]
    fn term(self, count: f64) -> f64 {
        match self {
            Impurity::Gini => count * count,
            Impurity::Entropy => {
                if count > 0.0 {
                    count * count.log2()
                } else {
                    0.0
                }
            }
        }
    }

    /// Impurity from the total and the sufficient statistic.
    #[inline]
    fn from_statistic(self, total: f64, statistic: f64) -> f64 {
        if total <= 0.0 {
            return 0.0;
        }
        match self {
            Impurity::Gini => 1.0 - statistic / (total * total),
            Impurity::Entropy => total.log2() - statistic / total,
        }
    }

    /// Impurity of a node with `total` samples distributed as `per_class_counts`.
    pub fn node_impurity(self, total: f64, per_class_counts: &[f64]) -> f64 {
        let statistic = per_class_counts.iter().map(|&c| self.term(c)).sum();
        self.from_statistic(total, statistic)
    }

    /// Sample-weighted average impurity of two children. An empty side
    /// contributes with zero weight.
    pub fn weighted_children_impurity(
        self,
        left_total: f64,
        left_counts: &[f64],
        right_total: f64,
        right_counts: &[f64],
    ) -> f64 {
        let total = left_total + right_total;
        if total <= 0.0 {
            return 0.0;
        }
        let left = if left_total > 0.0 {
            self.node_impurity(left_total, left_counts)
        } else {
            0.0
        };
        let right = if right_total > 0.0 {
            self.node_impurity(right_total, right_counts)
        } else {
            0.0
        };
        (left_total * left + right_total * right) / total
    }

    /// Impurity decrease obtained by splitting the node into the two children.
    pub fn gain(
        self,
        left_total: f64,
        left_counts: &[f64],
        right_total: f64,
        right_counts: &[f64],
    ) -> f64 {
        let total = left_total + right_total;
        let parent: Vec<f64> = left_counts
            .iter()
            .zip(right_counts)
            .map(|(l, r)| l + r)
            .collect();
        self.node_impurity(total, &parent)
            - self.weighted_children_impurity(left_total, left_counts, right_total, right_counts)
    }
}

impl fmt::Display for Impurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Impurity::Gini => write!(f, "gini"),
            Impurity::Entropy => write!(f, "entropy"),
        }
    }
}

/// Running class counts of one side of a candidate split.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassTally {
    impurity: Impurity,
    counts: Vec<f64>,
    total: f64,
    statistic: f64,
}

impl ClassTally {
    /// Empty tally over `num_classes` classes.
    pub fn new(impurity: Impurity, num_classes: usize) -> Self {
        ClassTally {
            impurity,
            counts: vec![0.0; num_classes],
            total: 0.0,
            statistic: 0.0,
        }
    }

    /// Tally initialized with the given counts.
    pub fn from_counts(impurity: Impurity, counts: &[f64]) -> Self {
        ClassTally {
            impurity,
            counts: counts.to_vec(),
            total: counts.iter().sum(),
            statistic: counts.iter().map(|&c| impurity.term(c)).sum(),
        }
    }

    /// Adds `amount` samples of `class` (negative amounts remove samples).
    #[inline]
    pub fn add(&mut self, class: usize, amount: f64) {
        let old = self.counts[class];
        let new = old + amount;
        self.statistic += self.impurity.term(new) - self.impurity.term(old);
        self.counts[class] = new;
        self.total += amount;
    }

    /// Adds a whole row of per-class counts.
    pub fn add_row<'r>(&mut self, row: impl IntoIterator<Item = &'r f64>) {
        for (class, &amount) in row.into_iter().enumerate() {
            if amount != 0.0 {
                self.add(class, amount);
            }
        }
    }

    /// Removes a whole row of per-class counts.
    pub fn remove_row<'r>(&mut self, row: impl IntoIterator<Item = &'r f64>) {
        for (class, &amount) in row.into_iter().enumerate() {
            if amount != 0.0 {
                self.add(class, -amount);
            }
        }
    }

    /// Number of samples on this side.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Per-class counts on this side.
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Impurity of this side.
    pub fn impurity(&self) -> f64 {
        self.impurity.from_statistic(self.total, self.statistic)
    }

    /// Whether the side holds no samples. Tolerates round-off from removals.
    pub fn is_empty(&self) -> bool {
        self.total <= 0.5
    }
}

/// Turns a pair of children into a criterion value.
///
/// The parent impurity is computed once per node and attribute; every
/// candidate partition is then scored against it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    impurity: Impurity,
    objective: Objective,
}

impl Scorer {
    /// Creates a scorer for the given impurity and reported objective.
    pub fn new(impurity: Impurity, objective: Objective) -> Self {
        Scorer {
            impurity,
            objective,
        }
    }

    /// The impurity measure.
    pub fn impurity(&self) -> Impurity {
        self.impurity
    }

    /// The reported objective.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Whether larger or smaller values win.
    pub fn policy(&self) -> SelectionPolicy {
        self.objective.policy()
    }

    /// Criterion value of splitting a node of impurity `parent_impurity` into
    /// `left` and `right`, or `None` when a side is empty or the node is pure
    /// and the objective is a relative gain.
    pub fn score(&self, parent_impurity: f64, left: &ClassTally, right: &ClassTally) -> Option<f64> {
        if left.is_empty() || right.is_empty() {
            return None;
        }
        let total = left.total() + right.total();
        let children =
            (left.total() * left.impurity() + right.total() * right.impurity()) / total;
        match self.objective {
            Objective::RelativeGain => {
                if parent_impurity <= PURE_NODE_IMPURITY {
                    None
                } else {
                    Some((parent_impurity - children) / parent_impurity)
                }
            }
            Objective::ChildrenImpurity => Some(children),
        }
    }

    /// Scores an explicit partition given as the two sides' class counts.
    pub fn score_counts(&self, left_counts: &[f64], right_counts: &[f64]) -> Option<f64> {
        let left = ClassTally::from_counts(self.impurity, left_counts);
        let right = ClassTally::from_counts(self.impurity, right_counts);
        let mut parent = left.clone();
        parent.add_row(right_counts);
        self.score(parent.impurity(), &left, &right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_gini_pure_node_is_zero() {
        assert_eq!(Impurity::Gini.node_impurity(10.0, &[10.0, 0.0, 0.0]), 0.0);
        assert!(Impurity::Gini.node_impurity(10.0, &[9.0, 1.0, 0.0]) > 0.0);
    }

    #[test]
    fn test_gini_uniform_distribution() {
        for classes in 2..8 {
            let counts = vec![5.0; classes];
            let total = 5.0 * classes as f64;
            assert_abs_diff_eq!(
                Impurity::Gini.node_impurity(total, &counts),
                1.0 - 1.0 / classes as f64,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_entropy_values() {
        assert_abs_diff_eq!(Impurity::Entropy.node_impurity(8.0, &[4.0, 4.0]), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            Impurity::Entropy.node_impurity(12.0, &[3.0, 3.0, 3.0, 3.0]),
            2.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(Impurity::Entropy.node_impurity(5.0, &[5.0, 0.0]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_children_with_empty_side() {
        let value = Impurity::Gini.weighted_children_impurity(0.0, &[0.0, 0.0], 4.0, &[2.0, 2.0]);
        assert_abs_diff_eq!(value, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_gain_perfect_separation() {
        let gain = Impurity::Gini.gain(10.0, &[10.0, 0.0], 10.0, &[0.0, 10.0]);
        assert_abs_diff_eq!(gain, 0.5, epsilon = 1e-12);
        let gain = Impurity::Entropy.gain(10.0, &[10.0, 0.0], 10.0, &[0.0, 10.0]);
        assert_abs_diff_eq!(gain, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tally_matches_direct_computation() {
        for impurity in [Impurity::Gini, Impurity::Entropy] {
            let mut tally = ClassTally::new(impurity, 3);
            tally.add_row(&[3.0, 1.0, 0.0]);
            tally.add(2, 4.0);
            tally.add(0, -1.0);
            let direct = impurity.node_impurity(7.0, &[2.0, 1.0, 4.0]);
            assert_abs_diff_eq!(tally.impurity(), direct, epsilon = 1e-12);
            assert_abs_diff_eq!(tally.total(), 7.0);

            tally.remove_row(&[2.0, 1.0, 4.0]);
            assert!(tally.is_empty());
            assert_abs_diff_eq!(tally.impurity(), 0.0);
        }
    }

    #[test]
    fn test_scorer_relative_gain() {
        let scorer = Scorer::new(Impurity::Gini, Objective::RelativeGain);
        let value = scorer.score_counts(&[10.0, 0.0], &[0.0, 10.0]).unwrap();
        assert_abs_diff_eq!(value, 1.0, epsilon = 1e-12);

        let value = scorer.score_counts(&[2.0, 4.0], &[1.0, 2.0]).unwrap();
        assert_abs_diff_eq!(value, 0.0, epsilon = 1e-12);

        assert!(scorer.score_counts(&[0.0, 0.0], &[3.0, 2.0]).is_none());
        assert!(scorer.score_counts(&[3.0, 0.0], &[2.0, 0.0]).is_none());
    }

    #[test]
    fn test_scorer_children_impurity() {
        let scorer = Scorer::new(Impurity::Gini, Objective::ChildrenImpurity);
        assert_eq!(scorer.policy(), SelectionPolicy::Minimize);
        let value = scorer.score_counts(&[2.0, 2.0], &[4.0, 0.0]).unwrap();
        assert_abs_diff_eq!(value, 0.25, epsilon = 1e-12);
    }
}
