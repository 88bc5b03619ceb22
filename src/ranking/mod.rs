//! Attribute ranking ahead of split search.
//!
//! Plain criteria evaluate every valid attribute ([`IdentityRanker`]).
//! Conditional-inference criteria first order the attributes by the
//! significance of their association with the class ([`PermutationTestRanker`])
//! and split on the first one that yields a valid partition.

pub mod chi_square;
pub mod permutation;

use crate::config::CriterionConfig;
use crate::core::error::Result;
use crate::core::traits::AttributeRanker;
use crate::core::types::{AttributeIndex, AttributeKind};
use crate::node::TreeNode;
use rayon::prelude::*;
use std::fmt;

/// Outcome of one independence test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestStatistic {
    /// Test statistic
    pub statistic: f64,
    /// Degrees of freedom of its reference law
    pub degrees_of_freedom: usize,
    /// `1 - p-value`; higher is more significant, `-inf` is unusable
    pub score: f64,
}

impl TestStatistic {
    /// No evidence of association.
    pub fn no_power() -> Self {
        TestStatistic {
            statistic: 0.0,
            degrees_of_freedom: 0,
            score: 0.0,
        }
    }

    /// Numerically unusable attribute; ranked after every other one.
    pub fn unusable() -> Self {
        TestStatistic {
            statistic: f64::NEG_INFINITY,
            degrees_of_freedom: 0,
            score: f64::NEG_INFINITY,
        }
    }

    /// Whether the attribute may be split on.
    pub fn is_usable(&self) -> bool {
        self.score > f64::NEG_INFINITY
    }
}

/// Test outcome of one attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeRank {
    pub attribute: AttributeIndex,
    pub score: f64,
    pub statistic: f64,
    pub degrees_of_freedom: usize,
}

impl AttributeRank {
    fn new(attribute: AttributeIndex, test: TestStatistic) -> Self {
        AttributeRank {
            attribute,
            score: test.score,
            statistic: test.statistic,
            degrees_of_freedom: test.degrees_of_freedom,
        }
    }
}

/// Order in which a criterion evaluates attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum Ranking {
    /// Every valid attribute is evaluated and the best split wins.
    Unranked,
    /// Attributes by decreasing significance; the first valid split wins.
    Ordered(Vec<AttributeRank>),
}

impl Ranking {
    /// Attributes to try, in order. Unusable attributes are left out of an
    /// ordered ranking.
    pub fn candidates(&self, valid_attributes: &[AttributeIndex]) -> Vec<AttributeIndex> {
        match self {
            Ranking::Unranked => valid_attributes.to_vec(),
            Ranking::Ordered(ranks) => ranks
                .iter()
                .filter(|r| r.score > f64::NEG_INFINITY)
                .map(|r| r.attribute)
                .collect(),
        }
    }

    /// Whether the first valid split ends the search.
    pub fn is_ordered(&self) -> bool {
        matches!(self, Ranking::Ordered(_))
    }
}

/// Statistic used for the nominal attributes of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticMode {
    /// Linear statistic with its exact permutation covariance
    Exact,
    /// Pearson chi-square
    ChiSquare,
}

impl StatisticMode {
    /// Chi-square as soon as one valid nominal attribute has more than
    /// `threshold` non-empty (value, class) cells; the choice applies to the
    /// whole node.
    pub fn for_node(node: &TreeNode<'_>, threshold: usize) -> Result<Self> {
        let classes_seen = node.num_classes_seen();
        for attribute in node.valid_attributes() {
            if node.attribute_kind(attribute) != AttributeKind::Nominal {
                continue;
            }
            let values_seen = node.contingency_table(attribute)?.non_empty_values().len();
            if values_seen * classes_seen > threshold {
                log::debug!(
                    "attribute {} has a {}x{} table, node ranked with chi-square",
                    attribute,
                    values_seen,
                    classes_seen
                );
                return Ok(StatisticMode::ChiSquare);
            }
        }
        Ok(StatisticMode::Exact)
    }
}

impl fmt::Display for StatisticMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatisticMode::Exact => write!(f, "exact"),
            StatisticMode::ChiSquare => write!(f, "chi-square"),
        }
    }
}

/// Leaves the attribute order to the split search.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRanker;

impl AttributeRanker for IdentityRanker {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn rank(&self, _node: &TreeNode<'_>, _config: &CriterionConfig) -> Result<Ranking> {
        Ok(Ranking::Unranked)
    }
}

/// Conditional-inference ranking by permutation test.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermutationTestRanker;

impl PermutationTestRanker {
    /// Test outcome of one attribute at `node`.
    pub fn test_attribute(
        &self,
        node: &TreeNode<'_>,
        attribute: AttributeIndex,
        mode: StatisticMode,
        config: &CriterionConfig,
    ) -> Result<TestStatistic> {
        let outcome = match node.attribute_kind(attribute) {
            AttributeKind::Nominal => {
                let table = node.contingency_table(attribute)?.compact();
                match mode {
                    StatisticMode::Exact => permutation::nominal_statistic(&table, &config.pinv_tolerances),
                    StatisticMode::ChiSquare => Some(chi_square::pearson(&table)),
                }
            }
            AttributeKind::Numeric => {
                let pairs = node.numeric_pairs(attribute)?;
                permutation::numeric_statistic(&pairs, node.num_classes(), &config.pinv_tolerances)
            }
            AttributeKind::Invalid => return Ok(TestStatistic::unusable()),
        };

        Ok(outcome.unwrap_or_else(|| {
            log::warn!(
                "covariance of attribute {} could not be pseudo-inverted at any tolerance, attribute ranked last",
                attribute
            );
            TestStatistic::unusable()
        }))
    }
}

impl AttributeRanker for PermutationTestRanker {
    fn name(&self) -> &'static str {
        "permutation_test"
    }

    fn rank(&self, node: &TreeNode<'_>, config: &CriterionConfig) -> Result<Ranking> {
        let mode = StatisticMode::for_node(node, config.big_contingency_table_threshold)?;
        let attributes = node.valid_attributes();
        let test = |&attribute: &AttributeIndex| {
            self.test_attribute(node, attribute, mode, config)
                .map(|outcome| AttributeRank::new(attribute, outcome))
        };

        let mut ranks: Vec<AttributeRank> = if config.parallel {
            attributes.par_iter().map(test).collect::<Result<_>>()?
        } else {
            attributes.iter().map(test).collect::<Result<_>>()?
        };
        ranks.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(b.statistic.total_cmp(&a.statistic))
                .then(a.attribute.cmp(&b.attribute))
        });

        log::debug!(
            "{} attributes ranked ({} statistic), best {:?}",
            ranks.len(),
            mode,
            ranks.first().map(|r| (r.attribute, r.score))
        );
        Ok(Ranking::Ordered(ranks))
    }
}
