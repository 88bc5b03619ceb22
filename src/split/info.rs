//! The split record returned to the tree driver.

use crate::core::types::{AttributeIndex, SelectionPolicy, ValueIndex};
use std::collections::BTreeSet;
use std::fmt;

/// How the samples of a node are routed by a split.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitValues {
    /// No split
    None,
    /// Two disjoint, non-empty sets of nominal values
    Nominal {
        left: BTreeSet<ValueIndex>,
        right: BTreeSet<ValueIndex>,
    },
    /// Samples with value `<= last_left_value` go left
    Threshold {
        last_left_value: f64,
        first_right_value: f64,
    },
}

/// Outcome of evaluating a node: the chosen attribute and partition, or the
/// empty split when nothing can be split.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    attrib_index: Option<AttributeIndex>,
    splits_values: SplitValues,
    criterion_value: f64,
}

impl Split {
    /// The split reporting that no attribute can be split.
    pub fn empty() -> Self {
        Split {
            attrib_index: None,
            splits_values: SplitValues::None,
            criterion_value: f64::NEG_INFINITY,
        }
    }

    /// Split of a nominal attribute into two value sets.
    pub fn nominal(
        attribute: AttributeIndex,
        left: BTreeSet<ValueIndex>,
        right: BTreeSet<ValueIndex>,
        criterion_value: f64,
    ) -> Self {
        Split {
            attrib_index: Some(attribute),
            splits_values: SplitValues::Nominal { left, right },
            criterion_value,
        }
    }

    /// Threshold split of a numeric attribute.
    pub fn threshold(
        attribute: AttributeIndex,
        last_left_value: f64,
        first_right_value: f64,
        criterion_value: f64,
    ) -> Self {
        Split {
            attrib_index: Some(attribute),
            splits_values: SplitValues::Threshold {
                last_left_value,
                first_right_value,
            },
            criterion_value,
        }
    }

    /// Chosen attribute, `None` for the empty split.
    pub fn attrib_index(&self) -> Option<AttributeIndex> {
        self.attrib_index
    }

    /// Routing of the samples.
    pub fn splits_values(&self) -> &SplitValues {
        &self.splits_values
    }

    /// Criterion value, `-inf` for the empty split.
    pub fn criterion_value(&self) -> f64 {
        self.criterion_value
    }

    /// Whether this is an actual split.
    pub fn is_valid(&self) -> bool {
        self.attrib_index.is_some()
    }

    /// Nominal value sets, if this is a nominal split.
    pub fn nominal_sides(&self) -> Option<(&BTreeSet<ValueIndex>, &BTreeSet<ValueIndex>)> {
        match &self.splits_values {
            SplitValues::Nominal { left, right } => Some((left, right)),
            _ => None,
        }
    }

    /// Side taken by a sample whose value of the split attribute is `value`:
    /// `Some(true)` for left, `None` for the empty split or an unseen value.
    pub fn goes_left(&self, value: f64) -> Option<bool> {
        match &self.splits_values {
            SplitValues::None => None,
            SplitValues::Threshold {
                last_left_value, ..
            } => Some(value <= *last_left_value),
            SplitValues::Nominal { left, right } => {
                if !(value >= 0.0 && value.fract() == 0.0) {
                    return None;
                }
                let index = value as ValueIndex;
                if left.contains(&index) {
                    Some(true)
                } else if right.contains(&index) {
                    Some(false)
                } else {
                    None
                }
            }
        }
    }

    /// Whether this split beats `other` under `policy`. A valid split always
    /// beats the empty one; equal values keep the incumbent.
    pub fn is_better_than(&self, other: &Split, policy: SelectionPolicy) -> bool {
        match (self.is_valid(), other.is_valid()) {
            (false, _) => false,
            (true, false) => true,
            (true, true) => policy.prefers(self.criterion_value, other.criterion_value),
        }
    }
}

impl Default for Split {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.attrib_index, &self.splits_values) {
            (Some(attribute), SplitValues::Nominal { left, right }) => write!(
                f,
                "attribute {} {:?} | {:?} ({:.6})",
                attribute, left, right, self.criterion_value
            ),
            (
                Some(attribute),
                SplitValues::Threshold {
                    last_left_value,
                    first_right_value,
                },
            ) => write!(
                f,
                "attribute {} <= {} < {} ({:.6})",
                attribute, last_left_value, first_right_value, self.criterion_value
            ),
            _ => write!(f, "no split"),
        }
    }
}

/// A binary partition of the rows of a compact table with its criterion
/// value, as produced by a split finder.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPartition {
    /// Rows sent left, ascending
    pub left: Vec<usize>,
    /// Rows sent right, ascending
    pub right: Vec<usize>,
    /// Criterion value of the partition
    pub criterion_value: f64,
}

impl ScoredPartition {
    /// Builds a partition from a side assignment (`true` is left).
    pub fn from_sides(sides: &[bool], criterion_value: f64) -> Self {
        let (left, right): (Vec<usize>, Vec<usize>) = (0..sides.len()).partition(|&i| sides[i]);
        ScoredPartition {
            left,
            right,
            criterion_value,
        }
    }

    /// Builds a partition from the left rows out of `num_rows`.
    pub fn from_left(mut left: Vec<usize>, num_rows: usize, criterion_value: f64) -> Self {
        left.sort_unstable();
        left.dedup();
        let right = (0..num_rows).filter(|r| left.binary_search(r).is_err()).collect();
        ScoredPartition {
            left,
            right,
            criterion_value,
        }
    }

    /// Whether both sides hold at least one row.
    pub fn is_proper(&self) -> bool {
        !self.left.is_empty() && !self.right.is_empty()
    }
}
