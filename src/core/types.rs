//! Core data types shared by the split criteria.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an attribute (column) of the dataset.
pub type AttributeIndex = usize;

/// Index of a nominal attribute value, `0..V`.
pub type ValueIndex = usize;

/// Index of a class label, `0..C`.
pub type ClassIndex = usize;

/// Sample count stored in contingency tables.
pub type Count = u64;

/// Whether larger or smaller criterion values are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Larger criterion values win
    Maximize,
    /// Smaller criterion values win
    Minimize,
}

impl SelectionPolicy {
    /// Returns true when `candidate` is strictly better than `incumbent`.
    pub fn prefers(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            SelectionPolicy::Maximize => candidate > incumbent,
            SelectionPolicy::Minimize => candidate < incumbent,
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::Maximize => write!(f, "maximize"),
            SelectionPolicy::Minimize => write!(f, "minimize"),
        }
    }
}

/// The quantity reported as a split's criterion value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Fraction of the node impurity removed by the split (maximized).
    RelativeGain,
    /// Sample-weighted impurity of the two children (minimized).
    ChildrenImpurity,
}

impl Objective {
    /// Selection policy matching this objective.
    pub fn policy(self) -> SelectionPolicy {
        match self {
            Objective::RelativeGain => SelectionPolicy::Maximize,
            Objective::ChildrenImpurity => SelectionPolicy::Minimize,
        }
    }
}

impl Default for Objective {
    fn default() -> Self {
        Objective::RelativeGain
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Objective::RelativeGain => write!(f, "relative_gain"),
            Objective::ChildrenImpurity => write!(f, "children_impurity"),
        }
    }
}

/// Kind of an attribute at a node, as flagged by the tree driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Nominal attribute evaluated through its contingency table
    Nominal,
    /// Ordered attribute evaluated from raw `(value, class)` pairs
    Numeric,
    /// Not usable at this node
    Invalid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_prefers() {
        assert!(SelectionPolicy::Maximize.prefers(1.0, 0.5));
        assert!(!SelectionPolicy::Maximize.prefers(0.5, 0.5));
        assert!(SelectionPolicy::Minimize.prefers(0.2, 0.5));
        assert!(!SelectionPolicy::Minimize.prefers(0.5, 0.5));
    }

    #[test]
    fn test_objective_policy() {
        assert_eq!(Objective::default(), Objective::RelativeGain);
        assert_eq!(Objective::RelativeGain.policy(), SelectionPolicy::Maximize);
        assert_eq!(Objective::ChildrenImpurity.policy(), SelectionPolicy::Minimize);
        assert_eq!(Objective::ChildrenImpurity.to_string(), "children_impurity");
    }
}
