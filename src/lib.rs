//! # split-criteria
//!
//! Split criteria for the nodes of a classification decision tree.
//!
//! Given the statistics of one node (a contingency table of value × class
//! counts for every nominal attribute, raw values for numeric ones), a
//! criterion picks the attribute to split on, partitions its values in two
//! and reports a criterion value.
//!
//! ## Components
//!
//! - **Impurity**: Gini and entropy with O(1) incremental tallies
//!   ([`split::impurity`]).
//! - **Two-class trick**: exact binary partition for two (super)classes,
//!   the base of Twoing, largest-class-alone and hypercube cover
//!   ([`split::two_class`], [`split::superclass`]).
//! - **Max-Cut**: weighted value graph, semidefinite relaxation, randomized
//!   rounding and local search ([`split::max_cut`]).
//! - **PC-ext**: principal-component ordering with extended cuts
//!   ([`split::pc_ext`]).
//! - **Conditional inference**: permutation-test ranking of attributes before
//!   split search ([`ranking`]).
//!
//! A [`Criterion`] composes an attribute ranker with a split finder; the
//! eighteen presets are enumerated by [`CriterionKind`].
//!
//! ## Quick Start
//!
//! ```rust
//! use split_criteria::{Criterion, CriterionConfig, CriterionKind, Dataset, TreeNode};
//! use ndarray::array;
//!
//! # fn main() -> split_criteria::Result<()> {
//! // one nominal attribute with two values, two classes
//! let samples = array![[0.0], [0.0], [1.0], [1.0]];
//! let dataset = Dataset::new(samples, vec![0, 0, 1, 1], 2)?;
//! let node = TreeNode::from_dataset(&dataset, vec![0, 1, 2, 3], vec![true], vec![false], &[2])?;
//!
//! let config = CriterionConfig::builder().random_seed(42).build()?;
//! let criterion = Criterion::from_kind(CriterionKind::GwSquaredGini, config)?;
//! let split = criterion.select_best_attribute_and_split(&node)?;
//!
//! assert_eq!(split.attrib_index(), Some(0));
//! assert!((split.criterion_value() - 1.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through the `log` facade. Call [`init_logging`] (or
//! install any other logger) to see them; `RUST_LOG=split_criteria=debug`
//! shows the attribute rankings and chosen splits.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_debug_implementations, rust_2018_idioms, non_snake_case, non_upper_case_globals)]

pub mod config;
pub mod core;
pub mod criterion;
pub mod linalg;
pub mod node;
pub mod ranking;
pub mod split;

pub use crate::core::{
    error::{Result, SplitError},
    traits::{AttributeRanker, FinderContext, SplitFinder},
    types::*,
};

pub use config::{ConfigSource, ConfigValidator, CriterionConfig, CriterionConfigBuilder};

pub use criterion::{Criterion, CriterionKind, CriterionSpec, FinderKind, RankerKind};

pub use node::{CompactTable, ContingencyTable, Dataset, TreeNode};

pub use ranking::{IdentityRanker, PermutationTestRanker, Ranking, StatisticMode};

pub use split::{Impurity, Scorer, Split, SplitValues};

pub use crate::core::constants::SPLIT_CRITERIA_VERSION as VERSION;

/// Installs `env_logger` as the global logger, defaulting to the `info`
/// level when `RUST_LOG` is unset. Later calls, or calls after another
/// logger was installed, do nothing.
pub fn init_logging() {
    crate::core::initialize_logging()
}
