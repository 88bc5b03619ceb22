//! Trait seams a criterion is composed from.
//!
//! A criterion is an [`AttributeRanker`] deciding which attributes are looked
//! at and in what order, plus a [`SplitFinder`] producing the binary
//! partition of a nominal attribute's values. Numeric attributes always go
//! through the sorted threshold scan and never reach a finder.

use crate::config::CriterionConfig;
use crate::core::error::Result;
use crate::core::types::AttributeIndex;
use crate::node::{CompactTable, TreeNode};
use crate::ranking::Ranking;
use crate::split::{ScoredPartition, Scorer};

use std::fmt::Debug;

/// Everything a split finder needs besides the table itself.
#[derive(Debug, Clone, Copy)]
pub struct FinderContext<'a> {
    /// Attribute being evaluated, used for error reporting and random streams
    pub attribute: AttributeIndex,
    /// Impurity and objective every candidate is scored with
    pub scorer: Scorer,
    /// Numerical tunables
    pub config: &'a CriterionConfig,
}

impl<'a> FinderContext<'a> {
    /// Creates a context for one attribute.
    pub fn new(attribute: AttributeIndex, scorer: Scorer, config: &'a CriterionConfig) -> Self {
        FinderContext {
            attribute,
            scorer,
            config,
        }
    }
}

/// Produces the binary partition of a nominal attribute's values.
pub trait SplitFinder: Send + Sync + Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Best partition of the rows of `table` found by this strategy, scored
    /// with `ctx.scorer`, or `None` when the attribute cannot be split.
    ///
    /// Row indices in the result refer to `table`; the caller maps them back
    /// to the attribute's original value indices.
    fn find_split(&self, ctx: &FinderContext<'_>, table: &CompactTable) -> Result<Option<ScoredPartition>>;
}

/// Decides which attributes of a node are evaluated and in which order.
pub trait AttributeRanker: Send + Sync + Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Ranks the valid attributes of `node`.
    fn rank(&self, node: &TreeNode<'_>, config: &CriterionConfig) -> Result<Ranking>;
}
