//! Split search: impurity measures and the partition algorithms.
//!
//! Nominal attributes are handled by a [`SplitFinder`](crate::core::traits::SplitFinder):
//!
//! - [`superclass`]: Twoing, largest class alone, hypercube cover, all built
//!   on the exact [`two_class`] trick
//! - [`max_cut`]: Goemans-Williamson and local-search Max-Cut
//! - [`pc_ext`]: principal-component ordering with extended cuts
//!
//! Numeric attributes always use the sorted threshold scan in [`numeric`].

pub mod impurity;
pub mod info;
pub mod max_cut;
pub mod numeric;
pub mod pc_ext;
pub mod superclass;
pub mod two_class;

pub use impurity::{ClassTally, Impurity, Scorer};
pub use info::{ScoredPartition, Split, SplitValues};
pub use max_cut::{MaxCutFinder, MaxCutStrategy, MixingMethodSolver, SdpSolver, WeightLaw};
pub use numeric::{best_threshold, NumericThreshold};
pub use pc_ext::PcExtFinder;
pub use superclass::{HypercubeCoverFinder, LargestClassAloneFinder, TwoingFinder};
pub use two_class::{two_class_trick, TwoClassOutcome, TwoClassSolution};
