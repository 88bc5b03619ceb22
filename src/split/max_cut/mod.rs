//! Max-Cut partition of the values of a multi-class nominal attribute.
//!
//! Values become the vertices of a weighted graph ([`weights`]); a heavy
//! cut separates values with dissimilar class distributions. Two families
//! share the graph and the final [`local_search`]:
//!
//! - Goemans-Williamson: semidefinite relaxation ([`sdp`]), pivoted Cholesky
//!   of the relaxed matrix and one random hyperplane ([`rounding`]);
//! - local search only: seeded by [`local_search::greedy_partition`].

pub mod local_search;
pub mod rounding;
pub mod sdp;
pub mod weights;

pub use local_search::{cut_value, greedy_partition, LocalSearch, LocalSearchStats};
pub use rounding::hyperplane_rounding;
pub use sdp::{MixingMethodSolver, SdpSolver};
pub use weights::{build_weights, WeightLaw};

use crate::core::error::{Result, SplitError};
use crate::core::traits::{FinderContext, SplitFinder};
use crate::core::utils::Random;
use crate::linalg::pivoted_cholesky;
use crate::node::CompactTable;
use crate::split::info::ScoredPartition;
use crate::split::two_class::two_class_trick;
use std::sync::Arc;

/// How the starting cut is obtained before local search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaxCutStrategy {
    /// Relaxation, factorization and randomized rounding
    GoemansWilliamson,
    /// Greedy construction
    LocalSearch,
}

/// Split finder running the Max-Cut pipeline.
#[derive(Debug, Clone)]
pub struct MaxCutFinder {
    strategy: MaxCutStrategy,
    law: WeightLaw,
    solver: Arc<dyn SdpSolver>,
}

impl MaxCutFinder {
    /// Relaxation-based finder with the default solver.
    pub fn goemans_williamson(law: WeightLaw) -> Self {
        MaxCutFinder {
            strategy: MaxCutStrategy::GoemansWilliamson,
            law,
            solver: Arc::new(MixingMethodSolver),
        }
    }

    /// Greedy-plus-local-search finder.
    pub fn local_search(law: WeightLaw) -> Self {
        MaxCutFinder {
            strategy: MaxCutStrategy::LocalSearch,
            law,
            solver: Arc::new(MixingMethodSolver),
        }
    }

    /// Replaces the relaxation solver.
    pub fn with_solver(mut self, solver: Arc<dyn SdpSolver>) -> Self {
        self.solver = solver;
        self
    }

    /// Starting strategy.
    pub fn strategy(&self) -> MaxCutStrategy {
        self.strategy
    }

    /// Edge weight law.
    pub fn law(&self) -> WeightLaw {
        self.law
    }

    /// Starting cut of the relaxation family.
    fn rounded_cut(&self, ctx: &FinderContext<'_>, weights: &nalgebra::DMatrix<f64>) -> Result<Vec<bool>> {
        let attribute = ctx.attribute;
        let mut rng = Random::for_stream(ctx.config.random_seed, attribute as u64);
        let relaxed = self
            .solver
            .solve(weights, &mut rng, ctx.config)
            .map_err(|e| SplitError::solver(attribute, format!("{}: {}", self.solver.name(), e)))?;
        let cholesky = pivoted_cholesky(&relaxed, ctx.config.cholesky_tolerance)
            .map_err(|e| SplitError::solver(attribute, format!("factorization of the relaxation: {}", e)))?;
        log::trace!(
            "attribute {}: relaxation of rank {} over {} values ({})",
            attribute,
            cholesky.rank,
            weights.nrows(),
            self.solver.name()
        );
        Ok(hyperplane_rounding(&cholesky.factor, &mut rng))
    }
}

impl SplitFinder for MaxCutFinder {
    fn name(&self) -> &'static str {
        match (self.strategy, self.law) {
            (MaxCutStrategy::GoemansWilliamson, WeightLaw::SquaredGini) => "gw_squared_gini",
            (MaxCutStrategy::GoemansWilliamson, WeightLaw::ChiSquare) => "gw_chi_square",
            (MaxCutStrategy::LocalSearch, WeightLaw::SquaredGini) => "ls_squared_gini",
            (MaxCutStrategy::LocalSearch, WeightLaw::ChiSquare) => "ls_chi_square",
        }
    }

    fn find_split(&self, ctx: &FinderContext<'_>, table: &CompactTable) -> Result<Option<ScoredPartition>> {
        let num_values = table.num_values();
        if num_values < 2 || table.num_classes() < 2 {
            return Ok(None);
        }

        // two classes: the exact answer is cheap
        if table.num_classes() == 2 {
            return Ok(two_class_trick(table.counts(), &ctx.scorer)?
                .solution()
                .map(|s| ScoredPartition {
                    left: s.left,
                    right: s.right,
                    criterion_value: s.objective_value,
                }));
        }

        let sides = if num_values == 2 {
            vec![true, false]
        } else {
            let weights = build_weights(table, self.law);
            let mut sides = match self.strategy {
                MaxCutStrategy::GoemansWilliamson => self.rounded_cut(ctx, &weights)?,
                MaxCutStrategy::LocalSearch => greedy_partition(&weights),
            };
            let stats = LocalSearch::new(ctx.config.epsilon).refine(&weights, &mut sides);
            log::trace!(
                "attribute {}: local search applied {} switches and {} swaps, cut {:.6}",
                ctx.attribute,
                stats.single_switches,
                stats.pair_swaps,
                stats.cut_value
            );
            sides
        };

        let partition = ScoredPartition::from_sides(&sides, 0.0);
        let left_counts = table.side_counts(&partition.left);
        let right_counts = table.side_counts(&partition.right);
        Ok(ctx
            .scorer
            .score_counts(&left_counts, &right_counts)
            .map(|criterion_value| ScoredPartition {
                criterion_value,
                ..partition
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CriterionConfig;
    use crate::core::error::SplitError;
    use crate::core::types::Objective;
    use crate::split::impurity::{Impurity, Scorer};
    use nalgebra::DMatrix;

    #[derive(Debug)]
    struct BrokenSolver;

    impl SdpSolver for BrokenSolver {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn solve(&self, _: &DMatrix<f64>, _: &mut Random, _: &CriterionConfig) -> Result<DMatrix<f64>> {
            Err(SplitError::numerical("diverged"))
        }
    }

    fn three_class_table() -> CompactTable {
        CompactTable::from_rows(&[
            vec![10.0, 0.0, 1.0],
            vec![0.0, 10.0, 0.0],
            vec![9.0, 1.0, 0.0],
            vec![1.0, 9.0, 1.0],
        ])
        .unwrap()
    }

    fn ctx(config: &CriterionConfig) -> FinderContext<'_> {
        FinderContext::new(3, Scorer::new(Impurity::Gini, Objective::RelativeGain), config)
    }

    #[test]
    fn test_both_families_separate_class_profiles() {
        let config = CriterionConfig {
            random_seed: Some(42),
            ..CriterionConfig::default()
        };
        let table = three_class_table();
        for finder in [
            MaxCutFinder::goemans_williamson(WeightLaw::SquaredGini),
            MaxCutFinder::goemans_williamson(WeightLaw::ChiSquare),
            MaxCutFinder::local_search(WeightLaw::SquaredGini),
            MaxCutFinder::local_search(WeightLaw::ChiSquare),
        ] {
            let best = finder.find_split(&ctx(&config), &table).unwrap().unwrap();
            let mut groups = [best.left.clone(), best.right.clone()];
            groups.sort();
            assert_eq!(groups, [vec![0, 2], vec![1, 3]], "{}", finder.name());
            assert!(best.criterion_value > 0.5);
        }
    }

    #[test]
    fn test_solver_failure_is_fatal() {
        let config = CriterionConfig::default();
        let finder = MaxCutFinder::goemans_williamson(WeightLaw::SquaredGini).with_solver(Arc::new(BrokenSolver));
        let err = finder.find_split(&ctx(&config), &three_class_table()).unwrap_err();
        match err {
            SplitError::Solver { attribute, message } => {
                assert_eq!(attribute, 3);
                assert!(message.starts_with("broken: "), "{}", message);
                assert!(message.contains("diverged"), "{}", message);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_two_values_are_split_directly() {
        let config = CriterionConfig::default();
        let table = CompactTable::from_rows(&[vec![3.0, 1.0, 0.0], vec![0.0, 1.0, 3.0]]).unwrap();
        let finder = MaxCutFinder::goemans_williamson(WeightLaw::ChiSquare).with_solver(Arc::new(BrokenSolver));
        let best = finder.find_split(&ctx(&config), &table).unwrap().unwrap();
        assert_eq!(best.left, vec![0]);
        assert_eq!(best.right, vec![1]);
    }

    #[test]
    fn test_two_classes_use_exact_search() {
        let config = CriterionConfig::default();
        let table = CompactTable::from_rows(&[vec![5.0, 0.0], vec![0.0, 5.0], vec![4.0, 1.0]]).unwrap();
        let finder = MaxCutFinder::goemans_williamson(WeightLaw::SquaredGini).with_solver(Arc::new(BrokenSolver));
        let best = finder.find_split(&ctx(&config), &table).unwrap().unwrap();
        assert_eq!(best.left, vec![0, 2]);
        assert_eq!(best.right, vec![1]);
    }
}
