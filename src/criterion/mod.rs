//! Split criteria assembled from a ranker and a split finder.
//!
//! A [`Criterion`] answers one question for a tree node: which attribute to
//! split on, how, and with which criterion value. Its behaviour is fixed by
//! a [`CriterionSpec`]; the eighteen shipped presets are listed in
//! [`CriterionKind`].

pub mod kind;

pub use kind::{CriterionKind, CriterionSpec, FinderKind, RankerKind};

use crate::config::{ConfigValidator, CriterionConfig};
use crate::core::error::{Result, SplitError};
use crate::core::traits::{AttributeRanker, FinderContext, SplitFinder};
use crate::core::types::{AttributeIndex, AttributeKind};
use crate::node::TreeNode;
use crate::ranking::{IdentityRanker, PermutationTestRanker};
use crate::split::{
    best_threshold, HypercubeCoverFinder, LargestClassAloneFinder, MaxCutFinder, MaxCutStrategy, PcExtFinder,
    Scorer, SdpSolver, Split, TwoingFinder, WeightLaw,
};
use rayon::prelude::*;
use std::sync::Arc;

/// A configured split criterion.
#[derive(Debug)]
pub struct Criterion {
    name: String,
    spec: CriterionSpec,
    ranker: Box<dyn AttributeRanker>,
    finder: Box<dyn SplitFinder>,
    scorer: Scorer,
    config: CriterionConfig,
    pool: Option<rayon::ThreadPool>,
}

impl Criterion {
    /// Assembles a criterion, validating `config` first.
    pub fn new(spec: CriterionSpec, config: CriterionConfig) -> Result<Self> {
        config.validate()?;
        Self::validator(&spec).check(&config)?;

        let ranker: Box<dyn AttributeRanker> = match spec.ranker {
            RankerKind::Identity => Box::new(IdentityRanker),
            RankerKind::PermutationTest => Box::new(PermutationTestRanker),
        };
        let finder: Box<dyn SplitFinder> = match spec.finder {
            FinderKind::Twoing => Box::new(TwoingFinder),
            FinderKind::LargestClassAlone => Box::new(LargestClassAloneFinder),
            FinderKind::HypercubeCover => Box::new(HypercubeCoverFinder),
            FinderKind::PcExt => Box::new(PcExtFinder),
            FinderKind::MaxCut { strategy, law } => Box::new(Self::max_cut_finder(strategy, law)),
        };

        let pool = if config.parallel && config.num_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.num_threads)
                .thread_name(|i| format!("split-criteria-{}", i))
                .build()
                .map_err(|e| SplitError::config(format!("Failed to create thread pool: {}", e)))?;
            Some(pool)
        } else {
            None
        };

        let name = format!("{}/{}/{}", ranker.name(), finder.name(), spec.impurity);
        log::debug!(
            "criterion {} ({} objective, {} threads)",
            name,
            config.objective,
            if config.parallel { config.effective_num_threads() } else { 1 }
        );

        Ok(Criterion {
            name,
            spec,
            ranker,
            finder,
            scorer: Scorer::new(spec.impurity, config.objective),
            config,
            pool,
        })
    }

    /// One of the shipped presets.
    pub fn from_kind(kind: CriterionKind, config: CriterionConfig) -> Result<Self> {
        let mut criterion = Self::new(kind.spec(), config)?;
        criterion.name = kind.name().to_string();
        Ok(criterion)
    }

    /// Replaces the relaxation solver of a Max-Cut criterion; other criteria
    /// are returned unchanged.
    pub fn with_sdp_solver(mut self, solver: Arc<dyn SdpSolver>) -> Self {
        if let FinderKind::MaxCut { strategy, law } = self.spec.finder {
            self.finder = Box::new(Self::max_cut_finder(strategy, law).with_solver(solver));
        }
        self
    }

    /// Advisory checks relevant to `spec`; the seed only matters when a
    /// random hyperplane is drawn.
    fn validator(spec: &CriterionSpec) -> ConfigValidator {
        let randomized = matches!(
            spec.finder,
            FinderKind::MaxCut {
                strategy: MaxCutStrategy::GoemansWilliamson,
                ..
            }
        );
        if randomized {
            ConfigValidator::new()
        } else {
            ConfigValidator::new().without_rule("reproducibility")
        }
    }

    fn max_cut_finder(strategy: MaxCutStrategy, law: WeightLaw) -> MaxCutFinder {
        match strategy {
            MaxCutStrategy::GoemansWilliamson => MaxCutFinder::goemans_williamson(law),
            MaxCutStrategy::LocalSearch => MaxCutFinder::local_search(law),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> CriterionSpec {
        self.spec
    }

    pub fn config(&self) -> &CriterionConfig {
        &self.config
    }

    pub fn scorer(&self) -> Scorer {
        self.scorer
    }

    /// Runs `op` on the criterion's pool, or on the global one.
    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Best split of one attribute, or the empty split when it cannot be
    /// split.
    pub fn evaluate_attribute(&self, node: &TreeNode<'_>, attribute: AttributeIndex) -> Result<Split> {
        match node.attribute_kind(attribute) {
            AttributeKind::Numeric => {
                let mut pairs = node.numeric_pairs(attribute)?;
                Ok(best_threshold(&mut pairs, node.num_classes(), &self.scorer).map_or_else(Split::empty, |t| {
                    Split::threshold(attribute, t.last_left_value, t.first_right_value, t.criterion_value)
                }))
            }
            AttributeKind::Nominal => {
                let table = node.contingency_table(attribute)?.compact();
                if table.num_values() < 2 {
                    return Ok(Split::empty());
                }
                let ctx = FinderContext::new(attribute, self.scorer, &self.config);
                match self.finder.find_split(&ctx, &table)? {
                    Some(partition) if partition.is_proper() => Ok(Split::nominal(
                        attribute,
                        table.to_original_values(&partition.left),
                        table.to_original_values(&partition.right),
                        partition.criterion_value,
                    )),
                    _ => Ok(Split::empty()),
                }
            }
            AttributeKind::Invalid => Ok(Split::empty()),
        }
    }

    fn evaluate_or_abort(&self, node: &TreeNode<'_>, attribute: AttributeIndex) -> Result<Split> {
        self.evaluate_attribute(node, attribute).map_err(|e| {
            log::error!("{}: attribute {} aborted the node ({}): {}", self.name, attribute, e.category(), e);
            e
        })
    }

    /// Chooses the attribute and partition for `node`.
    ///
    /// Without ranking every valid attribute is evaluated and the best value
    /// under the objective wins, the lowest attribute index on ties. With a
    /// permutation-test ranking attributes are visited by decreasing
    /// significance and the first valid split is returned. When nothing can
    /// be split the empty split is returned. Solver failures abort the call.
    pub fn select_best_attribute_and_split(&self, node: &TreeNode<'_>) -> Result<Split> {
        let ranking = self.install(|| self.ranker.rank(node, &self.config))?;
        let candidates = ranking.candidates(&node.valid_attributes());

        if ranking.is_ordered() {
            for attribute in candidates {
                let split = self.evaluate_or_abort(node, attribute)?;
                if split.is_valid() {
                    log::debug!("{}: {}", self.name, split);
                    return Ok(split);
                }
                log::debug!("{}: attribute {} ranked but not splittable", self.name, attribute);
            }
            return Ok(Split::empty());
        }

        let splits: Vec<Split> = self.install(|| {
            if self.config.parallel {
                candidates
                    .par_iter()
                    .map(|&attribute| self.evaluate_or_abort(node, attribute))
                    .collect::<Result<Vec<_>>>()
            } else {
                candidates
                    .iter()
                    .map(|&attribute| self.evaluate_or_abort(node, attribute))
                    .collect::<Result<Vec<_>>>()
            }
        })?;

        let policy = self.scorer.policy();
        let best = splits.into_iter().fold(Split::empty(), |best, split| {
            if split.is_better_than(&best, policy) {
                split
            } else {
                best
            }
        });
        log::debug!("{}: {}", self.name, best);
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Objective;
    use crate::core::utils::Random;
    use crate::node::{ContingencyTable, Dataset};
    use crate::split::{Impurity, SplitValues};
    use approx::assert_abs_diff_eq;
    use nalgebra::DMatrix;
    use ndarray::{array, Array2};
    use std::collections::BTreeSet;

    fn seeded() -> CriterionConfig {
        CriterionConfig {
            random_seed: Some(7),
            parallel: false,
            ..CriterionConfig::default()
        }
    }

    /// Node over a single nominal attribute built from its table.
    fn nominal_node<'a>(data: &'a Dataset, counts: Array2<u64>) -> TreeNode<'a> {
        TreeNode::new(
            data,
            (0..data.num_samples()).collect(),
            vec![true],
            vec![false],
            vec![Some(ContingencyTable::from_counts(counts))],
        )
        .unwrap()
    }

    /// Dataset whose class totals match `class_totals`; attribute values are
    /// irrelevant because the node gets its table directly.
    fn dataset_with_classes(class_totals: &[usize]) -> Dataset {
        let classes: Vec<usize> = class_totals
            .iter()
            .enumerate()
            .flat_map(|(c, &n)| std::iter::repeat(c).take(n))
            .collect();
        Dataset::new(Array2::zeros((classes.len(), 1)), classes, class_totals.len()).unwrap()
    }

    #[test]
    fn test_perfect_separation_under_every_gini_criterion() {
        let data = dataset_with_classes(&[10, 10]);
        let node = nominal_node(&data, array![[10, 0], [0, 10]]);
        for kind in CriterionKind::all() {
            if kind.spec().impurity != Impurity::Gini {
                continue;
            }
            let criterion = Criterion::from_kind(kind, seeded()).unwrap();
            let split = criterion.select_best_attribute_and_split(&node).unwrap();
            let (left, right) = split.nominal_sides().unwrap();
            let mut sides = [left.clone(), right.clone()];
            sides.sort();
            assert_eq!(sides, [BTreeSet::from([0]), BTreeSet::from([1])], "{}", kind);
            assert_abs_diff_eq!(split.criterion_value(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_identical_distributions_give_zero_gain() {
        let data = dataset_with_classes(&[6, 12, 18]);
        let node = nominal_node(&data, array![[1, 2, 3], [2, 4, 6], [3, 6, 9]]);
        for kind in [CriterionKind::Twoing, CriterionKind::PcExt, CriterionKind::LsChiSquare] {
            let split = Criterion::from_kind(kind, seeded())
                .unwrap()
                .select_best_attribute_and_split(&node)
                .unwrap();
            assert!(split.is_valid());
            assert_abs_diff_eq!(split.criterion_value(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pure_node_has_no_split() {
        let data = dataset_with_classes(&[0, 8]);
        let node = nominal_node(&data, array![[0, 3], [0, 5]]);
        let split = Criterion::from_kind(CriterionKind::Twoing, seeded())
            .unwrap()
            .select_best_attribute_and_split(&node)
            .unwrap();
        assert_eq!(split, Split::empty());
    }

    #[test]
    fn test_numeric_attribute_uses_threshold() {
        let data = Dataset::new(array![[1.0], [2.0], [3.0], [10.0], [11.0]], vec![0, 0, 0, 1, 1], 2).unwrap();
        let node = TreeNode::from_dataset(&data, (0..5).collect(), vec![false], vec![true], &[0]).unwrap();
        let split = Criterion::from_kind(CriterionKind::GwSquaredGini, seeded())
            .unwrap()
            .select_best_attribute_and_split(&node)
            .unwrap();
        assert_eq!(
            split.splits_values(),
            &SplitValues::Threshold {
                last_left_value: 3.0,
                first_right_value: 10.0
            }
        );
        assert_abs_diff_eq!(split.criterion_value(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ties_keep_lowest_attribute_index() {
        let samples = array![[0.0, 0.0], [0.0, 0.0], [1.0, 1.0], [1.0, 1.0]];
        let data = Dataset::new(samples, vec![0, 0, 1, 1], 2).unwrap();
        let node = TreeNode::from_dataset(&data, (0..4).collect(), vec![true, true], vec![false, false], &[2, 2])
            .unwrap();
        for parallel in [false, true] {
            let config = CriterionConfig {
                parallel,
                num_threads: 2,
                ..seeded()
            };
            let split = Criterion::from_kind(CriterionKind::HypercubeCover, config)
                .unwrap()
                .select_best_attribute_and_split(&node)
                .unwrap();
            assert_eq!(split.attrib_index(), Some(0));
        }
    }

    #[test]
    fn test_conditional_inference_takes_the_significant_attribute() {
        // attribute 1 separates the classes; attribute 0 splits them evenly
        let samples = array![
            [0.0, 0.0],
            [1.0, 0.0],
            [0.0, 0.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [1.0, 1.0],
        ];
        let data = Dataset::new(samples, vec![0, 0, 0, 0, 1, 1, 1, 1], 2).unwrap();
        let node = TreeNode::from_dataset(&data, (0..8).collect(), vec![true, true], vec![false, false], &[2, 2])
            .unwrap();
        let split = Criterion::from_kind(CriterionKind::CiTwoing, seeded())
            .unwrap()
            .select_best_attribute_and_split(&node)
            .unwrap();
        assert_eq!(split.attrib_index(), Some(1));
        assert_abs_diff_eq!(split.criterion_value(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_minimize_objective_reports_children_impurity() {
        let data = dataset_with_classes(&[10, 10]);
        let node = nominal_node(&data, array![[10, 0], [0, 10]]);
        let config = CriterionConfig {
            objective: Objective::ChildrenImpurity,
            ..seeded()
        };
        let split = Criterion::from_kind(CriterionKind::LargestClassAlone, config)
            .unwrap()
            .select_best_attribute_and_split(&node)
            .unwrap();
        assert!(split.is_valid());
        assert_abs_diff_eq!(split.criterion_value(), 0.0, epsilon = 1e-12);
    }

    #[derive(Debug)]
    struct FailingSolver;

    impl SdpSolver for FailingSolver {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn solve(&self, _: &DMatrix<f64>, _: &mut Random, _: &CriterionConfig) -> Result<DMatrix<f64>> {
            Err(SplitError::numerical("no convergence"))
        }
    }

    #[test]
    fn test_solver_failure_propagates() {
        let data = dataset_with_classes(&[11, 11, 3]);
        let node = nominal_node(&data, array![[10, 0, 1], [0, 10, 0], [1, 1, 2]]);
        let criterion = Criterion::from_kind(CriterionKind::GwChiSquare, seeded())
            .unwrap()
            .with_sdp_solver(Arc::new(FailingSolver));
        let err = criterion.select_best_attribute_and_split(&node).unwrap_err();
        assert!(matches!(err, SplitError::Solver { attribute: 0, .. }));
    }

    #[test]
    fn test_seed_is_checked_only_for_randomized_finders() {
        for kind in CriterionKind::all() {
            let randomized = matches!(
                kind.spec().finder,
                FinderKind::MaxCut {
                    strategy: MaxCutStrategy::GoemansWilliamson,
                    ..
                }
            );
            let rules = Criterion::validator(&kind.spec()).rule_names();
            assert_eq!(rules.contains(&"reproducibility"), randomized, "{}", kind);
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = CriterionConfig {
            epsilon: -1.0,
            ..CriterionConfig::default()
        };
        assert!(Criterion::from_kind(CriterionKind::Twoing, config).is_err());
    }

    #[test]
    fn test_names() {
        let criterion = Criterion::from_kind(CriterionKind::CiGwChiSquare, seeded()).unwrap();
        assert_eq!(criterion.name(), "ci-gw-chi-square");
        let custom = Criterion::new(
            CriterionSpec::new(FinderKind::PcExt, Impurity::Entropy),
            seeded(),
        )
        .unwrap();
        assert_eq!(custom.name(), "identity/pc_ext/entropy");
    }
}
