//! End-to-end behaviour of the shipped criteria on small nodes.

use approx::assert_abs_diff_eq;
use ndarray::Array2;
use split_criteria::*;

mod common;
use common::*;

#[test]
fn test_perfect_separation_every_gini_criterion() {
    let (dataset, num_values) = single_table(vec![vec![10, 0], vec![0, 10]]);
    let node = nominal_node(&dataset, &num_values);

    for kind in CriterionKind::all() {
        if kind.spec().impurity != Impurity::Gini {
            continue;
        }
        let criterion = Criterion::from_kind(kind, seeded_config()).unwrap();
        let split = criterion.select_best_attribute_and_split(&node).unwrap();
        assert_eq!(split.attrib_index(), Some(0), "{}", kind);
        assert_eq!(sorted_sides(&split), (vec![0], vec![1]), "{}", kind);
        assert_abs_diff_eq!(split.criterion_value(), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_identical_distributions_give_zero_gain_everywhere() {
    let (dataset, num_values) = single_table(vec![vec![2, 4, 2], vec![1, 2, 1], vec![3, 6, 3]]);
    let node = nominal_node(&dataset, &num_values);

    for kind in CriterionKind::all() {
        let criterion = Criterion::from_kind(kind, seeded_config()).unwrap();
        let split = criterion.select_best_attribute_and_split(&node).unwrap();
        if kind.is_conditional_inference() {
            // a significance ranking still splits the only usable attribute
            assert!(split.is_valid(), "{}", kind);
        }
        if split.is_valid() {
            assert_abs_diff_eq!(split.criterion_value(), 0.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_empty_values_stay_out_of_the_partition() {
    let (dataset, num_values) = single_table(vec![vec![10, 0, 0], vec![0, 0, 0], vec![0, 10, 0], vec![0, 0, 10]]);
    let node = nominal_node(&dataset, &num_values);
    let table = node.contingency_table(0).unwrap();
    assert_eq!(table.non_empty_values(), vec![0, 2, 3]);

    for kind in [
        CriterionKind::Twoing,
        CriterionKind::HypercubeCover,
        CriterionKind::PcExt,
        CriterionKind::GwSquaredGini,
        CriterionKind::LsChiSquare,
    ] {
        let split = Criterion::from_kind(kind, seeded_config())
            .unwrap()
            .select_best_attribute_and_split(&node)
            .unwrap();
        let (left, right) = sorted_sides(&split);
        assert!(!left.contains(&1) && !right.contains(&1), "{}", kind);
        assert_eq!(left.len() + right.len(), 3, "{}", kind);
    }
}

#[test]
fn test_best_attribute_wins_without_ranking() {
    let informative = vec![vec![9, 1], vec![1, 9]];
    let noisy = vec![vec![5, 5], vec![5, 5]];
    let dataset = dataset_from_tables(&[noisy, informative]);
    let node = nominal_node(&dataset, &[2, 2]);

    let split = Criterion::from_kind(CriterionKind::LargestClassAlone, seeded_config())
        .unwrap()
        .select_best_attribute_and_split(&node)
        .unwrap();
    assert_eq!(split.attrib_index(), Some(1));
    assert!(split.criterion_value() > 0.5);
}

#[test]
fn test_conditional_inference_ranks_before_splitting() {
    let weak = vec![vec![6, 4], vec![4, 6]];
    let strong = vec![vec![10, 0], vec![0, 10]];
    let dataset = dataset_from_tables(&[weak, strong]);
    let node = nominal_node(&dataset, &[2, 2]);

    let config = seeded_config();
    let ranking = PermutationTestRanker.rank(&node, &config).unwrap();
    assert_eq!(ranking.candidates(&node.valid_attributes())[0], 1);

    let split = Criterion::from_kind(CriterionKind::CiPcExt, config)
        .unwrap()
        .select_best_attribute_and_split(&node)
        .unwrap();
    assert_eq!(split.attrib_index(), Some(1));
}

#[test]
fn test_mixed_nominal_and_numeric_attributes() {
    // column 0 nominal and weak, column 1 numeric and separating
    let mut dataset_rows = Vec::new();
    let mut classes = Vec::new();
    for i in 0..12 {
        let class = usize::from(i >= 6);
        dataset_rows.push([(i % 2) as f64, i as f64 * 0.5]);
        classes.push(class);
    }
    let samples = ndarray::Array2::from_shape_fn((12, 2), |(i, j)| dataset_rows[i][j]);
    let dataset = Dataset::new(samples, classes, 2).unwrap();
    let node = TreeNode::from_dataset(&dataset, (0..12).collect(), vec![true, false], vec![false, true], &[2, 0])
        .unwrap();

    for kind in [CriterionKind::Twoing, CriterionKind::CiTwoing, CriterionKind::PcExtEntropy] {
        let split = Criterion::from_kind(kind, seeded_config())
            .unwrap()
            .select_best_attribute_and_split(&node)
            .unwrap();
        assert_eq!(split.attrib_index(), Some(1), "{}", kind);
        assert_eq!(
            split.splits_values(),
            &SplitValues::Threshold {
                last_left_value: 2.5,
                first_right_value: 3.0
            }
        );
        assert_eq!(split.goes_left(2.5), Some(true));
        assert_eq!(split.goes_left(2.75), Some(false));
    }
}

#[test]
fn test_seeded_max_cut_is_reproducible_in_parallel() {
    let tables: Vec<Vec<Vec<u64>>> = (0..4).map(|seed| random_table(seed, 6, 4, 12)).collect();
    // align class totals by appending a balancing value to every table
    let totals: Vec<Vec<u64>> = tables
        .iter()
        .map(|t| (0..4).map(|c| t.iter().map(|r| r[c]).sum()).collect())
        .collect();
    let target: Vec<u64> = (0..4).map(|c| totals.iter().map(|t| t[c]).max().unwrap()).collect();
    let tables: Vec<Vec<Vec<u64>>> = tables
        .into_iter()
        .zip(&totals)
        .map(|(mut t, tot)| {
            t.push((0..4).map(|c| target[c] - tot[c]).collect());
            t
        })
        .collect();
    let dataset = dataset_from_tables(&tables);
    let node = nominal_node(&dataset, &[7, 7, 7, 7]);

    let sequential = Criterion::from_kind(CriterionKind::GwChiSquare, seeded_config())
        .unwrap()
        .select_best_attribute_and_split(&node)
        .unwrap();
    let parallel_config = CriterionConfig::builder()
        .random_seed(42)
        .parallel(true)
        .num_threads(3)
        .build()
        .unwrap();
    let parallel = Criterion::from_kind(CriterionKind::GwChiSquare, parallel_config)
        .unwrap()
        .select_best_attribute_and_split(&node)
        .unwrap();
    assert_eq!(sequential, parallel);
    assert!(sequential.is_valid());
}

#[test]
fn test_no_valid_attribute_returns_empty_split() {
    let dataset = dataset_from_tables(&[vec![vec![3, 2], vec![1, 4]]]);
    let node = TreeNode::from_dataset(&dataset, (0..10).collect(), vec![false], vec![false], &[2]).unwrap();
    for kind in [CriterionKind::Twoing, CriterionKind::CiTwoing] {
        let split = Criterion::from_kind(kind, seeded_config())
            .unwrap()
            .select_best_attribute_and_split(&node)
            .unwrap();
        assert_eq!(split, Split::empty());
        assert_eq!(split.criterion_value(), f64::NEG_INFINITY);
    }
}

#[test]
fn test_twoing_class_cap_leaves_the_attribute_unsplit() {
    let table = random_table(3, 4, 5, 6);
    let (dataset, num_values) = single_table(table);
    let node = nominal_node(&dataset, &num_values);
    let config = CriterionConfig::builder()
        .random_seed(1)
        .parallel(false)
        .max_superclass_classes(4)
        .build()
        .unwrap();
    let split = Criterion::from_kind(CriterionKind::Twoing, config)
        .unwrap()
        .select_best_attribute_and_split(&node)
        .unwrap();
    assert_eq!(split, Split::empty());
}

#[test]
fn test_twoing_class_cap_keeps_sibling_attributes() {
    // attribute 0 is numeric and follows the class, attribute 1 is nominal
    let classes: Vec<usize> = (0..20).map(|i| i % 5).collect();
    let samples = Array2::from_shape_fn((20, 2), |(i, a)| if a == 0 { (i % 5) as f64 } else { (i % 2) as f64 });
    let dataset = Dataset::new(samples, classes, 5).unwrap();
    let node = TreeNode::from_dataset(&dataset, (0..20).collect(), vec![false, true], vec![true, false], &[0, 2])
        .unwrap();
    let config = CriterionConfig::builder()
        .random_seed(1)
        .parallel(false)
        .max_superclass_classes(4)
        .build()
        .unwrap();

    for kind in [CriterionKind::Twoing, CriterionKind::CiTwoing] {
        let split = Criterion::from_kind(kind, config.clone())
            .unwrap()
            .select_best_attribute_and_split(&node)
            .unwrap();
        assert_eq!(split.attrib_index(), Some(0), "{}", kind);
        assert!(matches!(split.splits_values(), SplitValues::Threshold { .. }), "{}", kind);
        assert!(split.criterion_value() > 0.0);
    }
}

#[test]
fn test_large_tables_switch_the_node_to_chi_square() {
    let big = random_table(11, 60, 4, 5);
    let (dataset, num_values) = single_table(big);
    let node = nominal_node(&dataset, &num_values);
    let values_seen = node.contingency_table(0).unwrap().non_empty_values().len();
    let threshold = values_seen * node.num_classes_seen() - 1;
    assert_eq!(StatisticMode::for_node(&node, threshold).unwrap(), StatisticMode::ChiSquare);
    assert_eq!(StatisticMode::for_node(&node, threshold + 1).unwrap(), StatisticMode::Exact);

    let config = CriterionConfig::builder()
        .random_seed(5)
        .parallel(false)
        .big_contingency_table_threshold(threshold)
        .build()
        .unwrap();
    let split = Criterion::from_kind(CriterionKind::CiHypercubeCover, config)
        .unwrap()
        .select_best_attribute_and_split(&node)
        .unwrap();
    assert!(split.is_valid());
}
