//! Shared fixtures for the split-criteria integration tests.

#![allow(dead_code)]

use ndarray::Array2;
use rand::prelude::*;
use split_criteria::*;

/// Configuration with a fixed seed and sequential evaluation.
pub fn seeded_config() -> CriterionConfig {
    init_logging();
    CriterionConfig::builder()
        .random_seed(42)
        .parallel(false)
        .build()
        .unwrap()
}

/// Dataset with one column per table: the samples of attribute `a` follow
/// `tables[a]` (row = value, column = class).
///
/// Every table must have the same class totals. Samples are laid out class
/// by class, so each attribute column can be filled independently.
pub fn dataset_from_tables(tables: &[Vec<Vec<u64>>]) -> Dataset {
    let num_classes = tables[0][0].len();
    let class_totals = |table: &Vec<Vec<u64>>| -> Vec<u64> {
        (0..num_classes).map(|c| table.iter().map(|row| row[c]).sum()).collect()
    };
    let totals = class_totals(&tables[0]);
    for table in tables {
        assert_eq!(class_totals(table), totals, "tables disagree on class totals");
    }

    let classes: Vec<usize> = totals
        .iter()
        .enumerate()
        .flat_map(|(c, &n)| std::iter::repeat(c).take(n as usize))
        .collect();
    let mut samples = Array2::<f64>::zeros((classes.len(), tables.len()));
    for (attribute, table) in tables.iter().enumerate() {
        let mut offset = 0;
        for c in 0..num_classes {
            for (value, row) in table.iter().enumerate() {
                for _ in 0..row[c] {
                    samples[[offset, attribute]] = value as f64;
                    offset += 1;
                }
            }
        }
    }
    Dataset::new(samples, classes, num_classes).unwrap()
}

/// Node over every sample of `dataset` with all attributes nominal.
pub fn nominal_node<'a>(dataset: &'a Dataset, num_values: &[usize]) -> TreeNode<'a> {
    let n = dataset.num_attributes();
    TreeNode::from_dataset(
        dataset,
        (0..dataset.num_samples()).collect(),
        vec![true; n],
        vec![false; n],
        num_values,
    )
    .unwrap()
}

/// Dataset and value counts for a single nominal attribute.
pub fn single_table(table: Vec<Vec<u64>>) -> (Dataset, Vec<usize>) {
    let num_values = table.len();
    (dataset_from_tables(&[table]), vec![num_values])
}

/// Random `values x classes` table with counts in `0..max_count`; every
/// class receives at least one sample.
pub fn random_table(seed: u64, values: usize, classes: usize, max_count: u64) -> Vec<Vec<u64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut table: Vec<Vec<u64>> = (0..values)
        .map(|_| (0..classes).map(|_| rng.gen_range(0..max_count)).collect())
        .collect();
    for c in 0..classes {
        if table.iter().all(|row| row[c] == 0) {
            table[c % values][c] = 1;
        }
    }
    table
}

/// The two value sets of a nominal split, smaller first value first.
pub fn sorted_sides(split: &Split) -> (Vec<usize>, Vec<usize>) {
    let (left, right) = split.nominal_sides().expect("nominal split");
    let left: Vec<usize> = left.iter().copied().collect();
    let right: Vec<usize> = right.iter().copied().collect();
    if left.first() <= right.first() {
        (left, right)
    } else {
        (right, left)
    }
}
