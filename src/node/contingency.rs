//! Contingency tables of nominal attributes.
//!
//! A [`ContingencyTable`] holds, for one nominal attribute at one node, how
//! many samples of each class take each value. Split finders work on the
//! [`CompactTable`] view that drops empty values and classes, and map their
//! result back through its index maps.

use crate::core::error::{Result, SplitError};
use crate::core::types::{ClassIndex, Count, ValueIndex};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::collections::BTreeSet;

/// Per-value, per-class sample counts of one nominal attribute at a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContingencyTable {
    counts: Array2<Count>,
    values_num_samples: Array1<Count>,
    classes_num_samples: Array1<Count>,
}

impl ContingencyTable {
    /// Table from a `values x classes` count matrix; marginals are derived.
    pub fn from_counts(counts: Array2<Count>) -> Self {
        let values_num_samples = counts.sum_axis(Axis(1));
        let classes_num_samples = counts.sum_axis(Axis(0));
        ContingencyTable {
            counts,
            values_num_samples,
            classes_num_samples,
        }
    }

    /// Table from a count matrix and the per-value totals reported by the
    /// tree driver, checking that they agree.
    pub fn with_value_totals(counts: Array2<Count>, values_num_samples: Array1<Count>) -> Result<Self> {
        if values_num_samples.len() != counts.nrows() {
            return Err(SplitError::dimension_mismatch(
                format!("{} value totals", counts.nrows()),
                format!("{}", values_num_samples.len()),
            ));
        }
        let table = Self::from_counts(counts);
        for (value, (&given, &derived)) in values_num_samples
            .iter()
            .zip(table.values_num_samples.iter())
            .enumerate()
        {
            if given != derived {
                return Err(SplitError::invalid_parameter(
                    format!("values_num_samples[{}]", value),
                    given.to_string(),
                    format!("row sum of the contingency table is {}", derived),
                ));
            }
        }
        Ok(table)
    }

    /// Table from parallel slices of value and class indices.
    pub fn from_samples(
        values: &[ValueIndex],
        classes: &[ClassIndex],
        num_values: usize,
        num_classes: usize,
    ) -> Result<Self> {
        if values.len() != classes.len() {
            return Err(SplitError::dimension_mismatch(
                format!("{} class labels", values.len()),
                format!("{}", classes.len()),
            ));
        }
        let mut counts = Array2::<Count>::zeros((num_values, num_classes));
        for (&value, &class) in values.iter().zip(classes) {
            if value >= num_values {
                return Err(SplitError::index_out_of_bounds(value, num_values));
            }
            if class >= num_classes {
                return Err(SplitError::index_out_of_bounds(class, num_classes));
            }
            counts[[value, class]] += 1;
        }
        Ok(Self::from_counts(counts))
    }

    /// Number of values (rows), including values with no samples.
    pub fn num_values(&self) -> usize {
        self.counts.nrows()
    }

    /// Number of classes (columns), including classes with no samples.
    pub fn num_classes(&self) -> usize {
        self.counts.ncols()
    }

    /// Number of samples at the node.
    pub fn total(&self) -> Count {
        self.values_num_samples.sum()
    }

    /// Samples taking `value` with class `class`.
    pub fn count(&self, value: ValueIndex, class: ClassIndex) -> Count {
        self.counts[[value, class]]
    }

    /// Count matrix view.
    pub fn counts(&self) -> ArrayView2<'_, Count> {
        self.counts.view()
    }

    /// Samples per value.
    pub fn values_num_samples(&self) -> ArrayView1<'_, Count> {
        self.values_num_samples.view()
    }

    /// Samples per class.
    pub fn classes_num_samples(&self) -> ArrayView1<'_, Count> {
        self.classes_num_samples.view()
    }

    /// Values with at least one sample, ascending.
    pub fn non_empty_values(&self) -> Vec<ValueIndex> {
        (0..self.num_values())
            .filter(|&v| self.values_num_samples[v] > 0)
            .collect()
    }

    /// Classes with at least one sample, ascending.
    pub fn non_empty_classes(&self) -> Vec<ClassIndex> {
        (0..self.num_classes())
            .filter(|&c| self.classes_num_samples[c] > 0)
            .collect()
    }

    /// Drops empty values and classes.
    pub fn compact(&self) -> CompactTable {
        let value_map = self.non_empty_values();
        let class_map = self.non_empty_classes();
        let counts = Array2::from_shape_fn((value_map.len(), class_map.len()), |(i, j)| {
            self.counts[[value_map[i], class_map[j]]] as f64
        });
        CompactTable::new(counts, value_map, class_map)
    }
}

/// Contingency table restricted to non-empty values and classes, in `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactTable {
    counts: Array2<f64>,
    value_totals: Array1<f64>,
    class_totals: Array1<f64>,
    value_map: Vec<ValueIndex>,
    class_map: Vec<ClassIndex>,
}

impl CompactTable {
    /// Builds the view; `value_map[i]` is the original value of row `i` and
    /// `class_map[j]` the original class of column `j`.
    pub fn new(counts: Array2<f64>, value_map: Vec<ValueIndex>, class_map: Vec<ClassIndex>) -> Self {
        let value_totals = counts.sum_axis(Axis(1));
        let class_totals = counts.sum_axis(Axis(0));
        CompactTable {
            counts,
            value_totals,
            class_totals,
            value_map,
            class_map,
        }
    }

    /// Table with identity index maps, mostly for tests and benches.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let num_classes = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != num_classes) {
            return Err(SplitError::dimension_mismatch(
                format!("rows of length {}", num_classes),
                "ragged rows",
            ));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let counts = Array2::from_shape_vec((rows.len(), num_classes), flat)
            .map_err(|e| SplitError::internal(e.to_string()))?;
        Ok(Self::new(counts, (0..rows.len()).collect(), (0..num_classes).collect()))
    }

    /// Number of rows.
    pub fn num_values(&self) -> usize {
        self.counts.nrows()
    }

    /// Number of columns.
    pub fn num_classes(&self) -> usize {
        self.counts.ncols()
    }

    /// Number of samples.
    pub fn total(&self) -> f64 {
        self.value_totals.sum()
    }

    /// Count matrix view.
    pub fn counts(&self) -> ArrayView2<'_, f64> {
        self.counts.view()
    }

    /// Class counts of row `value`.
    pub fn row(&self, value: usize) -> ArrayView1<'_, f64> {
        self.counts.row(value)
    }

    /// Samples per row.
    pub fn value_totals(&self) -> ArrayView1<'_, f64> {
        self.value_totals.view()
    }

    /// Samples per column.
    pub fn class_totals(&self) -> ArrayView1<'_, f64> {
        self.class_totals.view()
    }

    /// Original value index of every row.
    pub fn value_map(&self) -> &[ValueIndex] {
        &self.value_map
    }

    /// Original class index of every column.
    pub fn class_map(&self) -> &[ClassIndex] {
        &self.class_map
    }

    /// Summed class counts of a set of rows.
    pub fn side_counts(&self, rows: &[usize]) -> Vec<f64> {
        let mut counts = vec![0.0; self.num_classes()];
        for &row in rows {
            for (acc, &c) in counts.iter_mut().zip(self.counts.row(row)) {
                *acc += c;
            }
        }
        counts
    }

    /// Maps rows to the attribute's original value indices.
    pub fn to_original_values(&self, rows: &[usize]) -> BTreeSet<ValueIndex> {
        rows.iter().map(|&r| self.value_map[r]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_marginals() {
        let table = ContingencyTable::from_counts(array![[3, 0, 1], [0, 0, 0], [2, 0, 4]]);
        assert_eq!(table.total(), 10);
        assert_eq!(table.values_num_samples().to_vec(), vec![4, 0, 6]);
        assert_eq!(table.classes_num_samples().to_vec(), vec![5, 0, 5]);
        assert_eq!(table.non_empty_values(), vec![0, 2]);
        assert_eq!(table.non_empty_classes(), vec![0, 2]);
    }

    #[test]
    fn test_with_value_totals_checks_rows() {
        let counts = array![[1, 2], [3, 4]];
        assert!(ContingencyTable::with_value_totals(counts.clone(), array![3, 7]).is_ok());
        assert!(ContingencyTable::with_value_totals(counts.clone(), array![3, 8]).is_err());
        assert!(ContingencyTable::with_value_totals(counts, array![3]).is_err());
    }

    #[test]
    fn test_from_samples() {
        let table = ContingencyTable::from_samples(&[0, 1, 1, 2], &[1, 0, 0, 1], 3, 2).unwrap();
        assert_eq!(table.count(1, 0), 2);
        assert_eq!(table.count(2, 1), 1);
        assert!(ContingencyTable::from_samples(&[3], &[0], 3, 2).is_err());
        assert!(ContingencyTable::from_samples(&[0], &[0, 1], 3, 2).is_err());
    }

    #[test]
    fn test_compact_maps_back() {
        let table = ContingencyTable::from_counts(array![[0, 0, 0], [5, 0, 1], [0, 0, 0], [2, 0, 7]]);
        let compact = table.compact();
        assert_eq!(compact.num_values(), 2);
        assert_eq!(compact.num_classes(), 2);
        assert_eq!(compact.value_map(), &[1, 3]);
        assert_eq!(compact.class_map(), &[0, 2]);
        assert_eq!(compact.row(1).to_vec(), vec![2.0, 7.0]);
        assert_eq!(compact.to_original_values(&[1]), BTreeSet::from([3]));
        assert_eq!(compact.side_counts(&[0, 1]), vec![7.0, 8.0]);
        assert_eq!(compact.total(), 15.0);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(CompactTable::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
        let table = CompactTable::from_rows(&[vec![1.0, 2.0], vec![3.0, 0.0]]).unwrap();
        assert_eq!(table.class_totals().to_vec(), vec![4.0, 2.0]);
    }
}
