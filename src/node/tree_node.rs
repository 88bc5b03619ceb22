//! Training data and the node-local statistics a criterion reads.

use crate::core::error::{Result, SplitError};
use crate::core::types::{AttributeIndex, AttributeKind, ClassIndex, Count};
use crate::node::contingency::ContingencyTable;
use ndarray::Array2;

/// Training samples with their class labels.
///
/// Nominal attribute values are stored as their value index (`0.0, 1.0, ...`)
/// in the same matrix as numeric attributes.
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: Array2<f64>,
    sample_class: Vec<ClassIndex>,
    num_classes: usize,
}

impl Dataset {
    /// Creates a dataset of `samples.nrows()` samples.
    pub fn new(samples: Array2<f64>, sample_class: Vec<ClassIndex>, num_classes: usize) -> Result<Self> {
        if samples.nrows() != sample_class.len() {
            return Err(SplitError::dimension_mismatch(
                format!("{} class labels", samples.nrows()),
                format!("{}", sample_class.len()),
            ));
        }
        if let Some(&bad) = sample_class.iter().find(|&&c| c >= num_classes) {
            return Err(SplitError::index_out_of_bounds(bad, num_classes));
        }
        Ok(Dataset {
            samples,
            sample_class,
            num_classes,
        })
    }

    /// Number of samples.
    pub fn num_samples(&self) -> usize {
        self.samples.nrows()
    }

    /// Number of attributes.
    pub fn num_attributes(&self) -> usize {
        self.samples.ncols()
    }

    /// Number of classes.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Value of `attribute` for `sample`.
    pub fn value(&self, sample: usize, attribute: AttributeIndex) -> f64 {
        self.samples[[sample, attribute]]
    }

    /// Class label of `sample`.
    pub fn class_of(&self, sample: usize) -> ClassIndex {
        self.sample_class[sample]
    }
}

/// The statistics of one tree node handed to a criterion.
///
/// Built by the tree driver; the criterion only reads it.
#[derive(Debug, Clone)]
pub struct TreeNode<'a> {
    dataset: &'a Dataset,
    valid_samples_indices: Vec<usize>,
    valid_nominal_attribute: Vec<bool>,
    valid_numeric_attribute: Vec<bool>,
    contingency_tables: Vec<Option<ContingencyTable>>,
    class_index_num_samples: Vec<Count>,
}

impl<'a> TreeNode<'a> {
    /// Creates a node, checking that its statistics are consistent with each
    /// other and with the dataset.
    pub fn new(
        dataset: &'a Dataset,
        valid_samples_indices: Vec<usize>,
        valid_nominal_attribute: Vec<bool>,
        valid_numeric_attribute: Vec<bool>,
        contingency_tables: Vec<Option<ContingencyTable>>,
    ) -> Result<Self> {
        let num_attributes = dataset.num_attributes();
        for (name, len) in [
            ("valid_nominal_attribute", valid_nominal_attribute.len()),
            ("valid_numeric_attribute", valid_numeric_attribute.len()),
            ("contingency_tables", contingency_tables.len()),
        ] {
            if len != num_attributes {
                return Err(SplitError::dimension_mismatch(
                    format!("{} entries in {}", num_attributes, name),
                    format!("{}", len),
                ));
            }
        }

        if let Some(&bad) = valid_samples_indices
            .iter()
            .find(|&&s| s >= dataset.num_samples())
        {
            return Err(SplitError::index_out_of_bounds(bad, dataset.num_samples()));
        }

        let mut class_index_num_samples = vec![0; dataset.num_classes()];
        for &sample in &valid_samples_indices {
            class_index_num_samples[dataset.class_of(sample)] += 1;
        }

        for attribute in 0..num_attributes {
            if valid_nominal_attribute[attribute] && valid_numeric_attribute[attribute] {
                return Err(SplitError::invalid_parameter(
                    format!("attribute {}", attribute),
                    "nominal and numeric",
                    "an attribute has a single kind",
                ));
            }
            if !valid_nominal_attribute[attribute] {
                continue;
            }
            let table = contingency_tables[attribute].as_ref().ok_or_else(|| {
                SplitError::invalid_parameter(
                    format!("contingency_tables[{}]", attribute),
                    "missing",
                    "valid nominal attributes need a contingency table",
                )
            })?;
            if table.num_classes() != dataset.num_classes() {
                return Err(SplitError::dimension_mismatch(
                    format!("{} classes", dataset.num_classes()),
                    format!("{} in table of attribute {}", table.num_classes(), attribute),
                ));
            }
            if table.classes_num_samples().iter().ne(class_index_num_samples.iter()) {
                return Err(SplitError::invalid_parameter(
                    format!("contingency_tables[{}]", attribute),
                    table.total().to_string(),
                    "class totals disagree with the node's samples",
                ));
            }
        }

        Ok(TreeNode {
            dataset,
            valid_samples_indices,
            valid_nominal_attribute,
            valid_numeric_attribute,
            contingency_tables,
            class_index_num_samples,
        })
    }

    /// Builds a node over `valid_samples_indices`, deriving the contingency
    /// tables of nominal attributes from the dataset. `num_values[a]` is the
    /// number of values of attribute `a` (ignored for other attributes).
    pub fn from_dataset(
        dataset: &'a Dataset,
        valid_samples_indices: Vec<usize>,
        valid_nominal_attribute: Vec<bool>,
        valid_numeric_attribute: Vec<bool>,
        num_values: &[usize],
    ) -> Result<Self> {
        if num_values.len() != dataset.num_attributes() {
            return Err(SplitError::dimension_mismatch(
                format!("{} value counts", dataset.num_attributes()),
                format!("{}", num_values.len()),
            ));
        }
        if let Some(&bad) = valid_samples_indices
            .iter()
            .find(|&&s| s >= dataset.num_samples())
        {
            return Err(SplitError::index_out_of_bounds(bad, dataset.num_samples()));
        }
        let classes: Vec<ClassIndex> = valid_samples_indices
            .iter()
            .map(|&s| dataset.class_of(s))
            .collect();

        let mut tables = Vec::with_capacity(dataset.num_attributes());
        for attribute in 0..dataset.num_attributes() {
            if !valid_nominal_attribute.get(attribute).copied().unwrap_or(false) {
                tables.push(None);
                continue;
            }
            let mut values = Vec::with_capacity(valid_samples_indices.len());
            for &sample in &valid_samples_indices {
                let raw = dataset.value(sample, attribute);
                if !(raw >= 0.0 && raw.fract() == 0.0) {
                    return Err(SplitError::invalid_parameter(
                        format!("attribute {}", attribute),
                        raw.to_string(),
                        "nominal values must be non-negative integers",
                    ));
                }
                values.push(raw as usize);
            }
            tables.push(Some(ContingencyTable::from_samples(
                &values,
                &classes,
                num_values[attribute],
                dataset.num_classes(),
            )?));
        }

        Self::new(
            dataset,
            valid_samples_indices,
            valid_nominal_attribute,
            valid_numeric_attribute,
            tables,
        )
    }

    /// The dataset the node indexes into.
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Samples reaching this node.
    pub fn valid_samples_indices(&self) -> &[usize] {
        &self.valid_samples_indices
    }

    /// Number of samples reaching this node.
    pub fn num_valid_samples(&self) -> usize {
        self.valid_samples_indices.len()
    }

    /// Number of attributes of the dataset.
    pub fn num_attributes(&self) -> usize {
        self.valid_nominal_attribute.len()
    }

    /// Number of classes of the dataset.
    pub fn num_classes(&self) -> usize {
        self.class_index_num_samples.len()
    }

    /// Samples per class at this node.
    pub fn class_index_num_samples(&self) -> &[Count] {
        &self.class_index_num_samples
    }

    /// Number of classes with at least one sample at this node.
    pub fn num_classes_seen(&self) -> usize {
        self.class_index_num_samples.iter().filter(|&&n| n > 0).count()
    }

    /// How `attribute` may be used at this node.
    pub fn attribute_kind(&self, attribute: AttributeIndex) -> AttributeKind {
        if self.valid_nominal_attribute.get(attribute).copied().unwrap_or(false) {
            AttributeKind::Nominal
        } else if self.valid_numeric_attribute.get(attribute).copied().unwrap_or(false) {
            AttributeKind::Numeric
        } else {
            AttributeKind::Invalid
        }
    }

    /// Attributes flagged valid at this node, ascending.
    pub fn valid_attributes(&self) -> Vec<AttributeIndex> {
        (0..self.num_attributes())
            .filter(|&a| self.attribute_kind(a) != AttributeKind::Invalid)
            .collect()
    }

    /// Contingency table of a valid nominal attribute.
    pub fn contingency_table(&self, attribute: AttributeIndex) -> Result<&ContingencyTable> {
        if attribute >= self.num_attributes() {
            return Err(SplitError::index_out_of_bounds(attribute, self.num_attributes()));
        }
        self.contingency_tables[attribute]
            .as_ref()
            .filter(|_| self.valid_nominal_attribute[attribute])
            .ok_or_else(|| {
                SplitError::invalid_parameter(
                    format!("attribute {}", attribute),
                    "not nominal",
                    "contingency tables exist only for valid nominal attributes",
                )
            })
    }

    /// `(value, class)` of every sample at the node for a numeric attribute,
    /// in sample order. Samples with a non-finite value are left out.
    pub fn numeric_pairs(&self, attribute: AttributeIndex) -> Result<Vec<(f64, ClassIndex)>> {
        if attribute >= self.num_attributes() {
            return Err(SplitError::index_out_of_bounds(attribute, self.num_attributes()));
        }
        let pairs: Vec<(f64, ClassIndex)> = self
            .valid_samples_indices
            .iter()
            .map(|&s| (self.dataset.value(s, attribute), self.dataset.class_of(s)))
            .filter(|(x, _)| x.is_finite())
            .collect();
        let skipped = self.valid_samples_indices.len() - pairs.len();
        if skipped > 0 {
            log::warn!("attribute {}: {} non-finite values skipped", attribute, skipped);
        }
        Ok(pairs)
    }
}
