//! Criterion configuration: numerical tunables, reproducibility and
//! parallelism.

use crate::core::constants::*;
use crate::core::error::{Result, SplitError};
use crate::core::types::Objective;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables shared by every component of a criterion.
///
/// The defaults reproduce the reference behavior of the algorithms; most
/// callers only touch `random_seed`, `objective` and the parallelism knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriterionConfig {
    /// Minimum cut improvement for a local-search move to be applied
    pub epsilon: f64,
    /// Exact permutation statistic is used while every nominal attribute has
    /// at most this many `values_seen * classes_seen` cells
    pub big_contingency_table_threshold: usize,
    /// Increasing relative cut-offs tried by the pseudo-inverse
    pub pinv_tolerances: Vec<f64>,
    /// Class-probability vectors closer than this are merged by PC-ext
    pub probability_tolerance: f64,
    /// Relative pivot threshold of the pivoted Cholesky factorization
    pub cholesky_tolerance: f64,
    /// Sweep budget of the relaxation solver
    pub sdp_max_iterations: usize,
    /// Relative objective change at which the relaxation solver stops
    pub sdp_tolerance: f64,
    /// Seed of the randomized steps; `None` draws from entropy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
    /// Largest class count Twoing will enumerate
    pub max_superclass_classes: usize,
    /// Quantity reported as the criterion value
    pub objective: Objective,
    /// Evaluate attributes in parallel
    pub parallel: bool,
    /// Worker threads when `parallel` is set (0 means all cores)
    pub num_threads: usize,
}

impl Default for CriterionConfig {
    fn default() -> Self {
        CriterionConfig {
            epsilon: DEFAULT_LOCAL_SEARCH_EPSILON,
            big_contingency_table_threshold: DEFAULT_BIG_CONTINGENCY_TABLE_THRESHOLD,
            pinv_tolerances: DEFAULT_PINV_TOLERANCES.to_vec(),
            probability_tolerance: DEFAULT_PROBABILITY_TOLERANCE,
            cholesky_tolerance: DEFAULT_CHOLESKY_TOLERANCE,
            sdp_max_iterations: DEFAULT_SDP_MAX_ITERATIONS,
            sdp_tolerance: DEFAULT_SDP_TOLERANCE,
            random_seed: None,
            max_superclass_classes: DEFAULT_MAX_SUPERCLASS_CLASSES,
            objective: Objective::default(),
            parallel: false,
            num_threads: DEFAULT_NUM_THREADS,
        }
    }
}

fn check_positive(parameter: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(SplitError::invalid_parameter(
            parameter,
            value.to_string(),
            "must be a positive finite number",
        ));
    }
    Ok(())
}

impl CriterionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a [`CriterionConfigBuilder`] from the defaults
    pub fn builder() -> CriterionConfigBuilder {
        CriterionConfigBuilder::new()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        check_positive("epsilon", self.epsilon)?;
        check_positive("probability_tolerance", self.probability_tolerance)?;
        check_positive("sdp_tolerance", self.sdp_tolerance)?;

        if !(self.cholesky_tolerance > 0.0 && self.cholesky_tolerance < 1.0) {
            return Err(SplitError::invalid_parameter(
                "cholesky_tolerance",
                self.cholesky_tolerance.to_string(),
                "must be in range (0.0, 1.0)",
            ));
        }

        if self.big_contingency_table_threshold == 0 {
            return Err(SplitError::invalid_parameter(
                "big_contingency_table_threshold",
                "0",
                "must be at least 1",
            ));
        }

        if self.pinv_tolerances.is_empty() {
            return Err(SplitError::invalid_parameter(
                "pinv_tolerances",
                "[]",
                "must contain at least one tolerance",
            ));
        }
        for &tolerance in &self.pinv_tolerances {
            check_positive("pinv_tolerances", tolerance)?;
            if tolerance >= 1.0 {
                return Err(SplitError::invalid_parameter(
                    "pinv_tolerances",
                    tolerance.to_string(),
                    "relative tolerances must be below 1",
                ));
            }
        }
        if self.pinv_tolerances.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SplitError::invalid_parameter(
                "pinv_tolerances",
                format!("{:?}", self.pinv_tolerances),
                "must be strictly increasing",
            ));
        }

        if self.sdp_max_iterations == 0 {
            return Err(SplitError::invalid_parameter(
                "sdp_max_iterations",
                "0",
                "must be at least 1",
            ));
        }

        if self.max_superclass_classes < 2 || self.max_superclass_classes >= usize::BITS as usize {
            return Err(SplitError::invalid_parameter(
                "max_superclass_classes",
                self.max_superclass_classes.to_string(),
                format!("must be in range [2, {})", usize::BITS),
            ));
        }

        Ok(())
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|s| s.to_str());
        if !matches!(extension, Some("json") | Some("toml")) {
            return Err(SplitError::config(
                "Unsupported config file format. Use .json or .toml",
            ));
        }
        let content = std::fs::read_to_string(path)?;

        let config: CriterionConfig = if extension == Some("json") {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)
                .map_err(|e| SplitError::config(format!("Failed to parse TOML config: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| SplitError::config(format!("Failed to serialize to TOML: {}", e)))?,
            _ => {
                return Err(SplitError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Load configuration from `SPLIT_CRITERIA_*` environment variables on
    /// top of the defaults
    pub fn load_from_environment() -> Result<Self> {
        let mut config = CriterionConfig::default();
        config.apply_environment_overrides()?;
        Ok(config)
    }

    /// Overwrite fields for which a `SPLIT_CRITERIA_*` variable is set
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
            match std::env::var(name) {
                Ok(val) => val
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| SplitError::config(format!("Invalid {}", name))),
                Err(_) => Ok(None),
            }
        }

        if let Some(v) = parse_var("SPLIT_CRITERIA_EPSILON")? {
            self.epsilon = v;
        }
        if let Some(v) = parse_var("SPLIT_CRITERIA_BIG_CONTINGENCY_TABLE_THRESHOLD")? {
            self.big_contingency_table_threshold = v;
        }
        if let Some(v) = parse_var("SPLIT_CRITERIA_PROBABILITY_TOLERANCE")? {
            self.probability_tolerance = v;
        }
        if let Some(v) = parse_var("SPLIT_CRITERIA_SDP_MAX_ITERATIONS")? {
            self.sdp_max_iterations = v;
        }
        if let Some(v) = parse_var("SPLIT_CRITERIA_RANDOM_SEED")? {
            self.random_seed = Some(v);
        }
        if let Some(v) = parse_var("SPLIT_CRITERIA_PARALLEL")? {
            self.parallel = v;
        }
        if let Some(v) = parse_var("SPLIT_CRITERIA_NUM_THREADS")? {
            self.num_threads = v;
        }
        if let Ok(val) = std::env::var("SPLIT_CRITERIA_OBJECTIVE") {
            self.objective = match val.trim() {
                "relative_gain" => Objective::RelativeGain,
                "children_impurity" => Objective::ChildrenImpurity,
                _ => return Err(SplitError::config("Invalid SPLIT_CRITERIA_OBJECTIVE")),
            };
        }

        self.validate()
    }

    /// Get the effective number of threads (0 means use all available cores)
    pub fn effective_num_threads(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get()
        } else {
            self.num_threads
        }
    }
}

/// Configuration builder for fluent configuration creation
#[derive(Debug, Clone)]
pub struct CriterionConfigBuilder {
    config: CriterionConfig,
    validation_errors: Vec<String>,
}

impl CriterionConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        CriterionConfigBuilder {
            config: CriterionConfig::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the local-search improvement threshold
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        if !(epsilon > 0.0) {
            self.validation_errors.push("epsilon must be positive".to_string());
        }
        self.config.epsilon = epsilon;
        self
    }

    /// Set the exact/chi-square switch of the permutation test
    pub fn big_contingency_table_threshold(mut self, threshold: usize) -> Self {
        if threshold == 0 {
            self.validation_errors
                .push("big_contingency_table_threshold must be at least 1".to_string());
        }
        self.config.big_contingency_table_threshold = threshold;
        self
    }

    /// Set the pseudo-inverse tolerance ladder
    pub fn pinv_tolerances(mut self, tolerances: Vec<f64>) -> Self {
        self.config.pinv_tolerances = tolerances;
        self
    }

    /// Set the probability merge tolerance of PC-ext
    pub fn probability_tolerance(mut self, tolerance: f64) -> Self {
        self.config.probability_tolerance = tolerance;
        self
    }

    /// Set the pivot threshold of the Cholesky factorization
    pub fn cholesky_tolerance(mut self, tolerance: f64) -> Self {
        self.config.cholesky_tolerance = tolerance;
        self
    }

    /// Set the relaxation solver budget and tolerance
    pub fn sdp(mut self, max_iterations: usize, tolerance: f64) -> Self {
        self.config.sdp_max_iterations = max_iterations;
        self.config.sdp_tolerance = tolerance;
        self
    }

    /// Fix the random seed
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = Some(seed);
        self
    }

    /// Set the Twoing enumeration cap
    pub fn max_superclass_classes(mut self, max: usize) -> Self {
        if max < 2 {
            self.validation_errors
                .push("max_superclass_classes must be at least 2".to_string());
        }
        self.config.max_superclass_classes = max;
        self
    }

    /// Set the reported objective
    pub fn objective(mut self, objective: Objective) -> Self {
        self.config.objective = objective;
        self
    }

    /// Enable parallel attribute evaluation
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Set the number of worker threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<CriterionConfig> {
        if !self.validation_errors.is_empty() {
            return Err(SplitError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for CriterionConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
