//! Advisory validation of criterion configurations.
//!
//! [`CriterionConfig::validate`] rejects values the algorithms cannot run
//! with. The [`ConfigValidator`] goes further and reports settings that are
//! legal but likely to hurt split quality, reproducibility or throughput.

use crate::config::core::CriterionConfig;
use crate::core::error::{Result, SplitError};

use serde::{Deserialize, Serialize};

/// Validation result enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationResult {
    /// Parameter is valid
    Valid,
    /// Parameter has a warning (non-fatal)
    Warning(ValidationWarning),
    /// Parameter has an error (fatal)
    Error(ValidationError),
}

/// Validation warning structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Parameter name
    pub parameter: String,
    /// Parameter value
    pub value: String,
    /// Warning message
    pub message: String,
    /// Suggested fix
    pub suggestion: Option<String>,
}

/// Validation error structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Parameter name
    pub parameter: String,
    /// Parameter value
    pub value: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parameter '{}' = '{}': {}",
            self.parameter, self.value, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// A single validation rule
pub trait ValidationRule: Send + Sync {
    /// Rule name
    fn name(&self) -> &'static str;

    /// Checks the configuration
    fn validate(&self, config: &CriterionConfig) -> Vec<ValidationResult>;
}

/// Configuration validator
pub struct ConfigValidator {
    /// Treat warnings as errors
    strict_mode: bool,
    rules: Vec<Box<dyn ValidationRule>>,
}

impl std::fmt::Debug for ConfigValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigValidator")
            .field("strict_mode", &self.strict_mode)
            .field("rules", &self.rule_names())
            .finish()
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    /// Validator with the built-in rules
    pub fn new() -> Self {
        ConfigValidator {
            strict_mode: false,
            rules: vec![
                Box::new(HardLimitsRule),
                Box::new(ToleranceRule),
                Box::new(RelaxationBudgetRule),
                Box::new(ReproducibilityRule),
                Box::new(ThreadingRule),
            ],
        }
    }

    /// Validator that rejects configurations with warnings
    pub fn strict() -> Self {
        ConfigValidator {
            strict_mode: true,
            ..Self::new()
        }
    }

    /// Add a custom rule
    pub fn add_rule(mut self, rule: Box<dyn ValidationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Drop the rule called `name`
    pub fn without_rule(mut self, name: &str) -> Self {
        self.rules.retain(|rule| rule.name() != name);
        self
    }

    /// Names of the active rules
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Run every rule and collect the findings
    pub fn validate(&self, config: &CriterionConfig) -> Vec<ValidationResult> {
        self.rules
            .iter()
            .flat_map(|rule| rule.validate(config))
            .filter(|result| *result != ValidationResult::Valid)
            .collect()
    }

    /// Run every rule, log warnings and fail on errors (and on warnings in
    /// strict mode)
    pub fn check(&self, config: &CriterionConfig) -> Result<()> {
        let mut failures = Vec::new();
        for result in self.validate(config) {
            match result {
                ValidationResult::Valid => {}
                ValidationResult::Warning(warning) => {
                    log::warn!(
                        "{} = {}: {}{}",
                        warning.parameter,
                        warning.value,
                        warning.message,
                        warning
                            .suggestion
                            .as_ref()
                            .map(|s| format!(" ({})", s))
                            .unwrap_or_default()
                    );
                    if self.strict_mode {
                        failures.push(format!("{}: {}", warning.parameter, warning.message));
                    }
                }
                ValidationResult::Error(error) => failures.push(error.to_string()),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(SplitError::config(format!(
                "Configuration validation failed: {}",
                failures.join(", ")
            )))
        }
    }
}

/// Mirrors the hard limits of `CriterionConfig::validate`
struct HardLimitsRule;

impl ValidationRule for HardLimitsRule {
    fn name(&self) -> &'static str {
        "hard_limits"
    }

    fn validate(&self, config: &CriterionConfig) -> Vec<ValidationResult> {
        match config.validate() {
            Ok(()) => vec![ValidationResult::Valid],
            Err(SplitError::InvalidParameter {
                parameter,
                value,
                reason,
            }) => vec![ValidationResult::Error(ValidationError {
                parameter,
                value,
                message: reason,
            })],
            Err(other) => vec![ValidationResult::Error(ValidationError {
                parameter: "config".to_string(),
                value: String::new(),
                message: other.to_string(),
            })],
        }
    }
}

/// Tolerances loose enough to change which splits are found
struct ToleranceRule;

impl ValidationRule for ToleranceRule {
    fn name(&self) -> &'static str {
        "tolerances"
    }

    fn validate(&self, config: &CriterionConfig) -> Vec<ValidationResult> {
        let mut results = Vec::new();

        if let Some(&ceiling) = config.pinv_tolerances.last() {
            if ceiling > 1e-2 {
                results.push(ValidationResult::Warning(ValidationWarning {
                    parameter: "pinv_tolerances".to_string(),
                    value: ceiling.to_string(),
                    message: "Loose ceiling discards informative directions of the statistic"
                        .to_string(),
                    suggestion: Some("Keep the last tolerance at or below 1e-4".to_string()),
                }));
            }
        }

        if config.epsilon > 1e-2 {
            results.push(ValidationResult::Warning(ValidationWarning {
                parameter: "epsilon".to_string(),
                value: config.epsilon.to_string(),
                message: "Large epsilon stops local search before it reaches a local optimum"
                    .to_string(),
                suggestion: None,
            }));
        }

        if config.probability_tolerance > 1e-3 {
            results.push(ValidationResult::Warning(ValidationWarning {
                parameter: "probability_tolerance".to_string(),
                value: config.probability_tolerance.to_string(),
                message: "Values with visibly different class distributions will be merged"
                    .to_string(),
                suggestion: None,
            }));
        }

        results
    }
}

struct RelaxationBudgetRule;

impl ValidationRule for RelaxationBudgetRule {
    fn name(&self) -> &'static str {
        "relaxation_budget"
    }

    fn validate(&self, config: &CriterionConfig) -> Vec<ValidationResult> {
        if config.sdp_max_iterations < 50 {
            vec![ValidationResult::Warning(ValidationWarning {
                parameter: "sdp_max_iterations".to_string(),
                value: config.sdp_max_iterations.to_string(),
                message: "Relaxation may stop far from its optimum".to_string(),
                suggestion: Some("Use at least a few hundred sweeps".to_string()),
            })]
        } else {
            vec![ValidationResult::Valid]
        }
    }
}

/// Only meaningful for criteria that draw random hyperplanes
struct ReproducibilityRule;

impl ValidationRule for ReproducibilityRule {
    fn name(&self) -> &'static str {
        "reproducibility"
    }

    fn validate(&self, config: &CriterionConfig) -> Vec<ValidationResult> {
        if config.random_seed.is_none() {
            vec![ValidationResult::Warning(ValidationWarning {
                parameter: "random_seed".to_string(),
                value: "none".to_string(),
                message: "Goemans-Williamson rounding is not reproducible".to_string(),
                suggestion: Some("Set random_seed".to_string()),
            })]
        } else {
            vec![ValidationResult::Valid]
        }
    }
}

struct ThreadingRule;

impl ValidationRule for ThreadingRule {
    fn name(&self) -> &'static str {
        "threading"
    }

    fn validate(&self, config: &CriterionConfig) -> Vec<ValidationResult> {
        let mut results = Vec::new();

        if !config.parallel && config.num_threads > 0 {
            results.push(ValidationResult::Warning(ValidationWarning {
                parameter: "num_threads".to_string(),
                value: config.num_threads.to_string(),
                message: "Ignored because parallel evaluation is disabled".to_string(),
                suggestion: Some("Set parallel = true".to_string()),
            }));
        }

        let cores = num_cpus::get();
        if config.num_threads > cores {
            results.push(ValidationResult::Warning(ValidationWarning {
                parameter: "num_threads".to_string(),
                value: config.num_threads.to_string(),
                message: format!("More threads than the {} available cores", cores),
                suggestion: None,
            }));
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warnings_for(results: &[ValidationResult], parameter: &str) -> usize {
        results
            .iter()
            .filter(|r| matches!(r, ValidationResult::Warning(w) if w.parameter == parameter))
            .count()
    }

    #[test]
    fn test_seeded_default_has_no_findings() {
        let config = CriterionConfig {
            random_seed: Some(1),
            ..CriterionConfig::default()
        };
        assert!(ConfigValidator::new().validate(&config).is_empty());
        assert!(ConfigValidator::strict().check(&config).is_ok());
    }

    #[test]
    fn test_missing_seed_warns() {
        let config = CriterionConfig::default();
        let results = ConfigValidator::new().validate(&config);
        assert_eq!(warnings_for(&results, "random_seed"), 1);
        assert!(ConfigValidator::new().check(&config).is_ok());
        assert!(ConfigValidator::strict().check(&config).is_err());
    }

    #[test]
    fn test_without_rule() {
        let validator = ConfigValidator::strict().without_rule("reproducibility");
        assert!(!validator.rule_names().contains(&"reproducibility"));
        assert!(validator.rule_names().contains(&"hard_limits"));
        assert!(validator.check(&CriterionConfig::default()).is_ok());
    }

    #[test]
    fn test_hard_errors_fail_check() {
        let config = CriterionConfig {
            epsilon: -1.0,
            random_seed: Some(1),
            ..CriterionConfig::default()
        };
        let results = ConfigValidator::new().validate(&config);
        assert!(results
            .iter()
            .any(|r| matches!(r, ValidationResult::Error(e) if e.parameter == "epsilon")));
        assert!(ConfigValidator::new().check(&config).is_err());
    }

    #[test]
    fn test_loose_tolerances_warn() {
        let config = CriterionConfig {
            pinv_tolerances: vec![1e-8, 0.1],
            epsilon: 0.5,
            random_seed: Some(1),
            ..CriterionConfig::default()
        };
        let results = ConfigValidator::new().validate(&config);
        assert_eq!(warnings_for(&results, "pinv_tolerances"), 1);
        assert_eq!(warnings_for(&results, "epsilon"), 1);
    }

    #[test]
    fn test_custom_rule() {
        struct NoParallel;
        impl ValidationRule for NoParallel {
            fn name(&self) -> &'static str {
                "no_parallel"
            }
            fn validate(&self, config: &CriterionConfig) -> Vec<ValidationResult> {
                if config.parallel {
                    vec![ValidationResult::Error(ValidationError {
                        parameter: "parallel".to_string(),
                        value: "true".to_string(),
                        message: "not allowed here".to_string(),
                    })]
                } else {
                    vec![ValidationResult::Valid]
                }
            }
        }

        let validator = ConfigValidator::new().add_rule(Box::new(NoParallel));
        let config = CriterionConfig {
            parallel: true,
            random_seed: Some(2),
            ..CriterionConfig::default()
        };
        assert!(validator.check(&config).is_err());
    }
}
