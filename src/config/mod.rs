//! Configuration of the split criteria.
//!
//! A [`CriterionConfig`] can be built in code, read from a `.toml`/`.json`
//! file, or taken from `SPLIT_CRITERIA_*` environment variables. Every
//! criterion validates its configuration once at construction.

pub mod core;
pub mod validation;

pub use self::core::{CriterionConfig, CriterionConfigBuilder};
pub use validation::{ConfigValidator, ValidationError, ValidationResult, ValidationRule, ValidationWarning};

use crate::core::error::Result;
use std::path::PathBuf;

/// Conventional file name for a criterion configuration
pub const DEFAULT_CONFIG_FILE: &str = "split_criteria.toml";

/// Where a configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Default configuration values
    Default,
    /// Configuration file, format chosen by extension
    File(PathBuf),
    /// Defaults overridden by environment variables
    Environment,
    /// A file, then environment overrides on top
    FileWithEnvironment(PathBuf),
}

impl ConfigSource {
    /// Loads and validates the configuration
    pub fn load(&self) -> Result<CriterionConfig> {
        let config = match self {
            ConfigSource::Default => CriterionConfig::default(),
            ConfigSource::File(path) => CriterionConfig::load_from_file(path)?,
            ConfigSource::Environment => CriterionConfig::load_from_environment()?,
            ConfigSource::FileWithEnvironment(path) => {
                let mut config = CriterionConfig::load_from_file(path)?;
                config.apply_environment_overrides()?;
                config
            }
        };
        log::debug!("Loaded criterion configuration from {:?}", self);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source() {
        let config = ConfigSource::Default.load().unwrap();
        assert_eq!(config, CriterionConfig::default());
    }

    #[test]
    fn test_missing_file_source() {
        let source = ConfigSource::File(PathBuf::from("/nonexistent/split_criteria.toml"));
        assert!(source.load().is_err());
    }
}
