//! Error handling and error types for split criteria.
//!
//! Most degenerate situations a criterion meets at a node are not errors: an
//! attribute without a usable split simply loses the comparison, and a node
//! where nothing can be split yields the empty [`Split`](crate::split::Split).
//! The variants below cover invalid inputs and configuration, and the one
//! failure that is fatal by contract: the relaxation solver of the Max-Cut
//! pipeline breaking down numerically.

use std::io;
use thiserror::Error;

/// Main error type for the split criteria library.
#[derive(Error, Debug)]
pub enum SplitError {
    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Node statistics whose shapes do not agree with each other
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Out of bounds access
    #[error("Index out of bounds: index {index}, length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// Numerical computation errors (non-finite values, failed decompositions)
    #[error("Numerical error: {message}")]
    Numerical { message: String },

    /// The semidefinite relaxation could not be solved for an attribute
    #[error("Relaxation solver failed on attribute {attribute}: {message}")]
    Solver { attribute: usize, message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Internal library errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Results using SplitError
pub type Result<T> = std::result::Result<T, SplitError>;

impl SplitError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        SplitError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        SplitError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        SplitError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an index out of bounds error
    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        SplitError::IndexOutOfBounds { index, length }
    }

    /// Create a numerical error
    pub fn numerical<S: Into<String>>(message: S) -> Self {
        SplitError::Numerical {
            message: message.into(),
        }
    }

    /// Create a solver error for the given attribute
    pub fn solver<S: Into<String>>(attribute: usize, message: S) -> Self {
        SplitError::Solver {
            attribute,
            message: message.into(),
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        SplitError::Internal {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            SplitError::Config { .. } => "config",
            SplitError::InvalidParameter { .. } => "invalid_parameter",
            SplitError::DimensionMismatch { .. } => "dimension_mismatch",
            SplitError::IndexOutOfBounds { .. } => "index_out_of_bounds",
            SplitError::Numerical { .. } => "numerical",
            SplitError::Solver { .. } => "solver",
            SplitError::Io { .. } => "io",
            SplitError::Json { .. } => "json",
            SplitError::Internal { .. } => "internal",
        }
    }
}
