//! Default values for the tunables of the split criteria.
//!
//! None of these are read as process-wide globals by the algorithms; they seed
//! [`CriterionConfig::default`](crate::config::CriterionConfig), which is
//! what every component receives.

/// Minimum improvement of the cut value for a local-search move to be applied.
pub const DEFAULT_LOCAL_SEARCH_EPSILON: f64 = 1e-6;

/// Largest `values_seen * classes_seen` for which the permutation test uses
/// the exact linear statistic. One larger nominal attribute switches the whole
/// node to the chi-square statistic.
pub const DEFAULT_BIG_CONTINGENCY_TABLE_THRESHOLD: usize = 200;

/// Relative singular-value cut-offs tried, in order, when pseudo-inverting the
/// covariance of the linear statistic. The last entry is the ceiling.
pub const DEFAULT_PINV_TOLERANCES: [f64; 6] = [1e-15, 1e-12, 1e-10, 1e-8, 1e-6, 1e-4];

/// Absolute tolerance under which two class-probability entries are the same.
pub const DEFAULT_PROBABILITY_TOLERANCE: f64 = 1e-10;

/// Relative pivot threshold below which the pivoted Cholesky stops.
pub const DEFAULT_CHOLESKY_TOLERANCE: f64 = 1e-9;

/// Sweep budget of the default semidefinite relaxation solver.
pub const DEFAULT_SDP_MAX_ITERATIONS: usize = 1000;

/// Relative objective change under which the relaxation solver stops.
pub const DEFAULT_SDP_TOLERANCE: f64 = 1e-7;

/// Largest number of non-empty classes for which Twoing enumerates every
/// superclass bipartition (2^(C-1) - 1 candidates).
pub const DEFAULT_MAX_SUPERCLASS_CLASSES: usize = 16;

/// Default number of threads for parallel attribute evaluation.
/// 0 means use all available cores.
pub const DEFAULT_NUM_THREADS: usize = 0;

/// Number of sweeps without improvement after which the relaxation solver
/// reports convergence even if the tolerance has not been met.
pub const SDP_STALL_SWEEPS: usize = 25;

/// Version information.
pub const SPLIT_CRITERIA_VERSION: &str = env!("CARGO_PKG_VERSION");
