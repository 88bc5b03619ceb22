//! Dense linear algebra on top of `nalgebra`.
//!
//! Contingency data stays in `ndarray`; the matrices handed to these
//! routines are small (classes, values or their product) and dense.

pub mod cholesky;
pub mod eigen;
pub mod pinv;

pub use cholesky::{pivoted_cholesky, symmetrize, PivotedCholesky};
pub use eigen::principal_eigenvector;
pub use pinv::{pseudo_inverse, PseudoInverse};
