//! Core infrastructure shared by every split criterion.
//!
//! - [`types`]: index aliases, selection policy and objective
//! - [`constants`]: defaults for the numerical tunables
//! - [`error`]: the crate error type
//! - [`traits`]: the ranking and split-finding seams a criterion is built from
//! - [`utils`]: seeded random streams
//!
//! ```rust
//! use split_criteria::core::{
//!     error::{Result, SplitError},
//!     types::{Objective, SelectionPolicy},
//! };
//!
//! let policy = Objective::RelativeGain.policy();
//! assert_eq!(policy, SelectionPolicy::Maximize);
//! # Ok::<(), SplitError>(())
//! ```

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
pub mod utils;

pub use constants::*;
pub use error::{Result, SplitError};
pub use traits::*;
pub use types::*;

use std::sync::OnceLock;

static LOGGING: OnceLock<()> = OnceLock::new();

/// Installs `env_logger` once per process with `info` as the default filter.
///
/// `RUST_LOG` still takes precedence. Calling this when another logger is
/// already installed is harmless.
pub fn initialize_logging() {
    LOGGING.get_or_init(|| {
        let env = env_logger::Env::default().default_filter_or("info");
        if env_logger::Builder::from_env(env).try_init().is_ok() {
            log::debug!("split-criteria {} logging initialized", SPLIT_CRITERIA_VERSION);
        }
    });
}
