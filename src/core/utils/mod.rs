//! Utility modules shared across the crate.

pub mod random;

pub use random::Random;
