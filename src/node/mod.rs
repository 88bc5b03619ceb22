//! Node-local statistics read by the criteria.

pub mod contingency;
pub mod tree_node;

pub use contingency::{CompactTable, ContingencyTable};
pub use tree_node::{Dataset, TreeNode};
