//! Tree map built from a flat list of paths.
//!
//! Directories are implied by the paths below them. Chains of single-child
//! directories additionally get a flattened node so they can render as one row.

mod builder;
mod chain_resolver;
mod node;
mod visible_items;

pub use builder::{DEFAULT_ROOT_ID, DEFAULT_ROOT_NAME, PathTree, PathTreeBuilder, TreeBuildError};
pub use chain_resolver::{Chain, ChainResolver, MIN_CHAIN_HOPS};
pub use node::{NodeChildren, NodeKind, TreeNode};
pub use visible_items::TreeItem;
