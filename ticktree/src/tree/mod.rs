//! Per-context call trees
//!
//! - [`node`]: `ProfileNode` and the `NodeTree` contract a node relies on
//! - [`profile_tree`]: `ProfileTree`, the arena that owns nodes, merges
//!   children and attributes samples along call paths
//!
//! Nodes never own each other. The tree owns every node in one `Vec` and
//! parent/child links are `NodeIndex` slots into it, so a node can never
//! outlive its tree.

pub mod node;
pub mod profile_tree;

pub use node::{ChildKey, NodeTree, ProfileNode};
pub use profile_tree::{DepthFirst, LineMode, ProfileTree, StackFrame};
