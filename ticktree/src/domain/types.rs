//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers keep the tree's issued node IDs apart from the
//! arena slots nodes live in, and make function signatures more expressive.

use std::fmt;

/// Node ID issued by the owning tree
///
/// IDs start at 1 (the root) and are strictly increasing in construction
/// order. Downstream consumers reference nodes by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// ID issued to the first node of every tree
    pub const FIRST: NodeId = NodeId(1);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node#{}", self.0)
    }
}

/// Arena slot of a node inside its tree
///
/// Only meaningful for the tree that returned it.
/// This is NOT the same as the node's ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

/// Execution context ID
///
/// Identifies the isolated execution context (one heap, one call tree per
/// profile) a tree was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContextId(pub u32);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context#{}", self.0)
    }
}

impl From<u32> for ContextId {
    fn from(id: u32) -> Self {
        ContextId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(7).to_string(), "Node#7");
        assert_eq!(NodeId::FIRST, NodeId(1));
    }

    #[test]
    fn test_node_ids_order_by_issue() {
        assert!(NodeId(2) < NodeId(3));
    }

    #[test]
    fn test_context_id_conversion() {
        let context = ContextId::from(4u32);
        assert_eq!(context.0, 4);
        assert_eq!(context.to_string(), "Context#4");
    }
}
