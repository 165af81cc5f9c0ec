//! Call-tree nodes.

use log::trace;
use std::collections::HashMap;
use std::sync::Arc;

use crate::classification::{classify_entry, SourceType};
use crate::code::{CodeIdentity, FunctionKey};
use crate::domain::{ContextId, NodeId, NodeIndex};

/// What a node needs from the tree that owns it.
pub trait NodeTree {
    /// Fresh ID, strictly greater than every ID issued before by this tree.
    fn next_node_id(&mut self) -> NodeId;

    /// Take ownership of a newly built node and return its slot. A node with
    /// a parent is linked under it.
    fn enqueue_node(&mut self, node: ProfileNode) -> NodeIndex;

    /// Execution context the tree was built for.
    fn execution_context(&self) -> ContextId;

    /// The root slot, once the root has been built.
    fn root(&self) -> Option<NodeIndex>;

    /// Whether `index` names a node already owned by this tree.
    fn contains(&self, index: NodeIndex) -> bool;
}

/// Children are merged by function and call line.
pub type ChildKey = (FunctionKey, i32);

/// One position in a call tree: a code identity reached via one call path.
#[derive(Debug)]
pub struct ProfileNode {
    id: NodeId,
    entry: Arc<CodeIdentity>,
    parent: Option<NodeIndex>,
    context: ContextId,
    line_number: i32,
    self_ticks: u64,
    children: HashMap<ChildKey, NodeIndex>,
    children_list: Vec<NodeIndex>,
    line_ticks: HashMap<i32, u32>,
}

impl ProfileNode {
    /// Build a node and hand it to `tree`.
    ///
    /// Only the first node of a tree may be built without a parent.
    ///
    /// # Panics
    /// Panics if `parent` is `None` and `tree` already has a root, or if
    /// `parent` is not a node of `tree`.
    pub fn construct<T: NodeTree + ?Sized>(
        tree: &mut T,
        entry: Arc<CodeIdentity>,
        parent: Option<NodeIndex>,
        line_number: i32,
    ) -> NodeIndex {
        assert!(
            parent.is_some() || tree.root().is_none(),
            "non-root node '{}' must have a parent",
            entry.name()
        );
        if let Some(parent) = parent {
            assert!(
                tree.contains(parent),
                "parent {parent:?} of '{}' is not a node of this tree",
                entry.name()
            );
        }
        let node = ProfileNode {
            id: tree.next_node_id(),
            entry,
            parent,
            context: tree.execution_context(),
            line_number,
            self_ticks: 0,
            children: HashMap::new(),
            children_list: Vec::new(),
            line_ticks: HashMap::new(),
        };
        trace!("{} {}: {} (parent {:?})", node.context, node.id, node.entry.name(), node.parent);
        tree.enqueue_node(node)
    }

    /// Attribute one more sample to this exact position.
    pub fn record_sample(&mut self) {
        self.self_ticks += 1;
    }

    /// Count one more sample on `src_line` inside this node's code.
    pub fn increment_line_ticks(&mut self, src_line: i32) {
        *self.line_ticks.entry(src_line).or_insert(0) += 1;
    }

    /// Reporting category of this node.
    #[must_use]
    pub fn classify(&self) -> SourceType {
        classify_entry(&self.entry)
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn entry(&self) -> &Arc<CodeIdentity> {
        &self.entry
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    #[must_use]
    pub fn execution_context(&self) -> ContextId {
        self.context
    }

    /// Line in the parent's code this call was made from.
    #[must_use]
    pub fn line_number(&self) -> i32 {
        self.line_number
    }

    #[must_use]
    pub fn self_ticks(&self) -> u64 {
        self.self_ticks
    }

    /// Children in the order they were added.
    #[must_use]
    pub fn children(&self) -> &[NodeIndex] {
        &self.children_list
    }

    #[must_use]
    pub fn line_ticks(&self) -> &HashMap<i32, u32> {
        &self.line_ticks
    }

    pub(crate) fn find_child(&self, key: &ChildKey) -> Option<NodeIndex> {
        self.children.get(key).copied()
    }

    /// The first child registered under a key stays the one found by lookups.
    pub(crate) fn insert_child(&mut self, key: ChildKey, child: NodeIndex) {
        self.children.entry(key).or_insert(child);
        self.children_list.push(child);
    }
}
