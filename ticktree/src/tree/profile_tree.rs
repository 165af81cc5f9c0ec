//! Arena-owned call tree.
//!
//! # Sample Attribution
//!
//! ```text
//! sampled stack (leaf first)        tree after add_path_from_end
//!
//!   [0] parse   line 12               (root)
//!   [1] load    line 40                 └── main
//!   [2] main    line 3                        └── load
//!                                                 └── parse  self_ticks += 1
//! ```
//!
//! The path is walked from the outermost frame to the leaf, reusing a child
//! when one with the same function (and call line, in `LineMode::Callers`)
//! already exists.

use log::debug;
use std::sync::Arc;

use ticktree_common::NO_LINE_NUMBER_INFO;

use super::node::{ChildKey, NodeTree, ProfileNode};
use crate::code::{root_entry, CodeIdentity};
use crate::domain::{ContextId, NodeId, NodeIndex};

/// Which source lines distinguish otherwise identical children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineMode {
    /// One child per function; line information only on the leaf's line ticks
    #[default]
    LeafOnly,
    /// One child per function and call-site line in the caller
    Callers,
}

/// One frame of a sampled stack.
///
/// `entry` is `None` for frames the code-event source could not identify;
/// those frames are skipped during attribution.
#[derive(Debug, Clone)]
pub struct StackFrame {
    pub entry: Option<Arc<CodeIdentity>>,
    pub line_number: i32,
}

impl StackFrame {
    #[must_use]
    pub fn new(entry: Arc<CodeIdentity>, line_number: i32) -> Self {
        Self { entry: Some(entry), line_number }
    }
}

/// Call tree for one execution context.
#[derive(Debug)]
pub struct ProfileTree {
    context: ContextId,
    line_mode: LineMode,
    nodes: Vec<ProfileNode>,
    root: Option<NodeIndex>,
    next_node_id: u32,
}

impl ProfileTree {
    #[must_use]
    pub fn new(context: ContextId) -> Self {
        Self::with_line_mode(context, LineMode::default())
    }

    #[must_use]
    pub fn with_line_mode(context: ContextId, line_mode: LineMode) -> Self {
        let mut tree = Self {
            context,
            line_mode,
            nodes: Vec::new(),
            root: None,
            next_node_id: NodeId::FIRST.0,
        };
        ProfileNode::construct(&mut tree, Arc::clone(root_entry()), None, NO_LINE_NUMBER_INFO);
        tree
    }

    #[must_use]
    pub fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Slot of the root node. Always the first slot.
    #[must_use]
    pub fn root_index(&self) -> NodeIndex {
        NodeIndex(0)
    }

    #[must_use]
    pub fn root_node(&self) -> &ProfileNode {
        &self.nodes[0]
    }

    /// # Panics
    /// Panics if `index` did not come from this tree.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &ProfileNode {
        &self.nodes[index.0]
    }

    /// # Panics
    /// Panics if `index` did not come from this tree.
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut ProfileNode {
        &mut self.nodes[index.0]
    }

    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&ProfileNode> {
        self.nodes.get(index.0)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in construction order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &ProfileNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeIndex(i), node))
    }

    #[must_use]
    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.node(index).children()
    }

    #[must_use]
    pub fn find_child(
        &self,
        parent: NodeIndex,
        entry: &Arc<CodeIdentity>,
        line_number: i32,
    ) -> Option<NodeIndex> {
        self.node(parent).find_child(&(entry.function_key(), line_number))
    }

    /// Existing child of `parent` for this function and line, or a new one.
    pub fn find_or_add_child(
        &mut self,
        parent: NodeIndex,
        entry: &Arc<CodeIdentity>,
        line_number: i32,
    ) -> NodeIndex {
        match self.find_child(parent, entry, line_number) {
            Some(child) => child,
            None => ProfileNode::construct(self, Arc::clone(entry), Some(parent), line_number),
        }
    }

    /// Attribute a sampled stack and return the leaf's node.
    ///
    /// `path` is leaf first. Frames without an identity are skipped; a path
    /// with no identified frames resolves to the root. With `update_stats`
    /// the leaf gets one self tick and, when `src_line` is known, a line tick.
    pub fn add_path_from_end(
        &mut self,
        path: &[StackFrame],
        src_line: i32,
        update_stats: bool,
    ) -> NodeIndex {
        let mut node = self.root_index();
        let mut parent_line_number = NO_LINE_NUMBER_INFO;
        for frame in path.iter().rev() {
            let Some(entry) = frame.entry.as_ref() else {
                continue;
            };
            node = self.find_or_add_child(node, entry, parent_line_number);
            parent_line_number = match self.line_mode {
                LineMode::Callers => frame.line_number,
                LineMode::LeafOnly => NO_LINE_NUMBER_INFO,
            };
        }
        if update_stats {
            let leaf = self.node_mut(node);
            leaf.record_sample();
            if src_line != NO_LINE_NUMBER_INFO {
                leaf.increment_line_ticks(src_line);
            }
        }
        node
    }

    /// Pre-order walk yielding each node with its depth (root is 0).
    #[must_use]
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst { tree: self, stack: vec![(self.root_index(), 0)] }
    }

    /// Self ticks of `index` and everything below it.
    #[must_use]
    pub fn total_ticks(&self, index: NodeIndex) -> u64 {
        let mut total = 0;
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            let node = self.node(current);
            total += node.self_ticks();
            stack.extend_from_slice(node.children());
        }
        total
    }

    /// Subtree tick totals for every node, indexed by slot.
    ///
    /// A child always sits in a later slot than its parent, so one backwards
    /// pass folds every subtree into its parent.
    #[must_use]
    pub fn subtree_totals(&self) -> Vec<u64> {
        let mut totals: Vec<u64> = self.nodes.iter().map(ProfileNode::self_ticks).collect();
        for (index, node) in self.nodes.iter().enumerate().rev() {
            if let Some(parent) = node.parent() {
                totals[parent.0] += totals[index];
            }
        }
        totals
    }

    /// Number of edges from the root to `index`.
    #[must_use]
    pub fn depth(&self, index: NodeIndex) -> usize {
        std::iter::successors(self.node(index).parent(), |&parent| self.node(parent).parent())
            .count()
    }
}

impl NodeTree for ProfileTree {
    fn next_node_id(&mut self) -> NodeId {
        let id = self.next_node_id;
        assert!(id < u32::MAX, "node id space exhausted");
        self.next_node_id += 1;
        NodeId(id)
    }

    fn enqueue_node(&mut self, node: ProfileNode) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        match node.parent() {
            Some(parent) => {
                let key: ChildKey = (node.entry().function_key(), node.line_number());
                self.node_mut(parent).insert_child(key, index);
            }
            None => {
                debug!("{}: call tree created", self.context);
                self.root = Some(index);
            }
        }
        self.nodes.push(node);
        index
    }

    fn execution_context(&self) -> ContextId {
        self.context
    }

    fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    fn contains(&self, index: NodeIndex) -> bool {
        index.0 < self.nodes.len()
    }
}

/// Iterator returned by [`ProfileTree::iter_depth_first`].
pub struct DepthFirst<'a> {
    tree: &'a ProfileTree,
    stack: Vec<(NodeIndex, usize)>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (NodeIndex, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, depth) = self.stack.pop()?;
        let children = self.tree.children(index);
        self.stack.extend(children.iter().rev().map(|&child| (child, depth + 1)));
        Some((index, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::SourceType;
    use crate::code::{gc_entry, root_entry};
    use ticktree_common::{CodeEventTag, CodeKind};

    fn function(name: &'static str) -> Arc<CodeIdentity> {
        Arc::new(CodeIdentity::new(
            CodeEventTag::Function,
            name,
            "app.js",
            1,
            1,
            None,
            false,
            CodeKind::Js,
        ))
    }

    fn frames(entries: &[&Arc<CodeIdentity>]) -> Vec<StackFrame> {
        entries
            .iter()
            .map(|&entry| StackFrame::new(Arc::clone(entry), NO_LINE_NUMBER_INFO))
            .collect()
    }

    #[test]
    fn test_new_tree_has_root() {
        let tree = ProfileTree::new(ContextId(1));
        let root = tree.root_node();
        assert!(Arc::ptr_eq(root.entry(), root_entry()));
        assert_eq!(root.id(), NodeId::FIRST);
        assert_eq!(root.parent(), None);
        assert_eq!(tree.root(), Some(tree.root_index()));
        assert_eq!(tree.node_count(), 1);
        assert!(tree.children(tree.root_index()).is_empty());
    }

    #[test]
    fn test_find_or_add_child_merges_same_function() {
        let mut tree = ProfileTree::new(ContextId(1));
        let root = tree.root_index();
        let a = tree.find_or_add_child(root, &function("a"), 0);
        let again = tree.find_or_add_child(root, &function("a"), 0);
        assert_eq!(a, again);
        assert_eq!(tree.children(root), &[a]);
        assert_eq!(tree.find_child(root, &function("a"), 0), Some(a));
        assert_eq!(tree.find_child(root, &function("b"), 0), None);
    }

    #[test]
    fn test_add_path_from_end_builds_outermost_first() {
        let mut tree = ProfileTree::new(ContextId(1));
        let (main, load, parse) = (function("main"), function("load"), function("parse"));
        let leaf = tree.add_path_from_end(&frames(&[&parse, &load, &main]), 12, true);

        assert_eq!(tree.node(leaf).entry().name(), "parse");
        assert_eq!(tree.node(leaf).self_ticks(), 1);
        assert_eq!(tree.node(leaf).line_ticks()[&12], 1);
        assert_eq!(tree.depth(leaf), 3);

        let names: Vec<_> = tree
            .iter_depth_first()
            .map(|(i, _)| tree.node(i).entry().name().to_string())
            .collect();
        assert_eq!(names, ["(root)", "main", "load", "parse"]);
    }

    #[test]
    fn test_add_path_skips_unidentified_frames() {
        let mut tree = ProfileTree::new(ContextId(1));
        let main = function("main");
        let path = vec![
            StackFrame { entry: None, line_number: 0 },
            StackFrame::new(Arc::clone(&main), 0),
        ];
        let leaf = tree.add_path_from_end(&path, NO_LINE_NUMBER_INFO, true);
        assert_eq!(tree.node(leaf).entry().name(), "main");
        assert!(tree.node(leaf).line_ticks().is_empty());
    }

    #[test]
    fn test_empty_path_ticks_root() {
        let mut tree = ProfileTree::new(ContextId(1));
        let leaf = tree.add_path_from_end(&[], NO_LINE_NUMBER_INFO, true);
        assert_eq!(leaf, tree.root_index());
        assert_eq!(tree.root_node().self_ticks(), 1);
    }

    #[test]
    fn test_update_stats_false_only_builds() {
        let mut tree = ProfileTree::new(ContextId(1));
        let leaf = tree.add_path_from_end(&frames(&[&function("f")]), 3, false);
        assert_eq!(tree.node(leaf).self_ticks(), 0);
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_caller_line_mode_splits_call_sites() {
        let mut tree = ProfileTree::with_line_mode(ContextId(1), LineMode::Callers);
        let (main, helper) = (function("main"), function("helper"));
        let from_line = |line| {
            vec![StackFrame::new(Arc::clone(&helper), 0), StackFrame::new(Arc::clone(&main), line)]
        };
        let first = tree.add_path_from_end(&from_line(10), 0, true);
        let second = tree.add_path_from_end(&from_line(20), 0, true);
        let repeat = tree.add_path_from_end(&from_line(10), 0, true);

        assert_ne!(first, second);
        assert_eq!(first, repeat);
        assert_eq!(tree.node(first).line_number(), 10);
        assert_eq!(tree.node(second).line_number(), 20);
    }

    #[test]
    fn test_leaf_only_mode_merges_call_sites() {
        let mut tree = ProfileTree::new(ContextId(1));
        let (main, helper) = (function("main"), function("helper"));
        let from_line = |line| {
            vec![StackFrame::new(Arc::clone(&helper), 0), StackFrame::new(Arc::clone(&main), line)]
        };
        let first = tree.add_path_from_end(&from_line(10), 0, true);
        let second = tree.add_path_from_end(&from_line(20), 0, true);
        assert_eq!(first, second);
        assert_eq!(tree.node(first).self_ticks(), 2);
    }

    #[test]
    fn test_total_ticks_sums_subtree() {
        let mut tree = ProfileTree::new(ContextId(1));
        let (main, a, b) = (function("main"), function("a"), function("b"));
        tree.add_path_from_end(&frames(&[&a, &main]), 0, true);
        tree.add_path_from_end(&frames(&[&b, &main]), 0, true);
        tree.add_path_from_end(&frames(&[&b, &main]), 0, true);
        let main_node = tree.find_child(tree.root_index(), &main, 0).expect("main exists");
        assert_eq!(tree.total_ticks(main_node), 3);
        assert_eq!(tree.total_ticks(tree.root_index()), 3);
    }

    #[test]
    fn test_subtree_totals_match_total_ticks() {
        let mut tree = ProfileTree::new(ContextId(1));
        let (main, a, b) = (function("main"), function("a"), function("b"));
        tree.add_path_from_end(&frames(&[&a, &main]), 0, true);
        tree.add_path_from_end(&frames(&[&b, &a, &main]), 0, true);
        tree.add_path_from_end(&frames(&[&main]), 0, true);

        let totals = tree.subtree_totals();
        assert_eq!(totals.len(), tree.node_count());
        for (index, _) in tree.nodes() {
            assert_eq!(totals[index.0], tree.total_ticks(index));
        }
        assert_eq!(totals[tree.root_index().0], 3);
    }

    #[test]
    fn test_constructed_node_is_linked_under_parent() {
        let mut tree = ProfileTree::new(ContextId(1));
        let root = tree.root_index();
        let main = function("main");
        let node = ProfileNode::construct(&mut tree, Arc::clone(&main), Some(root), 0);

        assert_eq!(tree.children(root), &[node]);
        assert_eq!(tree.find_or_add_child(root, &main, 0), node);
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_ids_increase_with_construction() {
        let mut tree = ProfileTree::new(ContextId(1));
        for name in ["a", "b", "c"] {
            tree.add_path_from_end(&frames(&[&function(name)]), 0, false);
        }
        let ids: Vec<_> = tree.nodes().map(|(_, node)| node.id().0).collect();
        assert_eq!(ids, [1, 2, 3, 4]);
    }

    #[test]
    fn test_synthetic_child_is_internal() {
        let mut tree = ProfileTree::new(ContextId(1));
        let gc = tree.add_path_from_end(&frames(&[gc_entry()]), 0, true);
        assert_eq!(tree.node(gc).classify(), SourceType::Internal);
    }
}
