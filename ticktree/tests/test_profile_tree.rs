use std::collections::HashSet;
use std::sync::Arc;

use ticktree::code::{gc_entry, root_entry, CodeIdentity};
use ticktree::domain::{ContextId, NodeId, NodeIndex};
use ticktree::tree::{LineMode, NodeTree, ProfileNode, ProfileTree, StackFrame};
use ticktree_common::{CodeEventTag, CodeKind, NO_LINE_NUMBER_INFO};

fn function(name: &'static str, line: i32) -> Arc<CodeIdentity> {
    Arc::new(CodeIdentity::new(
        CodeEventTag::LazyCompile,
        name,
        "lib.js",
        line,
        1,
        None,
        false,
        CodeKind::Js,
    ))
}

fn stack(entries: &[&Arc<CodeIdentity>]) -> Vec<StackFrame> {
    entries.iter().map(|&entry| StackFrame::new(Arc::clone(entry), NO_LINE_NUMBER_INFO)).collect()
}

#[test]
fn test_same_identity_under_two_parents_gets_two_nodes() {
    let mut tree = ProfileTree::new(ContextId(3));
    let a = function("a", 1);
    let b = function("b", 5);
    let shared = function("shared", 9);

    let under_a = tree.add_path_from_end(&stack(&[&shared, &a]), NO_LINE_NUMBER_INFO, true);
    let under_b = tree.add_path_from_end(&stack(&[&shared, &b]), NO_LINE_NUMBER_INFO, true);

    assert_ne!(under_a, under_b);
    assert_ne!(tree.node(under_a).id(), tree.node(under_b).id());
    assert!(Arc::ptr_eq(tree.node(under_a).entry(), tree.node(under_b).entry()));
}

#[test]
fn test_ids_strictly_increase_in_construction_order() {
    let mut tree = ProfileTree::new(ContextId(3));
    for name in ["one", "two", "three", "four"] {
        let entry = function(name, 1);
        tree.add_path_from_end(&stack(&[&entry]), NO_LINE_NUMBER_INFO, false);
    }

    let ids: Vec<NodeId> = tree.nodes().map(|(_, node)| node.id()).collect();
    assert_eq!(ids.first(), Some(&NodeId::FIRST));
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
}

#[test]
fn test_self_ticks_count_only_leaf_samples() {
    let mut tree = ProfileTree::new(ContextId(3));
    let outer = function("outer", 1);
    let inner = function("inner", 2);

    let leaf = tree.add_path_from_end(&stack(&[&inner, &outer]), 14, true);
    tree.add_path_from_end(&stack(&[&inner, &outer]), 14, true);
    tree.add_path_from_end(&stack(&[&inner, &outer]), 15, true);

    let parent = tree.node(leaf).parent().expect("has parent");
    assert_eq!(tree.node(leaf).self_ticks(), 3);
    assert_eq!(tree.node(parent).self_ticks(), 0);
    assert_eq!(tree.node(leaf).line_ticks().get(&14), Some(&2));
    assert_eq!(tree.total_ticks(tree.root_index()), 3);
}

#[test]
fn test_node_reports_tree_context() {
    let mut tree = ProfileTree::new(ContextId(42));
    let path = [StackFrame::new(Arc::clone(gc_entry()), 0)];
    let leaf = tree.add_path_from_end(&path, NO_LINE_NUMBER_INFO, true);
    assert_eq!(tree.node(leaf).execution_context(), ContextId(42));
    assert_eq!(tree.execution_context(), ContextId(42));
}

#[test]
fn test_caller_lines_split_children() {
    let mut tree = ProfileTree::with_line_mode(ContextId(1), LineMode::Callers);
    let caller = function("caller", 1);
    let callee = function("callee", 20);

    let first = tree.add_path_from_end(
        &[StackFrame::new(Arc::clone(&callee), 21), StackFrame::new(Arc::clone(&caller), 4)],
        NO_LINE_NUMBER_INFO,
        true,
    );
    let second = tree.add_path_from_end(
        &[StackFrame::new(Arc::clone(&callee), 21), StackFrame::new(Arc::clone(&caller), 8)],
        NO_LINE_NUMBER_INFO,
        true,
    );

    assert_ne!(first, second);
    assert_eq!(tree.node(first).line_number(), 4);
    assert_eq!(tree.node(second).line_number(), 8);
}

#[test]
#[should_panic(expected = "must have a parent")]
fn test_second_parentless_node_panics() {
    let mut tree = ProfileTree::new(ContextId(1));
    ProfileNode::construct(&mut tree, function("orphan", 1), None, NO_LINE_NUMBER_INFO);
}

#[test]
fn test_root_is_the_root_singleton() {
    let tree = ProfileTree::new(ContextId(1));
    assert_eq!(tree.root(), Some(tree.root_index()));
    assert!(tree.root_node().parent().is_none());
    assert!(Arc::ptr_eq(tree.root_node().entry(), root_entry()));
}

#[test]
fn test_directly_constructed_node_is_reachable() {
    let mut tree = ProfileTree::new(ContextId(1));
    let root = tree.root_index();
    let node =
        ProfileNode::construct(&mut tree, function("direct", 1), Some(root), NO_LINE_NUMBER_INFO);
    tree.node_mut(node).record_sample();

    assert_eq!(tree.children(root), &[node]);
    assert_eq!(tree.iter_depth_first().count(), 2);
    assert_eq!(tree.total_ticks(root), 1);
    assert_eq!(tree.subtree_totals()[root.0], 1);
    assert_eq!(tree.depth(node), 1);
}

#[test]
#[should_panic(expected = "is not a node of this tree")]
fn test_parent_from_outside_the_tree_panics() {
    let mut tree = ProfileTree::new(ContextId(1));
    let stray = function("stray", 1);
    ProfileNode::construct(&mut tree, stray, Some(NodeIndex(999)), NO_LINE_NUMBER_INFO);
}
