//! Console rendering of finished trees.
//!
//! Plain text for terminals and logs. Not an interchange format.

use std::fmt::Write;

use ticktree_common::NO_LINE_NUMBER_INFO;

use crate::analysis::{CategorySummary, HotNode};
use crate::tree::ProfileTree;

/// Which nodes `render_tree` prints.
#[derive(Debug, Clone, Copy)]
pub struct TreeDisplayOptions {
    /// Deepest level printed; the root is level 0
    pub max_depth: usize,
    /// Subtrees with fewer total ticks are left out
    pub min_ticks: u64,
}

impl Default for TreeDisplayOptions {
    fn default() -> Self {
        Self { max_depth: usize::MAX, min_ticks: 0 }
    }
}

/// Indented tree, one node per line:
///
/// ```text
/// (root)  total=4 self=0 [internal] #1
///   main app.js:1  total=3 self=1 [script] #2
/// ```
#[must_use]
pub fn render_tree(tree: &ProfileTree, options: TreeDisplayOptions) -> String {
    let mut out = String::new();
    let totals = tree.subtree_totals();
    let mut skip_below: Option<usize> = None;

    for (index, depth) in tree.iter_depth_first() {
        if let Some(limit) = skip_below {
            if depth > limit {
                continue;
            }
            skip_below = None;
        }
        let total = totals[index.0];
        if depth > options.max_depth || (total < options.min_ticks && depth > 0) {
            skip_below = Some(depth);
            continue;
        }

        let node = tree.node(index);
        let entry = node.entry();
        let location = if entry.resource_name().is_empty() {
            String::new()
        } else if entry.line_number() == NO_LINE_NUMBER_INFO {
            format!(" {}", entry.resource_name())
        } else {
            format!(" {}:{}", entry.resource_name(), entry.line_number())
        };
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{:indent$}{}{location}  total={total} self={} [{}] #{}",
            "",
            entry.name(),
            node.self_ticks(),
            node.classify(),
            node.id().0,
            indent = depth * 2,
        );
    }
    out
}

/// Category table followed by the hottest nodes.
#[must_use]
pub fn render_summary(rows: &[CategorySummary], hot: &[HotNode]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:>10} {:>8} {:>7}", "Category", "Self", "Share", "Nodes");
    let _ = writeln!(out, "{}", "─".repeat(40));
    for row in rows {
        let _ = writeln!(
            out,
            "{:<12} {:>10} {:>7.1}% {:>7}",
            row.source_type.as_str(),
            row.self_ticks,
            row.percentage,
            row.node_count
        );
    }
    if !hot.is_empty() {
        let _ = writeln!(out, "\nHottest nodes:");
        for node in hot {
            let _ = writeln!(
                out,
                "  {:>6.1}%  {:>8}  {} [{}]",
                node.percentage, node.self_ticks, node.name, node.source_type
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{hottest_nodes, summarize};
    use crate::code::CodeIdentity;
    use crate::domain::ContextId;
    use crate::tree::StackFrame;
    use std::sync::Arc;
    use ticktree_common::{CodeEventTag, CodeKind};

    fn create_test_tree() -> ProfileTree {
        let mut tree = ProfileTree::new(ContextId(1));
        let main = Arc::new(CodeIdentity::new(
            CodeEventTag::Function,
            "main",
            "app.js",
            1,
            1,
            None,
            false,
            CodeKind::Js,
        ));
        let leaf = Arc::new(CodeIdentity::named(CodeEventTag::Callback, "onRead"));
        let cold = Arc::new(CodeIdentity::named(CodeEventTag::Function, "cold"));
        let hot_path = [
            StackFrame::new(Arc::clone(&leaf), 0),
            StackFrame::new(Arc::clone(&main), 0),
        ];
        tree.add_path_from_end(&hot_path, 0, true);
        tree.add_path_from_end(&hot_path, 0, true);
        tree.add_path_from_end(&[StackFrame::new(cold, 0)], 0, false);
        tree
    }

    #[test]
    fn test_render_tree_indents_by_depth() {
        let text = render_tree(&create_test_tree(), TreeDisplayOptions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("(root)  total=2"));
        assert!(lines[1].starts_with("  main app.js:1  total=2 self=0 [script]"));
        assert!(lines[2].starts_with("    onRead  total=2 self=2 [callback]"));
        assert!(lines[3].starts_with("  cold  total=0"));
    }

    #[test]
    fn test_render_tree_respects_limits() {
        let options = TreeDisplayOptions { max_depth: 1, min_ticks: 1 };
        let text = render_tree(&create_test_tree(), options);
        assert_eq!(text.lines().count(), 2);
        assert!(!text.contains("onRead"));
        assert!(!text.contains("cold"));
    }

    #[test]
    fn test_render_tree_totals_on_deep_chain() {
        let mut tree = ProfileTree::new(ContextId(1));
        let path: Vec<StackFrame> = (0..300)
            .map(|depth| {
                let entry = CodeIdentity::new(
                    CodeEventTag::Function,
                    format!("f{depth}"),
                    "deep.js",
                    depth,
                    1,
                    None,
                    false,
                    CodeKind::Js,
                );
                StackFrame::new(Arc::new(entry), 0)
            })
            .collect();
        tree.add_path_from_end(&path, 0, true);

        let text = render_tree(&tree, TreeDisplayOptions::default());
        assert_eq!(text.lines().count(), 301);
        assert!(text.lines().all(|line| line.contains("total=1 ")));
    }

    #[test]
    fn test_render_summary_lists_categories() {
        let tree = create_test_tree();
        let text = render_summary(&summarize(&tree), &hottest_nodes(&tree, 5));
        assert!(text.contains("callback"));
        assert!(text.contains("100.0%"));
        assert!(text.contains("Hottest nodes:"));
        assert!(text.contains("onRead [callback]"));
    }
}
