//! Self time per source type, and the hottest individual nodes.
//!
//! # Performance
//!
//! - `summarize()`: O(nodes), one classification per node
//! - `hottest_nodes()`: O(nodes log nodes)

// Percentage calculations intentionally convert u64 to f64
#![allow(clippy::cast_precision_loss)]

use std::cmp::Reverse;

use crate::classification::SourceType;
use crate::domain::NodeIndex;
use crate::tree::ProfileTree;

/// Self ticks attributed to one source type.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub source_type: SourceType,
    pub self_ticks: u64,
    /// Nodes classified as this source type, ticked or not
    pub node_count: usize,
    /// Share of all self ticks (0.0 - 100.0)
    pub percentage: f64,
}

/// A node ranked by its self ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct HotNode {
    pub index: NodeIndex,
    pub name: String,
    pub source_type: SourceType,
    pub self_ticks: u64,
    pub percentage: f64,
}

fn percentage(ticks: u64, total: u64) -> f64 {
    if total > 0 {
        (ticks as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// One row per source type, in `SourceType::ALL` order.
#[must_use]
pub fn summarize(tree: &ProfileTree) -> Vec<CategorySummary> {
    let mut rows: Vec<CategorySummary> = SourceType::ALL
        .into_iter()
        .map(|source_type| CategorySummary {
            source_type,
            self_ticks: 0,
            node_count: 0,
            percentage: 0.0,
        })
        .collect();

    for (_, node) in tree.nodes() {
        let source_type = node.classify();
        if let Some(row) = rows.iter_mut().find(|row| row.source_type == source_type) {
            row.self_ticks += node.self_ticks();
            row.node_count += 1;
        }
    }

    let total: u64 = rows.iter().map(|row| row.self_ticks).sum();
    for row in &mut rows {
        row.percentage = percentage(row.self_ticks, total);
    }
    rows
}

/// Up to `limit` nodes with self ticks, most ticks first. Ties keep
/// construction order.
#[must_use]
pub fn hottest_nodes(tree: &ProfileTree, limit: usize) -> Vec<HotNode> {
    let total = tree.total_ticks(tree.root_index());
    let mut ticked: Vec<_> = tree.nodes().filter(|(_, node)| node.self_ticks() > 0).collect();
    ticked.sort_by_key(|(_, node)| Reverse(node.self_ticks()));
    ticked
        .into_iter()
        .take(limit)
        .map(|(index, node)| HotNode {
            index,
            name: node.entry().name().to_string(),
            source_type: node.classify(),
            self_ticks: node.self_ticks(),
            percentage: percentage(node.self_ticks(), total),
        })
        .collect()
}
