//! Analysis logic for call trees
//!
//! This module contains pure aggregation over finished trees, separated from
//! the console presentation in `profiling::tree_display`.

pub mod category_summary;

pub use category_summary::{hottest_nodes, summarize, CategorySummary, HotNode};
