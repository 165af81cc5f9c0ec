//! Profiling pipeline
//!
//! - Sample collection: one thread owns the tree, producers send samples
//! - Tree display: console rendering of finished trees and summaries

pub mod sample_collector;
pub mod tree_display;

pub use sample_collector::{SampleCollector, SampleSender, TickSample};
pub use tree_display::{render_summary, render_tree, TreeDisplayOptions};
