//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::profiling::TreeDisplayOptions;
use crate::tree::LineMode;

#[derive(Parser)]
#[command(
    name = "ticktree",
    about = "Build and inspect a sampled call tree from a recorded trace",
    after_help = "\
EXAMPLES:
    ticktree samples.json                    Category summary and full tree
    ticktree samples.json --max-depth 3      Only the top of the tree
    ticktree samples.json --summary-only     Category summary only"
)]
pub struct Args {
    /// Recorded sample trace (JSON)
    #[arg(value_name = "TRACE")]
    pub trace: PathBuf,

    /// Deepest tree level to print (root is 0)
    #[arg(long, value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Hide subtrees with fewer total ticks
    #[arg(long, default_value = "0")]
    pub min_ticks: u64,

    /// Number of hottest nodes listed in the summary
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Keep calls from different caller lines apart
    #[arg(long)]
    pub caller_lines: bool,

    /// Samples buffered between producers and the collector
    #[arg(long, default_value = "1024")]
    pub channel_capacity: usize,

    /// Print the category summary without the tree
    #[arg(long)]
    pub summary_only: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    #[must_use]
    pub fn line_mode(&self) -> LineMode {
        if self.caller_lines {
            LineMode::Callers
        } else {
            LineMode::LeafOnly
        }
    }

    #[must_use]
    pub fn display_options(&self) -> TreeDisplayOptions {
        TreeDisplayOptions {
            max_depth: self.max_depth.unwrap_or(usize::MAX),
            min_ticks: self.min_ticks,
        }
    }
}
