//! # ticktree - Main Entry Point
//!
//! Replays a recorded sample trace through the collector thread, then prints
//! the self time per source type and the resulting call tree.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use ticktree::analysis::{hottest_nodes, summarize};
use ticktree::cli::Args;
use ticktree::profiling::{render_summary, render_tree, SampleCollector};
use ticktree::trace_data::SampleTrace;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_NOINPUT: i32 = 66;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let missing_input = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io| io.kind() == std::io::ErrorKind::NotFound);
    if missing_input {
        EXIT_NOINPUT
    } else {
        EXIT_ERROR
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let trace = SampleTrace::from_file(&args.trace)?;
    let entries = trace.build_entries().context("Invalid code entry in trace")?;
    let samples = trace.resolve_samples(&entries).context("Invalid sample in trace")?;
    info!("Loaded {} entries and {} samples", entries.len(), samples.len());

    let (sender, collector) =
        SampleCollector::spawn(trace.context(), args.line_mode(), args.channel_capacity.max(1))?;
    for sample in samples {
        sender.send(sample)?;
    }
    drop(sender);
    let tree = collector.finish()?;
    debug!("{}: tree has {} nodes", tree.root_node().execution_context(), tree.node_count());

    if !args.quiet {
        println!("ticktree v{}", env!("CARGO_PKG_VERSION"));
        println!("trace: {}", args.trace.display());
        println!("context: {}\n", trace.context());
    }

    print!("{}", render_summary(&summarize(&tree), &hottest_nodes(&tree, args.top)));
    if !args.summary_only {
        println!();
        print!("{}", render_tree(&tree, args.display_options()));
    }
    Ok(())
}
