//! # Sample Collection
//!
//! Confines all tree building to one collector thread. Any number of
//! producers hand `TickSample`s over a bounded channel; the collector owns
//! the `ProfileTree` and returns it once every sender is gone.
//!
//! ```text
//! producer ──┐
//! producer ──┼──► bounded channel ──► collector thread ──► ProfileTree
//! producer ──┘
//! ```

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, info};
use std::thread::{self, JoinHandle};

use crate::domain::{CollectorError, ContextId};
use crate::tree::{LineMode, ProfileTree, StackFrame};

/// One attributed stack sample.
#[derive(Debug, Clone)]
pub struct TickSample {
    /// Leaf first
    pub frames: Vec<StackFrame>,
    /// Source line inside the leaf's code, or `NO_LINE_NUMBER_INFO`
    pub src_line: i32,
}

/// Producer handle. Clone it for every producing thread.
#[derive(Debug, Clone)]
pub struct SampleSender {
    tx: Sender<TickSample>,
}

impl SampleSender {
    /// Queue a sample, waiting while the channel is full.
    ///
    /// # Errors
    /// Returns `Disconnected` if the collector thread is gone.
    pub fn send(&self, sample: TickSample) -> Result<(), CollectorError> {
        self.tx.send(sample).map_err(|_| CollectorError::Disconnected)
    }
}

/// Handle to the collector thread.
pub struct SampleCollector {
    context: ContextId,
    handle: JoinHandle<ProfileTree>,
}

impl SampleCollector {
    /// Start a collector building a tree for `context`.
    ///
    /// # Errors
    /// Returns `Spawn` if the thread cannot be created.
    pub fn spawn(
        context: ContextId,
        line_mode: LineMode,
        capacity: usize,
    ) -> Result<(SampleSender, SampleCollector), CollectorError> {
        let (tx, rx) = bounded(capacity);
        let handle = thread::Builder::new()
            .name(format!("ticktree-collector-{}", context.0))
            .spawn(move || collect(context, line_mode, &rx))
            .map_err(CollectorError::Spawn)?;
        debug!("{context}: sample collector started (capacity {capacity})");
        Ok((SampleSender { tx }, SampleCollector { context, handle }))
    }

    #[must_use]
    pub fn execution_context(&self) -> ContextId {
        self.context
    }

    /// Wait for every sender to drop and take the finished tree.
    ///
    /// # Errors
    /// Returns `Panicked` if the collector thread panicked.
    pub fn finish(self) -> Result<ProfileTree, CollectorError> {
        self.handle.join().map_err(|_| CollectorError::Panicked)
    }
}

fn collect(context: ContextId, line_mode: LineMode, rx: &Receiver<TickSample>) -> ProfileTree {
    let mut tree = ProfileTree::with_line_mode(context, line_mode);
    let mut samples = 0u64;
    for sample in rx {
        tree.add_path_from_end(&sample.frames, sample.src_line, true);
        samples += 1;
    }
    info!("{context}: collected {samples} samples into {} nodes", tree.node_count());
    tree
}
