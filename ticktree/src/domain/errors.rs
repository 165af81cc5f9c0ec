//! Structured error types for ticktree
//!
//! Using thiserror for automatic Display implementation and error chaining.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodeEventError {
    #[error("Builtin id {0} does not fit the packed builtin field")]
    BuiltinIdOutOfRange(u32),
}

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Sample {sample} references entry {index}, but only {len} entries are defined")]
    UnknownEntry { sample: usize, index: usize, len: usize },

    #[error("Unknown synthetic entry: {0}")]
    UnknownSyntheticEntry(String),

    #[error("Invalid entry {index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: CodeEventError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Sample collector has shut down")]
    Disconnected,

    #[error("Sample collector thread panicked")]
    Panicked,

    #[error("Failed to spawn sample collector thread: {0}")]
    Spawn(#[source] std::io::Error),
}
