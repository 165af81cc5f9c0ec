//! Recorded sample traces
//!
//! A trace file lists the code identities observed during a run and the
//! stack samples attributed to them:
//!
//! ```json
//! {
//!   "context": 1,
//!   "entries": [
//!     { "tag": "function", "name": "main", "resource": "app.js", "line": 1, "kind": "js" },
//!     { "tag": "builtin", "name": "ArrayPush", "builtin_id": 12 }
//!   ],
//!   "samples": [
//!     { "frames": [ { "entry": 1 }, { "entry": 0, "line": 4 } ], "src_line": 4 },
//!     { "frames": [ { "entry": "(garbage collector)" } ] }
//!   ]
//! }
//! ```
//!
//! Frames are leaf first. An entry reference is either an index into
//! `entries` or the name of a synthetic entry; a missing reference marks a
//! frame that could not be identified.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use ticktree_common::{
    CodeEventTag, CodeKind, NO_COLUMN_NUMBER_INFO, NO_LINE_NUMBER_INFO, NO_SCRIPT_ID,
};

use crate::code::{CodeIdentity, SourcePositionTable, SyntheticKind};
use crate::domain::{ContextId, TraceError};
use crate::profiling::TickSample;
use crate::tree::StackFrame;

/// One observed code identity.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryRecord {
    pub tag: CodeEventTag,
    pub name: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default = "no_line")]
    pub line: i32,
    #[serde(default = "no_column")]
    pub column: i32,
    #[serde(default)]
    pub kind: CodeKind,
    #[serde(default)]
    pub cross_origin: bool,
    #[serde(default = "no_script")]
    pub script_id: i32,
    #[serde(default)]
    pub position: i32,
    pub builtin_id: Option<u32>,
    /// (code offset, line) pairs in ascending offset order
    #[serde(default)]
    pub positions: Vec<(i32, i32)>,
}

fn no_line() -> i32 {
    NO_LINE_NUMBER_INFO
}

fn no_column() -> i32 {
    NO_COLUMN_NUMBER_INFO
}

fn no_script() -> i32 {
    NO_SCRIPT_ID
}

/// Reference from a frame to an entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntryRef {
    Index(usize),
    Synthetic(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrameRecord {
    pub entry: Option<EntryRef>,
    #[serde(default = "no_line")]
    pub line: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleRecord {
    pub frames: Vec<FrameRecord>,
    #[serde(default = "no_line")]
    pub src_line: i32,
}

/// A parsed trace file, before entries are turned into code identities.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleTrace {
    #[serde(default)]
    pub context: u32,
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
    #[serde(default)]
    pub samples: Vec<SampleRecord>,
}

impl SampleTrace {
    /// Parse a trace file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse trace file: {}", path.display()))
    }

    /// # Errors
    /// Returns `Json` if the text is not a valid trace.
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn context(&self) -> ContextId {
        ContextId(self.context)
    }

    /// Build one code identity per entry record.
    ///
    /// # Errors
    /// Returns `InvalidEntry` when a builtin id does not fit.
    pub fn build_entries(&self) -> Result<Vec<Arc<CodeIdentity>>, TraceError> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, record)| -> Result<Arc<CodeIdentity>, TraceError> {
                let line_info = (!record.positions.is_empty())
                    .then(|| record.positions.iter().copied().collect::<SourcePositionTable>());
                let entry = CodeIdentity::new(
                    record.tag,
                    record.name.clone(),
                    record.resource.clone(),
                    record.line,
                    record.column,
                    line_info,
                    record.cross_origin,
                    record.kind,
                );
                entry.set_script_id(record.script_id);
                entry.set_position(record.position);
                if let Some(id) = record.builtin_id {
                    entry
                        .set_builtin_id(id)
                        .map_err(|source| TraceError::InvalidEntry { index, source })?;
                }
                Ok(Arc::new(entry))
            })
            .collect()
    }

    /// Resolve every sample against `entries` (as built by `build_entries`).
    ///
    /// # Errors
    /// Returns `UnknownEntry` or `UnknownSyntheticEntry` for dangling references.
    pub fn resolve_samples(
        &self,
        entries: &[Arc<CodeIdentity>],
    ) -> Result<Vec<TickSample>, TraceError> {
        self.samples
            .iter()
            .enumerate()
            .map(|(sample, record)| -> Result<TickSample, TraceError> {
                let frames = record
                    .frames
                    .iter()
                    .map(|frame| -> Result<StackFrame, TraceError> {
                        let entry = frame
                            .entry
                            .as_ref()
                            .map(|r| resolve_entry(r, entries, sample))
                            .transpose()?;
                        Ok(StackFrame { entry, line_number: frame.line })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TickSample { frames, src_line: record.src_line })
            })
            .collect()
    }
}

fn resolve_entry(
    entry_ref: &EntryRef,
    entries: &[Arc<CodeIdentity>],
    sample: usize,
) -> Result<Arc<CodeIdentity>, TraceError> {
    match entry_ref {
        EntryRef::Index(index) => entries
            .get(*index)
            .cloned()
            .ok_or(TraceError::UnknownEntry { sample, index: *index, len: entries.len() }),
        EntryRef::Synthetic(name) => SyntheticKind::from_entry_name(name)
            .map(|kind| Arc::clone(kind.entry()))
            .ok_or_else(|| TraceError::UnknownSyntheticEntry(name.clone())),
    }
}
