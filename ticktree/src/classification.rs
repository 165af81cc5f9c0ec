//! Source type classification for call-tree nodes.
//!
//! Every node gets one reporting label so report renderers can color or
//! group time by where it was spent.
//!
//! # Classification Strategy
//!
//! 1. **Synthetic identity** - checked by reference, never by value
//!    - `(program)`, `(idle)`, `(garbage collector)`, `(root)` → Internal
//!    - `(unresolved function)` → Unresolved
//!
//! 2. **Code event tag** - fixed table over [`CodeEventTag`]
//!
//! 3. **Unknown raw tag** - Internal, with a one-time warning

use log::warn;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use ticktree_common::CodeEventTag;

use crate::code::{gc_entry, idle_entry, program_entry, root_entry, unresolved_entry, CodeIdentity};

/// Reporting category of a call-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    /// Engine-internal time: synthetic entries, stubs, regexp code
    Internal,
    /// Samples that could not be mapped to known code
    Unresolved,
    /// Code compiled from script source
    Script,
    /// Builtins, handlers and native code
    Builtin,
    /// Embedder callbacks
    Callback,
}

impl SourceType {
    pub const ALL: [SourceType; 5] = [
        SourceType::Internal,
        SourceType::Unresolved,
        SourceType::Script,
        SourceType::Builtin,
        SourceType::Callback,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SourceType::Internal => "internal",
            SourceType::Unresolved => "unresolved",
            SourceType::Script => "script",
            SourceType::Builtin => "builtin",
            SourceType::Callback => "callback",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a code identity.
///
/// # Examples
///
/// ```
/// use ticktree::classification::{classify_entry, SourceType};
/// use ticktree::code::{program_entry, CodeIdentity};
/// use ticktree_common::CodeEventTag;
///
/// assert_eq!(classify_entry(program_entry()), SourceType::Internal);
/// let callback = CodeIdentity::named(CodeEventTag::Callback, "onRead");
/// assert_eq!(classify_entry(&callback), SourceType::Callback);
/// ```
#[must_use]
pub fn classify_entry(entry: &CodeIdentity) -> SourceType {
    let is = |singleton: &Arc<CodeIdentity>| std::ptr::eq(entry, Arc::as_ptr(singleton));

    if is(program_entry()) || is(idle_entry()) || is(gc_entry()) || is(root_entry()) {
        SourceType::Internal
    } else if is(unresolved_entry()) {
        SourceType::Unresolved
    } else if let Some(tag) = entry.tag() {
        source_type_for_tag(tag)
    } else {
        diagnostics().record_unknown_tag(entry.raw_tag(), entry.name());
        SourceType::Internal
    }
}

/// Tag lookup table. Total over the enumeration.
#[must_use]
pub const fn source_type_for_tag(tag: CodeEventTag) -> SourceType {
    match tag {
        CodeEventTag::Eval
        | CodeEventTag::Script
        | CodeEventTag::LazyCompile
        | CodeEventTag::Function
        | CodeEventTag::InterpretedFunction => SourceType::Script,
        CodeEventTag::Builtin
        | CodeEventTag::Handler
        | CodeEventTag::BytecodeHandler
        | CodeEventTag::NativeFunction
        | CodeEventTag::NativeScript
        | CodeEventTag::NativeLazyCompile => SourceType::Builtin,
        CodeEventTag::Callback => SourceType::Callback,
        CodeEventTag::RegExp
        | CodeEventTag::Stub
        | CodeEventTag::CodeCreation
        | CodeEventTag::CodeDisableOpt
        | CodeEventTag::CodeMove
        | CodeEventTag::CodeDelete
        | CodeEventTag::CodeMovingGc
        | CodeEventTag::SharedFunctionMove
        | CodeEventTag::SnapshotCodeName
        | CodeEventTag::Tick
        | CodeEventTag::CountMarker => SourceType::Internal,
    }
}

// =============================================================================
// CLASSIFICATION DIAGNOSTICS
// =============================================================================

/// Remembers raw tags that fell back to Internal, so each one is only
/// warned about once.
pub struct ClassificationDiagnostics {
    warned_tags: Mutex<HashSet<u8>>,
    unknown_tags: AtomicU64,
}

impl ClassificationDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            warned_tags: Mutex::new(HashSet::new()),
            unknown_tags: AtomicU64::new(0),
        }
    }

    /// Record a raw tag with no table entry, warning the first time it shows up.
    pub fn record_unknown_tag(&self, raw_tag: u8, name: &str) {
        self.unknown_tags.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut warned) = self.warned_tags.lock() {
            if warned.insert(raw_tag) {
                warn!("Unknown code event tag {raw_tag} on '{name}' - classifying as internal");
            }
        }
    }

    /// Number of classifications that hit an unknown raw tag.
    #[must_use]
    pub fn unknown_tag_count(&self) -> u64 {
        self.unknown_tags.load(Ordering::Relaxed)
    }
}

impl Default for ClassificationDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

static DIAGNOSTICS: OnceLock<ClassificationDiagnostics> = OnceLock::new();

/// Get the global classification diagnostics tracker.
pub fn diagnostics() -> &'static ClassificationDiagnostics {
    DIAGNOSTICS.get_or_init(ClassificationDiagnostics::new)
}
