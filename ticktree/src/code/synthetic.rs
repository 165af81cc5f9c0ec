//! Process-wide synthetic code identities.
//!
//! Each accessor lazily builds its identity on first use and hands out the
//! same `Arc` forever after. The identities carry no per-context state, so
//! they are never torn down.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::CodeIdentity;

/// Category of a synthetic code identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntheticKind {
    Program,
    Idle,
    GarbageCollector,
    Unresolved,
    Root,
}

impl SyntheticKind {
    pub const ALL: [SyntheticKind; 5] = [
        SyntheticKind::Program,
        SyntheticKind::Idle,
        SyntheticKind::GarbageCollector,
        SyntheticKind::Unresolved,
        SyntheticKind::Root,
    ];

    /// Display name of the identity, as shown in reports.
    #[must_use]
    pub const fn entry_name(self) -> &'static str {
        match self {
            SyntheticKind::Program => "(program)",
            SyntheticKind::Idle => "(idle)",
            SyntheticKind::GarbageCollector => "(garbage collector)",
            SyntheticKind::Unresolved => "(unresolved function)",
            SyntheticKind::Root => "(root)",
        }
    }

    /// Look a category up by its display name.
    #[must_use]
    pub fn from_entry_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.entry_name() == name)
    }

    /// The singleton identity for this category.
    #[must_use]
    pub fn entry(self) -> &'static Arc<CodeIdentity> {
        match self {
            SyntheticKind::Program => program_entry(),
            SyntheticKind::Idle => idle_entry(),
            SyntheticKind::GarbageCollector => gc_entry(),
            SyntheticKind::Unresolved => unresolved_entry(),
            SyntheticKind::Root => root_entry(),
        }
    }
}

impl fmt::Display for SyntheticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entry_name())
    }
}

static PROGRAM_ENTRY: OnceLock<Arc<CodeIdentity>> = OnceLock::new();
static IDLE_ENTRY: OnceLock<Arc<CodeIdentity>> = OnceLock::new();
static GC_ENTRY: OnceLock<Arc<CodeIdentity>> = OnceLock::new();
static UNRESOLVED_ENTRY: OnceLock<Arc<CodeIdentity>> = OnceLock::new();
static ROOT_ENTRY: OnceLock<Arc<CodeIdentity>> = OnceLock::new();

fn init(
    cell: &'static OnceLock<Arc<CodeIdentity>>,
    kind: SyntheticKind,
) -> &'static Arc<CodeIdentity> {
    cell.get_or_init(|| Arc::new(CodeIdentity::synthetic(kind)))
}

/// Time spent in internal, non-script execution.
pub fn program_entry() -> &'static Arc<CodeIdentity> {
    init(&PROGRAM_ENTRY, SyntheticKind::Program)
}

/// Time with no code running.
pub fn idle_entry() -> &'static Arc<CodeIdentity> {
    init(&IDLE_ENTRY, SyntheticKind::Idle)
}

/// Time spent inside the garbage collector.
pub fn gc_entry() -> &'static Arc<CodeIdentity> {
    init(&GC_ENTRY, SyntheticKind::GarbageCollector)
}

/// A sampled location that could not be mapped to known code.
pub fn unresolved_entry() -> &'static Arc<CodeIdentity> {
    init(&UNRESOLVED_ENTRY, SyntheticKind::Unresolved)
}

/// Root of every call tree.
pub fn root_entry() -> &'static Arc<CodeIdentity> {
    init(&ROOT_ENTRY, SyntheticKind::Root)
}
