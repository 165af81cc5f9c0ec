//! # Shared Code-Event Vocabulary
//!
//! Defines the closed enumeration of code-event tags and the id-space constants
//! shared between a code-event source (the component that observes code being
//! created, moved and deleted) and the call-tree profiler that consumes them.
//!
//! Everything here is `no_std` so a code-event source can depend on it without
//! pulling in an allocator.
//!
//! ## Key Types
//!
//! - [`CodeEventTag`] - What kind of code event or code object a record describes
//! - [`CodeKind`] - Whether a code object is script-like or something else
//! - [`UnknownTag`] - Raw tag value outside the enumeration

#![cfg_attr(not(test), no_std)]

use core::fmt;

// ============================================================================
// Id Space Constants
// ============================================================================

/// Line number reported when no line information is available.
///
/// Source lines are 1-based, so 0 never collides with a real line.
pub const NO_LINE_NUMBER_INFO: i32 = 0;

/// Column number reported when no column information is available.
pub const NO_COLUMN_NUMBER_INFO: i32 = 0;

/// Script id of code that does not belong to any script.
pub const NO_SCRIPT_ID: i32 = 0;

/// Builtin id sentinel meaning "not a builtin".
///
/// Builtin ids are packed into 16 bits, so the largest valid id is
/// `NO_BUILTIN_ID - 1`.
pub const NO_BUILTIN_ID: u16 = u16::MAX;

// ============================================================================
// Code Event Tags
// ============================================================================

/// Closed enumeration of code-event categories.
///
/// The first block are code-lifecycle notifications, the second block tags
/// the kind of code object a record describes. `CountMarker` is the number
/// of real tags and never describes code.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CodeEventTag {
    CodeCreation = 0,
    CodeDisableOpt = 1,
    CodeMove = 2,
    CodeDelete = 3,
    CodeMovingGc = 4,
    SharedFunctionMove = 5,
    SnapshotCodeName = 6,
    Tick = 7,
    Builtin = 8,
    Callback = 9,
    Eval = 10,
    Function = 11,
    Handler = 12,
    BytecodeHandler = 13,
    LazyCompile = 14,
    #[cfg_attr(feature = "serde", serde(rename = "regexp"))]
    RegExp = 15,
    Script = 16,
    Stub = 17,
    NativeFunction = 18,
    NativeLazyCompile = 19,
    NativeScript = 20,
    InterpretedFunction = 21,
    CountMarker = 22,
}

impl CodeEventTag {
    /// Every tag, in discriminant order.
    pub const ALL: [CodeEventTag; 23] = [
        CodeEventTag::CodeCreation,
        CodeEventTag::CodeDisableOpt,
        CodeEventTag::CodeMove,
        CodeEventTag::CodeDelete,
        CodeEventTag::CodeMovingGc,
        CodeEventTag::SharedFunctionMove,
        CodeEventTag::SnapshotCodeName,
        CodeEventTag::Tick,
        CodeEventTag::Builtin,
        CodeEventTag::Callback,
        CodeEventTag::Eval,
        CodeEventTag::Function,
        CodeEventTag::Handler,
        CodeEventTag::BytecodeHandler,
        CodeEventTag::LazyCompile,
        CodeEventTag::RegExp,
        CodeEventTag::Script,
        CodeEventTag::Stub,
        CodeEventTag::NativeFunction,
        CodeEventTag::NativeLazyCompile,
        CodeEventTag::NativeScript,
        CodeEventTag::InterpretedFunction,
        CodeEventTag::CountMarker,
    ];

    /// Raw discriminant, as packed into code flags.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns true for code-lifecycle notifications (creation, move, tick...).
    #[must_use]
    pub const fn is_lifecycle_event(self) -> bool {
        (self as u8) <= (CodeEventTag::Tick as u8) || matches!(self, CodeEventTag::CountMarker)
    }

    /// Stable lowercase name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CodeEventTag::CodeCreation => "code-creation",
            CodeEventTag::CodeDisableOpt => "code-disable-opt",
            CodeEventTag::CodeMove => "code-move",
            CodeEventTag::CodeDelete => "code-delete",
            CodeEventTag::CodeMovingGc => "code-moving-gc",
            CodeEventTag::SharedFunctionMove => "shared-function-move",
            CodeEventTag::SnapshotCodeName => "snapshot-code-name",
            CodeEventTag::Tick => "tick",
            CodeEventTag::Builtin => "builtin",
            CodeEventTag::Callback => "callback",
            CodeEventTag::Eval => "eval",
            CodeEventTag::Function => "function",
            CodeEventTag::Handler => "handler",
            CodeEventTag::BytecodeHandler => "bytecode-handler",
            CodeEventTag::LazyCompile => "lazy-compile",
            CodeEventTag::RegExp => "regexp",
            CodeEventTag::Script => "script",
            CodeEventTag::Stub => "stub",
            CodeEventTag::NativeFunction => "native-function",
            CodeEventTag::NativeLazyCompile => "native-lazy-compile",
            CodeEventTag::NativeScript => "native-script",
            CodeEventTag::InterpretedFunction => "interpreted-function",
            CodeEventTag::CountMarker => "count-marker",
        }
    }
}

impl fmt::Display for CodeEventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw tag value that does not name any [`CodeEventTag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownTag(pub u8);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown code event tag {}", self.0)
    }
}

impl core::error::Error for UnknownTag {}

impl TryFrom<u8> for CodeEventTag {
    type Error = UnknownTag;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        CodeEventTag::ALL.get(usize::from(raw)).copied().ok_or(UnknownTag(raw))
    }
}

// ============================================================================
// Code Kind
// ============================================================================

/// Kind of code object behind a code identity.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CodeKind {
    /// Compiled from script source (functions, eval, top-level scripts)
    Js = 0,
    /// Everything else (stubs, builtins, handlers, synthetic entries)
    #[default]
    Other = 1,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_discriminant_order() {
        for (index, tag) in CodeEventTag::ALL.iter().enumerate() {
            assert_eq!(usize::from(tag.as_u8()), index);
        }
    }

    #[test]
    fn test_try_from_round_trips_known_tags() {
        assert_eq!(CodeEventTag::try_from(11), Ok(CodeEventTag::Function));
        assert_eq!(CodeEventTag::try_from(22), Ok(CodeEventTag::CountMarker));
    }

    #[test]
    fn test_try_from_rejects_unknown_tag() {
        assert_eq!(CodeEventTag::try_from(23), Err(UnknownTag(23)));
        assert_eq!(UnknownTag(200).to_string(), "unknown code event tag 200");
    }

    #[test]
    fn test_lifecycle_events() {
        assert!(CodeEventTag::CodeMove.is_lifecycle_event());
        assert!(CodeEventTag::Tick.is_lifecycle_event());
        assert!(CodeEventTag::CountMarker.is_lifecycle_event());
        assert!(!CodeEventTag::Builtin.is_lifecycle_event());
        assert!(!CodeEventTag::Function.is_lifecycle_event());
    }

    #[test]
    fn test_display_uses_kebab_case() {
        assert_eq!(CodeEventTag::BytecodeHandler.to_string(), "bytecode-handler");
        assert_eq!(CodeEventTag::RegExp.to_string(), "regexp");
    }
}
