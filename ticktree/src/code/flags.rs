//! Packed code flags.
//!
//! Tag, builtin id, code kind and the cross-origin flag share one `u32` so a
//! code identity stays small; profiles routinely hold tens of thousands.
//!
//! ```text
//!  31        26   25    24   23            8 7        0
//! ┌───────────┬─────┬─────┬────────────────┬──────────┐
//! │  unused   │ x-o │kind │   builtin id   │   tag    │
//! └───────────┴─────┴─────┴────────────────┴──────────┘
//! ```

use std::fmt;
use ticktree_common::{CodeEventTag, CodeKind, NO_BUILTIN_ID};

const TAG_MASK: u32 = 0xFF;
const BUILTIN_SHIFT: u32 = 8;
const BUILTIN_MASK: u32 = 0xFFFF << BUILTIN_SHIFT;
const KIND_BIT: u32 = 1 << 24;
const CROSS_ORIGIN_BIT: u32 = 1 << 25;

/// Tag, builtin id, code kind and cross-origin flag of a code identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeFlags(u32);

impl CodeFlags {
    /// Flags for a code object that is not (yet) known to be a builtin.
    #[must_use]
    pub fn new(tag: CodeEventTag, kind: CodeKind, is_shared_cross_origin: bool) -> Self {
        let mut bits = u32::from(tag.as_u8()) | (u32::from(NO_BUILTIN_ID) << BUILTIN_SHIFT);
        if kind == CodeKind::Other {
            bits |= KIND_BIT;
        }
        if is_shared_cross_origin {
            bits |= CROSS_ORIGIN_BIT;
        }
        Self(bits)
    }

    /// Rebuild flags from their packed form, as handed over by a code-event source.
    ///
    /// No validation happens here: a tag outside [`CodeEventTag`] survives
    /// and shows up as `None` from [`CodeFlags::tag`].
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // masked to 8 bits
    pub const fn raw_tag(self) -> u8 {
        (self.0 & TAG_MASK) as u8
    }

    /// Decoded tag, or `None` when the packed value is not a known tag.
    #[must_use]
    pub fn tag(self) -> Option<CodeEventTag> {
        CodeEventTag::try_from(self.raw_tag()).ok()
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // masked to 16 bits
    pub const fn builtin_id(self) -> Option<u16> {
        let id = ((self.0 & BUILTIN_MASK) >> BUILTIN_SHIFT) as u16;
        if id == NO_BUILTIN_ID {
            None
        } else {
            Some(id)
        }
    }

    #[must_use]
    pub const fn code_kind(self) -> CodeKind {
        if self.0 & KIND_BIT == 0 {
            CodeKind::Js
        } else {
            CodeKind::Other
        }
    }

    #[must_use]
    pub const fn is_shared_cross_origin(self) -> bool {
        self.0 & CROSS_ORIGIN_BIT != 0
    }

    #[must_use]
    pub fn with_tag(self, tag: CodeEventTag) -> Self {
        Self((self.0 & !TAG_MASK) | u32::from(tag.as_u8()))
    }

    #[must_use]
    pub fn with_builtin_id(self, id: u16) -> Self {
        Self((self.0 & !BUILTIN_MASK) | (u32::from(id) << BUILTIN_SHIFT))
    }
}

impl fmt::Debug for CodeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeFlags")
            .field("tag", &self.tag())
            .field("builtin_id", &self.builtin_id())
            .field("code_kind", &self.code_kind())
            .field("is_shared_cross_origin", &self.is_shared_cross_origin())
            .finish()
    }
}
