//! The code identity record.

use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};
use std::sync::Arc;

use ticktree_common::{
    CodeEventTag, CodeKind, NO_BUILTIN_ID, NO_COLUMN_NUMBER_INFO, NO_LINE_NUMBER_INFO,
    NO_SCRIPT_ID,
};

use super::{CodeFlags, SourcePositionTable, SyntheticKind};
use crate::domain::CodeEventError;

/// One observed unit of executable code and its reporting metadata.
///
/// Name, resource, line and column never change after construction. Builtin
/// id, script id and position may be filled in later by the code-event source
/// while samplers read them; those fields are atomics and readers observe the
/// most recent write (relaxed ordering, no cross-field consistency).
#[derive(Debug)]
pub struct CodeIdentity {
    flags: AtomicU32,
    name: Cow<'static, str>,
    resource_name: Cow<'static, str>,
    line_number: i32,
    column_number: i32,
    script_id: AtomicI32,
    position: AtomicI32,
    line_info: Option<SourcePositionTable>,
    synthetic: Option<SyntheticKind>,
}

/// Value identity of a code identity, used to merge call-tree children.
///
/// Script ids, positions and builtin ids are captured when the key is taken.
/// Named code is compared through the shared identity's immutable name,
/// resource and line, so building a key never copies strings.
#[derive(Debug, Clone)]
pub struct FunctionKey {
    kind: KeyKind,
    entry: Arc<CodeIdentity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum KeyKind {
    Synthetic(SyntheticKind),
    Script { script_id: i32, position: i32 },
    Builtin(u16),
    Named,
}

impl PartialEq for FunctionKey {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && (self.kind != KeyKind::Named || self.entry.same_location_as(&other.entry))
    }
}

impl Eq for FunctionKey {}

impl Hash for FunctionKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        if self.kind == KeyKind::Named {
            self.entry.name().hash(state);
            self.entry.resource_name().hash(state);
            self.entry.line_number.hash(state);
        }
    }
}

impl CodeIdentity {
    /// Record newly observed code. Inputs are trusted as-is.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        tag: CodeEventTag,
        name: impl Into<Cow<'static, str>>,
        resource_name: impl Into<Cow<'static, str>>,
        line_number: i32,
        column_number: i32,
        line_info: Option<SourcePositionTable>,
        is_shared_cross_origin: bool,
        code_kind: CodeKind,
    ) -> Self {
        Self {
            flags: AtomicU32::new(CodeFlags::new(tag, code_kind, is_shared_cross_origin).bits()),
            name: name.into(),
            resource_name: resource_name.into(),
            line_number,
            column_number,
            script_id: AtomicI32::new(NO_SCRIPT_ID),
            position: AtomicI32::new(0),
            line_info,
            synthetic: None,
        }
    }

    /// Code with only a tag and a name, no source location.
    #[must_use]
    pub fn named(tag: CodeEventTag, name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(
            tag,
            name,
            "",
            NO_LINE_NUMBER_INFO,
            NO_COLUMN_NUMBER_INFO,
            None,
            false,
            CodeKind::Other,
        )
    }

    /// Code whose flags arrive already packed from a code-event source.
    #[must_use]
    pub fn from_packed(
        flags: CodeFlags,
        name: impl Into<Cow<'static, str>>,
        resource_name: impl Into<Cow<'static, str>>,
        line_number: i32,
        column_number: i32,
    ) -> Self {
        Self {
            flags: AtomicU32::new(flags.bits()),
            ..Self::new(
                CodeEventTag::Function,
                name,
                resource_name,
                line_number,
                column_number,
                None,
                false,
                CodeKind::Other,
            )
        }
    }

    pub(super) fn synthetic(kind: SyntheticKind) -> Self {
        let tag = match kind {
            SyntheticKind::GarbageCollector => CodeEventTag::Builtin,
            _ => CodeEventTag::Function,
        };
        Self {
            synthetic: Some(kind),
            ..Self::named(tag, kind.entry_name())
        }
    }

    #[must_use]
    pub fn flags(&self) -> CodeFlags {
        CodeFlags::from_bits(self.flags.load(Ordering::Relaxed))
    }

    /// Decoded tag; `None` only for packed flags carrying an unknown raw tag.
    #[must_use]
    pub fn tag(&self) -> Option<CodeEventTag> {
        self.flags().tag()
    }

    #[must_use]
    pub fn raw_tag(&self) -> u8 {
        self.flags().raw_tag()
    }

    #[must_use]
    pub fn builtin_id(&self) -> Option<u16> {
        self.flags().builtin_id()
    }

    /// Mark this code as the builtin `id`. Also retags it as a builtin.
    ///
    /// # Errors
    /// Returns `BuiltinIdOutOfRange` if `id` does not fit the packed field.
    pub fn set_builtin_id(&self, id: u32) -> Result<(), CodeEventError> {
        let packed_id = u16::try_from(id)
            .ok()
            .filter(|&packed_id| packed_id != NO_BUILTIN_ID)
            .ok_or(CodeEventError::BuiltinIdOutOfRange(id))?;
        // The closure never declines, so this cannot fail.
        let _ = self.flags.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
            let flags = CodeFlags::from_bits(bits).with_tag(CodeEventTag::Builtin);
            Some(flags.with_builtin_id(packed_id).bits())
        });
        Ok(())
    }

    #[must_use]
    pub fn code_kind(&self) -> CodeKind {
        self.flags().code_kind()
    }

    #[must_use]
    pub fn is_js_function(&self) -> bool {
        self.code_kind() == CodeKind::Js
    }

    #[must_use]
    pub fn is_shared_cross_origin(&self) -> bool {
        self.flags().is_shared_cross_origin()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    #[must_use]
    pub fn line_number(&self) -> i32 {
        self.line_number
    }

    #[must_use]
    pub fn column_number(&self) -> i32 {
        self.column_number
    }

    #[must_use]
    pub fn script_id(&self) -> i32 {
        self.script_id.load(Ordering::Relaxed)
    }

    pub fn set_script_id(&self, script_id: i32) {
        self.script_id.store(script_id, Ordering::Relaxed);
    }

    /// Offset of the function inside its script.
    #[must_use]
    pub fn position(&self) -> i32 {
        self.position.load(Ordering::Relaxed)
    }

    pub fn set_position(&self, position: i32) {
        self.position.store(position, Ordering::Relaxed);
    }

    #[must_use]
    pub fn line_info(&self) -> Option<&SourcePositionTable> {
        self.line_info.as_ref()
    }

    /// Source line of a sampled offset inside this code.
    #[must_use]
    pub fn source_line(&self, pc_offset: i32) -> i32 {
        self.line_info
            .as_ref()
            .map_or(NO_LINE_NUMBER_INFO, |table| table.source_line_number(pc_offset))
    }

    /// Which synthetic category this is, if any.
    #[must_use]
    pub fn synthetic_kind(&self) -> Option<SyntheticKind> {
        self.synthetic
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic.is_some()
    }

    /// Key under which two identities describe the same function.
    ///
    /// Script-backed code is keyed by script and offset, builtins by builtin
    /// id, and everything else by name, resource and line.
    #[must_use]
    pub fn function_key(self: &Arc<Self>) -> FunctionKey {
        FunctionKey { kind: self.key_kind(), entry: Arc::clone(self) }
    }

    #[must_use]
    pub fn is_same_function_as(&self, other: &CodeIdentity) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        let kind = self.key_kind();
        kind == other.key_kind() && (kind != KeyKind::Named || self.same_location_as(other))
    }

    fn key_kind(&self) -> KeyKind {
        if let Some(kind) = self.synthetic {
            return KeyKind::Synthetic(kind);
        }
        let script_id = self.script_id();
        if script_id != NO_SCRIPT_ID {
            return KeyKind::Script { script_id, position: self.position() };
        }
        match self.builtin_id() {
            Some(id) => KeyKind::Builtin(id),
            None => KeyKind::Named,
        }
    }

    fn same_location_as(&self, other: &CodeIdentity) -> bool {
        self.line_number == other.line_number
            && self.name == other.name
            && self.resource_name == other.resource_name
    }
}
