//! Code offset to source line mapping.

use ticktree_common::NO_LINE_NUMBER_INFO;

/// Maps code offsets inside one code object to 1-based source lines.
///
/// Entries are appended in ascending offset order. Consecutive offsets on the
/// same line collapse into the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePositionTable {
    /// (code offset, line), sorted by offset
    pc_offsets_to_lines: Vec<(i32, i32)>,
}

impl SourcePositionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that code starting at `pc_offset` belongs to `line`.
    ///
    /// A second position for the offset that was set last is ignored.
    pub fn set_position(&mut self, pc_offset: i32, line: i32) {
        debug_assert!(pc_offset >= 0, "code offsets are non-negative");
        debug_assert!(line > 0, "source lines are 1-based");
        if let Some(&(last_offset, last_line)) = self.pc_offsets_to_lines.last() {
            if last_offset == pc_offset {
                return;
            }
            debug_assert!(
                last_offset < pc_offset,
                "positions must be set in ascending offset order"
            );
            if last_line == line {
                return;
            }
        }
        self.pc_offsets_to_lines.push((pc_offset, line));
    }

    /// Source line for a sampled code offset.
    ///
    /// Sampled offsets are return addresses, which point just past the
    /// instruction being executed, so the line of the last entry strictly
    /// before `pc_offset` wins. Offsets before the first entry map to the
    /// first line.
    #[must_use]
    pub fn source_line_number(&self, pc_offset: i32) -> i32 {
        let upper = self.pc_offsets_to_lines.partition_point(|&(offset, _)| offset < pc_offset);
        self.pc_offsets_to_lines
            .get(upper.saturating_sub(1))
            .map_or(NO_LINE_NUMBER_INFO, |&(_, line)| line)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pc_offsets_to_lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pc_offsets_to_lines.is_empty()
    }
}

impl FromIterator<(i32, i32)> for SourcePositionTable {
    fn from_iter<I: IntoIterator<Item = (i32, i32)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (pc_offset, line) in iter {
            table.set_position(pc_offset, line);
        }
        table
    }
}
