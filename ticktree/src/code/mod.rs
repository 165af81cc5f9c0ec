//! Code identity registry
//!
//! A [`CodeIdentity`] describes one observed unit of executable code: what
//! kind of code it is (packed into [`CodeFlags`]), where it came from, and an
//! optional [`SourcePositionTable`] mapping code offsets to source lines.
//!
//! Five synthetic identities stand for time that cannot be attributed to
//! user code. They are process-wide singletons compared by reference:
//!
//! | Accessor | Name | Meaning |
//! |---|---|---|
//! | [`program_entry`] | `(program)` | internal, non-script execution |
//! | [`idle_entry`] | `(idle)` | no code running |
//! | [`gc_entry`] | `(garbage collector)` | inside the collector |
//! | [`unresolved_entry`] | `(unresolved function)` | sampled location with no known code |
//! | [`root_entry`] | `(root)` | root of every call tree |

pub mod flags;
pub mod identity;
pub mod position_table;
pub mod synthetic;

pub use flags::CodeFlags;
pub use identity::{CodeIdentity, FunctionKey};
pub use position_table::SourcePositionTable;
pub use synthetic::{
    gc_entry, idle_entry, program_entry, root_entry, unresolved_entry, SyntheticKind,
};
