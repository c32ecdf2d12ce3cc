//! # texcaret-engine
//!
//! The LaTeX-aware editing core: a [`Document`] state container over an
//! xi-rope buffer, a cursor-context resolver, a shortcut expander, and an
//! argument/bracket navigator. Parsing comes from `texcaret-syntax`; this
//! crate decides what each keystroke does to buffer and cursor.
//!
//! The host (a TUI, a GUI textarea wrapper) feeds input events into a
//! `Document` and reads back the updated text, selection, and a
//! [`CursorContext`] for diagnostic display. Every operation is synchronous
//! and total: malformed input degrades, missing targets are no-ops, and
//! nothing here returns an error across the editing path.

pub mod context;
pub mod editing;
pub mod events;
pub mod navigate;
pub mod shortcuts;

pub use context::{resolve, ArgumentPlace, CommandContext, CursorContext};
pub use editing::{Cmd, Document, Patch};
pub use events::EditorEvent;
pub use navigate::NavEdit;
pub use shortcuts::{builtin_shortcuts, try_expand, Expansion, Shortcut};
